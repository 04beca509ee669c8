//! IP block model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An IP address barred from authenticating
///
/// At most one block row exists per IP. A non-permanent block whose
/// `blocked_until` has passed is logically absent and is purged lazily on
/// the next read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IpBlock {
    /// Row id
    pub id: i64,

    /// Blocked IP address (unique)
    pub ip_address: String,

    /// Why the block was created
    pub reason: Option<String>,

    /// Expiry instant (RFC 3339 string); None for permanent blocks
    pub blocked_until: Option<String>,

    /// Permanent blocks never expire
    pub is_permanent: bool,

    /// Creation instant (RFC 3339 string)
    pub created_at: String,
}
