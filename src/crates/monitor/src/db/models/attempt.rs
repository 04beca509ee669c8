//! Login attempt model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One recorded login request outcome
///
/// Attempts are immutable once persisted. The `id` and `attempt_time` are
/// assigned by the store at insert time, never by the client.
///
/// # Timestamps
/// All timestamp fields are RFC 3339 strings due to SQLite type limitations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoginAttempt {
    /// Auto-assigned sequence id, unique and stable
    pub id: i64,

    /// Submitted username
    pub username: String,

    /// Source IP of the request
    pub ip_address: Option<String>,

    /// Optional geo/country tag
    pub country: Option<String>,

    /// Client-type tag (e.g., "desktop", "web")
    pub client_type: Option<String>,

    /// Whether the attempt was accepted
    pub success: bool,

    /// Human-readable classification reason (server-side only; never echoed
    /// verbatim in the login response)
    pub reason: Option<String>,

    /// Server-assigned creation instant (RFC 3339 string)
    pub attempt_time: String,

    /// Client user-agent string
    pub user_agent: Option<String>,

    /// Opaque metadata document (JSON string)
    pub metadata: Option<String>,
}

/// Fields supplied by the caller when recording a new attempt
///
/// Everything the store assigns itself (`id`, `attempt_time`) is absent here.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub username: String,
    pub ip_address: Option<String>,
    pub country: Option<String>,
    pub client_type: Option<String>,
    pub success: bool,
    pub reason: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl NewAttempt {
    /// Create a new attempt with required fields
    pub fn new(username: impl Into<String>, success: bool) -> Self {
        Self {
            username: username.into(),
            ip_address: None,
            country: None,
            client_type: None,
            success,
            reason: None,
            user_agent: None,
            metadata: None,
        }
    }

    /// Builder method to set the source IP
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Builder method to set the client type
    pub fn with_client_type(mut self, client_type: impl Into<String>) -> Self {
        self.client_type = Some(client_type.into());
        self
    }

    /// Builder method to set the classification reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Builder method to set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builder method to set the country tag
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Builder method to attach opaque metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
