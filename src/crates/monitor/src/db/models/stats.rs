//! Derived statistics over the attempt log
//!
//! Aggregates are recomputed on demand from the store and never cached
//! authoritatively.

use serde::{Deserialize, Serialize};

/// Summary statistics over the attempt log
///
/// The trailing-window counts are computed dynamically against the store at
/// query time. A zero-valued instance stands in when the store is
/// unreachable (statistics failures are never surfaced to callers).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptStats {
    /// Total recorded attempts
    pub total_attempts: i64,
    /// Accepted attempts
    pub successful: i64,
    /// Rejected attempts
    pub failed: i64,
    /// Distinct usernames seen
    pub unique_users: i64,
    /// Distinct source IPs seen
    pub unique_ips: i64,
    /// Attempts in the trailing 10 minutes
    pub last_10_min: i64,
    /// Attempts in the trailing 30 minutes
    pub last_30_min: i64,
    /// Attempts in the trailing hour
    pub last_hour: i64,
}

/// Cumulative success/failure totals for the monitor chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub successful: i64,
    pub failed: i64,
    pub total: i64,
}
