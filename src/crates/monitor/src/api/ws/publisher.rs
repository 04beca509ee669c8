//! Event publisher: decouples "something happened" from "tell the viewers"
//!
//! Sits between the request path and the connection registry. Publishing
//! never blocks on a viewer and never fails the caller; registry-level
//! failures shrink the live set and nothing else.

use std::sync::Arc;

use crate::db::models::AttemptStats;
use crate::db::repositories::AttemptRepository;
use crate::db::DatabaseConnection;

use super::events::MonitorEvent;
use super::registry::ConnectionRegistry;

/// Produces monitor events and hands them to the registry for fan-out
#[derive(Clone)]
pub struct EventPublisher {
    registry: Arc<ConnectionRegistry>,
    db: DatabaseConnection,
}

impl EventPublisher {
    /// Create a publisher over the given registry and store
    pub fn new(registry: Arc<ConnectionRegistry>, db: DatabaseConnection) -> Self {
        Self { registry, db }
    }

    /// Broadcast a persisted login attempt to all live viewers
    ///
    /// Called synchronously after the attempt is durably recorded; the event
    /// carries the server-assigned id and timestamp. Returns after hand-off,
    /// without awaiting any viewer. Returns the delivery count (useful in
    /// tests, ignorable elsewhere).
    pub fn publish_attempt(&self, attempt: &crate::db::models::LoginAttempt) -> usize {
        let delivered = self
            .registry
            .broadcast(&MonitorEvent::login_attempt(attempt.clone()));
        tracing::debug!(
            attempt = attempt.id,
            delivered,
            "login attempt broadcast"
        );
        delivered
    }

    /// Recompute aggregate statistics and broadcast them
    pub async fn publish_stats(&self) -> usize {
        let stats = self.snapshot_stats().await;
        self.registry.broadcast(&MonitorEvent::stats_update(stats))
    }

    /// Current aggregate statistics, degrading to zeroes on store failure
    ///
    /// A statistics failure is logged and never propagated.
    pub async fn snapshot_stats(&self) -> AttemptStats {
        match AttemptRepository::stats(self.db.pool()).await {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(error = %err, "stats query failed, using zero-valued aggregate");
                AttemptStats::default()
            }
        }
    }
}
