//! Event definitions and serialization for the monitor channel
//!
//! Wire format is `{"type": ..., "data": ..., "timestamp": ...}`. Events are
//! transient: they are observed by whichever sessions are live at broadcast
//! time and never stored.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::models::{AttemptStats, ChartSummary, LoginAttempt};

/// An event pushed to monitor viewers, stamped with its send time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorEvent {
    #[serde(flatten)]
    pub payload: EventPayload,
    /// Send-time instant (RFC 3339)
    pub timestamp: String,
}

/// Monitor event payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventPayload {
    /// Point-in-time snapshot pushed once per connection, before any stream
    /// events
    #[serde(rename = "init")]
    Init {
        stats: AttemptStats,
        recent_attempts: Vec<LoginAttempt>,
        chart: ChartSummary,
    },

    /// A login attempt was recorded
    #[serde(rename = "login_attempt")]
    LoginAttempt(LoginAttempt),

    /// Fresh aggregate statistics
    #[serde(rename = "stats_update")]
    StatsUpdate(AttemptStats),

    /// Heartbeat for an idle viewer
    #[serde(rename = "keep_alive")]
    KeepAlive,

    /// Reply to a client "ping" text frame
    #[serde(rename = "pong")]
    Pong,
}

impl MonitorEvent {
    fn stamped(payload: EventPayload) -> Self {
        Self {
            payload,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Build an init snapshot event
    pub fn init(
        stats: AttemptStats,
        recent_attempts: Vec<LoginAttempt>,
        chart: ChartSummary,
    ) -> Self {
        Self::stamped(EventPayload::Init {
            stats,
            recent_attempts,
            chart,
        })
    }

    /// Build a login attempt event from a persisted record
    pub fn login_attempt(attempt: LoginAttempt) -> Self {
        Self::stamped(EventPayload::LoginAttempt(attempt))
    }

    /// Build a statistics update event
    pub fn stats_update(stats: AttemptStats) -> Self {
        Self::stamped(EventPayload::StatsUpdate(stats))
    }

    /// Build a keepalive event
    pub fn keep_alive() -> Self {
        Self::stamped(EventPayload::KeepAlive)
    }

    /// Build a pong event
    pub fn pong() -> Self {
        Self::stamped(EventPayload::Pong)
    }

    /// Get event type as string
    pub fn event_type(&self) -> &'static str {
        match &self.payload {
            EventPayload::Init { .. } => "init",
            EventPayload::LoginAttempt(_) => "login_attempt",
            EventPayload::StatsUpdate(_) => "stats_update",
            EventPayload::KeepAlive => "keep_alive",
            EventPayload::Pong => "pong",
        }
    }

    /// Serialize to the wire format
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_alive_serialization() {
        let event = MonitorEvent::keep_alive();
        let json = event.to_json().unwrap();
        assert!(json.contains("\"type\":\"keep_alive\""));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_login_attempt_event() {
        let attempt = LoginAttempt {
            id: 7,
            username: "ilya".to_string(),
            ip_address: Some("127.0.0.1".to_string()),
            country: None,
            client_type: Some("desktop".to_string()),
            success: true,
            reason: Some("accepted".to_string()),
            attempt_time: "2025-08-01T00:00:00+00:00".to_string(),
            user_agent: None,
            metadata: None,
        };
        let event = MonitorEvent::login_attempt(attempt);
        assert_eq!(event.event_type(), "login_attempt");

        let json = event.to_json().unwrap();
        assert!(json.contains("\"type\":\"login_attempt\""));
        assert!(json.contains("\"username\":\"ilya\""));
    }

    #[test]
    fn test_round_trip() {
        let event = MonitorEvent::stats_update(AttemptStats::default());
        let json = event.to_json().unwrap();
        let parsed: MonitorEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.event_type(), "stats_update");
        assert_eq!(parsed.timestamp, event.timestamp);
    }

    #[test]
    fn test_init_event_shape() {
        let event = MonitorEvent::init(AttemptStats::default(), vec![], ChartSummary::default());
        let json = event.to_json().unwrap();
        assert!(json.contains("\"type\":\"init\""));
        assert!(json.contains("recent_attempts"));
        assert!(json.contains("chart"));
    }
}
