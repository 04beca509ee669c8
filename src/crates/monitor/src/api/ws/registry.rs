//! Connection registry: the live set of monitor viewers
//!
//! Explicitly constructed and injected into both the WebSocket handler and
//! the event publisher; there is no ambient global. All mutation goes
//! through DashMap, so register/unregister/broadcast are safe under
//! concurrent callers, and no lock is ever held across network I/O (sends
//! only enqueue into per-session queues).

use dashmap::DashMap;

use super::events::MonitorEvent;
use super::session::{Session, SessionId, SessionState};

/// Tracks currently-live viewer sessions and fans events out to them
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: DashMap<SessionId, Session>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Add a session to the live set, activating it
    pub fn register(&self, session: Session) {
        session.transition(SessionState::Active);
        self.sessions.insert(session.id().to_string(), session);
    }

    /// Remove a session from the live set
    ///
    /// Idempotent: removing an absent session is a no-op. Returns whether
    /// this call performed the removal, so racing cleanup paths resolve to
    /// exactly one winner.
    pub fn unregister(&self, id: &str) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                session.transition(SessionState::Closing);
                session.transition(SessionState::Closed);
                true
            }
            None => false,
        }
    }

    /// Deliver an event to every live session, best-effort
    ///
    /// The event is serialized once. A recipient that fails (full queue or
    /// closed channel) is unregistered and cannot affect delivery to the
    /// rest or the caller. Returns the number of sessions that accepted the
    /// event.
    pub fn broadcast(&self, event: &MonitorEvent) -> usize {
        let json = match event.to_json() {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "dropping unserializable broadcast event");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut dead: Vec<SessionId> = Vec::new();
        // Removal happens after iteration; removing from a DashMap shard
        // while iterating it can deadlock.
        for entry in self.sessions.iter() {
            if entry.value().send_raw(json.clone()) {
                delivered += 1;
            } else {
                dead.push(entry.key().clone());
            }
        }

        for id in dead {
            if self.unregister(&id) {
                tracing::debug!(session = %id, "dropped unresponsive monitor session");
            }
        }

        delivered
    }

    /// Deliver an event to one session
    ///
    /// Same failure isolation as `broadcast`: a failed send unregisters
    /// that session only. Returns whether the event was accepted.
    pub fn send_to(&self, id: &str, event: &MonitorEvent) -> bool {
        let sent = match self.sessions.get(id) {
            Some(session) => session.send(event),
            None => return false,
        };

        if !sent && self.unregister(id) {
            tracing::debug!(session = %id, "dropped unresponsive monitor session");
        }
        sent
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are live
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
