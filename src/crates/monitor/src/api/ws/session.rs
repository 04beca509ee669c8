//! Viewer session state and outbound queue
//!
//! A session is the registry's handle to one connected viewer: an opaque id,
//! a liveness state, and a bounded queue feeding the connection's single
//! writer task. Nothing else ever touches the transport.

use std::fmt;
use std::sync::{Arc, Mutex};

use axum::extract::ws::Message;
use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::MonitorEvent;

/// Opaque session identifier (UUID string, no business meaning)
pub type SessionId = String;

/// Session liveness state
///
/// `Connecting -> Active -> Closing -> Closed`; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake accepted, not yet registered
    Connecting,
    /// Registered and receiving events
    Active,
    /// Tearing down after an error or disconnect
    Closing,
    /// Fully released (terminal)
    Closed,
}

impl SessionState {
    /// Whether moving to `next` is a legal transition
    pub fn can_transition(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Connecting, SessionState::Active)
                | (SessionState::Connecting, SessionState::Closing)
                | (SessionState::Active, SessionState::Closing)
                | (SessionState::Closing, SessionState::Closed)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Active => write!(f, "active"),
            SessionState::Closing => write!(f, "closing"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

/// One live viewer session
///
/// Cheap to clone; clones share the state and the outbound queue.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    outbound: mpsc::Sender<Message>,
    state: Arc<Mutex<SessionState>>,
    /// Connection instant (RFC 3339)
    pub connected_at: String,
}

impl Session {
    /// Create a session in `Connecting` state together with the receiving
    /// half of its outbound queue
    ///
    /// `queue_depth` bounds how far a slow viewer may fall behind before
    /// sends to it start failing.
    pub fn channel(queue_depth: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(queue_depth);
        let session = Self {
            id: Uuid::new_v4().to_string(),
            outbound: tx,
            state: Arc::new(Mutex::new(SessionState::Connecting)),
            connected_at: Utc::now().to_rfc3339(),
        };
        (session, rx)
    }

    /// Session id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current liveness state
    pub fn state(&self) -> SessionState {
        *self.state.lock().expect("session state lock poisoned")
    }

    /// Transition to `next` if legal; returns whether the transition applied
    pub fn transition(&self, next: SessionState) -> bool {
        let mut state = self.state.lock().expect("session state lock poisoned");
        if state.can_transition(next) {
            *state = next;
            true
        } else {
            false
        }
    }

    /// Enqueue an event for this viewer
    ///
    /// Never blocks: a full queue (slow consumer) or a closed queue (viewer
    /// gone) reports failure, which callers treat as a dead session.
    pub fn send(&self, event: &MonitorEvent) -> bool {
        match event.to_json() {
            Ok(json) => self.send_raw(json),
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "event serialization failed");
                false
            }
        }
    }

    /// Enqueue pre-serialized event text
    pub(crate) fn send_raw(&self, json: String) -> bool {
        self.outbound.try_send(Message::Text(json)).is_ok()
    }
}
