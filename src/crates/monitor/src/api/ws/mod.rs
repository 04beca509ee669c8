//! Monitor WebSocket support
//!
//! Real-time fan-out of login attempts and statistics to connected viewers.

pub mod events;
pub mod handler;
pub mod publisher;
pub mod registry;
pub mod session;

pub use events::{EventPayload, MonitorEvent};
pub use handler::ws_handler;
pub use publisher::EventPublisher;
pub use registry::ConnectionRegistry;
pub use session::{Session, SessionId, SessionState};
