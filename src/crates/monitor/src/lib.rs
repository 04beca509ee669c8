//! Login-attempt monitoring server
//!
//! Clients submit credentials to an authentication endpoint; every attempt
//! is persisted and broadcast in real time to connected monitor viewers
//! over a WebSocket channel, together with aggregate statistics. The
//! connection registry tolerates viewer disconnects and slow consumers
//! without ever blocking the authentication path.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
