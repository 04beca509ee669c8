//! HTTP API: authentication, statistics, and the monitor WebSocket channel

pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod ws;

pub use error::{ApiError, ApiResult};
pub use routes::{create_router, AppState};
