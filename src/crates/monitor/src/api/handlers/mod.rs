//! API endpoint handlers

pub mod auth;
pub mod stats;
pub mod system;

pub use auth::{login, LoginRequest, LoginResponse};
pub use stats::{get_attempts, get_blocked_ips, get_chart_data, get_stats};
pub use system::{health, service_info};
