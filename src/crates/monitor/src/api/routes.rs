//! API route definitions
//!
//! Defines all routes, the shared application state, and the middleware
//! stack (permissive CORS plus request tracing).

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::{handlers, ws};
use crate::auth::Authenticator;
use crate::config::{MonitorConfig, ServerConfig};
use crate::db::DatabaseConnection;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub registry: Arc<ws::ConnectionRegistry>,
    pub publisher: ws::EventPublisher,
    pub authenticator: Arc<Authenticator>,
    pub monitor: MonitorConfig,
    pub server_name: String,
}

impl AppState {
    /// Wire up registry, publisher, and authenticator from configuration
    pub fn new(db: DatabaseConnection, config: &ServerConfig) -> Self {
        let registry = Arc::new(ws::ConnectionRegistry::new());
        let publisher = ws::EventPublisher::new(registry.clone(), db.clone());
        let authenticator = if config.auth.users.is_empty() {
            Authenticator::with_demo_users()
        } else {
            Authenticator::from_credentials(config.auth.users.clone())
        };

        Self {
            db,
            registry,
            publisher,
            authenticator: Arc::new(authenticator),
            monitor: config.monitor.clone(),
            server_name: config.server.name.clone(),
        }
    }
}

/// Build the complete API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        // Authentication endpoint
        .route("/api/auth/login", post(handlers::login))
        // Statistics and history endpoints
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/attempts", get(handlers::get_attempts))
        .route("/api/chart_data", get(handlers::get_chart_data))
        .route("/api/blocked_ips", get(handlers::get_blocked_ips))
        // Monitor channel
        .route("/ws/monitor", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
