//! Service descriptor and health endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::api::routes::AppState;

/// Service descriptor: endpoint list and demo usernames
///
/// GET /
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": state.server_name,
        "version": crate::version(),
        "endpoints": {
            "login": "POST /api/auth/login",
            "stats": "GET /api/stats",
            "attempts": "GET /api/attempts",
            "chart_data": "GET /api/chart_data",
            "blocked_ips": "GET /api/blocked_ips",
            "websocket": "WS /ws/monitor",
        },
        "demo_users": state.authenticator.usernames(),
    }))
}

/// Liveness check, including store connectivity
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"status": "ok", "database": "connected"})),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "error", "database": "error"})),
        ),
    }
}
