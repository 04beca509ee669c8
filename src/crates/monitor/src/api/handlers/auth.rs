//! Login endpoint handler
//!
//! Verifies credentials, persists the attempt, and hands the event to the
//! publisher. Broadcasting is fully isolated from the response: a failed or
//! slow viewer can never delay or replace the auth reply.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::AppState;
use crate::db::models::NewAttempt;
use crate::db::repositories::{AttemptRepository, IpBlockRepository};

/// Generic failure message, identical for wrong-password, unknown-user, and
/// blocked-IP outcomes. The internal classification still reaches the
/// monitors; the response must not reveal which one occurred.
const FAILURE_MESSAGE: &str = "Invalid username or password";

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default = "default_client_type")]
    pub client_type: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_client_type() -> String {
    "desktop".to_string()
}

fn default_user_agent() -> String {
    "unknown".to_string()
}

/// Login response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

/// Handle a login attempt
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    let client_ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let pool = state.db.pool();

    // A blocked source is rejected before credential verification; the
    // attempt is still recorded and broadcast so monitors see it.
    if let Some(block_reason) = IpBlockRepository::is_blocked(pool, &client_ip).await? {
        let attempt = AttemptRepository::record(
            pool,
            new_attempt(&req, &client_ip, false, &format!("ip blocked: {}", block_reason)),
        )
        .await?;
        state.publisher.publish_attempt(&attempt);

        return Ok(Json(LoginResponse {
            success: false,
            message: FAILURE_MESSAGE.to_string(),
        }));
    }

    let outcome = state.authenticator.verify(&req.username, &req.password);

    // An unreachable store here is surfaced as a structured error; the
    // attempt must be durable before anything is broadcast.
    let attempt = AttemptRepository::record(
        pool,
        new_attempt(&req, &client_ip, outcome.is_success(), outcome.reason()),
    )
    .await?;

    state.publisher.publish_attempt(&attempt);

    if !outcome.is_success() {
        maybe_block(&state, &client_ip).await;
    }

    let message = if outcome.is_success() {
        format!("Welcome, {}!", req.username)
    } else {
        FAILURE_MESSAGE.to_string()
    };

    Ok(Json(LoginResponse {
        success: outcome.is_success(),
        message,
    }))
}

fn new_attempt(req: &LoginRequest, client_ip: &str, success: bool, reason: &str) -> NewAttempt {
    NewAttempt::new(req.username.as_str(), success)
        .with_ip(client_ip)
        .with_client_type(req.client_type.as_str())
        .with_user_agent(req.user_agent.as_str())
        .with_reason(reason)
        .with_metadata(json!({
            "client_info": {
                "type": req.client_type,
                "user_agent": req.user_agent,
            }
        }))
}

/// Insert a temporary block once an IP crosses the failure threshold
///
/// Errors here are logged and swallowed: blocking is a side policy and must
/// not fail the login response.
async fn maybe_block(state: &AppState, client_ip: &str) {
    let pool = state.db.pool();
    let window = state.monitor.failed_window_minutes;

    match AttemptRepository::failed_count(pool, client_ip, window).await {
        Ok(count) if count >= state.monitor.failed_threshold => {
            let reason = format!("{} failed attempts in {} minutes", count, window);
            match IpBlockRepository::block(
                pool,
                client_ip,
                &reason,
                Some(state.monitor.block_minutes),
                false,
            )
            .await
            {
                Ok(()) => {
                    tracing::info!(ip = %client_ip, %reason, "temporary IP block added")
                }
                Err(err) => tracing::warn!(ip = %client_ip, error = %err, "IP block insert failed"),
            }
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(ip = %client_ip, error = %err, "failed-attempt count query failed"),
    }
}
