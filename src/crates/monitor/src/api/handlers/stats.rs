//! Statistics and attempt-history endpoint handlers

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::response;
use crate::api::routes::AppState;
use crate::db::models::ChartSummary;
use crate::db::repositories::{AttemptRepository, IpBlockRepository};

/// Get aggregate statistics
///
/// GET /api/stats
///
/// Statistics failures degrade to a zero-valued aggregate; this endpoint
/// never reports a store error.
pub async fn get_stats(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let stats = state.publisher.snapshot_stats().await;
    response::ok(stats)
}

/// Query parameters for the attempt history
#[derive(Debug, Deserialize)]
pub struct AttemptsQuery {
    pub limit: Option<i64>,
}

/// Get the attempt history, newest first
///
/// GET /api/attempts?limit=N (default 100, max 1000)
pub async fn get_attempts(
    State(state): State<AppState>,
    Query(query): Query<AttemptsQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let limit = query.limit.unwrap_or(100);
    if !(1..=1000).contains(&limit) {
        return Err(ApiError::BadRequest(
            "limit must be between 1 and 1000".to_string(),
        ));
    }

    let attempts = AttemptRepository::recent(state.db.pool(), limit).await?;
    Ok(response::list(attempts))
}

/// Chart data payload: cumulative totals under a `total` key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub total: ChartSummary,
}

/// Get cumulative chart data
///
/// GET /api/chart_data
///
/// Degrades to zero totals on store failure, like the stats endpoint.
pub async fn get_chart_data(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let total = match AttemptRepository::chart_summary(state.db.pool()).await {
        Ok(chart) => chart,
        Err(err) => {
            tracing::warn!(error = %err, "chart query failed, using zero totals");
            ChartSummary::default()
        }
    };
    response::ok(ChartData { total })
}

/// List active IP blocks
///
/// GET /api/blocked_ips
pub async fn get_blocked_ips(
    State(state): State<AppState>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let blocks = IpBlockRepository::list(state.db.pool()).await?;
    Ok(response::list(blocks))
}
