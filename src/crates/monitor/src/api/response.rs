//! API response helpers
//!
//! Every successful response carries the `{success, data, timestamp}`
//! envelope; listings add a `count`.

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Generic success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data
    pub data: T,
    /// Response instant (RFC 3339)
    pub timestamp: String,
}

impl<T: Serialize> SuccessResponse<T> {
    /// Create a new success response
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Success response for listings, with an item count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response items
    pub data: Vec<T>,
    /// Number of items returned
    pub count: usize,
    /// Response instant (RFC 3339)
    pub timestamp: String,
}

impl<T: Serialize> ListResponse<T> {
    /// Create a new list response
    pub fn new(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            success: true,
            data,
            count,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Create a 200 OK JSON response
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(SuccessResponse::new(data)))
}

/// Create a 200 OK JSON listing response
pub fn list<T: Serialize>(data: Vec<T>) -> impl IntoResponse {
    (StatusCode::OK, Json(ListResponse::new(data)))
}
