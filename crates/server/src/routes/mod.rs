//! API route handlers
//!
//! - `health`: liveness and readiness probes
//! - `items`: the two pipeline triggers (item-created, manual recheck)

pub mod health;
pub mod items;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{ServerError, ServerResult};

/// API version and base info. Root endpoint, no authentication.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Refind Server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/v1/items",
            "/v1/items/{kind}/{id}/recheck",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 handler for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
