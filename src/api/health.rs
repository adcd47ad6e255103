//! Service information and health endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::api::routes::ApiState;
use crate::config::{SERVICE_DESCRIPTION, SERVICE_NAME};
use crate::db;

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": SERVICE_DESCRIPTION,
        "endpoints": {
            "properties": "/api/properties",
            "analytics": "/api/analytics",
            "quarterly": "/api/quarterly",
            "health": "/health"
        }
    }))
}

/// 200 while the store answers a trivial query, 503 otherwise.
pub async fn health(State(state): State<ApiState>) -> (StatusCode, Json<Value>) {
    match db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "ok" })),
        ),
        Err(e) => {
            warn!("Health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "database": "unreachable" })),
            )
        }
    }
}
