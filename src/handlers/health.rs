// src/handlers/health.rs

use axum::{response::IntoResponse, Json};
use serde_json::json;

// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> impl IntoResponse {
    Json(json!({ "success": true, "status": "ok" }))
}
