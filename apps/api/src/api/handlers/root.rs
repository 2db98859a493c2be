use axum::Json;

use crate::api::response::ApiResponse;

/// GET /
pub async fn index() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("UBC App"))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
