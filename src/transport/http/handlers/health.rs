use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::storage::collections;
use crate::transport::http::types::{ApiResponse, AppState};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store readable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (store unreadable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.read_all(collections::SESSIONS).await {
        Ok(_) => (
            StatusCode::OK,
            Json(
                ApiResponse::ok(serde_json::json!({ "status": "ok" }))
                    .with_message("Tourism & Library API is running"),
            ),
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                success: false,
                data: Some(serde_json::json!({ "status": "unhealthy" })),
                count: None,
                message: None,
                error: Some(format!("store ping failed: {}", e)),
            }),
        )
            .into_response(),
    }
}
