use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::transport::http::auth::CurrentUser;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{ApiResponse, AppState};

#[utoipa::path(
    get,
    path = "/api/users",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "All users, redacted, newest first", body = ApiResponse),
        (status = 401, description = "Missing/expired token", body = ApiResponse),
        (status = 403, description = "Admin only", body = ApiResponse)
    )
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let users = state.auth.list_users().await?;
    let count = users.len();
    Ok(Json(ApiResponse::ok_list(
        serde_json::to_value(users).unwrap_or_default(),
        count,
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "User with borrowed books populated", body = ApiResponse),
        (status = 403, description = "Admin only", body = ApiResponse),
        (status = 404, description = "No such user", body = ApiResponse)
    )
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let profile = state.auth.profile(id).await?;
    Ok(Json(ApiResponse::ok(
        serde_json::to_value(profile).unwrap_or_default(),
    )))
}
