use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::transport::http::auth::CurrentUser;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{json_422, ApiResponse, AppState, LoginRequest, RegisterRequest};
use crate::transport::http::validate::validate_register;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created, token issued", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 409, description = "Email already taken", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn register_handler(
    State(state): State<AppState>,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, r#"{"name","email","password"}"#).into_response()),
    };
    validate_register(&request)?;

    let (user, token) = state
        .auth
        .register(&request.name, &request.email, &request.password, request.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(serde_json::json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
            "token": token,
        }))),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse),
        (status = 401, description = "Invalid credentials", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, r#"{"email","password"}"#).into_response()),
    };

    let (user, token) = state.auth.login(&request.email, &request.password).await?;

    Ok(Json(ApiResponse::ok(serde_json::json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "token": token,
    })))
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Profile with borrowed books populated", body = ApiResponse),
        (status = 401, description = "Missing/expired token", body = ApiResponse)
    )
)]
pub async fn profile_handler(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.auth.profile(user.0.id).await?;
    Ok(Json(ApiResponse::ok(serde_json::to_value(profile).unwrap_or_default())))
}
