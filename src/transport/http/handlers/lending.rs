use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::error::Error;
use crate::domain::model::Role;
use crate::transport::http::auth::CurrentUser;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{json_422, ApiResponse, AppState, LoanRequest};

#[utoipa::path(
    post,
    path = "/api/transactions/borrow",
    request_body = LoanRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 201, description = "Loan created", body = ApiResponse),
        (status = 400, description = "No copies available", body = ApiResponse),
        (status = 404, description = "No such book", body = ApiResponse),
        (status = 409, description = "Already borrowed by this user", body = ApiResponse)
    )
)]
pub async fn borrow_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    request: Result<Json<LoanRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, r#"{"bookId": 1}"#).into_response()),
    };

    let loan = state.lending.borrow(user.0.id, request.book_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(serde_json::to_value(loan).unwrap_or_default())),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/transactions/return",
    request_body = LoanRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Loan closed", body = ApiResponse),
        (status = 404, description = "No active loan for this book", body = ApiResponse)
    )
)]
pub async fn return_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    request: Result<Json<LoanRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, r#"{"bookId": 1}"#).into_response()),
    };

    let loan = state.lending.return_book(user.0.id, request.book_id).await?;
    Ok(Json(ApiResponse::ok(serde_json::to_value(loan).unwrap_or_default())).into_response())
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "All transactions, newest first", body = ApiResponse),
        (status = 403, description = "Admin only", body = ApiResponse)
    )
)]
pub async fn list_transactions_handler(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    if user.0.role != Role::Admin {
        return Err(Error::Forbidden("Not authorized to view all transactions".to_string()).into());
    }
    let transactions = state.lending.all_transactions().await?;
    let count = transactions.len();
    Ok(Json(ApiResponse::ok_list(
        serde_json::to_value(transactions).unwrap_or_default(),
        count,
    )))
}

#[utoipa::path(
    get,
    path = "/api/transactions/user/{user_id}",
    params(("user_id" = i64, Path, description = "User id")),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "The user's transactions, newest first", body = ApiResponse),
        (status = 403, description = "Only the user themselves or an admin", body = ApiResponse)
    )
)]
pub async fn user_transactions_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    // Users see their own history; admins see anyone's.
    if user.0.id != user_id && user.0.role != Role::Admin {
        return Err(
            Error::Forbidden("Not authorized to view these transactions".to_string()).into(),
        );
    }
    let transactions = state.lending.transactions_for_user(user_id).await?;
    let count = transactions.len();
    Ok(Json(ApiResponse::ok_list(
        serde_json::to_value(transactions).unwrap_or_default(),
        count,
    )))
}
