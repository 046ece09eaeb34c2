use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use crate::transport::http::auth::CurrentUser;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{
    json_422, ApiResponse, AppState, BookingRequest, ContactRequest,
};
use crate::transport::http::validate::{validate_booking, validate_contact};

#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "No such tour", body = ApiResponse)
    )
)]
pub async fn create_booking_handler(
    State(state): State<AppState>,
    request: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, "a booking object").into_response()),
    };
    let new_booking = validate_booking(&request)?;

    let booking = state.bookings.create(new_booking).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(serde_json::to_value(booking).unwrap_or_default())
                .with_message("Booking created successfully"),
        ),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/bookings",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "All bookings, newest first", body = ApiResponse),
        (status = 403, description = "Admin only", body = ApiResponse)
    )
)]
pub async fn list_bookings_handler(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let bookings = state.bookings.list().await?;
    let count = bookings.len();
    Ok(Json(ApiResponse::ok_list(
        serde_json::to_value(bookings).unwrap_or_default(),
        count,
    )))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Acknowledged", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse)
    )
)]
pub async fn contact_handler(
    request: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, "a contact form object").into_response()),
    };
    validate_contact(&request)?;

    // Nothing is persisted; the original only logged the submission.
    info!(
        name = request.name.as_deref().unwrap_or(""),
        subject = request.subject.as_deref().unwrap_or(""),
        "contact form submission"
    );
    Ok(Json(ApiResponse::message(
        "Thank you for contacting us! We will get back to you soon.",
    ))
    .into_response())
}
