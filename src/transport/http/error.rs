//! Maps the domain error taxonomy to HTTP responses. The mapping lives here
//! so the core stays free of status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use crate::domain::error::Error;
use crate::transport::http::types::ApiResponse;

pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Unavailable(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self.0 {
            // The original sent validation failures as a list of messages.
            Error::Validation(errors) => ApiResponse {
                success: false,
                data: Some(serde_json::json!({ "errors": errors })),
                count: None,
                message: None,
                error: Some(errors.join("; ")),
            },
            Error::Storage(source) => {
                error!("storage failure: {source}");
                ApiResponse {
                    success: false,
                    data: None,
                    count: None,
                    message: None,
                    error: Some("Server error".to_string()),
                }
            }
            other => ApiResponse {
                success: false,
                data: None,
                count: None,
                message: None,
                error: Some(other.to_string()),
            },
        };

        (status, Json(body)).into_response()
    }
}
