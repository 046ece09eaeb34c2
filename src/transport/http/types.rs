use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::domain::auth::AuthService;
use crate::domain::booking::{BookingService, TourCatalog};
use crate::domain::lending::LendingService;
use crate::domain::model::{BookCategory, Role};
use crate::storage::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    pub auth: AuthService,
    pub lending: LendingService,
    pub bookings: BookingService,
    pub tours: TourCatalog,
}

/// Response envelope shared by every endpoint, matching the shape the
/// original service sent: `{ success, data?, count?, message?, error? }`.
#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        ApiResponse { success: true, data: Some(data), count: None, message: None, error: None }
    }

    pub fn ok_list(data: JsonValue, count: usize) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            count: Some(count),
            message: None,
            error: None,
        }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: None,
            count: None,
            message: Some(msg.into()),
            error: None,
        }
    }

    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse {
            success: false,
            data: None,
            count: None,
            message: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: BookCategory,
    pub description: String,
    pub quantity: i64,
    /// Defaults to `quantity` when omitted.
    #[serde(default)]
    pub available: Option<i64>,
}

/// Partial update; absent fields keep their stored values. The record id can
/// never be patched.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub category: Option<BookCategory>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub available: Option<i64>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub book_id: i64,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Accepts an integer or a numeric string, like the original form posts.
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub tour_id: Option<JsonValue>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub travelers: Option<i64>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
