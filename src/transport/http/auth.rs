//! Bearer-token extraction and role checks.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::domain::error::Error;
use crate::domain::model::{Role, User};
use crate::transport::http::error::ApiError;
use crate::transport::http::types::AppState;

/// Extractor for endpoints behind `Authorization: Bearer <token>`.
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.0.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError(Error::Forbidden(
                "Not authorized to access this resource".to_string(),
            )))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                ApiError(Error::Unauthorized("Not authorized, no token".to_string()))
            })?;

        let user = state.auth.authenticate(token).await?;
        Ok(CurrentUser(user))
    }
}
