//! REST API module.
//!
//! Handlers for score lookups and roster reads/updates.

mod roster;
mod score;

pub use roster::*;
pub use score::*;

use axum::{
    extract::{FromRequest, FromRequestParts, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::Config;
use crate::errors::AppError;

/// JSON body extractor whose rejections use the error envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections use the error envelope.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Reject user ids that are not on the configured allow-list.
fn ensure_allowed_user(config: &Config, user_id: &str) -> Result<(), AppError> {
    if config.is_allowed_user(user_id) {
        Ok(())
    } else {
        tracing::warn!("Rejected request for user {}", user_id);
        Err(AppError::Forbidden(format!(
            "User {} is not allowed to manage rosters",
            user_id
        )))
    }
}
