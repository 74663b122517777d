//! Error handling module for the roster backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INVALID_GAMEWEEK: &str = "INVALID_GAMEWEEK";
    pub const UNKNOWN_PLAYER: &str = "UNKNOWN_PLAYER";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const STORE_ERROR: &str = "STORE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Authentication required
    Unauthorized(String),
    /// User id is not on the allow-list
    Forbidden(String),
    /// Validation error
    Validation(String),
    /// Requested gameweek is neither the feed's current week nor the next one
    InvalidGameweek {
        requested: String,
        current: String,
    },
    /// Player id missing from the feed snapshot
    UnknownPlayer(String),
    /// Player feed unreachable or unparsable
    Upstream(String),
    /// State store failure
    Store(String),
    /// Invalid process configuration
    Config(String),
    /// Internal server error
    Internal(String),
    /// Malformed request body or query string
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidGameweek { .. } => StatusCode::BAD_REQUEST,
            AppError::UnknownPlayer(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Forbidden(_) => codes::FORBIDDEN,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::InvalidGameweek { .. } => codes::INVALID_GAMEWEEK,
            AppError::UnknownPlayer(_) => codes::UNKNOWN_PLAYER,
            AppError::Upstream(_) => codes::UPSTREAM_ERROR,
            AppError::Store(_) => codes::STORE_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidGameweek { requested, current } => format!(
                "Gameweek {} is not available, only {} or the following week can be managed",
                requested, current
            ),
            AppError::UnknownPlayer(id) => format!("Player {} not found in the current feed", id),
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Validation(msg)
            | AppError::Upstream(msg)
            | AppError::Store(msg)
            | AppError::Config(msg)
            | AppError::Internal(msg)
            | AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Store(format!("Database error: {}", err))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        tracing::error!("Redis error: {:?}", err);
        AppError::Store(format!("Redis error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Feed request error: {:?}", err);
        AppError::Upstream(format!("Feed request failed: {}", err))
    }
}

impl From<roxmltree::Error> for AppError {
    fn from(err: roxmltree::Error) -> Self {
        tracing::error!("Feed XML error: {:?}", err);
        AppError::Upstream(format!("Feed XML is malformed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Store(format!("Stored state could not be decoded: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let details = match error {
            AppError::InvalidGameweek { requested, current } => Some(serde_json::json!({
                "requested": requested,
                "current": current,
            })),
            AppError::UnknownPlayer(id) => Some(serde_json::json!({ "playerId": id })),
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_gameweek_mapping() {
        let err = AppError::InvalidGameweek {
            requested: "7".to_string(),
            current: "5".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), codes::INVALID_GAMEWEEK);
        assert!(err.message().contains('7'));

        let body = ErrorResponse::new(&err);
        assert!(!body.success);
        assert_eq!(body.error.details.unwrap()["current"], "5");
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let err = AppError::Upstream("feed down".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "UPSTREAM_ERROR: feed down");
    }

    #[test]
    fn test_query_rejection_converts_to_bad_request() {
        #[derive(Debug, serde::Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            user_id: String,
        }

        let uri: axum::http::Uri = "/api/roster?gameweek=5".parse().unwrap();
        let rejection = axum::extract::Query::<Needs>::try_from_uri(&uri).unwrap_err();
        let err: AppError = rejection.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), codes::BAD_REQUEST);
        assert!(err.message().contains("user_id"));
    }

    #[test]
    fn test_xml_error_converts_to_upstream() {
        let err: AppError = roxmltree::Document::parse("<feed>").unwrap_err().into();
        assert_eq!(err.error_code(), codes::UPSTREAM_ERROR);
    }
}
