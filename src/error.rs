// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

use crate::database::DatabaseError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{0}")]
    BadRequest(String),
    /// First violation message from the validation engine
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists")]
    DuplicateEmail,

    // 401 Unauthorized - missing/invalid/expired token, bad login credentials
    #[error("{0}")]
    Authentication(String),

    // 401 Unauthorized - authenticated but insufficient role or ownership.
    // This API reports authorization failures as 401, not the conventional 403.
    #[error("{0}")]
    Authorization(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Authorization(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "msg": self.to_string() })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        ApiError::Authentication(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        ApiError::Authorization(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

// Store failures bubble up here; log the real cause, return a generic message
impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::NotFound(msg),
            DatabaseError::UniqueViolation { constraint } => {
                // Meaningful unique violations are intercepted at the call
                // site; anything reaching this point is unexpected.
                tracing::error!("Unhandled unique violation on constraint '{}'", constraint);
                ApiError::internal("Internal Server Error")
            }
            DatabaseError::ConfigMissing(name) => {
                tracing::error!("Missing configuration: {}", name);
                ApiError::internal("Internal Server Error")
            }
            DatabaseError::Serialization(err) => {
                tracing::error!("Document serialization failed: {}", err);
                ApiError::internal("Internal Server Error")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                tracing::error!("Database error: {}", sqlx_err);
                ApiError::internal("Internal Server Error")
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        ApiError::internal("Internal Server Error")
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::authentication("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        // Authorization failures are deliberately 401 in this design, not 403
        assert_eq!(
            ApiError::authorization("not yours").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_is_a_json_object_with_msg_only() {
        let body = ApiError::DuplicateEmail.to_json();
        assert_eq!(body, json!({ "msg": "Email already exists" }));

        let body = ApiError::bad_request("Please provide email and password").to_json();
        assert_eq!(body["msg"], "Please provide email and password");
        assert_eq!(body.as_object().unwrap().len(), 1);
    }
}
