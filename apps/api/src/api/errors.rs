use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use super::validation::FieldError;
use crate::domain::errors::RepositoryError;

/// API error with HTTP status code and message
///
/// Rendered as `{status: false, message, errors?, error?}`. "Not found" is
/// deliberately a 200 with `status: false`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Vec<FieldError>,
    /// Raw error text, only set for internal errors
    pub detail: Option<String>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
            detail: None,
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 400 carrying field-level validation errors
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            ..Self::bad_request("inputs not valid")
        }
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Reports a missing record: HTTP 200 with `status: false`
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message)
    }

    /// Creates a 500 Internal Server Error carrying the raw error text
    pub fn internal_server_error(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error!")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                detail = self.detail.as_deref().unwrap_or_default(),
                "{}",
                self.message
            );
        }

        let mut body = Map::new();
        body.insert("status".to_string(), Value::Bool(false));
        body.insert("message".to_string(), Value::String(self.message));
        if !self.errors.is_empty() {
            body.insert("errors".to_string(), json!(self.errors));
        }
        if let Some(detail) = self.detail {
            body.insert("error".to_string(), Value::String(detail));
        }

        (self.status, Json(Value::Object(body))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::TeamNotFound(_) => ApiError::not_found("team not found!"),
            RepositoryError::TeamNotEmpty(_) => ApiError::bad_request("team still has players"),
            other => ApiError::internal_server_error(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(vec![FieldError::new("body", rejection.body_text())])
    }
}
