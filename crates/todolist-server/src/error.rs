//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use todolist_core::TodoError;

/// Error returned by every handler and extractor
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        let message = err.to_string();
        match err {
            TodoError::Validation(_) => ApiError::bad_request(message),
            TodoError::ListNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, "list_not_found", message)
            }
            TodoError::TaskNotFound { .. } => {
                ApiError::new(StatusCode::NOT_FOUND, "todo_not_found", message)
            }
            TodoError::Conflict(_) => ApiError::new(StatusCode::CONFLICT, "conflict", message),
            TodoError::Storage(_) => {
                tracing::error!("{}", message);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "Internal storage error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "code": self.code
        }));
        (self.status, body).into_response()
    }
}
