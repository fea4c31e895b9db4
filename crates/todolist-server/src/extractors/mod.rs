//! Request extractors that reject bad input with an `ApiError`
//!
//! Malformed bodies and non-numeric ids are turned into 400 responses here,
//! before any store is touched.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use todolist_core::{ListId, TodoId};

pub const INVALID_BODY: &str = "Invalid request body";
pub const INVALID_LIST_ID: &str = "Invalid list ID format";
pub const INVALID_TODO_ID: &str = "Invalid todo ID format";
pub const INVALID_PATH: &str = "Invalid path parameters";

/// JSON request body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::bad_request(INVALID_BODY))
            }
        }
    }
}

/// `/todolists/:id` and `/todolists/:id/todos`
pub struct ListPath(pub ListId);

#[async_trait]
impl<S> FromRequestParts<S> for ListPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request(INVALID_PATH))?;
        parse_id(&raw, INVALID_LIST_ID).map(ListPath)
    }
}

/// `/todolists/:id/todos/:todo_id`
pub struct TodoPath {
    pub list_id: ListId,
    pub todo_id: TodoId,
}

#[async_trait]
impl<S> FromRequestParts<S> for TodoPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((list_raw, todo_raw)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request(INVALID_PATH))?;

        Ok(TodoPath {
            list_id: parse_id(&list_raw, INVALID_LIST_ID)?,
            todo_id: parse_id(&todo_raw, INVALID_TODO_ID)?,
        })
    }
}

fn parse_id(raw: &str, message: &'static str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::bad_request(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", INVALID_LIST_ID).unwrap(), 42);

        let err = parse_id("abc", INVALID_TODO_ID).unwrap_err();
        assert_eq!(err.message, INVALID_TODO_ID);
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unrouted_path_is_not_blamed_on_an_id() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/todolists/1/todos/2")
            .body(())
            .unwrap()
            .into_parts();

        let err = TodoPath::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.message, INVALID_PATH);

        let err = ListPath::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.message, INVALID_PATH);
    }
}
