//! Handlers for todos nested under a list

use crate::error::ApiError;
use crate::extractors::{JsonBody, ListPath, TodoPath};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use todolist_core::{Todo, TodoInput};
use tracing::info;

pub async fn create(
    State(state): State<AppState>,
    ListPath(list_id): ListPath,
    JsonBody(input): JsonBody<TodoInput>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    info!("Creating todo '{}' in list {}", input.title, list_id);

    let todo = state.store.create_task(list_id, input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn list(
    State(state): State<AppState>,
    ListPath(list_id): ListPath,
) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.store.list_tasks(list_id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    path: TodoPath,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.store.get_task(path.list_id, path.todo_id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    path: TodoPath,
    JsonBody(input): JsonBody<TodoInput>,
) -> Result<Json<Todo>, ApiError> {
    info!("Updating todo {} in list {}", path.todo_id, path.list_id);

    let todo = state
        .store
        .update_task(path.list_id, path.todo_id, input)
        .await?;
    Ok(Json(todo))
}

pub async fn delete(
    State(state): State<AppState>,
    path: TodoPath,
) -> Result<StatusCode, ApiError> {
    info!("Deleting todo {} from list {}", path.todo_id, path.list_id);

    state.store.delete_task(path.list_id, path.todo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
