//! Todo list handlers

use crate::error::ApiError;
use crate::extractors::{JsonBody, ListPath};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use todolist_core::{TodoList, TodoListRequest};
use tracing::{debug, info};

pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TodoListRequest>,
) -> Result<(StatusCode, Json<TodoList>), ApiError> {
    info!("Creating todo list: {}", req.title);

    let list = state.store.create_list(&req.title).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TodoList>>, ApiError> {
    let lists = state.store.list_all().await?;
    debug!("Listing {} todo lists", lists.len());
    Ok(Json(lists))
}

pub async fn get(
    State(state): State<AppState>,
    ListPath(id): ListPath,
) -> Result<Json<TodoList>, ApiError> {
    Ok(Json(state.store.get_list(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ListPath(id): ListPath,
    JsonBody(req): JsonBody<TodoListRequest>,
) -> Result<Json<TodoList>, ApiError> {
    info!("Renaming todo list {} to {}", id, req.title);

    let list = state.store.update_list(id, &req.title).await?;
    Ok(Json(list))
}

pub async fn delete(
    State(state): State<AppState>,
    ListPath(id): ListPath,
) -> Result<StatusCode, ApiError> {
    info!("Deleting todo list {}", id);

    state.store.delete_list(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
