//! Todo list types

use serde::{Deserialize, Serialize};

use crate::{ListId, Todo};

/// A named container of todo items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// A freshly created list owns no todos
    pub fn new(id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            todos: Vec::new(),
        }
    }
}

/// Body of `POST /todolists` and `PUT /todolists/:id`
///
/// A missing title deserializes to an empty string so it is reported as a
/// validation failure rather than a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoListRequest {
    #[serde(default)]
    pub title: String,
}
