//! Storage trait implemented by the in-memory and relational backends

use crate::{ListId, Result, Todo, TodoId, TodoInput, TodoList};
use async_trait::async_trait;

/// Todo list store
///
/// Lookups of a todo report [`TodoError::ListNotFound`] when the list is
/// missing and [`TodoError::TaskNotFound`] when only the todo is.
///
/// [`TodoError::ListNotFound`]: crate::TodoError::ListNotFound
/// [`TodoError::TaskNotFound`]: crate::TodoError::TaskNotFound
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Short backend name, reported by the health endpoint
    fn backend(&self) -> &'static str;

    async fn create_list(&self, title: &str) -> Result<TodoList>;
    async fn list_all(&self) -> Result<Vec<TodoList>>;
    async fn get_list(&self, id: ListId) -> Result<TodoList>;
    async fn update_list(&self, id: ListId, title: &str) -> Result<TodoList>;
    /// Removes the list together with all of its todos
    async fn delete_list(&self, id: ListId) -> Result<()>;

    async fn create_task(&self, list_id: ListId, input: TodoInput) -> Result<Todo>;
    async fn list_tasks(&self, list_id: ListId) -> Result<Vec<Todo>>;
    async fn get_task(&self, list_id: ListId, task_id: TodoId) -> Result<Todo>;
    async fn update_task(&self, list_id: ListId, task_id: TodoId, input: TodoInput)
        -> Result<Todo>;
    async fn delete_task(&self, list_id: ListId, task_id: TodoId) -> Result<()>;

    /// Release backend resources on shutdown
    async fn close(&self) {}
}
