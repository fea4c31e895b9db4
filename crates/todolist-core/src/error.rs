//! Error types for the todo list service

use thiserror::Error;

use crate::{ListId, TodoId};

pub type Result<T> = std::result::Result<T, TodoError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    #[error("{0}")]
    Validation(String),

    #[error("To-Do list not found")]
    ListNotFound(ListId),

    /// The list exists but holds no todo with this id
    #[error("To-Do item not found in this list")]
    TaskNotFound { list_id: ListId, task_id: TodoId },

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl TodoError {
    pub fn validation(message: impl Into<String>) -> Self {
        TodoError::Validation(message.into())
    }

    pub fn duplicate_title() -> Self {
        TodoError::Conflict("A todo list with this title already exists".to_string())
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        TodoError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants_are_distinct() {
        let list = TodoError::ListNotFound(1);
        let task = TodoError::TaskNotFound {
            list_id: 1,
            task_id: 2,
        };

        assert_ne!(list, task);
        assert_eq!(list.to_string(), "To-Do list not found");
        assert_eq!(task.to_string(), "To-Do item not found in this list");
    }

    #[test]
    fn test_conflict_message() {
        let err = TodoError::duplicate_title();
        assert!(matches!(err, TodoError::Conflict(_)));
        assert_eq!(err.to_string(), "A todo list with this title already exists");
    }
}
