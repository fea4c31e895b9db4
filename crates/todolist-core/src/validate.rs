//! Required-field checks applied by every store before mutating

use crate::{Result, TodoError};

pub const LIST_TITLE_REQUIRED: &str = "Title for todo list is required";
pub const TODO_TITLE_REQUIRED: &str = "Todo title is required";

pub fn list_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(TodoError::validation(LIST_TITLE_REQUIRED));
    }
    Ok(())
}

pub fn todo_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(TodoError::validation(TODO_TITLE_REQUIRED));
    }
    Ok(())
}
