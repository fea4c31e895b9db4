//! Todolist Core Library
//!
//! Domain errors, input validation and the storage port shared by every
//! backend.

// Re-export pure types from todolist-types
pub use todolist_types::*;

pub mod error;
pub mod ports;
pub mod validate;

pub use error::{Result, TodoError};
pub use ports::TodoStore;
