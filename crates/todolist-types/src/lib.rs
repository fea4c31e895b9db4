//! Todolist Types - Pure data definitions shared by the store and the HTTP layer
//!
//! This crate has no runtime dependencies beyond serde so that both storage
//! backends and the request handlers agree on one wire format.

pub mod list;
pub mod todo;

pub use list::*;
pub use todo::*;

/// Identifier of a todo list, allocated by the store
pub type ListId = i64;

/// Identifier of a todo item, unique within its owning list
pub type TodoId = i64;
