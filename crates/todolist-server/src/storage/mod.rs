//! Storage layer
//!
//! Two interchangeable `TodoStore` backends: SQLite (embedded) and a
//! single-lock in-memory registry. Exactly one is active per process.

pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;
