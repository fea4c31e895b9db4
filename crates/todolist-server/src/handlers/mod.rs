//! HTTP handlers

pub mod health;
pub mod lists;
pub mod todos;

pub use health::health;
