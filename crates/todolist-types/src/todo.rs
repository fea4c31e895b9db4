//! Todo item types

use serde::{Deserialize, Serialize};

use crate::{ListId, TodoId};

/// A single todo item, owned by exactly one list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub list_id: ListId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    pub fn new(id: TodoId, list_id: ListId, input: TodoInput) -> Self {
        Self {
            id,
            list_id,
            title: input.title,
            description: input.description,
            completed: input.completed,
        }
    }

    /// Replace every mutable field, keeping id and list membership
    pub fn apply(&mut self, input: TodoInput) {
        self.title = input.title;
        self.description = input.description;
        self.completed = input.completed;
    }
}

/// Mutable fields of a todo, used for both create and full update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl TodoInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_wire_format_uses_list_id_camel_case() {
        let todo = Todo::new(1, 7, TodoInput::new("Milk"));
        let json = serde_json::to_value(&todo).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["listId"], 7);
        assert_eq!(json["title"], "Milk");
        assert_eq!(json["description"], "");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn test_input_defaults() {
        let input: TodoInput = serde_json::from_str(r#"{"title": "Milk"}"#).unwrap();
        assert_eq!(input, TodoInput::new("Milk"));

        let input: TodoInput = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_empty());
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut todo = Todo::new(3, 2, TodoInput::new("Milk"));
        todo.apply(
            TodoInput::new("Oat milk")
                .with_description("2 litres")
                .completed(true),
        );

        assert_eq!(todo.id, 3);
        assert_eq!(todo.list_id, 2);
        assert_eq!(todo.title, "Oat milk");
        assert_eq!(todo.description, "2 litres");
        assert!(todo.completed);
    }
}
