//! In-memory store guarded by a single lock

use async_trait::async_trait;
use std::collections::BTreeMap;
use todolist_core::{
    validate, ListId, Result, Todo, TodoError, TodoId, TodoInput, TodoList, TodoStore,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Process-local todo list store
///
/// Every operation holds the one lock for its whole duration, so list deletes
/// and id allocation are never observed half-done.
pub struct MemoryStore {
    registry: Mutex<Registry>,
}

struct Registry {
    lists: BTreeMap<ListId, ListEntry>,
    next_list_id: ListId,
}

struct ListEntry {
    title: String,
    todos: BTreeMap<TodoId, Todo>,
    next_todo_id: TodoId,
}

impl Registry {
    fn new() -> Self {
        Self {
            lists: BTreeMap::new(),
            next_list_id: 1,
        }
    }

    fn list(&self, id: ListId) -> Result<&ListEntry> {
        self.lists.get(&id).ok_or(TodoError::ListNotFound(id))
    }

    fn list_mut(&mut self, id: ListId) -> Result<&mut ListEntry> {
        self.lists.get_mut(&id).ok_or(TodoError::ListNotFound(id))
    }

    /// Whether a list other than `except` already uses `title`
    fn title_taken(&self, title: &str, except: Option<ListId>) -> bool {
        self.lists
            .iter()
            .any(|(id, entry)| Some(*id) != except && entry.title == title)
    }
}

impl ListEntry {
    fn new(title: String) -> Self {
        Self {
            title,
            todos: BTreeMap::new(),
            next_todo_id: 1,
        }
    }

    fn snapshot(&self, id: ListId) -> TodoList {
        TodoList {
            id,
            title: self.title.clone(),
            todos: self.todos.values().cloned().collect(),
        }
    }

    fn todo_mut(&mut self, list_id: ListId, task_id: TodoId) -> Result<&mut Todo> {
        self.todos
            .get_mut(&task_id)
            .ok_or(TodoError::TaskNotFound { list_id, task_id })
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_list(&self, title: &str) -> Result<TodoList> {
        validate::list_title(title)?;

        let mut registry = self.registry.lock().await;
        if registry.title_taken(title, None) {
            return Err(TodoError::duplicate_title());
        }

        let id = registry.next_list_id;
        registry.next_list_id += 1;
        registry.lists.insert(id, ListEntry::new(title.to_string()));

        info!("Created list {} ({})", id, title);
        Ok(TodoList::new(id, title))
    }

    async fn list_all(&self) -> Result<Vec<TodoList>> {
        let registry = self.registry.lock().await;
        Ok(registry
            .lists
            .iter()
            .map(|(id, entry)| entry.snapshot(*id))
            .collect())
    }

    async fn get_list(&self, id: ListId) -> Result<TodoList> {
        let registry = self.registry.lock().await;
        registry.list(id).map(|entry| entry.snapshot(id))
    }

    async fn update_list(&self, id: ListId, title: &str) -> Result<TodoList> {
        validate::list_title(title)?;

        let mut registry = self.registry.lock().await;
        registry.list(id)?;
        if registry.title_taken(title, Some(id)) {
            return Err(TodoError::duplicate_title());
        }

        let entry = registry.list_mut(id)?;
        entry.title = title.to_string();

        info!("Renamed list {} to {}", id, title);
        Ok(entry.snapshot(id))
    }

    async fn delete_list(&self, id: ListId) -> Result<()> {
        let mut registry = self.registry.lock().await;
        let entry = registry
            .lists
            .remove(&id)
            .ok_or(TodoError::ListNotFound(id))?;

        info!("Deleted list {} with {} todos", id, entry.todos.len());
        Ok(())
    }

    async fn create_task(&self, list_id: ListId, input: TodoInput) -> Result<Todo> {
        let mut registry = self.registry.lock().await;
        let entry = registry.list_mut(list_id)?;
        validate::todo_title(&input.title)?;

        let id = entry.next_todo_id;
        entry.next_todo_id += 1;
        let todo = Todo::new(id, list_id, input);
        entry.todos.insert(id, todo.clone());

        debug!("Created todo {} in list {}", id, list_id);
        Ok(todo)
    }

    async fn list_tasks(&self, list_id: ListId) -> Result<Vec<Todo>> {
        let registry = self.registry.lock().await;
        let entry = registry.list(list_id)?;
        Ok(entry.todos.values().cloned().collect())
    }

    async fn get_task(&self, list_id: ListId, task_id: TodoId) -> Result<Todo> {
        let registry = self.registry.lock().await;
        registry
            .list(list_id)?
            .todos
            .get(&task_id)
            .cloned()
            .ok_or(TodoError::TaskNotFound { list_id, task_id })
    }

    async fn update_task(
        &self,
        list_id: ListId,
        task_id: TodoId,
        input: TodoInput,
    ) -> Result<Todo> {
        validate::todo_title(&input.title)?;

        let mut registry = self.registry.lock().await;
        let todo = registry.list_mut(list_id)?.todo_mut(list_id, task_id)?;
        todo.apply(input);

        debug!("Updated todo {} in list {}", task_id, list_id);
        Ok(todo.clone())
    }

    async fn delete_task(&self, list_id: ListId, task_id: TodoId) -> Result<()> {
        let mut registry = self.registry.lock().await;
        registry
            .list_mut(list_id)?
            .todos
            .remove(&task_id)
            .ok_or(TodoError::TaskNotFound { list_id, task_id })?;

        debug!("Deleted todo {} from list {}", task_id, list_id);
        Ok(())
    }
}
