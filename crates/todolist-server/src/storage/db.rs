//! SQLite database layer (embedded, no external dependencies)

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::path::Path;
use std::time::Duration;
use todolist_core::{
    validate, ListId, Result, Todo, TodoError, TodoId, TodoInput, TodoList, TodoStore,
};

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_path: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tracing::info!("Creating parent directory: {}", parent.display());
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        tracing::info!("SQLite connection established, creating schema...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to create database schema")?;

        tracing::info!("Database initialization complete");

        Ok(Self { pool })
    }

    /// Private in-memory database on a single connection
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(storage_error)?
            .foreign_keys(true);

        // Every connection to `:memory:` is a separate database, so keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Creates both tables, or neither.
    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        let mut tx = pool.begin().await.map_err(storage_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS lists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                list_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                completed INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (list_id) REFERENCES lists (id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(())
    }

    async fn tasks_for_list<'e, E>(executor: E, list_id: ListId) -> Result<Vec<Todo>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT id, list_id, title, description, completed
            FROM tasks WHERE list_id = ?1
            ORDER BY id
            "#,
        )
        .bind(list_id)
        .fetch_all(executor)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Explains a write that matched no task: either the list or only the todo is gone
    async fn missing_task(&self, list_id: ListId, task_id: TodoId) -> TodoError {
        match list_exists(&self.pool, list_id).await {
            Ok(true) => TodoError::TaskNotFound { list_id, task_id },
            Ok(false) => TodoError::ListNotFound(list_id),
            Err(e) => e,
        }
    }
}

async fn list_exists<'e, E>(executor: E, list_id: ListId) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM lists WHERE id = ?1)")
        .bind(list_id)
        .fetch_one(executor)
        .await
        .map_err(storage_error)
}

#[async_trait]
impl TodoStore for Database {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    // List operations
    async fn create_list(&self, title: &str) -> Result<TodoList> {
        validate::list_title(title)?;

        let id = sqlx::query(
            r#"
            INSERT INTO lists (title) VALUES (?1)
            "#,
        )
        .bind(title)
        .execute(&self.pool)
        .await
        .map_err(write_error)?
        .last_insert_rowid();

        tracing::info!("Created list {} ({})", id, title);
        Ok(TodoList::new(id, title))
    }

    async fn list_all(&self) -> Result<Vec<TodoList>> {
        let lists: Vec<ListRow> = sqlx::query_as(
            r#"
            SELECT id, title FROM lists ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let tasks: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT id, list_id, title, description, completed
            FROM tasks ORDER BY list_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut lists: Vec<TodoList> = lists.into_iter().map(|r| r.into()).collect();
        for task in tasks {
            if let Ok(idx) = lists.binary_search_by_key(&task.list_id, |l| l.id) {
                lists[idx].todos.push(task.into());
            }
        }

        Ok(lists)
    }

    async fn get_list(&self, id: ListId) -> Result<TodoList> {
        let row: Option<ListRow> = sqlx::query_as(
            r#"
            SELECT id, title FROM lists WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut list: TodoList = row.ok_or(TodoError::ListNotFound(id))?.into();
        list.todos = Self::tasks_for_list(&self.pool, id).await?;
        Ok(list)
    }

    async fn update_list(&self, id: ListId, title: &str) -> Result<TodoList> {
        validate::list_title(title)?;

        let result = sqlx::query(
            r#"
            UPDATE lists SET title = ?1 WHERE id = ?2
            "#,
        )
        .bind(title)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        if result.rows_affected() == 0 {
            return Err(TodoError::ListNotFound(id));
        }

        tracing::info!("Renamed list {} to {}", id, title);
        self.get_list(id).await
    }

    async fn delete_list(&self, id: ListId) -> Result<()> {
        // Tasks go with it through ON DELETE CASCADE
        let result = sqlx::query(
            r#"
            DELETE FROM lists WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(TodoError::ListNotFound(id));
        }

        tracing::info!("Deleted list {}", id);
        Ok(())
    }

    // Task operations
    async fn create_task(&self, list_id: ListId, input: TodoInput) -> Result<Todo> {
        if input.title.is_empty() {
            // A missing list outranks the empty title
            if !list_exists(&self.pool, list_id).await? {
                return Err(TodoError::ListNotFound(list_id));
            }
            validate::todo_title(&input.title)?;
        }

        // List existence is checked by the INSERT itself
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (list_id, title, description, completed)
            SELECT ?1, ?2, ?3, ?4
            WHERE EXISTS(SELECT 1 FROM lists WHERE id = ?1)
            "#,
        )
        .bind(list_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.completed)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(TodoError::ListNotFound(list_id));
        }
        let id = result.last_insert_rowid();

        tracing::debug!("Created todo {} in list {}", id, list_id);
        Ok(Todo::new(id, list_id, input))
    }

    async fn list_tasks(&self, list_id: ListId) -> Result<Vec<Todo>> {
        if !list_exists(&self.pool, list_id).await? {
            return Err(TodoError::ListNotFound(list_id));
        }
        Self::tasks_for_list(&self.pool, list_id).await
    }

    async fn get_task(&self, list_id: ListId, task_id: TodoId) -> Result<Todo> {
        let row: Option<TaskRow> = sqlx::query_as(
            r#"
            SELECT id, list_id, title, description, completed
            FROM tasks WHERE list_id = ?1 AND id = ?2
            "#,
        )
        .bind(list_id)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        match row {
            Some(row) => Ok(row.into()),
            None if list_exists(&self.pool, list_id).await? => {
                Err(TodoError::TaskNotFound { list_id, task_id })
            }
            None => Err(TodoError::ListNotFound(list_id)),
        }
    }

    async fn update_task(
        &self,
        list_id: ListId,
        task_id: TodoId,
        input: TodoInput,
    ) -> Result<Todo> {
        validate::todo_title(&input.title)?;

        let result = sqlx::query(
            r#"
            UPDATE tasks SET title = ?1, description = ?2, completed = ?3
            WHERE list_id = ?4 AND id = ?5
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.completed)
        .bind(list_id)
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(self.missing_task(list_id, task_id).await);
        }

        tracing::debug!("Updated todo {} in list {}", task_id, list_id);
        Ok(Todo::new(task_id, list_id, input))
    }

    async fn delete_task(&self, list_id: ListId, task_id: TodoId) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks WHERE list_id = ?1 AND id = ?2
            "#,
        )
        .bind(list_id)
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(self.missing_task(list_id, task_id).await);
        }

        tracing::debug!("Deleted todo {} from list {}", task_id, list_id);
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn storage_error(e: sqlx::Error) -> TodoError {
    TodoError::storage(e)
}

/// Like [`storage_error`], but a UNIQUE violation on the list title is a conflict
fn write_error(e: sqlx::Error) -> TodoError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            TodoError::duplicate_title()
        }
        _ => storage_error(e),
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct ListRow {
    id: i64,
    title: String,
}

impl From<ListRow> for TodoList {
    fn from(r: ListRow) -> Self {
        TodoList::new(r.id, r.title)
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    list_id: i64,
    title: String,
    description: String,
    completed: bool,
}

impl From<TaskRow> for Todo {
    fn from(r: TaskRow) -> Self {
        Todo {
            id: r.id,
            list_id: r.list_id,
            title: r.title,
            description: r.description,
            completed: r.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    async fn test_db() -> Database {
        Database::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = test_db().await;
        assert_ok!(db.create_list("Groceries").await);

        assert_ok!(Database::run_migrations(&db.pool).await);

        // Existing rows survive a second run
        let lists = assert_ok!(db.list_all().await);
        assert_eq!(lists.len(), 1);
    }

    #[tokio::test]
    async fn test_create_and_get_list() {
        let db = test_db().await;

        let list = assert_ok!(db.create_list("Groceries").await);
        assert!(list.todos.is_empty());

        let fetched = assert_ok!(db.get_list(list.id).await);
        assert_eq!(fetched.title, "Groceries");
        assert!(fetched.todos.is_empty());
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let db = test_db().await;

        let err = assert_err!(db.create_list("").await);
        assert!(matches!(err, TodoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_title_conflict() {
        let db = test_db().await;
        assert_ok!(db.create_list("Work").await);
        let home = assert_ok!(db.create_list("Home").await);

        assert_eq!(db.create_list("Work").await, Err(TodoError::duplicate_title()));
        assert_eq!(
            db.update_list(home.id, "Work").await,
            Err(TodoError::duplicate_title())
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_list() {
        let db = test_db().await;

        assert_eq!(
            db.update_list(7, "Nope").await,
            Err(TodoError::ListNotFound(7))
        );
        assert_eq!(db.delete_list(7).await, Err(TodoError::ListNotFound(7)));
    }

    #[tokio::test]
    async fn test_two_level_not_found() {
        let db = test_db().await;
        let list = assert_ok!(db.create_list("A").await);
        let missing_task = TodoError::TaskNotFound {
            list_id: list.id,
            task_id: 42,
        };

        assert_eq!(db.get_task(list.id, 42).await, Err(missing_task.clone()));
        assert_eq!(
            db.update_task(list.id, 42, TodoInput::new("x")).await,
            Err(missing_task.clone())
        );
        assert_eq!(db.delete_task(list.id, 42).await, Err(missing_task));

        assert_eq!(db.get_task(99, 1).await, Err(TodoError::ListNotFound(99)));
        assert_eq!(db.delete_task(99, 1).await, Err(TodoError::ListNotFound(99)));
        assert_eq!(
            db.update_task(99, 1, TodoInput::new("x")).await,
            Err(TodoError::ListNotFound(99))
        );
        assert_eq!(db.list_tasks(99).await, Err(TodoError::ListNotFound(99)));
        assert_eq!(
            db.create_task(99, TodoInput::new("x")).await,
            Err(TodoError::ListNotFound(99))
        );
    }

    #[tokio::test]
    async fn test_task_crud() {
        let db = test_db().await;
        let list = assert_ok!(db.create_list("A").await);

        let todo = assert_ok!(
            db.create_task(list.id, TodoInput::new("Milk").with_description("whole"))
                .await
        );
        assert_eq!(todo.list_id, list.id);
        assert_eq!(assert_ok!(db.get_task(list.id, todo.id).await), todo);

        let updated = assert_ok!(
            db.update_task(list.id, todo.id, TodoInput::new("Bread").completed(true))
                .await
        );
        assert_eq!(updated.id, todo.id);
        assert_eq!(updated.list_id, list.id);

        let fetched = assert_ok!(db.get_task(list.id, todo.id).await);
        assert_eq!(fetched.title, "Bread");
        assert_eq!(fetched.description, "");
        assert!(fetched.completed);

        assert_ok!(db.delete_task(list.id, todo.id).await);
        assert!(assert_ok!(db.list_tasks(list.id).await).is_empty());
    }

    #[tokio::test]
    async fn test_task_is_scoped_to_its_list() {
        let db = test_db().await;
        let a = assert_ok!(db.create_list("A").await);
        let b = assert_ok!(db.create_list("B").await);
        let todo = assert_ok!(db.create_task(a.id, TodoInput::new("only in A")).await);

        assert_eq!(
            db.get_task(b.id, todo.id).await,
            Err(TodoError::TaskNotFound {
                list_id: b.id,
                task_id: todo.id
            })
        );
    }

    #[tokio::test]
    async fn test_delete_list_cascades() {
        let db = test_db().await;
        let list = assert_ok!(db.create_list("A").await);
        let todo = assert_ok!(db.create_task(list.id, TodoInput::new("one")).await);
        let other = assert_ok!(db.create_list("B").await);
        assert_ok!(db.create_task(other.id, TodoInput::new("keep")).await);

        assert_ok!(db.delete_list(list.id).await);

        assert_eq!(
            db.get_task(list.id, todo.id).await,
            Err(TodoError::ListNotFound(list.id))
        );
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(remaining, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_task_writes_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");
        let db = Arc::new(Database::new(path.to_str().unwrap()).await.unwrap());
        let list = assert_ok!(db.create_list("Busy").await);
        let list_id = list.id;

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move {
                    let todo = db
                        .create_task(list_id, TodoInput::new(format!("task {}", i)))
                        .await?;
                    db.update_task(list_id, todo.id, TodoInput::new("done").completed(true))
                        .await?;
                    if i % 2 == 0 {
                        db.delete_task(list_id, todo.id).await?;
                    }
                    Ok::<_, TodoError>(())
                })
            })
            .collect();

        for handle in handles {
            assert_ok!(handle.await.unwrap());
        }

        let remaining = assert_ok!(db.list_tasks(list_id).await);
        assert_eq!(remaining.len(), 100);
        assert!(remaining.iter().all(|t| t.completed && t.title == "done"));

        db.close().await;
    }

    #[tokio::test]
    async fn test_list_all_groups_tasks() {
        let db = test_db().await;
        let a = assert_ok!(db.create_list("A").await);
        let b = assert_ok!(db.create_list("B").await);
        assert_ok!(db.create_task(b.id, TodoInput::new("b1")).await);
        assert_ok!(db.create_task(a.id, TodoInput::new("a1")).await);
        assert_ok!(db.create_task(b.id, TodoInput::new("b2")).await);

        let lists = assert_ok!(db.list_all().await);
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].todos.len(), 1);
        assert_eq!(lists[1].todos.len(), 2);
        assert!(lists[1].todos.iter().all(|t| t.list_id == b.id));
    }
}
