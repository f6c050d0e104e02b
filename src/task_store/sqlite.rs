//! SQLite-based task store.
//!
//! Uniqueness of `nome` and `ordem` is enforced by the engine. The insert picks
//! its order inside the same statement, and a move runs as one transaction.

use super::{MoveDirection, Task, TaskFields, TaskStore, TaskStoreError, TaskStoreResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tarefas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome TEXT NOT NULL UNIQUE,
    custo REAL NOT NULL,
    data_limite TEXT NOT NULL,
    ordem INTEGER NOT NULL UNIQUE
);
"#;

const FILE_PRAGMAS: &str = "PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;";

const NAME_COLUMN: &str = "tarefas.nome";

pub struct SqliteTaskStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteTaskStore {
    /// Open (or create) a database file.
    pub async fn open(path: PathBuf) -> TaskStoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TaskStoreError::Storage(format!("Failed to create database dir: {}", e))
            })?;
        }

        let db_path = path.clone();
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            conn.execute_batch(FILE_PRAGMAS)?;
            conn.execute_batch(SCHEMA)?;
            Ok::<_, TaskStoreError>(conn)
        })
        .await??;

        tracing::info!("Opened task database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// Open a private in-memory database. Data lives as long as the store.
    pub async fn open_in_memory() -> TaskStoreResult<Self> {
        let conn = tokio::task::spawn_blocking(|| {
            let conn = Connection::open_in_memory()?;
            conn.execute_batch(SCHEMA)?;
            Ok::<_, TaskStoreError>(conn)
        })
        .await??;

        tracing::debug!("Opened in-memory task database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Run `f` against the connection on the blocking pool. The mutex is held
    /// for the whole closure, so each call is serialized against the others.
    async fn with_conn<T, F>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut Connection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            f(&mut conn)
        })
        .await?
    }
}

/// Map a UNIQUE violation on `nome` to `DuplicateName`; everything else is storage.
fn classify(e: rusqlite::Error, name: &str) -> TaskStoreError {
    match &e {
        rusqlite::Error::SqliteFailure(err, Some(msg))
            if err.code == ErrorCode::ConstraintViolation && msg.contains(NAME_COLUMN) =>
        {
            TaskStoreError::DuplicateName(name.to_string())
        }
        _ => TaskStoreError::from(e),
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        cost: row.get(2)?,
        due_date: row.get(3)?,
        order: row.get(4)?,
    })
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, nome, custo, data_limite, ordem FROM tarefas ORDER BY ordem ASC",
            )?;
            let tasks = stmt
                .query_map([], row_to_task)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
        .await
    }

    async fn get(&self, id: i64) -> TaskStoreResult<Option<Task>> {
        self.with_conn(move |conn| {
            let task = conn
                .query_row(
                    "SELECT id, nome, custo, data_limite, ordem FROM tarefas WHERE id = ?1",
                    [id],
                    row_to_task,
                )
                .optional()?;
            Ok(task)
        })
        .await
    }

    async fn insert(&self, fields: TaskFields) -> TaskStoreResult<Task> {
        self.with_conn(move |conn| {
            let (id, order) = conn
                .query_row(
                    "INSERT INTO tarefas (nome, custo, data_limite, ordem)
                     VALUES (?1, ?2, ?3, (SELECT IFNULL(MAX(ordem), 0) + 1 FROM tarefas))
                     RETURNING id, ordem",
                    params![fields.name, fields.cost, fields.due_date],
                    |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
                )
                .map_err(|e| classify(e, &fields.name))?;

            Ok(Task {
                id,
                name: fields.name,
                cost: fields.cost,
                due_date: fields.due_date,
                order,
            })
        })
        .await
    }

    async fn update(&self, id: i64, fields: TaskFields) -> TaskStoreResult<()> {
        self.with_conn(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE tarefas SET nome = ?1, custo = ?2, data_limite = ?3 WHERE id = ?4",
                    params![fields.name, fields.cost, fields.due_date, id],
                )
                .map_err(|e| classify(e, &fields.name))?;
            if changed == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: i64) -> TaskStoreResult<bool> {
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM tarefas WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
        .await
    }

    async fn move_task(&self, id: i64, direction: MoveDirection) -> TaskStoreResult<()> {
        self.with_conn(move |conn| {
            // Dropping the transaction on any early return rolls it back.
            let tx = conn.transaction()?;

            let current: i64 = tx
                .query_row("SELECT ordem FROM tarefas WHERE id = ?1", [id], |row| {
                    row.get(0)
                })
                .optional()?
                .ok_or(TaskStoreError::NotFound(id))?;
            let target = direction.target_order(current);
            let neighbour: i64 = tx
                .query_row("SELECT id FROM tarefas WHERE ordem = ?1", [target], |row| {
                    row.get(0)
                })
                .optional()?
                .ok_or(TaskStoreError::MoveBoundary { id, direction })?;

            // Orders are always positive, so the negated value is a free slot
            // that keeps the UNIQUE index satisfied between the two writes.
            tx.execute(
                "UPDATE tarefas SET ordem = ?1 WHERE id = ?2",
                params![-current, id],
            )?;
            tx.execute(
                "UPDATE tarefas SET ordem = ?1 WHERE id = ?2",
                params![current, neighbour],
            )?;
            tx.execute(
                "UPDATE tarefas SET ordem = ?1 WHERE id = ?2",
                params![target, id],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_stores_are_isolated() {
        let a = SqliteTaskStore::open_in_memory().await.unwrap();
        let b = SqliteTaskStore::open_in_memory().await.unwrap();
        a.insert(TaskFields::new("only in a", 1.0, "2025-01-01"))
            .await
            .unwrap();
        assert_eq!(a.list().await.unwrap().len(), 1);
        assert!(b.list().await.unwrap().is_empty());
        assert!(!a.is_persistent());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tarefas.db");

        let created = {
            let store = SqliteTaskStore::open(path.clone()).await.unwrap();
            assert!(store.is_persistent());
            store
                .insert(TaskFields::new("Rent", 1500.0, "2025-02-01"))
                .await
                .unwrap()
        };

        let reopened = tokio_test::assert_ok!(SqliteTaskStore::open(path).await);
        let tasks = reopened.list().await.unwrap();
        assert_eq!(tasks, vec![created]);

        let err = reopened
            .insert(TaskFields::new("Rent", 1.0, "2025-02-02"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskStoreError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_schema_enforces_unique_order() {
        let store = SqliteTaskStore::open_in_memory().await.unwrap();
        store
            .insert(TaskFields::new("a", 1.0, "2025-01-01"))
            .await
            .unwrap();

        let err = store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO tarefas (nome, custo, data_limite, ordem) VALUES ('b', 1.0, '2025-01-01', 1)",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap_err();
        // A collision on `ordem` is not a name conflict.
        assert!(matches!(err, TaskStoreError::Storage(_)));
    }

    #[tokio::test]
    async fn test_failed_move_leaves_no_parked_order() {
        let store = SqliteTaskStore::open_in_memory().await.unwrap();
        let only = store
            .insert(TaskFields::new("only", 1.0, "2025-01-01"))
            .await
            .unwrap();
        tokio_test::assert_err!(store.move_task(only.id, MoveDirection::Down).await);
        let task = store.get(only.id).await.unwrap().unwrap();
        assert_eq!(task.order, 1);
    }
}
