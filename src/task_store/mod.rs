//! Task storage module with pluggable backends.
//!
//! Supports:
//! - `sqlite`: SQLite database with engine-enforced uniqueness (default, in-memory
//!   unless a database path is configured)
//! - `memory`: In-process map (non-persistent, for testing)
//!
//! Both backends keep two invariants: `name` is unique across live tasks and
//! `order` is unique across live tasks. Every mutation that checks one of them
//! runs atomically with its write.

mod memory;
mod sqlite;

pub use memory::InMemoryTaskStore;
pub use sqlite::SqliteTaskStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// A tracked task.
///
/// Field names on the wire are the localized ones used by the browser client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "custo")]
    pub cost: f64,
    /// `YYYY-MM-DD`, stored as given.
    #[serde(rename = "data_limite")]
    pub due_date: String,
    /// Display rank, ascending. Gaps are allowed after deletions.
    #[serde(rename = "ordem")]
    pub order: i64,
}

/// The user-editable fields of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFields {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "custo")]
    pub cost: f64,
    #[serde(rename = "data_limite")]
    pub due_date: String,
}

impl TaskFields {
    pub fn new(name: impl Into<String>, cost: f64, due_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost,
            due_date: due_date.into(),
        }
    }
}

/// Direction of a move: `up` swaps with the previous order, `down` with the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    /// Order slot the task would move into.
    pub fn target_order(self, current: i64) -> i64 {
        match self {
            Self::Up => current - 1,
            Self::Down => current + 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TaskStoreError {
    #[error("A task named {0:?} already exists")]
    DuplicateName(String),

    #[error("Task {0} not found")]
    NotFound(i64),

    #[error("Task {id} cannot move {direction}: no task holds the adjacent order")]
    MoveBoundary { id: i64, direction: MoveDirection },

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for TaskStoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<tokio::task::JoinError> for TaskStoreError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Storage(format!("Task join error: {}", e))
    }
}

pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task store trait - implemented by all storage backends.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// Short backend name, reported by the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// List all tasks, ordered by `order` ascending.
    async fn list(&self) -> TaskStoreResult<Vec<Task>>;

    /// Get a single task by ID. Not routed; tests use it to inspect state.
    async fn get(&self, id: i64) -> TaskStoreResult<Option<Task>>;

    /// Create a task at the end of the ranking (max order + 1, or 1 when empty).
    async fn insert(&self, fields: TaskFields) -> TaskStoreResult<Task>;

    /// Replace name, cost and due date. The order is left untouched.
    async fn update(&self, id: i64, fields: TaskFields) -> TaskStoreResult<()>;

    /// Delete a task. Returns whether a row was removed; absence is not an error.
    async fn delete(&self, id: i64) -> TaskStoreResult<bool>;

    /// Swap the task's order with its neighbour in `direction`.
    async fn move_task(&self, id: i64, direction: MoveDirection) -> TaskStoreResult<()>;
}

pub type SharedTaskStore = Arc<dyn TaskStore>;

/// Task store type selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStoreType {
    Memory,
    #[default]
    Sqlite,
}

impl TaskStoreType {
    /// Parse an environment variable value. `None` for unrecognised names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            "sqlite" | "db" => Some(Self::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Create a task store based on type and configuration.
///
/// `database_path` only applies to the SQLite backend; `None` opens an
/// in-memory database that lives as long as the process.
pub async fn create_task_store(
    store_type: TaskStoreType,
    database_path: Option<PathBuf>,
) -> TaskStoreResult<SharedTaskStore> {
    match store_type {
        TaskStoreType::Memory => Ok(Arc::new(InMemoryTaskStore::new())),
        TaskStoreType::Sqlite => {
            let store = match database_path {
                Some(path) => SqliteTaskStore::open(path).await?,
                None => SqliteTaskStore::open_in_memory().await?,
            };
            Ok(Arc::new(store))
        }
    }
}
