//! API request and response types.
//!
//! Envelopes match what the browser client expects: `{tarefas: [...]}` for the
//! list, `{tarefa: {...}}` for a created task, `{message}` for confirmations and
//! `{error}` for failures.

use serde::{Deserialize, Serialize};

use crate::task_store::{MoveDirection, Task, TaskFields};

/// Body of `POST /api/tarefas` and `PUT /api/tarefas/{id}`.
pub type TaskRequest = TaskFields;

/// Body of `POST /api/tarefas/{id}/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

/// Response of `GET /api/tarefas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    #[serde(rename = "tarefas")]
    pub tasks: Vec<Task>,
}

/// Response of `POST /api/tarefas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedTaskResponse {
    #[serde(rename = "tarefa")]
    pub task: Task,
}

/// Confirmation for update, delete and move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" when the server answers
    pub status: String,

    /// Crate version
    pub version: String,

    /// Storage backend in use
    pub store: String,

    /// Whether tasks survive a restart
    pub persistent: bool,
}
