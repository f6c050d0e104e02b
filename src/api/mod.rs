//! HTTP API for the task tracker.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET /api/tarefas` - List tasks in display order
//! - `POST /api/tarefas` - Create a task
//! - `PUT /api/tarefas/{id}` - Update a task
//! - `DELETE /api/tarefas/{id}` - Delete a task
//! - `POST /api/tarefas/{id}/move` - Swap a task with its neighbour
//!
//! Any other path is served from the static client directory.

pub mod error;
mod routes;
pub mod tasks;
pub mod types;

pub use error::ApiError;
pub use routes::{router, serve, AppState};
pub use types::*;
