//! # Tarefas
//!
//! Minimal task tracker: an HTTP JSON API over a task store, plus the clients
//! that drive it.
//!
//! ## Architecture
//!
//! ```text
//!   browser (public/) ─┐
//!                      ├──► api (axum) ──► task_store (sqlite | memory)
//!   tarefas-cli ───────┘
//! ```
//!
//! ## Modules
//! - `api`: HTTP routes, wire types and error mapping
//! - `task_store`: Task records with unique names and a swap-only ranking
//! - `client`: reqwest client for the API and terminal rendering
//! - `config`: Environment-based configuration

pub mod api;
pub mod client;
pub mod config;
pub mod task_store;

pub use config::Config;
pub use task_store::{MoveDirection, Task, TaskFields, TaskStore, TaskStoreError};
