//! Mapping from store failures to HTTP responses.
//!
//! A name conflict or a request the extractors can't parse is a client error,
//! answered in the same `{error}` envelope. Everything else, including a move
//! that hits the end of the list and an update on a missing id, answers 500 so
//! existing clients keep seeing the status codes they were written against.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::ErrorResponse;
use crate::task_store::TaskStoreError;

pub const DUPLICATE_NAME: &str = "Já existe uma tarefa com este nome";
pub const LIST_FAILED: &str = "Erro ao listar tarefas";
pub const INSERT_FAILED: &str = "Erro ao inserir tarefa";
pub const UPDATE_FAILED: &str = "Erro ao atualizar tarefa";
pub const DELETE_FAILED: &str = "Erro ao excluir tarefa";
pub const MOVE_TASK_MISSING: &str = "Erro ao obter tarefa";
pub const MOVE_BOUNDARY: &str = "Não é possível mover nessa direção";

/// The operation a failure happened in; picks the generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
    Move,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Classify a store error raised while performing `op`.
    pub fn from_store(op: Operation, err: TaskStoreError) -> Self {
        match (&err, op) {
            (TaskStoreError::DuplicateName(name), _) => {
                tracing::debug!("Rejected duplicate task name {:?}", name);
                Self::new(StatusCode::BAD_REQUEST, DUPLICATE_NAME)
            }
            (TaskStoreError::MoveBoundary { .. }, _) => {
                tracing::debug!("{}", err);
                Self::internal(MOVE_BOUNDARY)
            }
            (TaskStoreError::NotFound(_), Operation::Move) => {
                tracing::warn!("{}", err);
                Self::internal(MOVE_TASK_MISSING)
            }
            (TaskStoreError::NotFound(_), _) => {
                tracing::warn!("{}", err);
                Self::internal(UPDATE_FAILED)
            }
            (TaskStoreError::Storage(_), op) => {
                tracing::error!("Task store failure during {:?}: {}", op, err);
                Self::internal(match op {
                    Operation::List => LIST_FAILED,
                    Operation::Create => INSERT_FAILED,
                    Operation::Update | Operation::Move => UPDATE_FAILED,
                    Operation::Delete => DELETE_FAILED,
                })
            }
        }
    }
}

/// Malformed bodies answer 400 with the extractor's reason in `{error}`.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected request path: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
