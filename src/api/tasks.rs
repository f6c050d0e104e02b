//! Task API endpoints.
//!
//! Mounted under `/api/tarefas`:
//! - `GET /` - List tasks in display order
//! - `POST /` - Create a task at the end of the list
//! - `PUT /:id` - Replace name, cost and due date
//! - `DELETE /:id` - Delete a task (succeeds when already gone)
//! - `POST /:id/move` - Swap with the neighbour above or below

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post, put},
    Json, Router,
};

use super::error::{ApiError, Operation};
use super::routes::AppState;
use super::types::{
    CreatedTaskResponse, MessageResponse, MoveRequest, TaskListResponse, TaskRequest,
};

pub const UPDATED: &str = "Tarefa atualizada com sucesso";
pub const DELETED: &str = "Tarefa excluída com sucesso";
pub const MOVED: &str = "Ordem atualizada com sucesso";

/// Create task routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", put(update_task).delete(delete_task))
        .route("/:id/move", post(move_task))
}

/// GET /api/tarefas - List all tasks ordered by `ordem`.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let tasks = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::from_store(Operation::List, e))?;
    Ok(Json(TaskListResponse { tasks }))
}

/// POST /api/tarefas - Create a task.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<CreatedTaskResponse>, ApiError> {
    let Json(req) = body?;
    let task = state
        .store
        .insert(req)
        .await
        .map_err(|e| ApiError::from_store(Operation::Create, e))?;
    tracing::info!("Created task {} ({:?}) at order {}", task.id, task.name, task.order);
    Ok(Json(CreatedTaskResponse { task }))
}

/// PUT /api/tarefas/:id - Update a task's fields.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;
    let Json(req) = body?;
    state
        .store
        .update(id, req)
        .await
        .map_err(|e| ApiError::from_store(Operation::Update, e))?;
    tracing::info!("Updated task {}", id);
    Ok(Json(MessageResponse::new(UPDATED)))
}

/// DELETE /api/tarefas/:id - Delete a task.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;
    let removed = state
        .store
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(Operation::Delete, e))?;
    if removed {
        tracing::info!("Deleted task {}", id);
    } else {
        tracing::debug!("Delete of task {} found nothing", id);
    }
    Ok(Json(MessageResponse::new(DELETED)))
}

/// POST /api/tarefas/:id/move - Swap a task with its neighbour.
pub async fn move_task(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;
    let Json(req) = body?;
    state
        .store
        .move_task(id, req.direction)
        .await
        .map_err(|e| ApiError::from_store(Operation::Move, e))?;
    tracing::info!("Moved task {} {}", id, req.direction);
    Ok(Json(MessageResponse::new(MOVED)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{DUPLICATE_NAME, MOVE_BOUNDARY};
    use crate::config::Config;
    use crate::task_store::{InMemoryTaskStore, MoveDirection, TaskFields};
    use axum::http::StatusCode;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Config::new("public".into()),
            Arc::new(InMemoryTaskStore::new()),
        ))
    }

    async fn create(state: &Arc<AppState>, name: &str, cost: f64) -> Result<i64, ApiError> {
        let Json(created) = create_task(
            State(Arc::clone(state)),
            Ok(Json(TaskFields::new(name, cost, "2025-01-10"))),
        )
        .await?;
        Ok(created.task.id)
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = state();
        let id = create(&state, "Buy milk", 12.5).await.unwrap();

        let Json(listed) = list_tasks(State(Arc::clone(&state))).await.unwrap();
        assert_eq!(listed.tasks.len(), 1);
        assert_eq!(listed.tasks[0].id, id);
        assert_eq!(listed.tasks[0].order, 1);
    }

    #[tokio::test]
    async fn test_duplicate_create_is_bad_request() {
        let state = state();
        create(&state, "Rent", 1000.0).await.unwrap();
        let err = create(&state, "Rent", 1000.0).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, DUPLICATE_NAME);
    }

    #[tokio::test]
    async fn test_update_missing_is_server_error() {
        let state = state();
        let err = update_task(
            State(state),
            Ok(Path(99)),
            Ok(Json(TaskFields::new("x", 1.0, "2025-01-10"))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_delete_confirms_even_when_absent() {
        let Json(resp) = delete_task(State(state()), Ok(Path(5))).await.unwrap();
        assert_eq!(resp.message, DELETED);
    }

    #[tokio::test]
    async fn test_move_boundary_reports_server_error() {
        let state = state();
        let id = create(&state, "only", 1.0).await.unwrap();
        let err = move_task(
            State(state),
            Ok(Path(id)),
            Ok(Json(MoveRequest {
                direction: MoveDirection::Up,
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, MOVE_BOUNDARY);
    }
}
