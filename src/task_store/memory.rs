//! In-memory task store (non-persistent).

use super::{MoveDirection, Task, TaskFields, TaskStore, TaskStoreError, TaskStoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

impl State {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.tasks
            .values()
            .any(|t| t.name == name && Some(t.id) != except)
    }

    fn id_at_order(&self, order: i64) -> Option<i64> {
        self.tasks.values().find(|t| t.order == order).map(|t| t.id)
    }
}

/// Every mutation takes the single write guard, so the uniqueness check and
/// the write it protects can't interleave with another request.
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    fn is_persistent(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self.state.read().await.tasks.values().cloned().collect();
        tasks.sort_by_key(|t| t.order);
        Ok(tasks)
    }

    async fn get(&self, id: i64) -> TaskStoreResult<Option<Task>> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn insert(&self, fields: TaskFields) -> TaskStoreResult<Task> {
        let mut state = self.state.write().await;
        if state.name_taken(&fields.name, None) {
            return Err(TaskStoreError::DuplicateName(fields.name));
        }

        state.next_id += 1;
        let order = state.tasks.values().map(|t| t.order).max().unwrap_or(0) + 1;
        let task = Task {
            id: state.next_id,
            name: fields.name,
            cost: fields.cost,
            due_date: fields.due_date,
            order,
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, id: i64, fields: TaskFields) -> TaskStoreResult<()> {
        let mut state = self.state.write().await;
        if !state.tasks.contains_key(&id) {
            return Err(TaskStoreError::NotFound(id));
        }
        if state.name_taken(&fields.name, Some(id)) {
            return Err(TaskStoreError::DuplicateName(fields.name));
        }

        if let Some(task) = state.tasks.get_mut(&id) {
            task.name = fields.name;
            task.cost = fields.cost;
            task.due_date = fields.due_date;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> TaskStoreResult<bool> {
        Ok(self.state.write().await.tasks.remove(&id).is_some())
    }

    async fn move_task(&self, id: i64, direction: MoveDirection) -> TaskStoreResult<()> {
        let mut state = self.state.write().await;
        let current = state
            .tasks
            .get(&id)
            .map(|t| t.order)
            .ok_or(TaskStoreError::NotFound(id))?;
        let target = direction.target_order(current);
        let neighbour = state
            .id_at_order(target)
            .ok_or(TaskStoreError::MoveBoundary { id, direction })?;

        if let Some(task) = state.tasks.get_mut(&id) {
            task.order = target;
        }
        if let Some(task) = state.tasks.get_mut(&neighbour) {
            task.order = current;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryTaskStore::new();
        let a = store
            .insert(TaskFields::new("a", 1.0, "2025-01-01"))
            .await
            .unwrap();
        store.delete(a.id).await.unwrap();
        let b = store
            .insert(TaskFields::new("b", 1.0, "2025-01-01"))
            .await
            .unwrap();
        assert!(b.id > a.id);
        assert_eq!(b.order, 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryTaskStore::new();
        let other = store.clone();
        store
            .insert(TaskFields::new("shared", 1.0, "2025-01-01"))
            .await
            .unwrap();
        assert_eq!(other.list().await.unwrap().len(), 1);
        assert!(!other.is_persistent());
    }
}
