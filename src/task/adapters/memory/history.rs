//! In-memory append-only store for task status history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{HistoryId, StatusTransition, TaskHistory, TaskId},
    ports::{TaskHistoryRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory history repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskHistoryRepository {
    state: Arc<RwLock<InMemoryHistoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryHistoryState {
    rows: Vec<TaskHistory>,
    next_id: i64,
}

impl InMemoryTaskHistoryRepository {
    /// Creates an empty in-memory history repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned<T>(err: std::sync::PoisonError<T>) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskHistoryRepository for InMemoryTaskHistoryRepository {
    async fn append(
        &self,
        task_id: TaskId,
        transition: StatusTransition,
        recorded_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<TaskHistory> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.next_id += 1;
        let row = TaskHistory::from_parts(
            HistoryId::new(state.next_id),
            task_id,
            transition,
            recorded_at,
        );
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn list_for_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskHistory>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .rows
            .iter()
            .filter(|row| row.task_id() == task_id)
            .cloned()
            .collect())
    }
}
