//! Repository ports for task and history persistence.

use crate::task::domain::{
    NewTask, PriorityRangeExhausted, StatusCounts, StatusTransition, Task, TaskHistory, TaskId,
    UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Implementations must execute [`TaskRepository::cascade_priorities`] as
/// one atomic unit relative to concurrent cascades for the same owner: the
/// scan, the planner run, and the batch write either all commit or none
/// do, and no other cascade for that owner may interleave. Unrelated
/// owners must not contend.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a draft and returns the task with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the insert fails.
    async fn create(&self, draft: NewTask) -> TaskRepositoryResult<Task>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds one of the owner's live tasks by identifier.
    ///
    /// Returns `None` for missing, soft-deleted, or foreign-owned tasks.
    async fn find_by_id(&self, owner: &UserId, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the owner's live tasks ordered ascending by priority.
    async fn list_live(&self, owner: &UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Shifts the owner's colliding live-task priorities to free `desired`.
    ///
    /// Locks the owner's live tasks (excluding `exclude`, the task being
    /// updated) ordered by priority, runs the cascade planner and writes
    /// the shifted priorities back in one transaction. Returns the ids of
    /// the shifted tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::PriorityRangeExhausted`] when a
    /// colliding slot sits at the maximum priority and cannot shift, and
    /// [`TaskRepositoryError::Persistence`] when the batch write fails;
    /// no partial renumbering is ever visible.
    async fn cascade_priorities(
        &self,
        owner: &UserId,
        desired: u32,
        exclude: Option<TaskId>,
    ) -> TaskRepositoryResult<Vec<TaskId>>;

    /// Tallies the owner's live tasks by status.
    async fn status_counts(&self, owner: &UserId) -> TaskRepositoryResult<StatusCounts>;
}

/// Append-only persistence contract for task status history.
#[async_trait]
pub trait TaskHistoryRepository: Send + Sync {
    /// Appends one history row for an observed status transition.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the insert fails.
    async fn append(
        &self,
        task_id: TaskId,
        transition: StatusTransition,
        recorded_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<TaskHistory>;

    /// Returns a task's history ordered by recording time.
    async fn list_for_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskHistory>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A cascade could not shift a slot past the maximum priority.
    #[error(transparent)]
    PriorityRangeExhausted(#[from] PriorityRangeExhausted),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
