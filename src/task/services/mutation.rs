//! Task mutation workflow: create, update, complete, and soft-delete.
//!
//! Every mutation that touches a priority routes through the repository's
//! cascade before the task itself is persisted, and every observed status
//! change appends exactly one history row. Each repository call commits
//! on its own: a failure aborts the remaining steps and surfaces to the
//! caller, but steps that already committed (a cascade shift, a history
//! row) stay committed.

use crate::task::{
    domain::{
        NewTask, StatusTransition, Task, TaskChanges, TaskDomainError, TaskHistory, TaskId,
        TaskStatus, TaskTitle, UserId,
    },
    ports::{TaskHistoryRepository, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner: String,
    title: String,
    description: String,
    priority: u32,
    status: TaskStatus,
    completed: bool,
}

impl CreateTaskRequest {
    /// Creates a request with default status [`TaskStatus::Pending`].
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: u32,
    ) -> Self {
        Self {
            owner: owner.into(),
            title: title.into(),
            description: description.into(),
            priority,
            status: TaskStatus::Pending,
            completed: false,
        }
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the initial completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Service-level errors for task mutations.
#[derive(Debug, Error)]
pub enum TaskMutationError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task does not exist in the owner's live set.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task mutation operations.
pub type TaskMutationResult<T> = Result<T, TaskMutationError>;

/// Task mutation orchestration service.
#[derive(Clone)]
pub struct TaskMutationService<T, H, C>
where
    T: TaskRepository,
    H: TaskHistoryRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    history: Arc<H>,
    clock: Arc<C>,
}

impl<T, H, C> TaskMutationService<T, H, C>
where
    T: TaskRepository,
    H: TaskHistoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new mutation service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, history: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            history,
            clock,
        }
    }

    /// Creates a task, cascading colliding priorities out of the way first.
    ///
    /// Create has no prior status, so no history row is written.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError`] when validation fails or the
    /// repository rejects the cascade or the insert.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskMutationResult<Task> {
        let owner = UserId::new(request.owner)?;
        let title = TaskTitle::new(request.title)?;

        self.tasks
            .cascade_priorities(&owner, request.priority, None)
            .await?;

        let draft = NewTask::new(
            owner,
            title,
            request.description,
            request.priority,
            self.clock.as_ref(),
        )
        .with_status(request.status)
        .with_completed(request.completed);

        Ok(self.tasks.create(draft).await?)
    }

    /// Updates one of the owner's live tasks.
    ///
    /// The cascade runs with the task itself excluded from the collision
    /// scan, so re-submitting a task's own priority shifts nothing. A
    /// status change appends exactly one history row; a no-op status
    /// appends none.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::NotFound`] when the task is missing
    /// from the owner's live set, or repository errors from the cascade,
    /// history append, or final write.
    pub async fn update(
        &self,
        owner: &str,
        id: TaskId,
        changes: TaskChanges,
    ) -> TaskMutationResult<Task> {
        let owner = UserId::new(owner)?;
        let mut task = self
            .tasks
            .find_by_id(&owner, id)
            .await?
            .ok_or(TaskMutationError::NotFound(id))?;

        let desired = changes.priority().unwrap_or(task.priority());
        self.tasks
            .cascade_priorities(&owner, desired, Some(id))
            .await?;

        let transition = task.apply_update(changes);
        self.record_transition(id, transition).await?;
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Marks a task completed, recording the status change.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`Self::update`].
    pub async fn complete(&self, owner: &str, id: TaskId) -> TaskMutationResult<Task> {
        let changes = TaskChanges::new()
            .with_status(TaskStatus::Completed)
            .with_completed(true);
        self.update(owner, id, changes).await
    }

    /// Soft-deletes one of the owner's live tasks.
    ///
    /// Records a transition to [`TaskStatus::Cancelled`] before marking
    /// the task deleted, unless the task was already cancelled. The row
    /// itself persists for history referential integrity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::NotFound`] when the task is missing
    /// from the owner's live set, or repository errors from the history
    /// append or final write.
    pub async fn soft_delete(&self, owner: &str, id: TaskId) -> TaskMutationResult<Task> {
        let owner = UserId::new(owner)?;
        let mut task = self
            .tasks
            .find_by_id(&owner, id)
            .await?
            .ok_or(TaskMutationError::NotFound(id))?;

        let transition = task.soft_delete();
        self.record_transition(id, transition).await?;
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Returns the owner's live tasks ordered by priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError`] when validation or the repository
    /// read fails.
    pub async fn list(&self, owner: &str) -> TaskMutationResult<Vec<Task>> {
        let owner = UserId::new(owner)?;
        Ok(self.tasks.list_live(&owner).await?)
    }

    /// Returns the owner's completed live tasks ordered by priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError`] when validation or the repository
    /// read fails.
    pub async fn list_completed(&self, owner: &str) -> TaskMutationResult<Vec<Task>> {
        let mut tasks = self.list(owner).await?;
        tasks.retain(Task::completed);
        Ok(tasks)
    }

    /// Returns the owner's not-yet-completed live tasks ordered by
    /// priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError`] when validation or the repository
    /// read fails.
    pub async fn list_pending(&self, owner: &str) -> TaskMutationResult<Vec<Task>> {
        let mut tasks = self.list(owner).await?;
        tasks.retain(|task| !task.completed());
        Ok(tasks)
    }

    /// Returns the status history of one of the owner's live tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::NotFound`] when the task is missing
    /// from the owner's live set.
    pub async fn history(&self, owner: &str, id: TaskId) -> TaskMutationResult<Vec<TaskHistory>> {
        let owner = UserId::new(owner)?;
        self.tasks
            .find_by_id(&owner, id)
            .await?
            .ok_or(TaskMutationError::NotFound(id))?;
        Ok(self.history.list_for_task(id).await?)
    }

    async fn record_transition(
        &self,
        id: TaskId,
        transition: Option<StatusTransition>,
    ) -> TaskMutationResult<()> {
        if let Some(transition) = transition {
            self.history
                .append(id, transition, self.clock.utc())
                .await?;
        }
        Ok(())
    }
}
