//! Task aggregate root and mutation types.

use super::{StatusTransition, TaskId, TaskStatus, TaskTitle, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Display format for [`Task::pretty_created_at`], e.g. `Mon 05 Feb`.
const PRETTY_DATE_FORMAT: &str = "%a %d %b";

/// A task draft awaiting its store-assigned identifier.
///
/// Drafts are produced by the mutation service after validation and handed
/// to a repository, which assigns the identifier on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    owner: UserId,
    title: TaskTitle,
    description: String,
    priority: u32,
    status: TaskStatus,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates a draft with default status [`TaskStatus::Pending`] and
    /// `completed` unset.
    #[must_use]
    pub fn new(
        owner: UserId,
        title: TaskTitle,
        description: impl Into<String>,
        priority: u32,
        clock: &impl Clock,
    ) -> Self {
        Self {
            owner,
            title,
            description: description.into(),
            priority,
            status: TaskStatus::Pending,
            completed: false,
            created_at: clock.utc(),
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

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the desired priority.
    #[must_use]
    pub const fn priority(&self) -> u32 {
        self.priority
    }

    /// Returns the initial status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the initial completion flag.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: u32,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted soft-delete flag.
    pub deleted: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: UserId,
    title: TaskTitle,
    description: String,
    priority: u32,
    status: TaskStatus,
    completed: bool,
    deleted: bool,
    created_at: DateTime<Utc>,
}

impl Task {
    /// Promotes a draft to a stored task once the store assigned an id.
    #[must_use]
    pub fn from_new(id: TaskId, draft: NewTask) -> Self {
        Self {
            id,
            owner: draft.owner,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            completed: draft.completed,
            deleted: false,
            created_at: draft.created_at,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            completed: data.completed,
            deleted: data.deleted,
            created_at: data.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current priority.
    #[must_use]
    pub const fn priority(&self) -> u32 {
        self.priority
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns whether the task is flagged completed.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Returns whether the task is soft-deleted.
    #[must_use]
    pub const fn deleted(&self) -> bool {
        self.deleted
    }

    /// Returns the immutable creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the creation date in `Mon 05 Feb` form for display.
    #[must_use]
    pub fn pretty_created_at(&self) -> String {
        self.created_at.format(PRETTY_DATE_FORMAT).to_string()
    }

    /// Reassigns the priority. Callers must have run the cascade for the
    /// new value first.
    pub const fn set_priority(&mut self, priority: u32) {
        self.priority = priority;
    }

    /// Applies a set of field changes.
    ///
    /// Returns the status transition when the changes moved the task to a
    /// different status, so the caller can append exactly one history row.
    pub fn apply_update(&mut self, changes: TaskChanges) -> Option<StatusTransition> {
        let old_status = self.status;
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        StatusTransition::between(old_status, self.status)
    }

    /// Soft-deletes the task.
    ///
    /// Returns the transition to [`TaskStatus::Cancelled`] to record in the
    /// audit trail, or `None` when the task was already cancelled. The
    /// status field itself is left untouched; only the `deleted` flag
    /// changes.
    pub fn soft_delete(&mut self) -> Option<StatusTransition> {
        self.deleted = true;
        StatusTransition::between(self.status, TaskStatus::Cancelled)
    }
}

/// Field-level changes for a task update, absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    title: Option<TaskTitle>,
    description: Option<String>,
    priority: Option<u32>,
    status: Option<TaskStatus>,
    completed: Option<bool>,
}

impl TaskChanges {
    /// Creates an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            title: None,
            description: None,
            priority: None,
            status: None,
            completed: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: TaskTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Returns the requested priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<u32> {
        self.priority
    }
}
