//! Immutable audit records for task status transitions.

use super::{HistoryId, StatusTransition, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded status transition for a task.
///
/// History rows are append-only: there is no update or delete operation
/// for this entity anywhere in the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistory {
    id: HistoryId,
    task_id: TaskId,
    old_status: TaskStatus,
    new_status: TaskStatus,
    updated_at: DateTime<Utc>,
}

impl TaskHistory {
    /// Assembles a history record from its persisted parts.
    #[must_use]
    pub const fn from_parts(
        id: HistoryId,
        task_id: TaskId,
        transition: StatusTransition,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            old_status: transition.old_status(),
            new_status: transition.new_status(),
            updated_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryId {
        self.id
    }

    /// Returns the task this record belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the status before the transition.
    #[must_use]
    pub const fn old_status(&self) -> TaskStatus {
        self.old_status
    }

    /// Returns the status after the transition.
    #[must_use]
    pub const fn new_status(&self) -> TaskStatus {
        self.new_status
    }

    /// Returns when the transition was recorded.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
