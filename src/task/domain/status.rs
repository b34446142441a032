//! Task status enumeration and recorded status transitions.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a task, independent of the `completed` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is waiting to be picked up.
    Pending,
    /// Task is actively being worked on.
    InProgress,
    /// Task work has finished.
    Completed,
    /// Task has been abandoned or soft-deleted.
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An observed change between two distinct statuses.
///
/// A transition can only be constructed for statuses that actually differ,
/// so a no-op status update never yields a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    old_status: TaskStatus,
    new_status: TaskStatus,
}

impl StatusTransition {
    /// Builds a transition between two statuses, or `None` when they match.
    #[must_use]
    pub fn between(old_status: TaskStatus, new_status: TaskStatus) -> Option<Self> {
        (old_status != new_status).then_some(Self {
            old_status,
            new_status,
        })
    }

    /// Returns the status before the change.
    #[must_use]
    pub const fn old_status(&self) -> TaskStatus {
        self.old_status
    }

    /// Returns the status after the change.
    #[must_use]
    pub const fn new_status(&self) -> TaskStatus {
        self.new_status
    }
}

/// Per-status tally of an owner's live tasks, consumed by the report
/// renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Total number of live tasks.
    pub total: u64,
    /// Tasks with status `PENDING`.
    pub pending: u64,
    /// Tasks with status `IN_PROGRESS`.
    pub in_progress: u64,
    /// Tasks with status `COMPLETED`.
    pub completed: u64,
    /// Tasks with status `CANCELLED`.
    pub cancelled: u64,
}

impl StatusCounts {
    /// Tallies statuses of an owner's live tasks.
    pub fn tally(statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            counts.total += 1;
            match status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }
}
