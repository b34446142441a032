//! Domain model for prioritized task tracking.
//!
//! The task domain models owner-scoped prioritized tasks, their soft-delete
//! lifecycle, the priority cascade that keeps per-owner priorities unique,
//! and the append-only status history, while keeping all infrastructure
//! concerns outside of the domain boundary.

mod cascade;
mod error;
mod history;
mod ids;
mod status;
mod task;

pub use cascade::{PriorityRangeExhausted, PrioritySlot, plan_cascade};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use history::TaskHistory;
pub use ids::{HistoryId, TaskId, TaskTitle, UserId};
pub use status::{StatusCounts, StatusTransition, TaskStatus};
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges};
