//! Diesel row models for task persistence.

use super::schema::{task_histories, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Store-assigned task identifier.
    pub id: i64,
    /// Owning user identifier.
    pub owner: String,
    /// Normalized task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Priority within the owner's live task set.
    pub priority: i64,
    /// Workflow status.
    pub status: String,
    /// Completion flag.
    pub completed: bool,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for task records; the store assigns the identifier.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Owning user identifier.
    pub owner: String,
    /// Normalized task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Priority within the owner's live task set.
    pub priority: i64,
    /// Workflow status.
    pub status: String,
    /// Completion flag.
    pub completed: bool,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for history records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_histories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Store-assigned history identifier.
    pub id: i64,
    /// Task the transition belongs to.
    pub task_id: i64,
    /// Status before the transition.
    pub old_status: String,
    /// Status after the transition.
    pub new_status: String,
    /// When the transition was recorded.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for history records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_histories)]
pub struct NewHistoryRow {
    /// Task the transition belongs to.
    pub task_id: i64,
    /// Status before the transition.
    pub old_status: String,
    /// Status after the transition.
    pub new_status: String,
    /// When the transition was recorded.
    pub updated_at: DateTime<Utc>,
}
