//! Repository port for report schedule persistence.

use crate::report::domain::{NewReportSchedule, ReportId, ReportSchedule};
use crate::task::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for report repository operations.
pub type ReportRepositoryResult<T> = Result<T, ReportRepositoryError>;

/// Report schedule persistence contract.
#[async_trait]
pub trait ReportScheduleRepository: Send + Sync {
    /// Stores a draft and returns the schedule with its assigned
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::DuplicateOwner`] when the owner
    /// already has a schedule.
    async fn create(&self, draft: NewReportSchedule) -> ReportRepositoryResult<ReportSchedule>;

    /// Persists changes to an existing schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::NotFound`] when the schedule does
    /// not exist.
    async fn update(&self, schedule: &ReportSchedule) -> ReportRepositoryResult<()>;

    /// Finds the owner's schedule, if any.
    async fn find_by_owner(&self, owner: &UserId)
    -> ReportRepositoryResult<Option<ReportSchedule>>;

    /// Returns all enabled schedules due at or before `now`.
    async fn find_due(&self, now: DateTime<Utc>) -> ReportRepositoryResult<Vec<ReportSchedule>>;

    /// Advances a schedule's next-run instant only when it still matches
    /// `expected`.
    ///
    /// The compare-and-swap keeps a row from being advanced twice for one
    /// firing, including by dispatchers in other processes. It does not by
    /// itself prevent a duplicate send; the dispatcher claims a row and
    /// re-checks its dueness before handing anything to the mailer.
    async fn advance_if_unchanged(
        &self,
        id: ReportId,
        expected: DateTime<Utc>,
        next_run_at: DateTime<Utc>,
    ) -> ReportRepositoryResult<bool>;
}

/// Errors returned by report repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReportRepositoryError {
    /// The owner already has a schedule.
    #[error("a report schedule already exists for {0}")]
    DuplicateOwner(UserId),

    /// The schedule was not found.
    #[error("report schedule not found: {0}")]
    NotFound(ReportId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReportRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
