//! Report schedule management: create and update the per-user schedule.

use crate::report::{
    domain::{
        EmailAddress, NewReportSchedule, ReportDomainError, ReportSchedule, ReportSettings,
        compute_next_run_at,
    },
    ports::{ReportRepositoryError, ReportScheduleRepository},
};
use crate::task::domain::{TaskDomainError, UserId};
use chrono::NaiveTime;
use chrono_tz::Tz;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating or updating a report schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReportRequest {
    owner: String,
    user_mail: String,
    report_time: NaiveTime,
    timezone: String,
    enabled: bool,
}

impl ScheduleReportRequest {
    /// Creates an enabled schedule request.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        user_mail: impl Into<String>,
        report_time: NaiveTime,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            user_mail: user_mail.into(),
            report_time,
            timezone: timezone.into(),
            enabled: true,
        }
    }

    /// Sets whether the schedule participates in dispatch.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Service-level errors for schedule management.
#[derive(Debug, Error)]
pub enum ReportScheduleError {
    /// The owner identifier failed validation.
    #[error(transparent)]
    Owner(#[from] TaskDomainError),
    /// The schedule settings failed validation.
    #[error(transparent)]
    Domain(#[from] ReportDomainError),
    /// The owner already has a schedule; there is at most one per user.
    #[error("{0} has already scheduled a report; update the existing schedule instead")]
    AlreadyScheduled(UserId),
    /// The owner has no schedule to update.
    #[error("{0} has no report schedule")]
    NotScheduled(UserId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReportRepositoryError),
}

/// Result type for schedule management operations.
pub type ReportScheduleResult<T> = Result<T, ReportScheduleError>;

/// Report schedule orchestration service.
#[derive(Clone)]
pub struct ReportScheduleService<R, C>
where
    R: ReportScheduleRepository,
    C: Clock + Send + Sync,
{
    schedules: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ReportScheduleService<R, C>
where
    R: ReportScheduleRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new schedule service.
    #[must_use]
    pub const fn new(schedules: Arc<R>, clock: Arc<C>) -> Self {
        Self { schedules, clock }
    }

    /// Creates the owner's report schedule.
    ///
    /// Validation runs before any mutation: a bad timezone or email never
    /// touches the store. The next-run instant is computed from the
    /// submitted local time against the injected clock.
    ///
    /// # Errors
    ///
    /// Returns [`ReportScheduleError::AlreadyScheduled`] when the owner
    /// already has a schedule, validation errors for bad input, or
    /// repository errors.
    pub async fn schedule(
        &self,
        request: ScheduleReportRequest,
    ) -> ReportScheduleResult<ReportSchedule> {
        let owner = UserId::new(request.owner)?;
        let settings = validate_settings(
            request.user_mail,
            request.report_time,
            &request.timezone,
            request.enabled,
        )?;
        let next_run_at =
            compute_next_run_at(settings.report_time, settings.timezone, self.clock.utc())?;

        let draft = NewReportSchedule::new(owner, settings, next_run_at);
        match self.schedules.create(draft).await {
            Ok(schedule) => Ok(schedule),
            Err(ReportRepositoryError::DuplicateOwner(owner)) => {
                Err(ReportScheduleError::AlreadyScheduled(owner))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Updates the owner's existing schedule and recomputes its next-run
    /// instant.
    ///
    /// # Errors
    ///
    /// Returns [`ReportScheduleError::NotScheduled`] when the owner has no
    /// schedule, validation errors for bad input, or repository errors.
    pub async fn reschedule(
        &self,
        request: ScheduleReportRequest,
    ) -> ReportScheduleResult<ReportSchedule> {
        let owner = UserId::new(request.owner)?;
        let settings = validate_settings(
            request.user_mail,
            request.report_time,
            &request.timezone,
            request.enabled,
        )?;

        let mut schedule = self
            .schedules
            .find_by_owner(&owner)
            .await?
            .ok_or(ReportScheduleError::NotScheduled(owner))?;

        let next_run_at =
            compute_next_run_at(settings.report_time, settings.timezone, self.clock.utc())?;
        schedule.reconfigure(settings, next_run_at);
        self.schedules.update(&schedule).await?;
        Ok(schedule)
    }

    /// Returns the owner's schedule, if any.
    ///
    /// # Errors
    ///
    /// Returns validation or repository errors.
    pub async fn find(&self, owner: &str) -> ReportScheduleResult<Option<ReportSchedule>> {
        let owner = UserId::new(owner)?;
        Ok(self.schedules.find_by_owner(&owner).await?)
    }
}

fn validate_settings(
    user_mail: String,
    report_time: NaiveTime,
    timezone: &str,
    enabled: bool,
) -> Result<ReportSettings, ReportDomainError> {
    let user_mail = EmailAddress::new(user_mail)?;
    let timezone = timezone
        .parse::<Tz>()
        .map_err(|_| ReportDomainError::UnknownTimezone(timezone.to_owned()))?;
    Ok(ReportSettings {
        user_mail,
        report_time,
        timezone,
        enabled,
    })
}
