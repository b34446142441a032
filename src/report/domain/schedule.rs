//! Report schedule aggregate.

use super::{EmailAddress, ReportId};
use crate::task::domain::UserId;
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// User-configurable schedule settings, shared between creation and
/// reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Recipient address.
    pub user_mail: EmailAddress,
    /// Local wall-clock fire time, no date component.
    pub report_time: NaiveTime,
    /// IANA timezone the fire time is expressed in.
    pub timezone: Tz,
    /// Whether the schedule participates in dispatch.
    pub enabled: bool,
}

/// A schedule draft awaiting its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReportSchedule {
    owner: UserId,
    settings: ReportSettings,
    next_run_at: DateTime<Utc>,
}

impl NewReportSchedule {
    /// Creates a draft with a precomputed next-run instant.
    #[must_use]
    pub const fn new(owner: UserId, settings: ReportSettings, next_run_at: DateTime<Utc>) -> Self {
        Self {
            owner,
            settings,
            next_run_at,
        }
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the schedule settings.
    #[must_use]
    pub const fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Returns the precomputed next-run instant.
    #[must_use]
    pub const fn next_run_at(&self) -> DateTime<Utc> {
        self.next_run_at
    }
}

/// Parameter object for reconstructing a persisted schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReportScheduleData {
    /// Persisted schedule identifier.
    pub id: ReportId,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted settings.
    pub settings: ReportSettings,
    /// Persisted next-run instant.
    pub next_run_at: DateTime<Utc>,
}

/// Per-user daily report schedule aggregate. At most one exists per owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSchedule {
    id: ReportId,
    owner: UserId,
    settings: ReportSettings,
    next_run_at: DateTime<Utc>,
}

impl ReportSchedule {
    /// Promotes a draft once the store assigned an id.
    #[must_use]
    pub fn from_new(id: ReportId, draft: NewReportSchedule) -> Self {
        Self {
            id,
            owner: draft.owner,
            settings: draft.settings,
            next_run_at: draft.next_run_at,
        }
    }

    /// Reconstructs a schedule from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReportScheduleData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            settings: data.settings,
            next_run_at: data.next_run_at,
        }
    }

    /// Returns the schedule identifier.
    #[must_use]
    pub const fn id(&self) -> ReportId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the recipient address.
    #[must_use]
    pub const fn user_mail(&self) -> &EmailAddress {
        &self.settings.user_mail
    }

    /// Returns the local fire time.
    #[must_use]
    pub const fn report_time(&self) -> NaiveTime {
        self.settings.report_time
    }

    /// Returns the timezone the fire time is expressed in.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.settings.timezone
    }

    /// Returns the next UTC instant the report fires.
    #[must_use]
    pub const fn next_run_at(&self) -> DateTime<Utc> {
        self.next_run_at
    }

    /// Returns whether the schedule participates in dispatch.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Replaces the settings and the recomputed next-run instant.
    pub fn reconfigure(&mut self, settings: ReportSettings, next_run_at: DateTime<Utc>) {
        self.settings = settings;
        self.next_run_at = next_run_at;
    }

    /// Moves the next-run instant, leaving the settings untouched.
    pub const fn set_next_run_at(&mut self, next_run_at: DateTime<Utc>) {
        self.next_run_at = next_run_at;
    }
}
