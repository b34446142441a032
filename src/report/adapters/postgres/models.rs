//! Diesel row models for report schedule persistence.

use super::schema::task_reports;
use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;

/// Query result row for schedule records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReportScheduleRow {
    /// Store-assigned schedule identifier.
    pub id: i64,
    /// Owning user identifier.
    pub owner: String,
    /// Recipient email address.
    pub user_mail: String,
    /// Local wall-clock fire time.
    pub report_time: NaiveTime,
    /// IANA timezone name.
    pub timezone: String,
    /// Next UTC fire instant.
    pub next_run_at: DateTime<Utc>,
    /// Dispatch participation flag.
    pub enabled: bool,
}

/// Insert model for schedule records; the store assigns the identifier.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_reports)]
pub struct NewReportScheduleRow {
    /// Owning user identifier.
    pub owner: String,
    /// Recipient email address.
    pub user_mail: String,
    /// Local wall-clock fire time.
    pub report_time: NaiveTime,
    /// IANA timezone name.
    pub timezone: String,
    /// Next UTC fire instant.
    pub next_run_at: DateTime<Utc>,
    /// Dispatch participation flag.
    pub enabled: bool,
}
