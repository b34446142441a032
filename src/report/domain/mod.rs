//! Domain model for scheduled daily task reports.
//!
//! Models the per-user report schedule, the conversion of a local
//! wall-clock fire time into the next absolute UTC instant, and the fixed
//! advance rule applied after each successful send.

mod error;
mod ids;
mod next_run;
mod schedule;

pub use error::ReportDomainError;
pub use ids::{EmailAddress, ReportId};
pub use next_run::{advance_after_fire, compute_next_run_at};
pub use schedule::{
    NewReportSchedule, PersistedReportScheduleData, ReportSchedule, ReportSettings,
};
