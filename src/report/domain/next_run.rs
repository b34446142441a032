//! Next-run computation for daily report schedules.
//!
//! Converts a user's local wall-clock report time into the next absolute
//! UTC instant the report should fire. The reference instant is always an
//! explicit parameter; nothing here reads a wall clock, which keeps the
//! computation deterministic under test.

use super::ReportDomainError;
use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Computes the next UTC instant a daily report fires.
///
/// The current local date and time-of-day are derived from `reference` in
/// `tz`. When `report_time` is at or before the current local
/// time-of-day the report is due, so the next occurrence rolls to the
/// next local calendar date; otherwise it fires later today. The chosen
/// local date and `report_time` are then resolved in `tz` and converted
/// to UTC. An ambiguous local time (clocks rolling back) resolves to its
/// earliest occurrence.
///
/// # Errors
///
/// Returns [`ReportDomainError::UnrepresentableLocalTime`] when the
/// chosen wall-clock time falls in a daylight-saving gap, and
/// [`ReportDomainError::DateOutOfRange`] when the calendar date cannot be
/// advanced.
pub fn compute_next_run_at(
    report_time: NaiveTime,
    tz: Tz,
    reference: DateTime<Utc>,
) -> Result<DateTime<Utc>, ReportDomainError> {
    let local_now = reference.with_timezone(&tz);
    let mut date = local_now.date_naive();
    if report_time <= local_now.time() {
        date = date.succ_opt().ok_or(ReportDomainError::DateOutOfRange)?;
    }

    let zoned = match tz.from_local_datetime(&date.and_time(report_time)) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            return Err(ReportDomainError::UnrepresentableLocalTime {
                date,
                time: report_time,
                zone: tz,
            });
        }
    };
    Ok(zoned.with_timezone(&Utc))
}

/// Advances a fired schedule to its next occurrence.
///
/// A fixed 24-hour UTC increment, not a recomputation from the local
/// timezone: across daylight-saving transitions the fire time drifts
/// relative to the configured local time. Known quirk, kept for parity
/// with the advance rule the dispatcher has always applied.
#[must_use]
pub fn advance_after_fire(next_run_at: DateTime<Utc>) -> DateTime<Utc> {
    next_run_at + Duration::hours(24)
}
