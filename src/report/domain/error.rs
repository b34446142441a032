//! Error types for report domain validation.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use thiserror::Error;

/// Errors returned while constructing report domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportDomainError {
    /// The email address is not in `local@domain` form.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The timezone name is not a known IANA identifier.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// The local wall-clock time does not exist on the chosen date in the
    /// target zone (daylight-saving gap).
    #[error("local time {time} does not exist on {date} in {zone}")]
    UnrepresentableLocalTime {
        /// Chosen local calendar date.
        date: NaiveDate,
        /// Requested local wall-clock time.
        time: NaiveTime,
        /// Target timezone.
        zone: Tz,
    },

    /// The next-run date fell outside the representable calendar range.
    #[error("next run date out of range")]
    DateOutOfRange,
}
