//! Unit tests for the pure next-run calculator.

use crate::report::domain::{ReportDomainError, advance_after_fire, compute_next_run_at};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rstest::rstest;

const KOLKATA: Tz = chrono_tz::Asia::Kolkata;
const NEW_YORK: Tz = chrono_tz::America::New_York;

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid wall-clock time")
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("unambiguous UTC instant")
}

// Reference 2024-01-15 08:30 UTC is 14:00 in Kolkata (UTC+05:30).
#[rstest]
#[case::already_passed_rolls_to_tomorrow(time(13, 50), utc(2024, 1, 16, 8, 20))]
#[case::exactly_now_rolls_to_tomorrow(time(14, 0), utc(2024, 1, 16, 8, 30))]
#[case::still_ahead_fires_today(time(14, 10), utc(2024, 1, 15, 8, 40))]
fn next_run_compares_against_local_wall_clock(
    #[case] report_time: NaiveTime,
    #[case] expected: DateTime<Utc>,
) {
    let reference = utc(2024, 1, 15, 8, 30);
    let next = compute_next_run_at(report_time, KOLKATA, reference).expect("computable next run");
    assert_eq!(next, expected);
}

#[rstest]
fn utc_zone_needs_no_offset_conversion() {
    let reference = utc(2024, 6, 1, 9, 0);
    let next = compute_next_run_at(time(17, 30), Tz::UTC, reference).expect("computable next run");
    assert_eq!(next, utc(2024, 6, 1, 17, 30));
}

#[rstest]
fn spring_forward_gap_is_rejected() {
    // 2024-03-10 02:30 does not exist in America/New_York; clocks jump
    // from 02:00 to 03:00 that night.
    let reference = utc(2024, 3, 9, 12, 0);
    let result = compute_next_run_at(time(2, 30), NEW_YORK, reference);
    assert!(matches!(
        result,
        Err(ReportDomainError::UnrepresentableLocalTime { .. })
    ));
}

#[rstest]
fn fall_back_ambiguity_resolves_to_earliest_occurrence() {
    // 2024-11-03 01:30 occurs twice in America/New_York; the earlier one
    // is still on daylight time (UTC-04:00).
    let reference = utc(2024, 11, 2, 12, 0);
    let next = compute_next_run_at(time(1, 30), NEW_YORK, reference).expect("computable next run");
    assert_eq!(next, utc(2024, 11, 3, 5, 30));
}

#[rstest]
fn next_run_viewed_locally_reproduces_the_report_time() {
    let reference = utc(2024, 1, 15, 8, 30);
    let report_time = time(6, 15);
    let next = compute_next_run_at(report_time, KOLKATA, reference).expect("computable next run");
    assert_eq!(next.with_timezone(&KOLKATA).time(), report_time);
}

#[rstest]
fn advance_is_a_fixed_twenty_four_hours() {
    let fired_at = utc(2024, 1, 16, 8, 20);
    assert_eq!(advance_after_fire(fired_at), fired_at + Duration::hours(24));
}

#[rstest]
fn advance_drifts_across_a_daylight_saving_transition() {
    // 22:00 New York local on 2024-03-09 is 03:00 UTC. Adding a flat 24
    // hours lands at 23:00 local the next day, not 22:00, because the
    // offset changed underneath.
    let before_transition = utc(2024, 3, 10, 3, 0);
    let advanced = advance_after_fire(before_transition);
    assert_eq!(advanced.with_timezone(&NEW_YORK).time(), time(23, 0));
}
