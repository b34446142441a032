//! Service tests for report schedule creation and updates.

use std::sync::Arc;

use crate::report::{
    adapters::memory::InMemoryReportScheduleRepository,
    services::{ReportScheduleError, ReportScheduleService, ScheduleReportRequest},
};
use chrono::{Duration, NaiveTime, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const OWNER: &str = "test_user";

struct TestContext {
    service: ReportScheduleService<InMemoryReportScheduleRepository, DefaultClock>,
}

#[fixture]
fn context() -> TestContext {
    TestContext {
        service: ReportScheduleService::new(
            Arc::new(InMemoryReportScheduleRepository::new()),
            Arc::new(DefaultClock),
        ),
    }
}

fn request() -> ScheduleReportRequest {
    ScheduleReportRequest::new(
        OWNER,
        "test_user@example.com",
        NaiveTime::from_hms_opt(18, 30, 0).expect("valid time"),
        "Asia/Kolkata",
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn schedule_persists_with_a_future_next_run(context: TestContext) {
    let before = Utc::now();
    let created = context.service.schedule(request()).await.expect("schedule");

    assert!(created.next_run_at() > before);
    // The next occurrence of a daily time is always within one day of now.
    assert!(created.next_run_at() <= before + Duration::hours(25));

    let found = context
        .service
        .find(OWNER)
        .await
        .expect("find")
        .expect("schedule exists");
    assert_eq!(found, created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_schedule_for_same_owner_is_rejected(context: TestContext) {
    context.service.schedule(request()).await.expect("schedule");
    let result = context.service.schedule(request()).await;
    assert!(matches!(
        result,
        Err(ReportScheduleError::AlreadyScheduled(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_timezone_is_rejected_before_any_write(context: TestContext) {
    let bad = ScheduleReportRequest::new(
        OWNER,
        "test_user@example.com",
        NaiveTime::from_hms_opt(18, 30, 0).expect("valid time"),
        "Mars/Olympus",
    );

    let result = context.service.schedule(bad).await;
    assert!(matches!(result, Err(ReportScheduleError::Domain(_))));
    assert!(context.service.find(OWNER).await.expect("find").is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_email_is_rejected_before_any_write(context: TestContext) {
    let bad = ScheduleReportRequest::new(
        OWNER,
        "not-an-address",
        NaiveTime::from_hms_opt(18, 30, 0).expect("valid time"),
        "Asia/Kolkata",
    );

    let result = context.service.schedule(bad).await;
    assert!(matches!(result, Err(ReportScheduleError::Domain(_))));
    assert!(context.service.find(OWNER).await.expect("find").is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_owner_is_rejected(context: TestContext) {
    let bad = ScheduleReportRequest::new(
        "   ",
        "test_user@example.com",
        NaiveTime::from_hms_opt(18, 30, 0).expect("valid time"),
        "Asia/Kolkata",
    );

    let result = context.service.schedule(bad).await;
    assert!(matches!(result, Err(ReportScheduleError::Owner(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reschedule_keeps_the_row_and_replaces_settings(context: TestContext) {
    let created = context.service.schedule(request()).await.expect("schedule");

    let changed = ScheduleReportRequest::new(
        OWNER,
        "moved@example.com",
        NaiveTime::from_hms_opt(7, 0, 0).expect("valid time"),
        "Europe/London",
    )
    .with_enabled(false);
    let updated = context
        .service
        .reschedule(changed)
        .await
        .expect("reschedule");

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.user_mail().as_str(), "moved@example.com");
    assert_eq!(updated.timezone(), chrono_tz::Europe::London);
    assert!(!updated.enabled());

    let found = context
        .service
        .find(OWNER)
        .await
        .expect("find")
        .expect("schedule exists");
    assert_eq!(found, updated);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reschedule_without_a_schedule_is_rejected(context: TestContext) {
    let result = context.service.reschedule(request()).await;
    assert!(matches!(result, Err(ReportScheduleError::NotScheduled(_))));
}
