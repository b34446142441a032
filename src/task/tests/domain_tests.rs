//! Domain-focused tests for task types and lifecycle behaviour.

use crate::task::domain::{
    NewTask, StatusCounts, StatusTransition, Task, TaskChanges, TaskDomainError, TaskId,
    TaskStatus, TaskTitle, UserId,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn sample_task(clock: &DefaultClock) -> Task {
    let owner = UserId::new("test_user").expect("valid owner");
    let title = TaskTitle::new("test title long enough").expect("valid title");
    let draft = NewTask::new(owner, title, "test description", 1, clock);
    Task::from_new(TaskId::new(1), draft)
}

#[rstest]
#[case("PENDING", TaskStatus::Pending)]
#[case("IN_PROGRESS", TaskStatus::InProgress)]
#[case("COMPLETED", TaskStatus::Completed)]
#[case("CANCELLED", TaskStatus::Cancelled)]
#[case("pending", TaskStatus::Pending)]
#[case(" cancelled ", TaskStatus::Cancelled)]
fn status_parses_canonical_and_lenient_forms(#[case] raw: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(raw).expect("parsable status"), expected);
}

#[rstest]
fn status_rejects_unknown_values() {
    assert!(TaskStatus::try_from("DONE").is_err());
}

#[rstest]
#[case(TaskStatus::Pending)]
#[case(TaskStatus::InProgress)]
#[case(TaskStatus::Completed)]
#[case(TaskStatus::Cancelled)]
fn status_round_trips_through_storage_form(#[case] status: TaskStatus) {
    assert_eq!(
        TaskStatus::try_from(status.as_str()).expect("round trip"),
        status
    );
}

#[rstest]
fn title_is_upper_cased() {
    let title = TaskTitle::new("write the report").expect("valid title");
    assert_eq!(title.as_str(), "WRITE THE REPORT");
}

#[rstest]
fn short_title_is_rejected() {
    let result = TaskTitle::new("too short");
    assert_eq!(
        result,
        Err(TaskDomainError::TitleTooShort {
            minimum: TaskTitle::MINIMUM_LENGTH,
            actual: 9,
        })
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("two words")]
fn invalid_owner_is_rejected(#[case] raw: &str) {
    assert!(matches!(
        UserId::new(raw),
        Err(TaskDomainError::InvalidOwner(_))
    ));
}

#[rstest]
fn transition_requires_distinct_statuses() {
    assert!(StatusTransition::between(TaskStatus::Pending, TaskStatus::Pending).is_none());
    let transition = StatusTransition::between(TaskStatus::Pending, TaskStatus::Completed)
        .expect("distinct statuses");
    assert_eq!(transition.old_status(), TaskStatus::Pending);
    assert_eq!(transition.new_status(), TaskStatus::Completed);
}

#[rstest]
fn pretty_date_uses_weekday_day_month_form(clock: DefaultClock) {
    let task = sample_task(&clock);
    assert_eq!(
        task.pretty_created_at(),
        task.created_at().format("%a %d %b").to_string()
    );
}

#[rstest]
fn update_without_status_change_yields_no_transition(clock: DefaultClock) {
    let mut task = sample_task(&clock);
    let transition = task.apply_update(TaskChanges::new().with_description("reworded"));
    assert!(transition.is_none());
    assert_eq!(task.description(), "reworded");
}

#[rstest]
fn update_with_status_change_yields_one_transition(clock: DefaultClock) {
    let mut task = sample_task(&clock);
    let transition = task
        .apply_update(TaskChanges::new().with_status(TaskStatus::InProgress))
        .expect("status changed");
    assert_eq!(transition.old_status(), TaskStatus::Pending);
    assert_eq!(transition.new_status(), TaskStatus::InProgress);
}

#[rstest]
fn soft_delete_records_cancellation_and_keeps_status(clock: DefaultClock) {
    let mut task = sample_task(&clock);
    let transition = task.soft_delete().expect("was not cancelled");

    assert!(task.deleted());
    assert_eq!(transition.new_status(), TaskStatus::Cancelled);
    // Only the deleted flag changes; the status field stays as observed.
    assert_eq!(task.status(), TaskStatus::Pending);
}

#[rstest]
fn soft_delete_of_cancelled_task_records_nothing(clock: DefaultClock) {
    let mut task = sample_task(&clock);
    let _first = task.apply_update(TaskChanges::new().with_status(TaskStatus::Cancelled));
    assert!(task.soft_delete().is_none());
    assert!(task.deleted());
}

#[rstest]
fn status_counts_tally_by_status() {
    let counts = StatusCounts::tally([
        TaskStatus::Pending,
        TaskStatus::Completed,
        TaskStatus::InProgress,
        TaskStatus::Cancelled,
    ]);
    assert_eq!(
        counts,
        StatusCounts {
            total: 4,
            pending: 1,
            in_progress: 1,
            completed: 1,
            cancelled: 1,
        }
    );
}
