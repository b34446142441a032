//! End-to-end report flow through the public API: schedule creation,
//! due-report dispatch, and schedule advancement, backed by the
//! in-memory adapters.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]

use std::sync::Arc;

use chrono::{Duration, NaiveTime, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use tasktrail::report::{
    adapters::memory::{InMemoryReportScheduleRepository, RecordingMailer},
    domain::{EmailAddress, NewReportSchedule, ReportSettings},
    ports::ReportScheduleRepository,
    services::{ReportDispatcher, ReportScheduleService, ScheduleReportRequest},
};
use tasktrail::task::{
    adapters::memory::{InMemoryTaskHistoryRepository, InMemoryTaskRepository},
    domain::UserId,
    services::{CreateTaskRequest, TaskMutationService},
};

const OWNER: &str = "integration_user";

struct World {
    schedules: Arc<InMemoryReportScheduleRepository>,
    tasks: TaskMutationService<InMemoryTaskRepository, InMemoryTaskHistoryRepository, DefaultClock>,
    schedule_service: ReportScheduleService<InMemoryReportScheduleRepository, DefaultClock>,
    mailer: Arc<RecordingMailer>,
    dispatcher: ReportDispatcher<
        InMemoryReportScheduleRepository,
        InMemoryTaskRepository,
        RecordingMailer,
        DefaultClock,
    >,
}

#[fixture]
fn world() -> World {
    let schedules = Arc::new(InMemoryReportScheduleRepository::new());
    let task_repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    let mailer = Arc::new(RecordingMailer::new());
    World {
        schedules: schedules.clone(),
        tasks: TaskMutationService::new(
            task_repository.clone(),
            Arc::new(InMemoryTaskHistoryRepository::new()),
            clock.clone(),
        ),
        schedule_service: ReportScheduleService::new(schedules.clone(), clock.clone()),
        mailer: mailer.clone(),
        dispatcher: ReportDispatcher::new(schedules, task_repository, mailer, clock),
    }
}

/// Seeds a schedule that is already due, bypassing the next-run
/// calculation the service would apply.
async fn seed_due_schedule(world: &World, owner: &str) {
    let settings = ReportSettings {
        user_mail: EmailAddress::new(format!("{owner}@example.com")).expect("valid address"),
        report_time: NaiveTime::from_hms_opt(18, 30, 0).expect("valid time"),
        timezone: chrono_tz::Asia::Kolkata,
        enabled: true,
    };
    world
        .schedules
        .create(NewReportSchedule::new(
            UserId::new(owner).expect("valid owner"),
            settings,
            Utc::now() - Duration::minutes(10),
        ))
        .await
        .expect("seed schedule");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scheduled_report_is_not_due_until_its_time_arrives(world: World) {
    world
        .schedule_service
        .schedule(ScheduleReportRequest::new(
            OWNER,
            "integration_user@example.com",
            NaiveTime::from_hms_opt(18, 30, 0).expect("valid time"),
            "Asia/Kolkata",
        ))
        .await
        .expect("schedule");

    let summary = world.dispatcher.run_cycle().await.expect("cycle");

    // The freshly computed next run is in the future.
    assert_eq!(summary.sent, 0);
    assert!(world.mailer.outbox().expect("outbox").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_report_summarises_the_owners_tasks(world: World) {
    for (index, priority) in [1_u32, 2, 3].iter().enumerate() {
        world
            .tasks
            .create(CreateTaskRequest::new(
                OWNER,
                format!("reportable task number {index}"),
                "",
                *priority,
            ))
            .await
            .expect("create task");
    }
    world
        .tasks
        .complete(
            OWNER,
            world.tasks.list(OWNER).await.expect("list")[0].id(),
        )
        .await
        .expect("complete");
    seed_due_schedule(&world, OWNER).await;

    let summary = world.dispatcher.run_cycle().await.expect("cycle");

    assert_eq!(summary.sent, 1);
    let outbox = world.mailer.outbox().expect("outbox");
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].to.as_str(), "integration_user@example.com");
    assert_eq!(outbox[0].subject, "Tasks Report for Today");
    assert_eq!(
        outbox[0].body,
        "Hi integration_user,\n\nHere is your tasks report for today:\n\n\
         Total tasks added: 3\nPending tasks: 2\nIn Progress tasks: 0\n\
         Completed tasks: 1\nCancelled tasks: 0\n\nThanks"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatched_schedule_advances_one_day_and_goes_quiet(world: World) {
    seed_due_schedule(&world, OWNER).await;
    let seeded = world
        .schedules
        .find_by_owner(&UserId::new(OWNER).expect("valid owner"))
        .await
        .expect("find")
        .expect("schedule exists");

    let first = world.dispatcher.run_cycle().await.expect("first cycle");
    let second = world.dispatcher.run_cycle().await.expect("second cycle");

    assert_eq!(first.sent, 1);
    assert_eq!(second.sent, 0);
    let advanced = world
        .schedules
        .find_by_owner(&UserId::new(OWNER).expect("valid owner"))
        .await
        .expect("find")
        .expect("schedule exists");
    assert_eq!(
        advanced.next_run_at(),
        seeded.next_run_at() + Duration::hours(24)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_due_owner_receives_their_own_report(world: World) {
    seed_due_schedule(&world, OWNER).await;
    seed_due_schedule(&world, "second_user").await;
    world
        .tasks
        .create(CreateTaskRequest::new(
            "second_user",
            "task for the second owner",
            "",
            1,
        ))
        .await
        .expect("create task");

    let summary = world.dispatcher.run_cycle().await.expect("cycle");

    assert_eq!(summary.sent, 2);
    let outbox = world.mailer.outbox().expect("outbox");
    assert_eq!(outbox.len(), 2);
    let second = outbox
        .iter()
        .find(|email| email.to.as_str() == "second_user@example.com")
        .expect("second owner's email");
    assert!(second.body.contains("Hi second_user,"));
    assert!(second.body.contains("Total tasks added: 1"));
}
