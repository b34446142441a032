//! End-to-end task lifecycle flows through the public mutation service
//! API, backed by the in-memory adapters.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};
use tasktrail::task::{
    adapters::memory::{InMemoryTaskHistoryRepository, InMemoryTaskRepository},
    domain::{Task, TaskChanges, TaskStatus},
    services::{CreateTaskRequest, TaskMutationService},
};

type TestService =
    TaskMutationService<InMemoryTaskRepository, InMemoryTaskHistoryRepository, DefaultClock>;

const OWNER: &str = "integration_user";

#[fixture]
fn service() -> TestService {
    TaskMutationService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(InMemoryTaskHistoryRepository::new()),
        Arc::new(DefaultClock),
    )
}

/// Asserts the owner's live tasks carry dense, unique priorities starting
/// at the given floor.
///
/// # Errors
///
/// Returns an error when a priority is duplicated or a gap appears.
fn assert_dense_from(tasks: &[Task], floor: u32) -> Result<(), eyre::Report> {
    let mut priorities: Vec<u32> = tasks.iter().map(Task::priority).collect();
    priorities.sort_unstable();
    for (index, priority) in priorities.iter().enumerate() {
        let expected = floor + u32::try_from(index)?;
        eyre::ensure!(
            *priority == expected,
            "expected priority {expected} at position {index}, found {priority}"
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_head_inserts_keep_priorities_dense(
    service: TestService,
) -> Result<(), eyre::Report> {
    for round in 0..5_u32 {
        service
            .create(CreateTaskRequest::new(
                OWNER,
                format!("head insert round {round}"),
                "every round lands at the front",
                1,
            ))
            .await?;
    }

    let live = service.list(OWNER).await?;
    eyre::ensure!(live.len() == 5, "expected five live tasks");
    assert_dense_from(&live, 1)?;
    // The most recent insert holds the front slot.
    eyre::ensure!(live[0].priority() == 1, "front slot not at priority 1");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_records_each_status_change_once(service: TestService) {
    let created = service
        .create(CreateTaskRequest::new(
            OWNER,
            "ship the quarterly report",
            "draft, review, publish",
            1,
        ))
        .await
        .expect("create");

    service
        .update(
            OWNER,
            created.id(),
            TaskChanges::new().with_status(TaskStatus::InProgress),
        )
        .await
        .expect("start");
    service
        .complete(OWNER, created.id())
        .await
        .expect("complete");
    // Repeating the terminal state must not add another row.
    service
        .update(
            OWNER,
            created.id(),
            TaskChanges::new().with_status(TaskStatus::Completed),
        )
        .await
        .expect("repeat completion");

    let history = service
        .history(OWNER, created.id())
        .await
        .expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].old_status(), TaskStatus::Pending);
    assert_eq!(history[0].new_status(), TaskStatus::InProgress);
    assert_eq!(history[1].old_status(), TaskStatus::InProgress);
    assert_eq!(history[1].new_status(), TaskStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priority_moves_cascade_without_breaking_density(
    service: TestService,
) -> Result<(), eyre::Report> {
    let mut created = Vec::new();
    for (index, priority) in [1_u32, 2, 3, 4].iter().enumerate() {
        created.push(
            service
                .create(CreateTaskRequest::new(
                    OWNER,
                    format!("ordered task number {index}"),
                    "",
                    *priority,
                ))
                .await?,
        );
    }

    // Move the last task to the front; the run it lands on shifts up.
    service
        .update(OWNER, created[3].id(), TaskChanges::new().with_priority(1))
        .await?;

    let live = service.list(OWNER).await?;
    assert_dense_from(&live, 1)?;
    let moved = live
        .iter()
        .find(|task| task.id() == created[3].id())
        .ok_or_else(|| eyre::eyre!("moved task missing from live set"))?;
    eyre::ensure!(moved.priority() == 1, "moved task not at the front");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn soft_deleted_tasks_leave_the_live_set_but_not_the_store(service: TestService) {
    let created = service
        .create(CreateTaskRequest::new(
            OWNER,
            "task destined for removal",
            "",
            1,
        ))
        .await
        .expect("create");
    let survivor = service
        .create(CreateTaskRequest::new(
            OWNER,
            "task that stays behind",
            "",
            2,
        ))
        .await
        .expect("create survivor");

    let deleted = service
        .soft_delete(OWNER, created.id())
        .await
        .expect("soft delete");
    assert!(deleted.deleted());

    let live = service.list(OWNER).await.expect("list");
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id(), survivor.id());

    // A second delete cannot find the task any more.
    let repeat = service.soft_delete(OWNER, created.id()).await;
    assert!(repeat.is_err());
}
