//! `PostgreSQL` repositories for task and history storage.

use super::{
    models::{HistoryRow, NewHistoryRow, NewTaskRow, TaskRow},
    schema::{task_histories, tasks},
};
use crate::task::{
    domain::{
        HistoryId, NewTask, PersistedTaskData, PrioritySlot, StatusCounts, StatusTransition, Task,
        TaskHistory, TaskId, TaskStatus, TaskTitle, UserId, plan_cascade,
    },
    ports::{
        TaskHistoryRepository, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task repository.
///
/// The cascade runs inside a single transaction that takes `FOR UPDATE`
/// row locks over the owner's live tasks, so concurrent cascades for one
/// owner serialize at the database while other owners proceed untouched.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, f).await
    }
}

async fn run_blocking<F, T>(pool: &TaskPgPool, f: F) -> TaskRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(TaskRepositoryError::persistence)?
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, draft: NewTask) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(&draft);
        self.run_blocking(move |connection| {
            let row: TaskRow = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result(connection)?;
            row_to_task(row)
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let id = task.id();
        let changes = (
            tasks::title.eq(task.title().as_str().to_owned()),
            tasks::description.eq(task.description().to_owned()),
            tasks::priority.eq(i64::from(task.priority())),
            tasks::status.eq(task.status().as_str().to_owned()),
            tasks::completed.eq(task.completed()),
            tasks::deleted.eq(task.deleted()),
        );
        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.find(id.into_inner()))
                .set(changes)
                .execute(connection)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, owner: &UserId, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let owner = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::owner.eq(owner))
                .filter(tasks::deleted.eq(false))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_live(&self, owner: &UserId) -> TaskRepositoryResult<Vec<Task>> {
        let owner = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner.eq(owner))
                .filter(tasks::deleted.eq(false))
                .order(tasks::priority.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn cascade_priorities(
        &self,
        owner: &UserId,
        desired: u32,
        exclude: Option<TaskId>,
    ) -> TaskRepositoryResult<Vec<TaskId>> {
        let owner = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            connection.transaction::<Vec<TaskId>, TaskRepositoryError, _>(|connection| {
                let excluded: Vec<i64> = exclude
                    .map(|id| vec![id.into_inner()])
                    .unwrap_or_default();
                let locked = tasks::table
                    .filter(tasks::owner.eq(&owner))
                    .filter(tasks::deleted.eq(false))
                    .filter(tasks::id.ne_all(&excluded))
                    .order(tasks::priority.asc())
                    .select((tasks::id, tasks::priority))
                    .for_update()
                    .load::<(i64, i64)>(connection)?;

                let slots = locked
                    .into_iter()
                    .map(|(id, priority)| {
                        let priority =
                            u32::try_from(priority).map_err(TaskRepositoryError::persistence)?;
                        Ok(PrioritySlot::new(TaskId::new(id), priority))
                    })
                    .collect::<TaskRepositoryResult<Vec<_>>>()?;

                let shifts = plan_cascade(&slots, desired)?;
                for shift in &shifts {
                    diesel::update(tasks::table.find(shift.id.into_inner()))
                        .set(tasks::priority.eq(i64::from(shift.priority)))
                        .execute(connection)?;
                }
                Ok(shifts.iter().map(|shift| shift.id).collect())
            })
        })
        .await
    }

    async fn status_counts(&self, owner: &UserId) -> TaskRepositoryResult<StatusCounts> {
        let owner = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let statuses = tasks::table
                .filter(tasks::owner.eq(owner))
                .filter(tasks::deleted.eq(false))
                .select(tasks::status)
                .load::<String>(connection)?;
            let parsed = statuses
                .iter()
                .map(|status| {
                    TaskStatus::try_from(status.as_str())
                        .map_err(TaskRepositoryError::persistence)
                })
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            Ok(StatusCounts::tally(parsed))
        })
        .await
    }
}

/// `PostgreSQL`-backed append-only history repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskHistoryRepository {
    pool: TaskPgPool,
}

impl PostgresTaskHistoryRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskHistoryRepository for PostgresTaskHistoryRepository {
    async fn append(
        &self,
        task_id: TaskId,
        transition: StatusTransition,
        recorded_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<TaskHistory> {
        let new_row = NewHistoryRow {
            task_id: task_id.into_inner(),
            old_status: transition.old_status().as_str().to_owned(),
            new_status: transition.new_status().as_str().to_owned(),
            updated_at: recorded_at,
        };
        run_blocking(&self.pool, move |connection| {
            let row: HistoryRow = diesel::insert_into(task_histories::table)
                .values(&new_row)
                .returning(HistoryRow::as_returning())
                .get_result(connection)?;
            row_to_history(row)
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskHistory>> {
        run_blocking(&self.pool, move |connection| {
            let rows = task_histories::table
                .filter(task_histories::task_id.eq(task_id.into_inner()))
                .order(task_histories::updated_at.asc())
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)?;
            rows.into_iter().map(row_to_history).collect()
        })
        .await
    }
}

fn to_new_row(draft: &NewTask) -> NewTaskRow {
    NewTaskRow {
        owner: draft.owner().as_str().to_owned(),
        title: draft.title().as_str().to_owned(),
        description: draft.description().to_owned(),
        priority: i64::from(draft.priority()),
        status: draft.status().as_str().to_owned(),
        completed: draft.completed(),
        deleted: false,
        created_at: draft.created_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner,
        title,
        description,
        priority,
        status,
        completed,
        deleted,
        created_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(id),
        owner: UserId::new(owner).map_err(TaskRepositoryError::persistence)?,
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        priority: u32::try_from(priority).map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        completed,
        deleted,
        created_at,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_history(row: HistoryRow) -> TaskRepositoryResult<TaskHistory> {
    let transition = StatusTransition::between(
        TaskStatus::try_from(row.old_status.as_str()).map_err(TaskRepositoryError::persistence)?,
        TaskStatus::try_from(row.new_status.as_str()).map_err(TaskRepositoryError::persistence)?,
    )
    .ok_or_else(|| {
        TaskRepositoryError::persistence(std::io::Error::other(
            "history row records a no-op status transition",
        ))
    })?;
    Ok(TaskHistory::from_parts(
        HistoryId::new(row.id),
        TaskId::new(row.task_id),
        transition,
        row.updated_at,
    ))
}
