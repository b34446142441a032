//! `PostgreSQL` repository for report schedule storage.

use super::{
    models::{NewReportScheduleRow, ReportScheduleRow},
    schema::task_reports,
};
use crate::report::{
    domain::{
        EmailAddress, NewReportSchedule, PersistedReportScheduleData, ReportId, ReportSchedule,
        ReportSettings,
    },
    ports::{ReportRepositoryError, ReportRepositoryResult, ReportScheduleRepository},
};
use crate::task::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by report adapters.
pub type ReportPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<DieselError> for ReportRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed report schedule repository.
#[derive(Debug, Clone)]
pub struct PostgresReportScheduleRepository {
    pool: ReportPgPool,
}

impl PostgresReportScheduleRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReportPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReportRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReportRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReportRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReportRepositoryError::persistence)?
    }
}

#[async_trait]
impl ReportScheduleRepository for PostgresReportScheduleRepository {
    async fn create(&self, draft: NewReportSchedule) -> ReportRepositoryResult<ReportSchedule> {
        let owner = draft.owner().clone();
        let new_row = to_new_row(&draft);
        self.run_blocking(move |connection| {
            let row: ReportScheduleRow = diesel::insert_into(task_reports::table)
                .values(&new_row)
                .returning(ReportScheduleRow::as_returning())
                .get_result(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReportRepositoryError::DuplicateOwner(owner.clone())
                    }
                    other => ReportRepositoryError::persistence(other),
                })?;
            row_to_schedule(row)
        })
        .await
    }

    async fn update(&self, schedule: &ReportSchedule) -> ReportRepositoryResult<()> {
        let id = schedule.id();
        let changes = (
            task_reports::user_mail.eq(schedule.user_mail().as_str().to_owned()),
            task_reports::report_time.eq(schedule.report_time()),
            task_reports::timezone.eq(schedule.timezone().name().to_owned()),
            task_reports::next_run_at.eq(schedule.next_run_at()),
            task_reports::enabled.eq(schedule.enabled()),
        );
        self.run_blocking(move |connection| {
            let affected = diesel::update(task_reports::table.find(id.into_inner()))
                .set(changes)
                .execute(connection)?;
            if affected == 0 {
                return Err(ReportRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_owner(
        &self,
        owner: &UserId,
    ) -> ReportRepositoryResult<Option<ReportSchedule>> {
        let owner = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = task_reports::table
                .filter(task_reports::owner.eq(owner))
                .select(ReportScheduleRow::as_select())
                .first::<ReportScheduleRow>(connection)
                .optional()?;
            row.map(row_to_schedule).transpose()
        })
        .await
    }

    async fn find_due(&self, now: DateTime<Utc>) -> ReportRepositoryResult<Vec<ReportSchedule>> {
        self.run_blocking(move |connection| {
            let rows = task_reports::table
                .filter(task_reports::enabled.eq(true))
                .filter(task_reports::next_run_at.le(now))
                .order(task_reports::next_run_at.asc())
                .select(ReportScheduleRow::as_select())
                .load::<ReportScheduleRow>(connection)?;
            rows.into_iter().map(row_to_schedule).collect()
        })
        .await
    }

    async fn advance_if_unchanged(
        &self,
        id: ReportId,
        expected: DateTime<Utc>,
        next_run_at: DateTime<Utc>,
    ) -> ReportRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let affected = diesel::update(
                task_reports::table
                    .find(id.into_inner())
                    .filter(task_reports::next_run_at.eq(expected)),
            )
            .set(task_reports::next_run_at.eq(next_run_at))
            .execute(connection)?;
            if affected > 0 {
                return Ok(true);
            }
            // Distinguish a lost race from a missing row.
            let exists = task_reports::table
                .find(id.into_inner())
                .count()
                .get_result::<i64>(connection)?;
            if exists == 0 {
                return Err(ReportRepositoryError::NotFound(id));
            }
            Ok(false)
        })
        .await
    }
}

fn to_new_row(draft: &NewReportSchedule) -> NewReportScheduleRow {
    let settings = draft.settings();
    NewReportScheduleRow {
        owner: draft.owner().as_str().to_owned(),
        user_mail: settings.user_mail.as_str().to_owned(),
        report_time: settings.report_time,
        timezone: settings.timezone.name().to_owned(),
        next_run_at: draft.next_run_at(),
        enabled: settings.enabled,
    }
}

fn row_to_schedule(row: ReportScheduleRow) -> ReportRepositoryResult<ReportSchedule> {
    let timezone = row
        .timezone
        .parse::<Tz>()
        .map_err(|err| ReportRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
    let data = PersistedReportScheduleData {
        id: ReportId::new(row.id),
        owner: UserId::new(row.owner).map_err(ReportRepositoryError::persistence)?,
        settings: ReportSettings {
            user_mail: EmailAddress::new(row.user_mail)
                .map_err(ReportRepositoryError::persistence)?,
            report_time: row.report_time,
            timezone,
            enabled: row.enabled,
        },
        next_run_at: row.next_run_at,
    };
    Ok(ReportSchedule::from_persisted(data))
}
