//! In-memory report schedule repository for tests and lightweight
//! embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::report::{
    domain::{NewReportSchedule, ReportId, ReportSchedule},
    ports::{ReportRepositoryError, ReportRepositoryResult, ReportScheduleRepository},
};
use crate::task::domain::UserId;

/// Thread-safe in-memory schedule repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportScheduleRepository {
    state: Arc<RwLock<InMemoryScheduleState>>,
}

#[derive(Debug, Default)]
struct InMemoryScheduleState {
    schedules: BTreeMap<i64, ReportSchedule>,
    next_id: i64,
}

impl InMemoryReportScheduleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned<T>(err: std::sync::PoisonError<T>) -> ReportRepositoryError {
    ReportRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReportScheduleRepository for InMemoryReportScheduleRepository {
    async fn create(&self, draft: NewReportSchedule) -> ReportRepositoryResult<ReportSchedule> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state
            .schedules
            .values()
            .any(|schedule| schedule.owner() == draft.owner())
        {
            return Err(ReportRepositoryError::DuplicateOwner(draft.owner().clone()));
        }
        state.next_id += 1;
        let schedule = ReportSchedule::from_new(ReportId::new(state.next_id), draft);
        state
            .schedules
            .insert(schedule.id().into_inner(), schedule.clone());
        Ok(schedule)
    }

    async fn update(&self, schedule: &ReportSchedule) -> ReportRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.schedules.contains_key(&schedule.id().into_inner()) {
            return Err(ReportRepositoryError::NotFound(schedule.id()));
        }
        state
            .schedules
            .insert(schedule.id().into_inner(), schedule.clone());
        Ok(())
    }

    async fn find_by_owner(
        &self,
        owner: &UserId,
    ) -> ReportRepositoryResult<Option<ReportSchedule>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .schedules
            .values()
            .find(|schedule| schedule.owner() == owner)
            .cloned())
    }

    async fn find_due(&self, now: DateTime<Utc>) -> ReportRepositoryResult<Vec<ReportSchedule>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .schedules
            .values()
            .filter(|schedule| schedule.enabled() && schedule.next_run_at() <= now)
            .cloned()
            .collect())
    }

    async fn advance_if_unchanged(
        &self,
        id: ReportId,
        expected: DateTime<Utc>,
        next_run_at: DateTime<Utc>,
    ) -> ReportRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let Some(schedule) = state.schedules.get_mut(&id.into_inner()) else {
            return Err(ReportRepositoryError::NotFound(id));
        };
        if schedule.next_run_at() != expected {
            return Ok(false);
        }
        schedule.set_next_run_at(next_run_at);
        Ok(true)
    }
}
