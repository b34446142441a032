//! Due-report dispatch cycle.
//!
//! The surrounding scheduler (external) wakes this dispatcher
//! periodically. One cycle selects every enabled schedule whose next-run
//! instant has passed, then processes each row under a per-row claim:
//! the claim is taken before anything is handed to the mail
//! collaborator, the row's dueness is re-checked under it, and only
//! after a confirmed handoff is the schedule advanced by a fixed 24
//! hours through a compare-and-swap. An overlapping cycle that selected
//! the same row blocks on the claim and finds the row already advanced,
//! so a firing reaches the mailer at most once. A failed handoff
//! releases the claim without advancing, leaving the row due for the
//! next cycle.

use crate::report::{
    domain::{ReportId, ReportSchedule, advance_after_fire},
    ports::{
        MailerError, OutboundEmail, ReportMailer, ReportRepositoryError, ReportScheduleRepository,
    },
};
use crate::task::{
    domain::StatusCounts,
    ports::{TaskRepository, TaskRepositoryError},
};
use minijinja::{Environment, context};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

/// Subject line for every report email.
const REPORT_SUBJECT: &str = "Tasks Report for Today";

/// Plain-text body template for the report email.
const BODY_TEMPLATE: &str = "Hi {{ username }},\n\nHere is your tasks report for today:\n\n\
Total tasks added: {{ counts.total }}\nPending tasks: {{ counts.pending }}\n\
In Progress tasks: {{ counts.in_progress }}\nCompleted tasks: {{ counts.completed }}\n\
Cancelled tasks: {{ counts.cancelled }}\n\nThanks";

/// Errors raised while processing a single due schedule or selecting the
/// due set.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Schedule repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReportRepositoryError),
    /// Task tally read failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Report body rendering failed.
    #[error(transparent)]
    Template(#[from] minijinja::Error),
    /// Mail handoff was not confirmed.
    #[error(transparent)]
    Mail(#[from] MailerError),
}

/// Per-cycle tally of dispatch outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Reports sent and advanced.
    pub sent: usize,
    /// Due rows another cycle claimed and advanced first.
    pub skipped: usize,
    /// Rows left due after a failure; retried next cycle.
    pub failed: usize,
}

/// Outcome of one due row.
enum RowOutcome {
    Sent,
    LostRace,
}

/// Registry of per-row dispatch claims.
#[derive(Debug, Clone, Default)]
struct RowClaims {
    inner: Arc<Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>>,
}

impl RowClaims {
    fn for_row(&self, id: ReportId) -> Result<Arc<tokio::sync::Mutex<()>>, ReportRepositoryError> {
        let mut registry = self.inner.lock().map_err(|err| {
            ReportRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(registry.entry(id.into_inner()).or_default().clone())
    }
}

/// Periodic report dispatcher.
pub struct ReportDispatcher<S, T, M, C>
where
    S: ReportScheduleRepository,
    T: TaskRepository,
    M: ReportMailer,
    C: Clock + Send + Sync,
{
    schedules: Arc<S>,
    tasks: Arc<T>,
    mailer: Arc<M>,
    clock: Arc<C>,
    claims: RowClaims,
}

impl<S, T, M, C> ReportDispatcher<S, T, M, C>
where
    S: ReportScheduleRepository,
    T: TaskRepository,
    M: ReportMailer,
    C: Clock + Send + Sync,
{
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new(schedules: Arc<S>, tasks: Arc<T>, mailer: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            schedules,
            tasks,
            mailer,
            clock,
            claims: RowClaims::default(),
        }
    }

    /// Runs one dispatch cycle over every due schedule.
    ///
    /// Per-row failures are tallied and logged rather than aborting the
    /// cycle; the affected rows stay due and are retried next cycle.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Repository`] when the due-set selection
    /// itself fails.
    pub async fn run_cycle(&self) -> Result<DispatchSummary, DispatchError> {
        let now = self.clock.utc();
        let due = self.schedules.find_due(now).await?;

        let mut summary = DispatchSummary::default();
        for schedule in due {
            match self.dispatch_one(&schedule).await {
                Ok(RowOutcome::Sent) => {
                    debug!(owner = %schedule.owner(), "report sent");
                    summary.sent += 1;
                }
                Ok(RowOutcome::LostRace) => {
                    debug!(owner = %schedule.owner(), "report already taken by another cycle");
                    summary.skipped += 1;
                }
                Err(err) => {
                    warn!(owner = %schedule.owner(), error = %err, "report dispatch failed; row stays due");
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }

    async fn dispatch_one(&self, schedule: &ReportSchedule) -> Result<RowOutcome, DispatchError> {
        let claim = self.claims.for_row(schedule.id())?;
        let _claim_guard = claim.lock().await;

        // Another cycle may have processed the row between selection and
        // the claim; re-check before anything reaches the mailer.
        let Some(current) = self.schedules.find_by_owner(schedule.owner()).await? else {
            return Ok(RowOutcome::LostRace);
        };
        if current.next_run_at() != schedule.next_run_at() || !current.enabled() {
            return Ok(RowOutcome::LostRace);
        }

        let counts = self.tasks.status_counts(schedule.owner()).await?;
        let email = OutboundEmail {
            to: schedule.user_mail().clone(),
            subject: REPORT_SUBJECT.to_owned(),
            body: render_body(schedule.owner().as_str(), counts)?,
        };

        self.mailer.send(&email).await?;

        let advanced = self
            .schedules
            .advance_if_unchanged(
                schedule.id(),
                schedule.next_run_at(),
                advance_after_fire(schedule.next_run_at()),
            )
            .await?;
        Ok(if advanced {
            RowOutcome::Sent
        } else {
            RowOutcome::LostRace
        })
    }
}

fn render_body(username: &str, counts: StatusCounts) -> Result<String, minijinja::Error> {
    let mut environment = Environment::new();
    environment.add_template("report_body", BODY_TEMPLATE)?;
    environment.get_template("report_body")?.render(context! {
        username => username,
        counts => minijinja::Value::from_serialize(&counts),
    })
}
