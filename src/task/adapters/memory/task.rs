//! In-memory task repository for tests and lightweight embedding.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use crate::task::{
    domain::{NewTask, PrioritySlot, StatusCounts, Task, TaskId, UserId, plan_cascade},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Cascades hold a per-owner async mutex for the whole scan-and-rewrite,
/// so concurrent cascades for one owner serialize while distinct owners
/// never contend on anything but the short state guards.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
    owner_locks: OwnerLocks,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

/// Registry of per-owner cascade locks.
#[derive(Debug, Clone, Default)]
struct OwnerLocks {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl OwnerLocks {
    fn for_owner(&self, owner: &UserId) -> TaskRepositoryResult<Arc<tokio::sync::Mutex<()>>> {
        let mut registry = self.inner.lock().map_err(lock_poisoned)?;
        Ok(registry
            .entry(owner.as_str().to_owned())
            .or_default()
            .clone())
    }
}

fn lock_poisoned<T>(err: std::sync::PoisonError<T>) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn live_slots(state: &InMemoryTaskState, owner: &UserId, exclude: Option<TaskId>) -> Vec<PrioritySlot> {
    let mut slots: Vec<PrioritySlot> = state
        .tasks
        .values()
        .filter(|task| {
            task.owner() == owner && !task.deleted() && exclude.is_none_or(|id| task.id() != id)
        })
        .map(|task| PrioritySlot::new(task.id(), task.priority()))
        .collect();
    slots.sort_by_key(|slot| slot.priority);
    slots
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, draft: NewTask) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.next_id += 1;
        let task = Task::from_new(TaskId::new(state.next_id), draft);
        state.tasks.insert(task.id().into_inner(), task.clone());
        Ok(task)
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.tasks.contains_key(&task.id().into_inner()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id().into_inner(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, owner: &UserId, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .tasks
            .get(&id.into_inner())
            .filter(|task| task.owner() == owner && !task.deleted())
            .cloned())
    }

    async fn list_live(&self, owner: &UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.owner() == owner && !task.deleted())
            .cloned()
            .collect();
        tasks.sort_by_key(Task::priority);
        Ok(tasks)
    }

    async fn cascade_priorities(
        &self,
        owner: &UserId,
        desired: u32,
        exclude: Option<TaskId>,
    ) -> TaskRepositoryResult<Vec<TaskId>> {
        let owner_lock = self.owner_locks.for_owner(owner)?;
        let _cascade_guard = owner_lock.lock().await;

        let slots = {
            let state = self.state.read().map_err(lock_poisoned)?;
            live_slots(&state, owner, exclude)
        };
        let shifts = plan_cascade(&slots, desired)?;

        let mut state = self.state.write().map_err(lock_poisoned)?;
        for shift in &shifts {
            if let Some(task) = state.tasks.get_mut(&shift.id.into_inner()) {
                task.set_priority(shift.priority);
            }
        }
        Ok(shifts.iter().map(|shift| shift.id).collect())
    }

    async fn status_counts(&self, owner: &UserId) -> TaskRepositoryResult<StatusCounts> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(StatusCounts::tally(
            state
                .tasks
                .values()
                .filter(|task| task.owner() == owner && !task.deleted())
                .map(Task::status),
        ))
    }
}
