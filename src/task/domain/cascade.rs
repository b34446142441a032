//! Priority cascade planning.
//!
//! Priorities form a dense, unique ordering within an owner's live task
//! set. Assigning a priority that is already taken shifts the maximal
//! contiguous run of priorities starting at the desired value up by one,
//! leaving gaps and non-contiguous tasks untouched. The planner here is
//! pure; repository adapters wrap it in their own locking and transaction
//! envelope so the scan-and-rewrite is atomic per owner.

use super::TaskId;
use thiserror::Error;

/// A task's position in the cascade scan: its identifier and current
/// priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrioritySlot {
    /// Task occupying the slot.
    pub id: TaskId,
    /// Priority currently assigned to the task.
    pub priority: u32,
}

impl PrioritySlot {
    /// Creates a slot.
    #[must_use]
    pub const fn new(id: TaskId, priority: u32) -> Self {
        Self { id, priority }
    }
}

/// A shift would push a slot past the maximum representable priority.
///
/// Carries the priority of the unshiftable slot. The whole cascade is
/// rejected; wrapping the counter would duplicate an existing low
/// priority and silently break density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("priority {0} is at the representable maximum and cannot be shifted")]
pub struct PriorityRangeExhausted(pub u32);

/// Computes the priority reassignments needed to free `desired`.
///
/// `slots` must be the owner's live tasks ordered ascending by priority,
/// with the task being updated (if any) already excluded. Each returned
/// slot carries the new priority for the identified task; tasks absent
/// from the result keep their current priority. Inserting into a set with
/// no collision returns an empty plan.
///
/// # Errors
///
/// Returns [`PriorityRangeExhausted`] when the run reaches `u32::MAX`
/// and the colliding slot has nowhere to shift to.
pub fn plan_cascade(
    slots: &[PrioritySlot],
    desired: u32,
) -> Result<Vec<PrioritySlot>, PriorityRangeExhausted> {
    let mut cursor = desired;
    let mut shifted = Vec::new();
    for slot in slots {
        if slot.priority == cursor {
            cursor = cursor
                .checked_add(1)
                .ok_or(PriorityRangeExhausted(slot.priority))?;
            shifted.push(PrioritySlot::new(slot.id, cursor));
        }
    }
    Ok(shifted)
}
