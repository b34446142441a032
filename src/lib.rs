//! Tasktrail: personal task tracking with priority cascades and daily
//! email reports.
//!
//! The crate is organised into two bounded contexts, each following the
//! same hexagonal layout:
//!
//! - [`task`]: task lifecycle, per-owner dense priority management, and
//!   the immutable status-change history.
//! - [`report`]: per-owner daily report schedules, timezone-aware next
//!   run calculation, and the dispatch cycle that renders and sends the
//!   report email.
//!
//! Within each context, `domain` holds pure types and logic, `ports`
//! declares the async traits the services depend on, `adapters`
//! provides in-memory and Postgres implementations, and `services`
//! wires domain logic to ports.

pub mod report;
pub mod task;
