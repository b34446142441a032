//! Daily emailed task reports on a per-user schedule.
//!
//! A user picks a local wall-clock time and timezone; the schedule
//! calculator converts that into the next absolute UTC fire instant, and
//! the dispatcher advances it by a fixed 24 hours after each confirmed
//! send. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
