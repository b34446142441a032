//! Prioritized task tracking with soft deletion and status history.
//!
//! Task priorities stay dense and unique per owner: assigning an occupied
//! priority cascades the colliding contiguous run up by one inside a
//! per-owner atomic scan-and-rewrite. Every observed status change appends
//! one immutable history row. The module follows hexagonal architecture:
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
