//! Unit tests for the task module.
//!
//! Tests are organised by layer: the pure cascade planner, domain types,
//! and the mutation service running against the in-memory adapters.

mod domain_tests;
