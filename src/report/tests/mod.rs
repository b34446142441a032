//! Unit tests for the report module.
//!
//! Tests are organised by layer: the pure next-run calculator, domain
//! types, the schedule service, and the dispatcher running against the
//! in-memory adapters.

mod next_run_tests;
mod schedule_service_tests;
