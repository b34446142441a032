//! `PostgreSQL` adapters for report schedule persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresReportScheduleRepository, ReportPgPool};
