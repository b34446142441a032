//! Port contracts for report scheduling and delivery.

pub mod mailer;
pub mod repository;

pub use mailer::{MailerError, OutboundEmail, ReportMailer};
pub use repository::{ReportRepositoryError, ReportRepositoryResult, ReportScheduleRepository};
