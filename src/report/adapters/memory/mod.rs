//! In-memory adapters for report scheduling and delivery ports.

mod mailer;
mod schedule;

pub use mailer::RecordingMailer;
pub use schedule::InMemoryReportScheduleRepository;
