//! Application services for report scheduling and dispatch.

mod dispatch;
mod schedule;

pub use dispatch::{DispatchError, DispatchSummary, ReportDispatcher};
pub use schedule::{
    ReportScheduleError, ReportScheduleResult, ReportScheduleService, ScheduleReportRequest,
};
