//! In-memory adapters for task persistence ports.

mod history;
mod task;

pub use history::InMemoryTaskHistoryRepository;
pub use task::InMemoryTaskRepository;
