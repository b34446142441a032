//! Application services for task mutation orchestration.

mod mutation;

pub use mutation::{
    CreateTaskRequest, TaskMutationError, TaskMutationResult, TaskMutationService,
};
