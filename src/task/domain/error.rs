//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The owner identifier is empty or contains whitespace.
    #[error("invalid owner identifier '{0}', expected a non-empty username")]
    InvalidOwner(String),

    /// The task title is shorter than the minimum length.
    #[error("title must be at least {minimum} characters long, got {actual}")]
    TitleTooShort {
        /// Minimum accepted title length.
        minimum: usize,
        /// Length of the rejected title after trimming.
        actual: usize,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
