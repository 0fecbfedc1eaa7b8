//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent input validation failures.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("invalid {label} '{value}'")]
    InvalidId { label: &'static str, value: String },

    #[error("at least one file pattern is required")]
    NoPatterns,

    #[error("invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("no files matched the given patterns")]
    NoFilesMatched,

    #[error("limit must be at least 1")]
    InvalidLimit,

    #[error("streaming responses are not supported")]
    StreamingResponse,
}

pub type DomainResult<T> = Result<T, DomainError>;
