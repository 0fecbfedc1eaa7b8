//! Application-level errors (wraps domain and remote errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::api::ApiError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("invalid JSON in {location}: {message}")]
    Parse { location: String, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("{context}: {source}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
