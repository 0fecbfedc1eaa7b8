//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::services::API_KEY_ENV;
use crate::application::ApplicationError;
use crate::infrastructure::api::{ApiError, FALLBACK_MESSAGE};
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Infra(_) => crate::exitcode::FAILURE,
        }
    }

    /// Classified message shown on stderr.
    pub fn user_message(&self) -> String {
        match self.application() {
            Some(ApplicationError::NotAuthenticated(_))
            | Some(ApplicationError::Api(ApiError::Unauthorized { .. })) => format!(
                "Not authenticated. Run 'chatctl login' or set {}.",
                API_KEY_ENV
            ),
            Some(ApplicationError::Api(ApiError::NotFound { message })) => {
                format!("Not found: {message}")
            }
            Some(ApplicationError::Api(ApiError::RateLimited)) => {
                "Rate limited. Please wait a moment and try again.".to_string()
            }
            Some(ApplicationError::Api(ApiError::PayloadTooLarge)) => {
                "Payload too large. Try fewer or smaller files.".to_string()
            }
            _ => {
                let message = self.to_string();
                if message.trim().is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }

    fn application(&self) -> Option<&ApplicationError> {
        match self {
            CliError::Infra(InfraError::Application(e)) => Some(e),
            CliError::Infra(InfraError::Io { .. }) => None,
        }
    }
}
