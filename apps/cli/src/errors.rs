use std::path::PathBuf;

use thiserror::Error;

use crate::llm_client::TailoringError;

/// Application-level error type.
/// Binaries render it through `code()`, the `Display` message, and `hint()`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tailoring error: {0}")]
    Tailoring(#[from] TailoringError),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable, machine-readable kind printed alongside the message.
    pub fn code(&self) -> String {
        match self {
            AppError::NotFound(_) => "NOT_FOUND".to_string(),
            AppError::Validation(_) => "VALIDATION_ERROR".to_string(),
            AppError::Io { .. } => "IO_ERROR".to_string(),
            AppError::Tailoring(e) => format!("TAILORING_ERROR:{}", e.kind.code()),
            AppError::Config(_) => "CONFIG_ERROR".to_string(),
            AppError::Render(_) => "RENDER_ERROR".to_string(),
            AppError::Cancelled(_) => "CANCELLED".to_string(),
        }
    }

    /// What the user can do about it, if anything obvious.
    pub fn hint(&self) -> Option<&'static str> {
        use crate::llm_client::TailoringErrorKind as Kind;

        match self {
            AppError::NotFound(_) => {
                Some("No profile yet. Run `collect` first to enter your information.")
            }
            AppError::Validation(_) => {
                Some("Fix the field above in the profile file, or re-run `collect`.")
            }
            AppError::Io { .. } => Some("Check that the path exists and is writable."),
            AppError::Config(_) => Some("Check your environment variables or .env file."),
            AppError::Tailoring(e) => match e.kind {
                Kind::Unauthorized => Some("Check that OPENAI_API_KEY is set to a valid key."),
                Kind::RateLimited => Some("The API is rate limiting requests. Try again later."),
                Kind::Timeout => Some("The API did not answer in time. Try again later."),
                Kind::ServiceUnavailable => Some("The API could not be reached or failed."),
                Kind::MalformedReply => {
                    Some("The model's reply could not be understood. Try rephrasing the job description.")
                }
            },
            AppError::Render(_) | AppError::Cancelled(_) => None,
        }
    }

    /// Cancellation is a normal exit, everything else is a failure.
    pub fn is_failure(&self) -> bool {
        !matches!(self, AppError::Cancelled(_))
    }
}
