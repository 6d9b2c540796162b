use thiserror::Error;

use crate::infra::error::InfraError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("invalid change notification `{path}`: {source}")]
    Notification {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn notification(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Notification {
            path: path.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit code for this error; input problems are distinguished from failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Notification { .. } | AppError::Validation(_) => 2,
            AppError::Infra(InfraError::Configuration { .. }) => 3,
            AppError::Infra(_) | AppError::Unexpected(_) => 1,
        }
    }
}
