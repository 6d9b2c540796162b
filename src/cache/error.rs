use thiserror::Error;

/// Reasons a strategy could not reach a decision.
///
/// These never leave a strategy: each is logged, counted and turned into an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("navigation structure depth is not configured at `{path}`")]
    ConfigurationAbsent { path: String },
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl InvalidationError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn configuration_absent(path: impl Into<String>) -> Self {
        Self::ConfigurationAbsent { path: path.into() }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(message.into())
    }

    /// Stable label used for metrics and structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_input",
            Self::ConfigurationAbsent { .. } => "configuration_absent",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
        }
    }
}
