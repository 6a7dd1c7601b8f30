// Error types for the load engine and its front end

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that stop a run from producing a result.
///
/// Per-request failures never show up here; they are recorded as outcomes.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The shared HTTP transport could not be built before any loop started
    #[error("failed to initialize HTTP transport: {0}")]
    TransportInit(#[from] native_tls::Error),

    /// A request loop terminated abnormally
    #[error("a request loop did not complete: {0}")]
    WorkerJoin(#[source] tokio::task::JoinError),

    /// The deadline of the run is not representable
    #[error("test duration of {0} seconds is out of range")]
    DurationOutOfRange(u64),
}

/// Inbound parameters that do not describe a runnable test
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("url is not a valid absolute URL: {0}")]
    InvalidUrl(String),

    #[error("url scheme must be http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("url must include a host")]
    MissingHost,

    #[error("duration must be greater than 0, got {0}")]
    NonPositiveDuration(i64),

    #[error("duration must be at most {max} seconds, got {got}")]
    DurationTooLong { got: i64, max: i64 },

    #[error("concurrency must be greater than 0, got {0}")]
    NonPositiveConcurrency(i64),
}

/// Malformed process configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        ConfigError::InvalidValue {
            key,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
