use thiserror::Error;

/// Logging setup failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The `EnvFilter` directive did not parse.
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed.
    #[error("logging already initialized: {0}")]
    LoggingInit(String),
}
