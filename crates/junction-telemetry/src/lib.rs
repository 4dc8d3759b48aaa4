//! Logging setup for junction services.
//!
//! The other junction crates emit [`tracing`] events (route registration
//! and matching at `debug`, bind failures at `debug`, access lines at `info`,
//! recovered panics at `error`). This crate installs the subscriber that
//! renders them: an `EnvFilter` and a JSON or pretty `fmt` layer on stderr.
//!
//! ```rust,ignore
//! use junction_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! ```

#![warn(missing_docs)]

mod error;
mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, Output};

/// Result alias for this crate.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
