//! Typed configuration for junction.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict parsing (unknown fields are errors)
//! - Layered loading (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use junction_config::ConfigLoader;
//!
//! # fn main() -> Result<(), junction_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_production()
//!     .with_optional_file("junction.toml")?
//!     .with_env_prefix("JUNCTION")
//!     .load()?;
//!
//! junction_telemetry::init_logging(&config.logging.to_log_config()).ok();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [dispatch]
//! recover_panics = true
//! access_log = true
//!
//! [bind]
//! max_body_bytes = 4194304
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! file_line_info = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Every key can be overridden as `PREFIX__SECTION__KEY`:
//!
//! - `JUNCTION__DISPATCH__ACCESS_LOG=false`
//! - `JUNCTION__BIND__MAX_BODY_BYTES=1048576`
//! - `JUNCTION__LOGGING__LEVEL=junction_dispatch=debug,info`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{JunctionConfig, JunctionConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{BindConfig, DispatchConfig, LogFormat, LoggingConfig, DEFAULT_MAX_BODY_BYTES};
