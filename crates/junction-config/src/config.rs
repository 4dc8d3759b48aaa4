//! Top-level configuration.
//!
//! This module provides the [`JunctionConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{BindConfig, ConfigError, DispatchConfig, LogFormat, LoggingConfig};

/// Complete junction configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use junction_config::JunctionConfig;
///
/// let config = JunctionConfig::default();
/// assert!(config.dispatch.recover_panics);
/// assert_eq!(config.bind.max_body_bytes, 4 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct JunctionConfig {
    /// Dispatcher settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Binder settings.
    #[serde(default)]
    pub bind: BindConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl JunctionConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use junction_config::{BindConfig, JunctionConfig};
    ///
    /// let config = JunctionConfig::builder()
    ///     .bind(BindConfig { max_body_bytes: 1024 })
    ///     .build();
    ///
    /// assert_eq!(config.bind.max_body_bytes, 1024);
    /// ```
    #[must_use]
    pub fn builder() -> JunctionConfigBuilder {
        JunctionConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `bind.max_body_bytes` is zero
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.max_body_bytes == 0 {
            return Err(ConfigError::invalid(
                "bind.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if self.logging.enabled {
            junction_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Development preset: pretty `debug` logs with source locations and
    /// access logging.
    ///
    /// # Example
    ///
    /// ```
    /// use junction_config::JunctionConfig;
    ///
    /// let config = JunctionConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.file_line_info = true;

        config.dispatch.access_log = true;

        config
    }

    /// Production preset: JSON `info` logs, access logging and panic
    /// recovery.
    ///
    /// # Example
    ///
    /// ```
    /// use junction_config::{JunctionConfig, LogFormat};
    ///
    /// let config = JunctionConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;

        config.dispatch.recover_panics = true;
        config.dispatch.access_log = true;

        config
    }
}

/// Builder for [`JunctionConfig`].
#[derive(Debug, Default)]
pub struct JunctionConfigBuilder {
    dispatch: Option<DispatchConfig>,
    bind: Option<BindConfig>,
    logging: Option<LoggingConfig>,
}

impl JunctionConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dispatcher section.
    #[must_use]
    pub const fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Set the binder section.
    #[must_use]
    pub const fn bind(mut self, bind: BindConfig) -> Self {
        self.bind = Some(bind);
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> JunctionConfig {
        JunctionConfig {
            dispatch: self.dispatch.unwrap_or_default(),
            bind: self.bind.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<JunctionConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
