//! Layered loading: preset, then file, then environment.

use std::path::Path;
use std::{env, fs};

use crate::{ConfigError, JunctionConfig, LogFormat};

/// File formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if name.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    fn parse(self, content: &str) -> Result<JunctionConfig, ConfigError> {
        Ok(match self {
            Self::Toml => toml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        })
    }
}

/// Builds a [`JunctionConfig`] from layers.
///
/// Each layer replaces what came before: a preset, then at most one file
/// (sections it omits take their defaults), then `PREFIX__SECTION__KEY`
/// environment variables, applied in name order when [`load`](Self::load)
/// runs.
///
/// ```no_run
/// use junction_config::ConfigLoader;
///
/// # fn main() -> Result<(), junction_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("junction.toml")?
///     .with_env_prefix("junction")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: JunctionConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// A loader holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to [`JunctionConfig::default`].
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = JunctionConfig::default();
        self
    }

    /// Resets to [`JunctionConfig::development`].
    ///
    /// ```
    /// let config = junction_config::ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = JunctionConfig::development();
        self
    }

    /// Resets to [`JunctionConfig::production`].
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = JunctionConfig::production();
        self
    }

    /// Replaces the configuration with the contents of `path`, parsed by
    /// its `.toml` or `.json` extension.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`], [`ConfigError::Io`],
    /// [`ConfigError::UnsupportedFormat`], or a parse error (unknown keys
    /// included).
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::missing(path));
        }

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_name)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        self.config = format.parse(&content)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file keeps the
    /// current configuration.
    ///
    /// # Errors
    ///
    /// Any error of [`with_file`](Self::with_file) other than a missing file.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Replaces the configuration with `content` in the named format,
    /// `"toml"` or `"json"` (case-insensitive).
    ///
    /// ```
    /// let config = junction_config::ConfigLoader::new()
    ///     .with_string("[dispatch]\naccess_log = true", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    /// assert!(config.dispatch.access_log);
    /// ```
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedFormat`] or a parse error.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let format =
            Format::from_name(format).ok_or_else(|| ConfigError::UnsupportedFormat(format.into()))?;
        self.config = format.parse(content)?;
        Ok(self)
    }

    /// Reads overrides from variables named `PREFIX__SECTION__KEY`. The
    /// prefix is uppercased.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides, then validates.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Env`] for an unparsable override,
    /// [`ConfigError::Invalid`] from validation.
    pub fn load(mut self) -> Result<JunctionConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let mut vars: Vec<(String, String)> =
                env::vars().filter(|(name, _)| name.starts_with(&prefix)).collect();
            vars.sort();
            for (name, value) in vars {
                self.apply_env_var(&name, &value, &prefix)?;
            }
        }
        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration as layered so far, skipping environment
    /// overrides and validation.
    #[must_use]
    pub fn load_unvalidated(self) -> JunctionConfig {
        self.config
    }

    fn apply_env_var(&mut self, name: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(path) = name.strip_prefix(prefix).and_then(|rest| rest.strip_prefix("__")) else {
            return Ok(());
        };
        let Some((section, key)) = path.split_once("__") else {
            return Ok(());
        };

        let flag = || parse_bool(value).ok_or_else(|| ConfigError::env(name, "expected boolean"));
        let config = &mut self.config;

        match (section, key) {
            ("DISPATCH", "RECOVER_PANICS") => config.dispatch.recover_panics = flag()?,
            ("DISPATCH", "ACCESS_LOG") => config.dispatch.access_log = flag()?,
            ("BIND", "MAX_BODY_BYTES") => {
                config.bind.max_body_bytes = value
                    .parse()
                    .map_err(|_| ConfigError::env(name, "expected a byte count"))?;
            }
            ("LOGGING", "ENABLED") => config.logging.enabled = flag()?,
            ("LOGGING", "LEVEL") => config.logging.level = value.to_string(),
            ("LOGGING", "FORMAT") => {
                config.logging.format = match value.to_ascii_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => return Err(ConfigError::env(name, "expected json or pretty")),
                };
            }
            ("LOGGING", "FILE_LINE_INFO") => config.logging.file_line_info = flag()?,
            _ => tracing::trace!(var = name, "ignoring unknown configuration variable"),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(ConfigLoader::new().load().unwrap(), JunctionConfig::default());

        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.dispatch.access_log);

        let config = ConfigLoader::new()
            .with_development()
            .with_defaults()
            .load()
            .unwrap();
        assert_eq!(config, JunctionConfig::default());
    }

    #[test]
    fn test_json_string_fills_missing_sections() {
        let config = ConfigLoader::new()
            .with_string(r#"{"bind": {"max_body_bytes": 2048}}"#, "JSON")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.bind.max_body_bytes, 2048);
        assert!(config.dispatch.recover_panics);
    }

    #[test]
    fn test_unsupported_format_name() {
        let err = ConfigLoader::new().with_string("a: 1", "yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(f) if f == "yaml"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ConfigLoader::new()
            .with_string("[dispatch]\nrecover = true", "toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_validates_but_unvalidated_does_not() {
        let zero = "[bind]\nmax_body_bytes = 0";

        let result = ConfigLoader::new().with_string(zero, "toml").unwrap().load();
        assert!(matches!(result, Err(ConfigError::Invalid { field: "bind.max_body_bytes", .. })));

        let config = ConfigLoader::new()
            .with_string(zero, "toml")
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.bind.max_body_bytes, 0);
    }

    #[test]
    fn test_parse_bool() {
        for yes in ["true", "TRUE", "1", "yes", "On"] {
            assert_eq!(parse_bool(yes), Some(true), "{yes}");
        }
        for no in ["false", "False", "0", "no", "off"] {
            assert_eq!(parse_bool(no), Some(false), "{no}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_env_var_per_section() {
        let mut loader = ConfigLoader::new();
        for (name, value) in [
            ("APP__DISPATCH__ACCESS_LOG", "on"),
            ("APP__DISPATCH__RECOVER_PANICS", "0"),
            ("APP__BIND__MAX_BODY_BYTES", "512"),
            ("APP__LOGGING__FORMAT", "Pretty"),
            ("APP__LOGGING__LEVEL", "junction_dispatch=trace"),
            ("APP__LOGGING__FILE_LINE_INFO", "yes"),
        ] {
            loader.apply_env_var(name, value, "APP").unwrap();
        }

        let config = loader.load_unvalidated();
        assert!(config.dispatch.access_log);
        assert!(!config.dispatch.recover_panics);
        assert_eq!(config.bind.max_body_bytes, 512);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.level, "junction_dispatch=trace");
        assert!(config.logging.file_line_info);
    }

    #[test]
    fn test_env_var_bad_values() {
        let mut loader = ConfigLoader::new();
        for (name, value) in [
            ("APP__BIND__MAX_BODY_BYTES", "lots"),
            ("APP__DISPATCH__RECOVER_PANICS", "maybe"),
            ("APP__LOGGING__FORMAT", "xml"),
        ] {
            let err = loader.apply_env_var(name, value, "APP").unwrap_err();
            assert!(matches!(err, ConfigError::Env { ref var, .. } if var == name));
        }
    }

    #[test]
    fn test_env_var_unknown_or_foreign_ignored() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("APP__SERVER__PORT", "80", "APP").unwrap();
        loader.apply_env_var("APP__BIND", "80", "APP").unwrap();
        loader.apply_env_var("APPLE__BIND__MAX_BODY_BYTES", "1", "APP").unwrap();
        assert_eq!(loader.load_unvalidated(), JunctionConfig::default());
    }
}
