use std::path::PathBuf;

use thiserror::Error;

/// Why configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error("{} does not exist", path.display())]
    Missing {
        /// The file that was asked for.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read {}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML, or a key no section declares.
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or a key no section declares.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither `toml` nor `json`.
    #[error("unsupported configuration format {0:?}")]
    UnsupportedFormat(String),

    /// A value parsed but is out of bounds.
    #[error("{field}: {reason}")]
    Invalid {
        /// Dotted key, e.g. `bind.max_body_bytes`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// An override variable holds an unparsable value.
    #[error("{var}: {reason}")]
    Env {
        /// Full variable name.
        var: String,
        /// Expected shape of the value.
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn missing(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn env(var: impl Into<String>, reason: &'static str) -> Self {
        Self::Env {
            var: var.into(),
            reason,
        }
    }
}
