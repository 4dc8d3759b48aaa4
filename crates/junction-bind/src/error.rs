//! Binding error types.
//!
//! Coercion and body-decode failures are values: the binder returns them and
//! the handler decides how to render them. [`BindError`] implements
//! [`Respond`] so a handler can return it directly.
//!
//! # Example
//!
//! ```rust
//! use http::StatusCode;
//! use junction_bind::{BindError, CoerceError};
//!
//! let err = BindError::field("a", CoerceError::invalid("2a", "int", "invalid syntax"));
//! assert_eq!(err.to_string(), "a: 2a is not a valid int: invalid syntax");
//! assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
//! ```

use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use junction_core::{Respond, ResponseWriter};
use thiserror::Error;

use crate::validate::ValidationErrors;

/// A single token could not be converted to the field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// The token does not parse as the target kind.
    #[error("{token} is not a valid {kind}: {cause}")]
    Invalid {
        /// Offending token.
        token: String,
        /// Kind label of the target, e.g. `int64`.
        kind: &'static str,
        /// Parser cause, e.g. `invalid syntax`.
        cause: String,
    },

    /// More than one token for a scalar field.
    #[error("expected a single value, got {count}")]
    TooManyValues {
        /// Number of tokens supplied.
        count: usize,
    },

    /// More tokens than a fixed-length field can hold.
    #[error("got {count} values for a field holding at most {capacity}")]
    CapacityExceeded {
        /// Number of tokens supplied.
        count: usize,
        /// Field capacity.
        capacity: usize,
    },
}

impl CoerceError {
    /// Creates an [`CoerceError::Invalid`].
    pub fn invalid(token: &str, kind: &'static str, cause: impl Into<String>) -> Self {
        Self::Invalid {
            token: token.to_string(),
            kind,
            cause: cause.into(),
        }
    }
}

/// A request body could not be decoded.
#[derive(Debug, Error)]
pub enum BodyDecodeError {
    /// Malformed JSON.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed XML.
    #[error("invalid XML body: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Malformed YAML.
    #[error("invalid YAML body: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed URL-encoded form.
    #[error("invalid form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
}

/// Error returned by the binder.
#[derive(Debug, Error)]
pub enum BindError {
    /// A tagged field failed to coerce. Displays as `<tag-value>: <cause>`.
    #[error("{tag}: {source}")]
    Field {
        /// Tag value the tokens were looked up under.
        tag: String,
        /// Coercion failure.
        source: CoerceError,
    },

    /// The body's Content-Type has no decoder.
    #[error("unsupported Content-Type: {0}")]
    UnsupportedContentType(String),

    /// The body did not decode.
    #[error(transparent)]
    Body(#[from] BodyDecodeError),

    /// The query string did not parse.
    #[error("invalid query string: {0}")]
    Query(String),

    /// The body was already taken by an earlier bind.
    #[error("request body already consumed")]
    BodyConsumed,

    /// The body exceeds the configured limit.
    #[error("request body of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge {
        /// Body length.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Binding succeeded but the record reported violations.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl BindError {
    /// Attributes a coercion failure to a tag value.
    pub fn field(tag: impl Into<String>, source: CoerceError) -> Self {
        Self::Field {
            tag: tag.into(),
            source,
        }
    }

    /// HTTP status for rendering this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns true for validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Validation violations, when this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl Respond for BindError {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        writer.write_status(self.status_code());
        writer.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        writer.write(self.to_string().as_bytes());
    }
}
