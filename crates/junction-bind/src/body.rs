//! Body formats and decoders.
//!
//! The format is chosen from the request's `Content-Type`. Parameters such
//! as `charset` are ignored; a missing header means JSON.

use serde::de::{DeserializeOwned, IgnoredAny};

use crate::error::BodyDecodeError;
use crate::source::Tag;

/// A decodable body format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyFormat {
    /// `application/json`
    Json,
    /// `application/xml`, `text/xml`
    Xml,
    /// `application/x-yaml`, `application/yaml`
    Yaml,
    /// `application/x-www-form-urlencoded`
    Form,
}

impl BodyFormat {
    /// Picks the format for a `Content-Type` value.
    ///
    /// Returns `None` when the media type has no decoder.
    ///
    /// ```rust
    /// use junction_bind::BodyFormat;
    ///
    /// assert_eq!(BodyFormat::from_content_type(None), Some(BodyFormat::Json));
    /// assert_eq!(
    ///     BodyFormat::from_content_type(Some("text/xml; charset=utf-8")),
    ///     Some(BodyFormat::Xml)
    /// );
    /// assert_eq!(BodyFormat::from_content_type(Some("text/csv")), None);
    /// ```
    #[must_use]
    pub fn from_content_type(content_type: Option<&str>) -> Option<Self> {
        let Some(raw) = content_type else {
            return Some(Self::Json);
        };
        let media: mime::Mime = raw.trim().parse().ok()?;
        match media.essence_str().to_ascii_lowercase().as_str() {
            "application/json" => Some(Self::Json),
            "application/xml" | "text/xml" => Some(Self::Xml),
            "application/x-yaml" | "application/yaml" => Some(Self::Yaml),
            "application/x-www-form-urlencoded" => Some(Self::Form),
            _ => None,
        }
    }

    /// The field tag this format fills.
    #[must_use]
    pub const fn tag(self) -> Tag {
        match self {
            Self::Json => Tag::Json,
            Self::Xml => Tag::Xml,
            Self::Yaml => Tag::Yaml,
            Self::Form => Tag::Form,
        }
    }
}

/// Decodes a whole body into `T`.
///
/// # Errors
///
/// Returns the format's decoder error.
pub fn decode<T: DeserializeOwned>(format: BodyFormat, body: &[u8]) -> Result<T, BodyDecodeError> {
    let value = match format {
        BodyFormat::Json => serde_json::from_slice(body)?,
        BodyFormat::Xml => quick_xml::de::from_reader(body)?,
        BodyFormat::Yaml => serde_yaml::from_slice(body)?,
        BodyFormat::Form => serde_urlencoded::from_bytes(body)?,
    };
    Ok(value)
}

/// Checks that a body is well-formed without keeping any of it.
///
/// # Errors
///
/// Returns the format's decoder error.
pub fn check_syntax(format: BodyFormat, body: &[u8]) -> Result<(), BodyDecodeError> {
    decode::<IgnoredAny>(format, body).map(|_| ())
}
