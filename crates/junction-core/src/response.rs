//! The response contract.
//!
//! A response is anything that can write itself to a [`ResponseWriter`]. The
//! dispatcher calls [`Respond::write_to`] exactly once per request.
//!
//! # Example
//!
//! ```rust
//! use http::StatusCode;
//! use junction_core::{BufferedWriter, Respond};
//!
//! let mut writer = BufferedWriter::new();
//! Box::new((StatusCode::CREATED, "done")).write_to(&mut writer);
//!
//! let response = writer.into_response();
//! assert_eq!(response.status(), StatusCode::CREATED);
//! ```

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::writer::ResponseWriter;

/// Something that renders itself onto a [`ResponseWriter`].
pub trait Respond: Send {
    /// Writes status, headers and body.
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter);
}

/// A type-erased response.
pub type BoxResponse = Box<dyn Respond>;

/// Boxes a response.
pub fn boxed<R: Respond + 'static>(response: R) -> BoxResponse {
    Box::new(response)
}

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";
const APPLICATION_JSON: &str = "application/json";

fn default_content_type(writer: &mut dyn ResponseWriter, value: &'static str) {
    writer
        .headers_mut()
        .entry(CONTENT_TYPE)
        .or_insert(HeaderValue::from_static(value));
}

impl Respond for BoxResponse {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        (*self).write_to(writer);
    }
}

impl Respond for StatusCode {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        writer.write_status(*self);
    }
}

impl Respond for () {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        writer.write_status(StatusCode::OK);
    }
}

impl Respond for &'static str {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        default_content_type(writer, TEXT_PLAIN);
        writer.write(self.as_bytes());
    }
}

impl Respond for String {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        default_content_type(writer, TEXT_PLAIN);
        writer.write(self.as_bytes());
    }
}

impl Respond for Bytes {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        default_content_type(writer, OCTET_STREAM);
        writer.write(&self);
    }
}

impl Respond for Vec<u8> {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        default_content_type(writer, OCTET_STREAM);
        writer.write(&self);
    }
}

impl<R: Respond> Respond for (StatusCode, R) {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        let (status, inner) = *self;
        writer.write_status(status);
        Box::new(inner).write_to(writer);
    }
}

/// Headers are applied first; the inner response may overwrite them.
impl<R: Respond> Respond for (HeaderMap, R) {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        let (headers, inner) = *self;
        let target = writer.headers_mut();
        let mut last = None;
        for (name, value) in headers {
            if let Some(name) = name {
                target.insert(name.clone(), value);
                last = Some(name);
            } else if let Some(name) = &last {
                target.append(name.clone(), value);
            }
        }
        Box::new(inner).write_to(writer);
    }
}

impl<T: Respond, E: Respond> Respond for Result<T, E> {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        match *self {
            Ok(ok) => Box::new(ok).write_to(writer),
            Err(err) => Box::new(err).write_to(writer),
        }
    }
}

impl Respond for http::Response<Bytes> {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        let (parts, body) = self.into_parts();
        writer.headers_mut().extend(parts.headers);
        writer.write_status(parts.status);
        if !body.is_empty() {
            writer.write(&body);
        }
    }
}

/// Serializes `T` as a JSON body.
///
/// Serialization failures become a 500 with a plain-text message.
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: Serialize + Send> Respond for Json<T> {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        match serde_json::to_vec(&self.0) {
            Ok(body) => {
                default_content_type(writer, APPLICATION_JSON);
                writer.write(&body);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize JSON response");
                writer.write_status(StatusCode::INTERNAL_SERVER_ERROR);
                default_content_type(writer, TEXT_PLAIN);
                writer.write(e.to_string().as_bytes());
            }
        }
    }
}
