//! Requests assembled by tests.

use crate::error::TestError;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde::Serialize;

/// A request ready to be dispatched.
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// Verb.
    pub method: Method,
    /// Target, path plus optional query.
    pub uri: Uri,
    /// Header fields.
    pub headers: HeaderMap,
    /// Full body.
    pub body: Bytes,
}

impl TestRequest {
    /// Starts a request.
    pub fn builder(method: Method, uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(method, uri)
    }

    /// Converts this request to an `http::Request`.
    #[must_use]
    pub fn into_http_request(self) -> http::Request<Bytes> {
        let mut request = http::Request::new(self.body);
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }
}

/// Builder for [`TestRequest`].
///
/// Invalid headers or bodies do not fail immediately; the first error is
/// reported by [`build`](Self::build).
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    fn fail(mut self, error: TestError) -> Self {
        self.error.get_or_insert(error);
        self
    }

    /// Sets a header, replacing earlier values.
    pub fn header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.put_header(name.as_ref(), value.as_ref(), false)
    }

    /// Adds a header value, keeping earlier values.
    pub fn append_header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.put_header(name.as_ref(), value.as_ref(), true)
    }

    fn put_header(mut self, name: &str, value: &str, append: bool) -> Self {
        let name = match HeaderName::try_from(name) {
            Ok(name) => name,
            Err(e) => return self.fail(TestError::InvalidHeader(format!("{name}: {e}"))),
        };
        let value = match HeaderValue::try_from(value) {
            Ok(value) => value,
            Err(e) => return self.fail(TestError::InvalidHeader(format!("{name}: {e}"))),
        };
        if append {
            self.headers.append(name, value);
        } else {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and `Content-Type: application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.body = Bytes::from(bytes);
                self.content_type("application/json")
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Sets a form body and `Content-Type: application/x-www-form-urlencoded`.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => {
                self.body = Bytes::from(encoded);
                self.content_type("application/x-www-form-urlencoded")
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Builds the request.
    ///
    /// # Errors
    ///
    /// Returns the first header or body error, or an invalid URI.
    pub fn build(self) -> Result<TestRequest, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("invalid URI {:?}: {e}", self.uri)))?;

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body,
        })
    }
}
