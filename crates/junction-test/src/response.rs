//! Buffered responses with assertion helpers.

use std::fmt;

use bytes::Bytes;
use http::{header, HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full};
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A fully buffered response.
///
/// The `assert_*` methods panic with a descriptive message and return
/// `&Self`, so checks can be chained:
///
/// ```rust
/// use http::{HeaderMap, StatusCode};
/// use junction_test::TestResponse;
///
/// let response = TestResponse::new(StatusCode::CREATED, HeaderMap::new(), "ok".into());
/// response.assert_status(StatusCode::CREATED).assert_body_eq("ok");
/// ```
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Creates a response from raw parts.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Collects a dispatched response.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::BodyRead`] if the body cannot be collected.
    pub async fn from_http(response: http::Response<Full<Bytes>>) -> Result<Self, TestError> {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();
        Ok(Self::new(parts.status, parts.headers, body))
    }

    /// The status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The first value of a header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|value| value.to_str().ok())
    }

    /// The `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// The verbs listed in `Allow`, in order.
    #[must_use]
    pub fn allow(&self) -> Vec<&str> {
        self.header(header::ALLOW.as_str())
            .map(|value| value.split(',').map(str::trim).collect())
            .unwrap_or_default()
    }

    /// The raw body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body as text, lossily decoded.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::Json`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status differs.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "expected status {expected}, got {} with body {:?}",
            self.status,
            self.text()
        );
        self
    }

    /// Asserts a header value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    #[track_caller]
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        match self.header(name) {
            Some(actual) => assert_eq!(actual, expected, "header {name}"),
            None => panic!("expected header {name}: {expected}, but it is missing"),
        }
        self
    }

    /// Asserts a header is absent.
    ///
    /// # Panics
    ///
    /// Panics if the header is present.
    #[track_caller]
    pub fn assert_no_header(&self, name: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        assert!(
            self.headers.get(name).is_none(),
            "expected no {name} header, got {:?}",
            self.headers.get(name)
        );
        self
    }

    /// Asserts the `Allow` header lists exactly `expected`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the verbs differ.
    #[track_caller]
    pub fn assert_allow(&self, expected: &[&str]) -> &Self {
        assert_eq!(self.allow(), expected, "Allow header");
        self
    }

    /// Asserts the body text.
    ///
    /// # Panics
    ///
    /// Panics if the body differs.
    #[track_caller]
    pub fn assert_body_eq(&self, expected: impl AsRef<str>) -> &Self {
        assert_eq!(self.text(), expected.as_ref(), "response body");
        self
    }

    /// Asserts the body contains `needle`.
    ///
    /// # Panics
    ///
    /// Panics if it does not.
    #[track_caller]
    pub fn assert_body_contains(&self, needle: impl AsRef<str>) -> &Self {
        let text = self.text();
        let needle = needle.as_ref();
        assert!(text.contains(needle), "expected body to contain {needle:?}, got {text:?}");
        self
    }

    /// Asserts the body is empty.
    ///
    /// # Panics
    ///
    /// Panics if it is not.
    #[track_caller]
    pub fn assert_empty(&self) -> &Self {
        assert!(self.body.is_empty(), "expected empty body, got {:?}", self.text());
        self
    }

    /// Asserts the body equals a JSON value.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or differs.
    #[track_caller]
    pub fn assert_json_eq(&self, expected: &serde_json::Value) -> &Self {
        let actual: serde_json::Value = self
            .json()
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {:?}", self.text()));
        assert_eq!(&actual, expected, "JSON body");
        self
    }

    /// Asserts the value at a dotted path (`user.tags.0`) in the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON, the path is missing or the value
    /// differs.
    #[track_caller]
    pub fn assert_json_field(&self, path: &str, expected: &serde_json::Value) -> &Self {
        let actual: serde_json::Value = self
            .json()
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {:?}", self.text()));
        match json_path(&actual, path) {
            Some(value) => assert_eq!(value, expected, "JSON field {path}"),
            None => panic!("JSON field {path} missing in {actual}"),
        }
        self
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.text())
            .finish()
    }
}

fn json_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        serde_json::Value::Object(map) => map.get(segment),
        serde_json::Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
