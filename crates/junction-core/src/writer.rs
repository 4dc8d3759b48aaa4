//! Response writers.
//!
//! [`ResponseWriter`] is the surface a [`Respond`](crate::Respond) value
//! writes to. [`BufferedWriter`] collects everything into an
//! `http::Response`; [`RecordingWriter`] wraps another writer and remembers
//! what passed through it.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

/// Sink for a single response.
///
/// The first status written wins; later calls are ignored. Writing body
/// bytes before any status implies `200 OK`.
pub trait ResponseWriter: Send {
    /// Response headers. Changes after the first body write may be ignored
    /// by streaming implementations.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sets the status code if none has been written yet.
    fn write_status(&mut self, status: StatusCode);

    /// Appends body bytes.
    fn write(&mut self, chunk: &[u8]);
}

/// Writer that buffers the whole response in memory.
#[derive(Debug, Default)]
pub struct BufferedWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Finishes into a response with a `Full` body.
    #[must_use]
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        self.into_bytes_response().map(Full::new)
    }

    /// Finishes into a response with a plain `Bytes` body.
    #[must_use]
    pub fn into_bytes_response(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body.freeze());
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for BufferedWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
    }

    fn write(&mut self, chunk: &[u8]) {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(chunk);
    }
}

/// Wraps a writer and records the first status and the byte count.
///
/// # Example
///
/// ```rust
/// use http::StatusCode;
/// use junction_core::{BufferedWriter, RecordingWriter, ResponseWriter};
///
/// let mut inner = BufferedWriter::new();
/// let mut recorder = RecordingWriter::new(&mut inner);
/// recorder.write(b"abc");
/// recorder.write_status(StatusCode::NOT_FOUND);
///
/// assert_eq!(recorder.status(), Some(StatusCode::OK));
/// assert_eq!(recorder.bytes_written(), 3);
/// ```
pub struct RecordingWriter<'w> {
    inner: &'w mut dyn ResponseWriter,
    status: Option<StatusCode>,
    bytes_written: usize,
}

impl<'w> RecordingWriter<'w> {
    /// Wraps `inner`.
    pub fn new(inner: &'w mut dyn ResponseWriter) -> Self {
        Self {
            inner,
            status: None,
            bytes_written: 0,
        }
    }

    /// First status observed, or `200` implied by a body write.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Cumulative body bytes.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

impl std::fmt::Debug for RecordingWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingWriter")
            .field("status", &self.status)
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

impl ResponseWriter for RecordingWriter<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
        self.inner.write_status(status);
    }

    fn write(&mut self, chunk: &[u8]) {
        self.status.get_or_insert(StatusCode::OK);
        self.bytes_written += chunk.len();
        self.inner.write(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_first_status_wins() {
        let mut writer = BufferedWriter::new();
        writer.write_status(StatusCode::CREATED);
        writer.write_status(StatusCode::BAD_REQUEST);
        assert_eq!(writer.into_bytes_response().status(), StatusCode::CREATED);
    }

    #[test]
    fn test_buffered_empty_is_ok() {
        let writer = BufferedWriter::new();
        assert!(writer.status().is_none());
        let response = writer.into_bytes_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_buffered_concatenates_chunks() {
        let mut writer = BufferedWriter::new();
        writer.write(b"ab");
        writer.write(b"cd");
        assert_eq!(writer.into_bytes_response().body(), "abcd");
    }

    #[test]
    fn test_recording_counts_bytes() {
        let mut inner = BufferedWriter::new();
        {
            let mut recorder = RecordingWriter::new(&mut inner);
            recorder.write_status(StatusCode::ACCEPTED);
            recorder.write(b"12345");
            recorder.write(b"678");
            assert_eq!(recorder.status(), Some(StatusCode::ACCEPTED));
            assert_eq!(recorder.bytes_written(), 8);
        }
        let response = inner.into_bytes_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.body(), "12345678");
    }

    #[test]
    fn test_recording_without_writes() {
        let mut inner = BufferedWriter::new();
        let recorder = RecordingWriter::new(&mut inner);
        assert_eq!(recorder.status(), None);
        assert_eq!(recorder.bytes_written(), 0);
    }

    #[test]
    fn test_recording_forwards_headers() {
        let mut inner = BufferedWriter::new();
        {
            let mut recorder = RecordingWriter::new(&mut inner);
            recorder
                .headers_mut()
                .insert("x-trace", "t".parse().unwrap());
        }
        assert_eq!(inner.into_bytes_response().headers()["x-trace"], "t");
    }
}
