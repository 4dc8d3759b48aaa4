//! Access logging middleware.
//!
//! Logs one `info` event per request once the response has been written,
//! with the status and byte count observed through a [`RecordingWriter`].

use std::sync::Arc;
use std::time::Instant;

use http::{Method, StatusCode};
use junction_core::{
    boxed, into_handler, BoxHandler, BoxResponse, RecordingWriter, Request, Respond,
    ResponseWriter,
};

use crate::middleware::Middleware;

/// Logs method, path, status, bytes and duration for every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessLog;

impl AccessLog {
    /// Creates the middleware.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Middleware for AccessLog {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        into_handler(move |request: Request| {
            let next = Arc::clone(&next);
            async move {
                let method = request.method().clone();
                let path = request.path().to_string();
                let started = Instant::now();
                let inner = next.call(request).await;
                boxed(Logged {
                    inner,
                    method,
                    path,
                    started,
                })
            }
        })
    }
}

/// A response that logs itself after writing.
struct Logged {
    inner: BoxResponse,
    method: Method,
    path: String,
    started: Instant,
}

impl Respond for Logged {
    fn write_to(self: Box<Self>, writer: &mut dyn ResponseWriter) {
        let Self {
            inner,
            method,
            path,
            started,
        } = *self;

        let mut recorder = RecordingWriter::new(writer);
        inner.write_to(&mut recorder);
        let status = recorder.status().unwrap_or(StatusCode::OK);

        tracing::info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            bytes = recorder.bytes_written(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "request completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::BufferedWriter;

    #[tokio::test]
    async fn test_response_unchanged() {
        let handler = AccessLog::new().wrap(into_handler(|_req: Request| async {
            (StatusCode::CREATED, "made")
        }));

        let mut writer = BufferedWriter::new();
        handler
            .call(Request::builder().build())
            .await
            .write_to(&mut writer);

        let response = writer.into_bytes_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body(), "made");
    }

    #[tokio::test]
    async fn test_empty_response() {
        let handler =
            AccessLog::new().wrap(into_handler(|_req: Request| async { StatusCode::NO_CONTENT }));
        let mut writer = BufferedWriter::new();
        handler
            .call(Request::builder().build())
            .await
            .write_to(&mut writer);
        assert_eq!(writer.status(), Some(StatusCode::NO_CONTENT));
    }
}
