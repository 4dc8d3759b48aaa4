//! Panic recovery middleware.
//!
//! Converts a panic anywhere in the wrapped handler, including programmer
//! errors raised by the binder, into a `500 Internal Server Error` whose
//! body is the panic message. The message and a backtrace are logged at
//! `error` level.
//!
//! The backtrace is recorded where the panic is raised, by a process-wide
//! panic hook installed the first time a `Recovery` wraps a handler. The
//! hook chains to whatever hook was set before it.

use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};

use futures_util::FutureExt;
use http::StatusCode;
use junction_core::{boxed, into_handler, panic_message, BoxHandler, Request};

use crate::middleware::Middleware;

thread_local! {
    static PANIC_TRACE: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

static TRACE_HOOK: Once = Once::new();

fn install_trace_hook() {
    TRACE_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(Backtrace::force_capture()));
            previous(info);
        }));
    });
}

/// Takes the backtrace of the latest panic on this thread.
fn take_panic_trace() -> Option<Backtrace> {
    PANIC_TRACE.with(|slot| slot.borrow_mut().take())
}

/// Catches panics from the wrapped handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recovery;

impl Recovery {
    /// Creates the middleware.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Middleware for Recovery {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        install_trace_hook();
        into_handler(move |request: Request| {
            let next = Arc::clone(&next);
            async move {
                let method = request.method().clone();
                let path = request.path().to_string();

                let outcome = AssertUnwindSafe(async move { next.call(request).await })
                    .catch_unwind()
                    .await;

                match outcome {
                    Ok(response) => response,
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        let backtrace =
                            take_panic_trace().unwrap_or_else(Backtrace::force_capture);
                        tracing::error!(
                            method = %method,
                            path = %path,
                            panic = %message,
                            backtrace = %backtrace,
                            "handler panicked"
                        );
                        boxed((StatusCode::INTERNAL_SERVER_ERROR, message))
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::{BufferedWriter, ProgrammerError};

    async fn render(handler: &BoxHandler) -> http::Response<bytes::Bytes> {
        let mut writer = BufferedWriter::new();
        handler
            .call(Request::builder().build())
            .await
            .write_to(&mut writer);
        writer.into_bytes_response()
    }

    #[inline(never)]
    fn explode_in_frame() {
        panic!("deep");
    }

    #[test]
    fn test_trace_recorded_at_panic_site() {
        install_trace_hook();
        let _ = take_panic_trace();

        assert!(panic::catch_unwind(explode_in_frame).is_err());
        let trace = take_panic_trace().expect("hook stores a trace");
        assert!(take_panic_trace().is_none());

        if trace.status() == std::backtrace::BacktraceStatus::Captured {
            assert!(trace.to_string().contains("explode_in_frame"));
        }
    }

    #[tokio::test]
    async fn test_async_panic_trace_is_consumed() {
        let handler = Recovery::new().wrap(into_handler(|_req: Request| async {
            if true {
                panic!("traced");
            }
            "unreachable"
        }));
        let response = render(&handler).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(take_panic_trace().is_none());
    }

    #[tokio::test]
    async fn test_passes_through() {
        let handler = Recovery::new().wrap(into_handler(|_req: Request| async { "fine" }));
        let response = render(&handler).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), "fine");
    }

    #[tokio::test]
    async fn test_async_panic_becomes_500() {
        let handler = Recovery::new().wrap(into_handler(|_req: Request| async {
            if true {
                panic!("kaboom");
            }
            "unreachable"
        }));
        let response = render(&handler).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), "kaboom");
    }

    #[tokio::test]
    async fn test_programmer_error_payload_printed() {
        let handler = Recovery::new().wrap(into_handler(|_req: Request| async {
            if true {
                ProgrammerError::new("validator misuse", "target is not a field").raise();
            }
            "unreachable"
        }));
        let response = render(&handler).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), "validator misuse: target is not a field");
    }

    #[tokio::test]
    async fn test_handler_stays_usable_after_panic() {
        let handler = Recovery::new().wrap(into_handler(|req: Request| async move {
            assert!(req.query().is_none(), "query present");
            "ok"
        }));
        let mut writer = BufferedWriter::new();
        let request = Request::builder()
            .uri(http::Uri::from_static("/?x=1"))
            .build();
        handler.call(request).await.write_to(&mut writer);
        assert_eq!(
            writer.into_bytes_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        assert_eq!(render(&handler).await.body(), "ok");
    }
}
