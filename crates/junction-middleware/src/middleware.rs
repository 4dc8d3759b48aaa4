//! Core middleware trait and composition.
//!
//! A middleware turns a handler into another handler. Composition is
//! right-to-left: with `[A, B]` installed, every route runs as `A(B(h))`,
//! so `A` sees the request first and the response last.
//!
//! # Example
//!
//! ```rust
//! use junction_core::{into_handler, Request};
//! use junction_middleware::{compose, BoxMiddleware, FnMiddleware, Next};
//! use std::sync::Arc;
//!
//! let tag: BoxMiddleware = Arc::new(FnMiddleware::new("tag", |req: Request, next: Next| async move {
//!     let response = next.run(req).await;
//!     (http::StatusCode::ACCEPTED, response)
//! }));
//!
//! let handler = compose(into_handler(|_req: Request| async { "ok" }), &[tag]);
//! ```

use std::future::Future;
use std::sync::Arc;

use junction_core::{into_handler, BoxHandler, BoxResponse, Request, Respond};

/// The middleware trait.
///
/// # Invariants
///
/// - `wrap` is called once per route when a dispatcher is frozen, never per
///   request
/// - the returned handler SHOULD call the wrapped one at most once per request
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Wraps `next`.
    fn wrap(&self, next: BoxHandler) -> BoxHandler;
}

/// A shared, type-erased middleware.
pub type BoxMiddleware = Arc<dyn Middleware>;

/// The rest of the chain, handed to [`FnMiddleware`] closures.
#[derive(Clone)]
pub struct Next {
    handler: BoxHandler,
}

impl Next {
    /// Wraps a handler.
    #[must_use]
    pub fn new(handler: BoxHandler) -> Self {
        Self { handler }
    }

    /// Invokes the rest of the chain.
    pub async fn run(self, request: Request) -> BoxResponse {
        self.handler.call(request).await
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// A middleware built from an async closure over `(Request, Next)`.
///
/// Returning without calling [`Next::run`] short-circuits the chain.
pub struct FnMiddleware<F> {
    name: &'static str,
    func: Arc<F>,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub fn new(name: &'static str, func: F) -> Self {
        Self {
            name,
            func: Arc::new(func),
        }
    }
}

impl<F, Fut, R> Middleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: Respond + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        let func = Arc::clone(&self.func);
        into_handler(move |request: Request| func(request, Next::new(Arc::clone(&next))))
    }
}

/// A middleware built from a plain `handler -> handler` function.
pub struct WrapFn<F> {
    name: &'static str,
    func: F,
}

impl<F> WrapFn<F> {
    /// Creates a new wrapping middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for WrapFn<F>
where
    F: Fn(BoxHandler) -> BoxHandler + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        (self.func)(next)
    }
}

/// Wraps `handler` with `middlewares`, the first being outermost.
#[must_use]
pub fn compose(handler: BoxHandler, middlewares: &[BoxMiddleware]) -> BoxHandler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |inner, middleware| middleware.wrap(inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::{boxed, BufferedWriter};
    use std::sync::Mutex;

    async fn render(handler: &BoxHandler) -> http::Response<bytes::Bytes> {
        let mut writer = BufferedWriter::new();
        handler
            .call(Request::builder().build())
            .await
            .write_to(&mut writer);
        writer.into_bytes_response()
    }

    fn recording(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> BoxMiddleware {
        Arc::new(FnMiddleware::new(name, move |req: Request, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(format!("{name} in"));
                let response = next.run(req).await;
                log.lock().unwrap().push(format!("{name} out"));
                response
            }
        }))
    }

    #[tokio::test]
    async fn test_compose_outermost_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler_log = Arc::clone(&log);
        let handler = into_handler(move |_req: Request| {
            let log = Arc::clone(&handler_log);
            async move {
                log.lock().unwrap().push("handler".to_string());
                "done"
            }
        });

        let chain = compose(
            handler,
            &[
                recording("a", Arc::clone(&log)),
                recording("b", Arc::clone(&log)),
            ],
        );
        assert_eq!(render(&chain).await.body(), "done");
        assert_eq!(
            *log.lock().unwrap(),
            ["a in", "b in", "handler", "b out", "a out"]
        );
    }

    #[tokio::test]
    async fn test_compose_empty_is_identity() {
        let handler = into_handler(|_req: Request| async { "plain" });
        let chain = compose(handler, &[]);
        assert_eq!(render(&chain).await.body(), "plain");
    }

    #[tokio::test]
    async fn test_short_circuit() {
        let deny: BoxMiddleware = Arc::new(FnMiddleware::new(
            "deny",
            |_req: Request, _next: Next| async { http::StatusCode::FORBIDDEN },
        ));
        let handler = into_handler(|_req: Request| async { "unreachable" });
        let response = render(&compose(handler, &[deny])).await;
        assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn test_wrap_fn() {
        let replace: BoxMiddleware = Arc::new(WrapFn::new("replace", |_next: BoxHandler| {
            into_handler(|_req: Request| async { boxed("replaced") })
        }));
        assert_eq!(replace.name(), "replace");
        let handler = into_handler(|_req: Request| async { "original" });
        assert_eq!(render(&compose(handler, &[replace])).await.body(), "replaced");
    }
}
