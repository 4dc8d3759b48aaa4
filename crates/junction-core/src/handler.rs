//! Handler contract.
//!
//! A handler turns a [`Request`] into a response. Any
//! `Fn(Request) -> impl Future<Output = impl Respond>` is a handler.
//!
//! # Example
//!
//! ```rust
//! use junction_core::{into_handler, BoxHandler, Request};
//!
//! async fn hello(_req: Request) -> &'static str {
//!     "hello"
//! }
//!
//! let handler: BoxHandler = into_handler(hello);
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{BoxResponse, Respond};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Request handler.
pub trait Handler: Send + Sync + 'static {
    /// Handles one request.
    fn call(&self, request: Request) -> BoxFuture<'static, BoxResponse>;
}

/// A shared, type-erased handler.
pub type BoxHandler = Arc<dyn Handler>;

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: Respond + 'static,
{
    fn call(&self, request: Request) -> BoxFuture<'static, BoxResponse> {
        let fut = (self)(request);
        Box::pin(async move { Box::new(fut.await) as BoxResponse })
    }
}

/// Erases a handler's type.
pub fn into_handler<H: Handler>(handler: H) -> BoxHandler {
    Arc::new(handler)
}
