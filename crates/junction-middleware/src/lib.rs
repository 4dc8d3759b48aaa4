//! # junction middleware
//!
//! Middleware for junction dispatchers.
//!
//! A [`Middleware`] maps a handler to a handler. Dispatchers apply them once
//! per route when frozen, global middleware outermost, so at request time a
//! route with global `[A, B]` and per-route `[C]` runs as `A(B(C(h)))`.
//!
//! ## Provided middleware
//!
//! | Middleware    | Purpose                                              |
//! |---------------|------------------------------------------------------|
//! | [`Recovery`]  | Turns panics into `500` responses and logs them      |
//! | [`AccessLog`] | Logs method, path, status, bytes and duration        |
//!
//! Custom middleware is either a [`Middleware`] impl, an async
//! [`FnMiddleware`] closure over `(Request, Next)`, or a [`WrapFn`] over
//! `BoxHandler -> BoxHandler`.

#![doc(html_root_url = "https://docs.rs/junction-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod access_log;
pub mod middleware;
pub mod recovery;

pub use access_log::AccessLog;
pub use middleware::{compose, BoxMiddleware, FnMiddleware, Middleware, Next, WrapFn};
pub use recovery::Recovery;
