//! Request dispatch for junction.
//!
//! Routes are registered on a [`Dispatcher`] during setup. Freezing it
//! composes every handler with its middleware once and yields a
//! [`Service`], the immutable form that serves requests.
//!
//! # Fallbacks
//!
//! | Outcome | Default response |
//! |---------|------------------|
//! | no route for the path | `404`, empty body |
//! | path registered, verb not | `405`, empty body, `Allow` |
//! | `OPTIONS` on a registered path, preflight handler installed | `Allow` (verbs + `OPTIONS`), then the handler's response |
//!
//! Fallbacks run through the global middleware like any route.
//!
//! # Example
//!
//! ```rust
//! use junction_core::Request;
//! use junction_dispatch::Dispatcher;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .get("/users/:id", |req: Request| async move {
//!         format!("user {}", req.param("id").unwrap_or_default())
//!     })
//!     .unwrap();
//!
//! let service = dispatcher.freeze();
//! let response = service
//!     .dispatch(http::Request::get("/users/7").body(bytes::Bytes::new()).unwrap())
//!     .await;
//! assert_eq!(response.status(), http::StatusCode::OK);
//! # }
//! ```

#![warn(missing_docs)]

mod dispatcher;
mod fallback;
mod service;

pub use dispatcher::Dispatcher;
pub use service::Service;
