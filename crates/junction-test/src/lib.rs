//! In-memory testing for junction services.
//!
//! [`TestClient`] drives a frozen [`Service`](junction_dispatch::Service)
//! directly, so tests need no listener or port. Responses are fully
//! buffered into a [`TestResponse`] with chainable assertions.
//!
//! ```rust
//! use http::StatusCode;
//! use junction_core::Request;
//! use junction_dispatch::Dispatcher;
//! use junction_test::TestClient;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .get("/users/:id", |req: Request| async move {
//!         format!("user {}", req.param("id").unwrap_or_default())
//!     })
//!     .unwrap();
//! let client = TestClient::from_dispatcher(dispatcher);
//!
//! client.get("/users/7").send().await.assert_body_eq("user 7");
//! client
//!     .delete("/users/7")
//!     .send()
//!     .await
//!     .assert_status(StatusCode::METHOD_NOT_ALLOWED)
//!     .assert_allow(&["GET"]);
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
