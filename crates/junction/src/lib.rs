//! # Junction
//!
//! HTTP request routing and binding.
//!
//! - **Route trie** with static and `:param` segments, searched depth first:
//!   the static child is tried before the parameter, backtracking when a
//!   branch dead-ends
//! - **Dispatcher** with per-route and global middleware, configurable
//!   404/405 fallbacks and an `OPTIONS` preflight hook
//! - **Binder** that fills a `#[derive(Bind)]` struct from the body, path,
//!   query and headers, then runs its validation
//!
//! ## Quick Start
//!
//! ```rust
//! use junction::prelude::*;
//!
//! #[derive(Debug, Default, Bind)]
//! #[bind(crate = "junction::bind")]
//! struct Show {
//!     #[bind(path)]
//!     id: u64,
//!     #[bind(query)]
//!     verbose: bool,
//! }
//!
//! async fn show(mut req: Request) -> Result<String, BindError> {
//!     let show: Show = bind(&mut req, Sources::PATH | Sources::QUERY)?;
//!     Ok(format!("{} {}", show.id, show.verbose))
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.get("/things/:id", show).unwrap();
//! let service = dispatcher.freeze();
//!
//! let request = http::Request::get("/things/3?verbose=true")
//!     .body(Default::default())
//!     .unwrap();
//! let response = service.dispatch(request).await;
//! assert_eq!(response.status(), http::StatusCode::OK);
//! # }
//! ```
//!
//! ## Crates
//!
//! | module | crate |
//! |--------|-------|
//! | [`router`] | route trie |
//! | [`core`] | request view, responses, handlers |
//! | [`middleware`] | middleware chain, access log, panic recovery |
//! | [`bind`] | binder, coercion, validation |
//! | [`dispatch`] | dispatcher and frozen service |
//! | [`config`] | layered configuration |
//! | [`telemetry`] | logging setup |

#![doc(html_root_url = "https://docs.rs/junction/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use junction_bind as bind;
pub use junction_config as config;
pub use junction_core as core;
pub use junction_dispatch as dispatch;
pub use junction_middleware as middleware;
pub use junction_router as router;
pub use junction_telemetry as telemetry;

pub use junction_dispatch::{Dispatcher, Service};

/// Common imports.
///
/// ```rust
/// use junction::prelude::*;
/// ```
pub mod prelude {
    pub use junction_bind::{
        bind, bind_into, Bind, BindError, Binder, Check, Sources, Validate, ValidateOwned,
    };
    pub use junction_config::{ConfigLoader, JunctionConfig};
    pub use junction_core::{Handler, Json, Request, Respond};
    pub use junction_dispatch::{Dispatcher, Service};
    pub use junction_middleware::{AccessLog, FnMiddleware, Middleware, Next, Recovery};
    pub use junction_router::RouteError;
}
