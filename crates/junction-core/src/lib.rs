//! # junction core
//!
//! Contracts shared by every junction crate:
//!
//! - [`Request`] - the per-request view handed to handlers
//! - [`Respond`] - anything that writes itself to a [`ResponseWriter`]
//! - [`BufferedWriter`] and [`RecordingWriter`] - concrete writers
//! - [`Handler`] - `Request -> impl Respond`
//! - [`ProgrammerError`] - panic payload for application contract violations

#![doc(html_root_url = "https://docs.rs/junction-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod abort;
mod handler;
mod request;
mod response;
mod writer;

pub use abort::{panic_message, ProgrammerError};
pub use handler::{into_handler, BoxFuture, BoxHandler, Handler};
pub use request::{Request, RequestBuilder};
pub use response::{boxed, BoxResponse, Json, Respond};
pub use writer::{BufferedWriter, RecordingWriter, ResponseWriter};

pub use junction_router::Params;
