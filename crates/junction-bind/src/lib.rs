//! # junction bind
//!
//! Type-directed request binding for junction.
//!
//! A struct deriving [`Bind`] declares, per field, which parts of a request
//! fill it. The [`Binder`] reads those parts in a fixed order, coerces text
//! tokens into the field types, and finally runs the record's [`Validate`]
//! checks.
//!
//! | Tag | Source | Decoding |
//! |-----|--------|----------|
//! | `json`, `xml`, `yaml` | body | serde, by Content-Type |
//! | `form` | body | [`Coerce`] per token |
//! | `path` | route parameters | [`Coerce`], one token |
//! | `query` | query string | [`Coerce`], zero or more tokens |
//! | `header` | headers | [`Coerce`], zero or more tokens |
//!
//! ## Example
//!
//! ```rust
//! use junction_bind::{Bind, Sources};
//! use junction_core::Request;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize, Bind)]
//! #[serde(default)]
//! struct UpdateItem {
//!     #[bind(path)]
//!     #[serde(skip)]
//!     id: u64,
//!     #[bind(json)]
//!     name: String,
//!     #[bind(header = "X-Dry-Run")]
//!     #[serde(skip)]
//!     dry_run: bool,
//! }
//!
//! let mut request = Request::builder()
//!     .method(http::Method::PUT)
//!     .uri(http::Uri::from_static("/items/7"))
//!     .header("content-type", "application/json")
//!     .header("x-dry-run", "true")
//!     .param("id", "7")
//!     .body(r#"{"name":"bolt"}"#)
//!     .build();
//!
//! let item: UpdateItem = junction_bind::bind(&mut request, Sources::ALL).unwrap();
//! assert_eq!(item.id, 7);
//! assert_eq!(item.name, "bolt");
//! assert!(item.dry_run);
//! ```
//!
//! ## Errors
//!
//! Coercion and decode failures come back as [`BindError`]; a field
//! failure reads `<tag-value>: <token> is not a valid <kind>: <cause>`.
//! Deriving `Bind` for anything but a struct with named fields, or tagging a
//! field whose type has no [`BindField`] impl, fails to compile.

#![doc(html_root_url = "https://docs.rs/junction-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate self as junction_bind;

mod binder;
mod body;
mod coerce;
mod error;
mod field;
mod source;
mod validate;

pub use binder::{bind, bind_into, Bind, Binder, DEFAULT_MAX_BODY_BYTES};
pub use body::{check_syntax, decode, BodyFormat};
pub use coerce::{bind_single, BindField, Coerce};
pub use error::{BindError, BodyDecodeError, CoerceError};
pub use field::{FieldAddr, FieldSpec};
pub use source::{Pairs, Sources, Tag, TokenSource};
pub use validate::{
    Capability, Check, Validate, ValidateOwned, ValidationErrors, Violation, VALIDATOR_MISUSE,
};

/// Derives [`Bind`] for a struct with named fields.
pub use junction_macros::Bind;

#[doc(hidden)]
pub mod __private {
    pub use crate::body::{check_syntax, decode};
    pub use crate::validate::probe::{AbsentProbe, AddressableProbe, OwnedProbe, Probe};
}
