//! Procedural macros for junction.
//!
//! `#[derive(Bind)]` implements the binder contract for a struct with named
//! fields. Field attributes choose the sources each field is filled from:
//!
//! ```rust,ignore
//! use junction_bind::Bind;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize, Bind)]
//! #[serde(default)]
//! struct UpdateUser {
//!     #[bind(path)]
//!     #[serde(skip)]
//!     id: u64,
//!     #[bind(json, form)]
//!     name: String,
//!     #[bind(query = "dry_run")]
//!     #[serde(skip)]
//!     dry_run: bool,
//!     #[bind(header = "X-Request-Id")]
//!     #[serde(skip)]
//!     request_id: Option<String>,
//! }
//! ```
//!
//! # Tags
//!
//! | tag      | source                                   |
//! |----------|------------------------------------------|
//! | `json`   | JSON body, decoded by serde              |
//! | `xml`    | XML body, decoded by serde               |
//! | `yaml`   | YAML body, decoded by serde              |
//! | `form`   | `application/x-www-form-urlencoded` body |
//! | `path`   | route parameters                         |
//! | `query`  | query string                             |
//! | `header` | request headers, case-insensitive        |
//! | `skip`   | never bound                              |
//!
//! Body tags require the struct to implement `serde::Deserialize`. The
//! container attribute `#[bind(crate = "...")]` points the generated code at
//! a re-export of `junction_bind`.

mod bind;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `junction_bind::Bind`.
///
/// Fails to compile for enums, unions and tuple structs, and for fields whose
/// type has no `BindField` implementation.
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    bind::expand_bind(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
