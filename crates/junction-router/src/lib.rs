//! Route trie for junction.
//!
//! This crate indexes registered endpoints by path segment and verb, rejects
//! conflicting registrations up front, and resolves incoming paths to a single
//! payload plus its parameter bindings.
//!
//! # Features
//!
//! - **Segment trie**: literal children keyed by text, at most one dynamic child per node
//! - **Path parameters**: `:name` segments bind one request segment each
//! - **Verb tables**: a verb miss reports the verbs registered for the path
//! - **Atomic registration**: duplicate and conflicting routes are rejected before mutation
//!
//! # Example
//!
//! ```rust
//! use junction_router::{Match, Router};
//!
//! let mut router = Router::new();
//! router.insert("/users", "GET", "list_users").unwrap();
//! router.insert("/users/:id", "GET", "get_user").unwrap();
//! router.insert("/users/:id", "DELETE", "delete_user").unwrap();
//!
//! match router.match_route("/users/123", "GET") {
//!     Match::Found(m) => {
//!         assert_eq!(*m.payload, "get_user");
//!         assert_eq!(m.params.get("id"), Some("123"));
//!     }
//!     _ => unreachable!(),
//! }
//!
//! match router.match_route("/users/123", "PUT") {
//!     Match::MethodNotAllowed { allowed } => assert_eq!(allowed, vec!["GET", "DELETE"]),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//!                 (root)
//!                   │
//!                "users"  [GET]
//!                   │
//!           ┌───────┴───────┐
//!           │               │
//!          "me"           ":id"
//!         [GET]       [GET, DELETE]
//!                           │
//!                        "posts"
//!                         [GET]
//! ```
//!
//! Matching walks the tree depth-first. At each node the literal child is
//! tried first; if that branch does not resolve, the dynamic child is tried
//! with the current segment captured.

mod error;
mod node;
mod params;
mod path;
mod router;
mod verbs;

pub use error::RouteError;
pub use node::Terminal;
pub use params::{Params, INLINE_PARAMS};
pub use path::{
    canonical_verb, normalize_path, parse_pattern, parse_segments, split_request_path,
    ParsedRoute, Segment, PARAM_SIGIL, SEPARATOR,
};
pub use router::Router;
pub use verbs::VerbTable;

/// A resolved route: its payload and the parameter bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// Payload registered for the matched (path, verb).
    pub payload: &'a T,
    /// Parameter bindings, in path order.
    pub params: Params,
}

/// Outcome of [`Router::match_route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match<'a, T> {
    /// A route exists for the path and verb.
    Found(RouteMatch<'a, T>),
    /// The path resolves but not for this verb.
    MethodNotAllowed {
        /// Verbs registered for the path, in registration order.
        allowed: Vec<&'a str>,
    },
    /// No registered path matches.
    NotFound,
}

/// Description of a registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Canonical verb.
    pub verb: String,
    /// Canonical pattern, e.g. `/users/:id`.
    pub pattern: String,
    /// Parameter names along the path.
    pub param_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_static_vs_dynamic() {
        let mut router = Router::new();
        router.insert("/users/me", "GET", "me").unwrap();
        router.insert("/users/:id", "GET", "id").unwrap();

        assert!(matches!(
            router.match_route("/users/me", "GET"),
            Match::Found(RouteMatch { payload: &"me", .. })
        ));

        let Match::Found(m) = router.match_route("/users/42", "GET") else {
            panic!("expected dynamic hit");
        };
        assert_eq!(*m.payload, "id");
        assert_eq!(m.params.get("id"), Some("42"));

        assert_eq!(
            router.match_route("/users/me", "POST"),
            Match::MethodNotAllowed {
                allowed: vec!["GET"]
            }
        );
    }

    #[test]
    fn test_scenario_parameter_conflict() {
        let mut router = Router::new();
        router.insert("/users/:id", "GET", 1).unwrap();
        let before = router.routes();

        let err = router.insert("/users/:user_id", "GET", 2).unwrap_err();
        assert!(matches!(err, RouteError::ParameterConflict { .. }));
        assert_eq!(router.routes(), before);

        let Match::Found(m) = router.match_route("/users/9", "GET") else {
            panic!("expected hit");
        };
        assert_eq!(*m.payload, 1);
        assert_eq!(m.params.get("id"), Some("9"));
        assert_eq!(m.params.get("user_id"), None);
    }

    #[test]
    fn test_leading_slash_irrelevant() {
        let mut router = Router::new();
        router.insert("users", "GET", ()).unwrap();
        assert_eq!(router.match_route("/users", "GET"), router.match_route("users", "GET"));
    }
}
