//! High-level router API.

use crate::error::RouteError;
use crate::node::Node;
use crate::params::Params;
use crate::path::{canonical_verb, parse_pattern, split_request_path};
use crate::{Match, RouteInfo, RouteMatch};

/// Route trie keyed by path segments and verb.
///
/// `T` is the payload stored per (path, verb), typically a handler.
///
/// # Example
///
/// ```rust
/// use junction_router::{Match, Router};
///
/// let mut router = Router::new();
/// router.insert("/users/me", "GET", "me").unwrap();
/// router.insert("/users/:id", "GET", "by_id").unwrap();
///
/// match router.match_route("/users/42", "GET") {
///     Match::Found(m) => {
///         assert_eq!(*m.payload, "by_id");
///         assert_eq!(m.params.get("id"), Some("42"));
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
///
/// # Route Priority
///
/// At every depth the static child is tried before the dynamic child, and
/// the search backtracks when a branch does not resolve. `/users/me` wins
/// over `/users/:id` for the path `/users/me`.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers `payload` for `pattern` and `verb`.
    ///
    /// The insert is all-or-nothing: on error the router is unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use junction_router::{RouteError, Router};
    ///
    /// let mut router = Router::new();
    /// let info = router.insert("/users/:id/", "get", 1).unwrap();
    /// assert_eq!(info.pattern, "/users/:id");
    /// assert_eq!(info.verb, "GET");
    ///
    /// let err = router.insert("/users/:user_id", "GET", 2).unwrap_err();
    /// assert!(matches!(err, RouteError::ParameterConflict { .. }));
    /// ```
    pub fn insert(&mut self, pattern: &str, verb: &str, payload: T) -> Result<RouteInfo, RouteError> {
        let route = parse_pattern(pattern, verb)?;
        self.root.insert(&route, payload)?;
        self.route_count += 1;
        Ok(RouteInfo {
            param_names: route.param_names(),
            pattern: route.pattern(),
            verb: route.verb,
        })
    }

    /// Matches a request path and verb.
    ///
    /// A path with an empty intermediate component never matches. On a verb
    /// miss, `allowed` merges the verbs of every route whose pattern matches
    /// the path, in the order the search reaches them.
    #[must_use]
    pub fn match_route(&self, path: &str, verb: &str) -> Match<'_, T> {
        let Ok(verb) = canonical_verb(verb) else {
            return Match::NotFound;
        };
        let Some(tokens) = split_request_path(path) else {
            return Match::NotFound;
        };

        let mut captured = Vec::with_capacity(tokens.len());
        let mut allowed = Vec::new();
        match self
            .root
            .lookup(&tokens, &verb, &mut captured, &mut allowed)
        {
            Some((terminal, payload)) => Match::Found(RouteMatch {
                payload,
                params: Params::zip(terminal.param_names(), &captured),
            }),
            None if allowed.is_empty() => Match::NotFound,
            None => Match::MethodNotAllowed { allowed },
        }
    }

    /// Rebuilds the router with every payload transformed by `f`.
    ///
    /// `f` receives the canonical verb alongside the payload.
    pub fn map<U>(self, mut f: impl FnMut(&str, T) -> U) -> Router<U> {
        Router {
            root: self.root.map(&mut f),
            route_count: self.route_count,
        }
    }

    /// Lists every registered route, static children before dynamic ones.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut out = Vec::with_capacity(self.route_count);
        self.root.collect(&mut Vec::new(), &mut out);
        out
    }

    /// Number of registered (path, verb) pairs.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.route_count
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
