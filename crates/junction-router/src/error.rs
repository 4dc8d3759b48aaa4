//! Route registration errors.

use thiserror::Error;

/// Why a route could not be registered.
///
/// Every variant is detected before the trie is touched, so a failed
/// registration leaves the router exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The verb was the empty string.
    #[error("route verb must not be empty")]
    EmptyVerb,

    /// The pattern contains `//`.
    #[error("pattern {pattern:?} contains an empty segment")]
    DoubleSeparator {
        /// The rejected pattern.
        pattern: String,
    },

    /// A parameter segment consisting of only the sigil.
    #[error("pattern {pattern:?} contains a parameter without a name")]
    EmptyParameterName {
        /// The rejected pattern.
        pattern: String,
    },

    /// The (path, verb) pair is already registered.
    #[error("route {verb} {pattern} is already registered")]
    Duplicate {
        /// Canonical verb.
        verb: String,
        /// Canonical pattern.
        pattern: String,
    },

    /// The path is registered with different parameter names.
    #[error(
        "route {pattern} conflicts with existing parameters [{}]: got [{}]",
        existing.join(", "),
        attempted.join(", ")
    )]
    ParameterConflict {
        /// Canonical pattern of the rejected route.
        pattern: String,
        /// Names already bound to this path.
        existing: Vec<String>,
        /// Names in the rejected pattern.
        attempted: Vec<String>,
    },
}
