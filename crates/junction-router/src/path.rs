//! Pattern and request-path normalization.
//!
//! Patterns are slash-separated. A segment beginning with `:` names a
//! parameter; anything else is a literal. Leading and trailing slashes are
//! stripped before splitting, so `/users/`, `users` and `/users` are the same
//! path. Adjacent separators are rejected rather than collapsed.

use std::fmt;

use crate::error::RouteError;

/// Path separator.
pub const SEPARATOR: char = '/';

/// Leading sigil marking a parameter segment.
pub const PARAM_SIGIL: char = ':';

/// A single component of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Literal text that must match exactly.
    Static(String),
    /// Named parameter capturing one request segment.
    Parameter(String),
}

impl Segment {
    /// Classifies a raw token.
    #[must_use]
    pub fn classify(token: &str) -> Self {
        match token.strip_prefix(PARAM_SIGIL) {
            Some(name) => Self::Parameter(name.to_string()),
            None => Self::Static(token.to_string()),
        }
    }

    /// Returns true for [`Segment::Parameter`].
    #[must_use]
    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::Parameter(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.write_str(text),
            Self::Parameter(name) => write!(f, "{PARAM_SIGIL}{name}"),
        }
    }
}

/// A pattern and verb after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRoute {
    /// Ordered segments; empty for the root path.
    pub segments: Vec<Segment>,
    /// Upper-cased verb.
    pub verb: String,
}

impl ParsedRoute {
    /// Parameter names along the path, in order.
    #[must_use]
    pub fn param_names(&self) -> Vec<String> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Parameter(name) => Some(name.clone()),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// Canonical pattern text, e.g. `/users/:id`.
    #[must_use]
    pub fn pattern(&self) -> String {
        render(&self.segments)
    }
}

/// Upper-cases a verb, rejecting the empty string.
pub fn canonical_verb(verb: &str) -> Result<String, RouteError> {
    if verb.is_empty() {
        return Err(RouteError::EmptyVerb);
    }
    Ok(verb.to_ascii_uppercase())
}

/// Normalizes a pattern and verb into a [`ParsedRoute`].
///
/// # Example
///
/// ```rust
/// use junction_router::{parse_pattern, Segment};
///
/// let route = parse_pattern("/users/:id/", "get").unwrap();
/// assert_eq!(route.verb, "GET");
/// assert_eq!(
///     route.segments,
///     vec![Segment::Static("users".into()), Segment::Parameter("id".into())]
/// );
/// ```
pub fn parse_pattern(pattern: &str, verb: &str) -> Result<ParsedRoute, RouteError> {
    let verb = canonical_verb(verb)?;
    let segments = parse_segments(pattern)?;
    Ok(ParsedRoute { segments, verb })
}

/// Splits a pattern into classified segments.
pub fn parse_segments(pattern: &str) -> Result<Vec<Segment>, RouteError> {
    tokens(pattern)
        .ok_or_else(|| RouteError::DoubleSeparator {
            pattern: pattern.to_string(),
        })?
        .into_iter()
        .map(|token| match Segment::classify(token) {
            Segment::Parameter(name) if name.is_empty() => Err(RouteError::EmptyParameterName {
                pattern: pattern.to_string(),
            }),
            segment => Ok(segment),
        })
        .collect()
}

/// Returns the canonical text form of a pattern.
///
/// Normalizing an already-normalized pattern yields the same text.
pub fn normalize_path(pattern: &str) -> Result<String, RouteError> {
    parse_segments(pattern).map(|segments| render(&segments))
}

/// Splits a request path into raw tokens for matching.
///
/// Returns `None` when the path contains an empty component; such a path
/// cannot match any route.
#[must_use]
pub fn split_request_path(path: &str) -> Option<Vec<&str>> {
    tokens(path)
}

fn tokens(raw: &str) -> Option<Vec<&str>> {
    let trimmed = raw.trim_matches(SEPARATOR);
    if trimmed.is_empty() {
        return Some(Vec::new());
    }
    let parts: Vec<&str> = trimmed.split(SEPARATOR).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts)
}

fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push(SEPARATOR);
        out.push_str(&segment.to_string());
    }
    if out.is_empty() {
        out.push(SEPARATOR);
    }
    out
}
