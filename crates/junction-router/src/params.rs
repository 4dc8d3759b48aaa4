//! Path parameter bindings.
//!
//! A successful match pairs the terminal's parameter names with the captured
//! request segments. Most routes carry one or two parameters, so the pairs
//! live inline until they outgrow [`INLINE_PARAMS`].

use smallvec::SmallVec;

/// Number of bindings stored without a heap allocation.
pub const INLINE_PARAMS: usize = 4;

/// Name/value bindings produced by a route match.
///
/// # Example
///
/// ```rust
/// use junction_router::Params;
///
/// let params = Params::zip(&["org".to_string(), "id".to_string()], &["acme", "42"]);
///
/// assert_eq!(params.get("org"), Some("acme"));
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs names with captured values positionally.
    ///
    /// Extra entries on either side are ignored.
    #[must_use]
    pub fn zip<S: AsRef<str>>(names: &[String], values: &[S]) -> Self {
        names
            .iter()
            .zip(values)
            .map(|(n, v)| (n.clone(), v.as_ref().to_string()))
            .collect()
    }

    /// Appends a binding.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value bound to `name`.
    ///
    /// When a name repeats along a path, the first binding wins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates bindings in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Params {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }
}
