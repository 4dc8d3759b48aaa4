//! Per-path verb table.

use indexmap::IndexMap;

/// Maps canonical verbs to payloads for a single terminal path.
///
/// Registration order is preserved, which fixes the order of the `Allow`
/// list reported for a verb miss.
///
/// # Example
///
/// ```rust
/// use junction_router::VerbTable;
///
/// let mut table = VerbTable::new();
/// table.insert("GET", "list");
/// table.insert("POST", "create");
///
/// assert_eq!(table.get("GET"), Some(&"list"));
/// assert_eq!(table.allowed(), vec!["GET", "POST"]);
/// ```
#[derive(Debug, Clone)]
pub struct VerbTable<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for VerbTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> VerbTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Installs a payload, returning the previous one for that verb.
    pub fn insert(&mut self, verb: impl Into<String>, payload: T) -> Option<T> {
        self.entries.insert(verb.into(), payload)
    }

    /// Looks up the payload for a canonical verb.
    #[must_use]
    pub fn get(&self, verb: &str) -> Option<&T> {
        self.entries.get(verb)
    }

    /// Returns true if the verb has a payload.
    #[must_use]
    pub fn contains(&self, verb: &str) -> bool {
        self.entries.contains_key(verb)
    }

    /// Registered verbs in registration order.
    #[must_use]
    pub fn allowed(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of registered verbs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no verb is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(verb, payload)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(v, p)| (v.as_str(), p))
    }

    /// Applies `f` to every payload, keeping verbs and order.
    pub fn map<U>(self, mut f: impl FnMut(&str, T) -> U) -> VerbTable<U> {
        VerbTable {
            entries: self
                .entries
                .into_iter()
                .map(|(verb, payload)| {
                    let mapped = f(&verb, payload);
                    (verb, mapped)
                })
                .collect(),
        }
    }
}
