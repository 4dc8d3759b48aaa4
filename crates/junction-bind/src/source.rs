//! Binding sources and their token lookups.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use http::HeaderMap;
use junction_router::Params;

/// A field tag naming where a value comes from.
///
/// Declaration order is binding priority: body tags first, then path, query
/// and header. Later sources overwrite earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// JSON body.
    Json,
    /// XML body.
    Xml,
    /// YAML body.
    Yaml,
    /// URL-encoded form body.
    Form,
    /// Route parameter.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
}

impl Tag {
    /// Tag keyword as written in `#[bind(...)]`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Form => "form",
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
        }
    }

    /// Returns true for the body tags.
    #[must_use]
    pub const fn is_body(self) -> bool {
        matches!(self, Self::Json | Self::Xml | Self::Yaml | Self::Form)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of request parts a bind reads.
///
/// ```rust
/// use junction_bind::Sources;
///
/// let sources = Sources::PATH | Sources::QUERY;
/// assert!(sources.contains(Sources::QUERY));
/// assert!(!sources.contains(Sources::BODY));
/// assert!(Sources::ALL.contains(sources));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sources(u8);

impl Sources {
    /// Nothing.
    pub const NONE: Self = Self(0);
    /// Route parameters.
    pub const PATH: Self = Self(1);
    /// Query string.
    pub const QUERY: Self = Self(1 << 1);
    /// Headers.
    pub const HEADER: Self = Self(1 << 2);
    /// Body.
    pub const BODY: Self = Self(1 << 3);
    /// Every source.
    pub const ALL: Self = Self(0b1111);

    /// Returns true if every source in `other` is in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no source is selected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Sources {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Sources {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Sources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::PATH, "PATH"),
            (Self::QUERY, "QUERY"),
            (Self::HEADER, "HEADER"),
            (Self::BODY, "BODY"),
        ];
        let mut set = f.debug_set();
        for (flag, name) in names {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// Looks up the text tokens stored under a key.
pub trait TokenSource {
    /// All tokens for `key`, in request order. Empty when absent.
    fn tokens<'a>(&'a self, key: &str) -> Vec<&'a str>;
}

/// Route parameters yield at most one token.
impl TokenSource for Params {
    fn tokens<'a>(&'a self, key: &str) -> Vec<&'a str> {
        self.get(key).into_iter().collect()
    }
}

/// Header names match case-insensitively. Values that are not visible
/// ASCII are skipped.
impl TokenSource for HeaderMap {
    fn tokens<'a>(&'a self, key: &str) -> Vec<&'a str> {
        self.get_all(key)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect()
    }
}

/// Decoded `key=value` pairs from a query string or form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairs(Vec<(String, String)>);

impl Pairs {
    /// Parses `application/x-www-form-urlencoded` text.
    ///
    /// # Errors
    ///
    /// Returns the decoder error for malformed input.
    pub fn parse(input: &str) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(input).map(Self)
    }

    /// Parses URL-encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns the decoder error for malformed input.
    pub fn parse_bytes(input: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_bytes(input).map(Self)
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TokenSource for Pairs {
    fn tokens<'a>(&'a self, key: &str) -> Vec<&'a str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Pairs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
