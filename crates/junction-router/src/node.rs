//! Route trie node.
//!
//! Each node owns its static children (sorted for binary search), at most one
//! dynamic child, and, when a route ends here, a [`Terminal`].

use crate::error::RouteError;
use crate::path::{ParsedRoute, Segment};
use crate::verbs::VerbTable;
use crate::RouteInfo;

/// End of a registered path: the verb table plus the parameter names
/// collected along the path.
#[derive(Debug, Clone)]
pub struct Terminal<T> {
    param_names: Vec<String>,
    verbs: VerbTable<T>,
}

impl<T> Terminal<T> {
    fn new(param_names: Vec<String>) -> Self {
        Self {
            param_names,
            verbs: VerbTable::new(),
        }
    }

    /// Parameter names along the path, in order.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Verb table for this path.
    #[must_use]
    pub fn verbs(&self) -> &VerbTable<T> {
        &self.verbs
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// Literal text, or the first name registered for a dynamic child.
    segment: String,
    static_children: Vec<Node<T>>,
    param_child: Option<Box<Node<T>>>,
    terminal: Option<Terminal<T>>,
}

impl<T> Node<T> {
    pub(crate) fn root() -> Self {
        Self::new(String::new())
    }

    fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            static_children: Vec::new(),
            param_child: None,
            terminal: None,
        }
    }

    /// Installs `route.verb -> payload`, or leaves the tree untouched on error.
    pub(crate) fn insert(&mut self, route: &ParsedRoute, payload: T) -> Result<(), RouteError> {
        self.check(route)?;

        let node = self.descend_or_create(&route.segments);
        let terminal = node
            .terminal
            .get_or_insert_with(|| Terminal::new(route.param_names()));
        terminal.verbs.insert(route.verb.clone(), payload);
        Ok(())
    }

    fn check(&self, route: &ParsedRoute) -> Result<(), RouteError> {
        let Some(terminal) = self.find(&route.segments).and_then(|n| n.terminal.as_ref()) else {
            return Ok(());
        };

        let attempted = route.param_names();
        if terminal.param_names != attempted {
            return Err(RouteError::ParameterConflict {
                pattern: route.pattern(),
                existing: terminal.param_names.clone(),
                attempted,
            });
        }
        if terminal.verbs.contains(&route.verb) {
            return Err(RouteError::Duplicate {
                verb: route.verb.clone(),
                pattern: route.pattern(),
            });
        }
        Ok(())
    }

    /// Structural lookup: parameters match the dynamic child regardless of name.
    fn find(&self, segments: &[Segment]) -> Option<&Self> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self);
        };
        let child = match first {
            Segment::Static(text) => self.find_static_child(text)?,
            Segment::Parameter(_) => self.param_child.as_deref()?,
        };
        child.find(rest)
    }

    fn descend_or_create(&mut self, segments: &[Segment]) -> &mut Self {
        let Some((first, rest)) = segments.split_first() else {
            return self;
        };
        let child = match first {
            Segment::Static(text) => {
                let index = match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(text))
                {
                    Ok(index) => index,
                    Err(index) => {
                        self.static_children.insert(index, Self::new(text.as_str()));
                        index
                    }
                };
                &mut self.static_children[index]
            }
            Segment::Parameter(name) => self
                .param_child
                .get_or_insert_with(|| Box::new(Self::new(name.as_str()))),
        };
        child.descend_or_create(rest)
    }

    /// Depth-first match, static child before dynamic child.
    ///
    /// `captured` is scratch space for dynamic tokens; on success it holds
    /// exactly the tokens of the winning branch. Every terminal reached whose
    /// verb table lacks `verb` adds its verbs to `allowed`, skipping ones
    /// already listed.
    pub(crate) fn lookup<'a, 'p>(
        &'a self,
        tokens: &[&'p str],
        verb: &str,
        captured: &mut Vec<&'p str>,
        allowed: &mut Vec<&'a str>,
    ) -> Option<(&'a Terminal<T>, &'a T)> {
        let Some((token, rest)) = tokens.split_first() else {
            let terminal = self.terminal.as_ref()?;
            if let Some(payload) = terminal.verbs.get(verb) {
                return Some((terminal, payload));
            }
            for known in terminal.verbs.allowed() {
                if !allowed.contains(&known) {
                    allowed.push(known);
                }
            }
            return None;
        };

        if let Some(child) = self.find_static_child(token) {
            if let Some(hit) = child.lookup(rest, verb, captured, allowed) {
                return Some(hit);
            }
        }

        if let Some(child) = &self.param_child {
            captured.push(*token);
            if let Some(hit) = child.lookup(rest, verb, captured, allowed) {
                return Some(hit);
            }
            captured.pop();
        }

        None
    }

    fn find_static_child(&self, segment: &str) -> Option<&Self> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }

    pub(crate) fn map<U>(self, f: &mut impl FnMut(&str, T) -> U) -> Node<U> {
        Node {
            segment: self.segment,
            static_children: self
                .static_children
                .into_iter()
                .map(|child| child.map(f))
                .collect(),
            param_child: self.param_child.map(|child| Box::new(child.map(f))),
            terminal: self.terminal.map(|terminal| Terminal {
                param_names: terminal.param_names,
                verbs: terminal.verbs.map(&mut *f),
            }),
        }
    }

    /// Appends every registered route below this node to `out`.
    pub(crate) fn collect(&self, shape: &mut Vec<Option<String>>, out: &mut Vec<RouteInfo>) {
        if let Some(terminal) = &self.terminal {
            let mut names = terminal.param_names.iter();
            let segments: Vec<Segment> = shape
                .iter()
                .map(|s| match s {
                    Some(text) => Segment::Static(text.clone()),
                    None => Segment::Parameter(names.next().cloned().unwrap_or_default()),
                })
                .collect();
            let pattern = ParsedRoute {
                segments,
                verb: String::new(),
            }
            .pattern();
            for verb in terminal.verbs.allowed() {
                out.push(RouteInfo {
                    verb: verb.to_string(),
                    pattern: pattern.clone(),
                    param_names: terminal.param_names.clone(),
                });
            }
        }

        for child in &self.static_children {
            shape.push(Some(child.segment.clone()));
            child.collect(shape, out);
            shape.pop();
        }
        if let Some(child) = &self.param_child {
            shape.push(None);
            child.collect(shape, out);
            shape.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_pattern;

    fn insert(root: &mut Node<&'static str>, pattern: &str, verb: &str, payload: &'static str) {
        root.insert(&parse_pattern(pattern, verb).unwrap(), payload)
            .unwrap();
    }

    fn lookup<'p>(root: &Node<&'static str>, path: &'p str, verb: &str) -> Option<(&'static str, Vec<&'p str>)> {
        let tokens: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
        let mut captured = Vec::new();
        let mut allowed = Vec::new();
        let hit = root.lookup(&tokens, verb, &mut captured, &mut allowed)?;
        Some((*hit.1, captured))
    }

    #[test]
    fn test_static_children_stay_sorted() {
        let mut root = Node::root();
        insert(&mut root, "/c", "GET", "c");
        insert(&mut root, "/a", "GET", "a");
        insert(&mut root, "/b", "GET", "b");
        let order: Vec<_> = root.static_children.iter().map(|c| c.segment.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_dynamic_child() {
        let mut root = Node::root();
        insert(&mut root, "/users/:id", "GET", "get");
        insert(&mut root, "/users/:id/posts", "GET", "posts");
        let users = root.find_static_child("users").unwrap();
        assert!(users.param_child.is_some());
        assert_eq!(users.param_child.as_ref().unwrap().segment, "id");
    }

    #[test]
    fn test_lookup_backtracks_into_dynamic_child() {
        let mut root = Node::root();
        insert(&mut root, "/users/me/settings", "GET", "settings");
        insert(&mut root, "/users/:id/profile", "GET", "profile");

        let (payload, captured) = lookup(&root, "/users/me/profile", "GET").unwrap();
        assert_eq!(payload, "profile");
        assert_eq!(captured, vec!["me"]);
    }

    #[test]
    fn test_lookup_captures_are_popped_on_failure() {
        let mut root = Node::root();
        insert(&mut root, "/:a/x", "GET", "ax");
        insert(&mut root, "/k/:b", "GET", "kb");

        let (payload, captured) = lookup(&root, "/k/x", "GET").unwrap();
        assert_eq!(payload, "kb");
        assert_eq!(captured, vec!["x"]);
    }

    #[test]
    fn test_lookup_merges_verbs_on_miss() {
        let mut root = Node::root();
        insert(&mut root, "/users/me", "GET", "me");
        insert(&mut root, "/users/me", "PUT", "replace");
        insert(&mut root, "/users/:id", "DELETE", "delete");
        insert(&mut root, "/users/:id", "GET", "by_id");

        let mut captured = Vec::new();
        let mut allowed = Vec::new();
        let hit = root.lookup(&["users", "me"], "POST", &mut captured, &mut allowed);
        assert!(hit.is_none());
        assert!(captured.is_empty());
        assert_eq!(allowed, vec!["GET", "PUT", "DELETE"]);
    }

    #[test]
    fn test_lookup_captures_outlive_request_path() {
        let mut root = Node::root();
        insert(&mut root, "/files/:name", "GET", "file");

        let (payload, owned) = {
            let path = String::from("/files/readme");
            let (payload, captured) = lookup(&root, &path, "GET").unwrap();
            let owned: Vec<String> = captured.iter().map(|s| (*s).to_string()).collect();
            (payload, owned)
        };
        assert_eq!(payload, "file");
        assert_eq!(owned, vec!["readme"]);
    }

    #[test]
    fn test_rejected_insert_leaves_tree_untouched() {
        let mut root = Node::root();
        insert(&mut root, "/users/:id", "GET", "get");

        let route = parse_pattern("/users/:user_id", "GET").unwrap();
        assert!(root.insert(&route, "other").is_err());

        let mut out = Vec::new();
        root.collect(&mut Vec::new(), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pattern, "/users/:id");
    }
}
