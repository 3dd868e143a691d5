//! Hierarchical index of package rules keyed by `/`-segmented paths.
//!
//! The store is an arena of path-segment nodes. Node `0` is the root (the
//! empty package path); every other node is reached from its parent through
//! a child-by-segment lookup. A node holds a [`PackageRules`] entry only when
//! that exact path was configured.

use std::collections::BTreeMap;

use super::model::{path_segments, ModelError, PackageRules};

const ROOT: usize = 0;

#[derive(Debug, Default)]
struct SegmentNode {
    children: BTreeMap<String, usize>,
    entry: Option<PackageRules>,
}

/// Immutable, path-keyed index over configured packages.
///
/// Built once per run and shared read-only afterwards.
#[derive(Debug)]
pub struct RuleStore {
    nodes: Vec<SegmentNode>,
    len: usize,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self {
            nodes: vec![SegmentNode::default()],
            len: 0,
        }
    }
}

impl RuleStore {
    /// Creates an empty store. Every package resolves to no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from package entries.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicatePackage`] if two entries share the same
    /// normalized path.
    pub fn build<I>(entries: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = PackageRules>,
    {
        let mut store = Self::new();
        for entry in entries {
            store.insert(entry)?;
        }
        Ok(store)
    }

    fn insert(&mut self, entry: PackageRules) -> Result<(), ModelError> {
        let mut current = ROOT;
        for segment in path_segments(entry.path()) {
            let existing = self.nodes[current].children.get(segment).copied();
            current = match existing {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(SegmentNode::default());
                    self.nodes[current]
                        .children
                        .insert(segment.to_string(), child);
                    child
                }
            };
        }

        let slot = &mut self.nodes[current].entry;
        if slot.is_some() {
            return Err(ModelError::DuplicatePackage {
                path: entry.path().to_string(),
            });
        }
        *slot = Some(entry);
        self.len += 1;
        Ok(())
    }

    /// Follows `path` from the root, returning the visited node indices
    /// (root first). Stops early when a segment has no node.
    fn walk(&self, path: &str) -> (Vec<usize>, bool) {
        let mut visited = vec![ROOT];
        let mut current = ROOT;
        for segment in path_segments(path) {
            match self.nodes[current].children.get(segment) {
                Some(&child) => {
                    visited.push(child);
                    current = child;
                }
                None => return (visited, false),
            }
        }
        (visited, true)
    }

    /// Returns the entry configured for exactly `path`.
    #[must_use]
    pub fn exact_entry(&self, path: &str) -> Option<&PackageRules> {
        let (visited, complete) = self.walk(path);
        if !complete {
            return None;
        }
        visited
            .last()
            .and_then(|&index| self.nodes[index].entry.as_ref())
    }

    /// Returns every configured entry whose path is a strict segment prefix
    /// of `path`, ordered from the root towards `path`.
    #[must_use]
    pub fn ancestor_entries(&self, path: &str) -> Vec<&PackageRules> {
        let (mut visited, complete) = self.walk(path);
        if complete {
            // The final node is `path` itself, never its own ancestor.
            visited.pop();
        }
        visited
            .into_iter()
            .filter_map(|index| self.nodes[index].entry.as_ref())
            .collect()
    }

    /// Returns all configured entries sorted by path.
    #[must_use]
    pub fn entries(&self) -> Vec<&PackageRules> {
        let mut entries: Vec<&PackageRules> =
            self.nodes.iter().filter_map(|n| n.entry.as_ref()).collect();
        entries.sort_by(|a, b| a.path().cmp(b.path()));
        entries
    }

    /// Number of configured packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no package is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of rules across all packages.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| n.entry.as_ref())
            .map(|e| e.rules().len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> PackageRules {
        PackageRules::new(path, false, vec![])
    }

    fn paths(entries: &[&PackageRules]) -> Vec<String> {
        entries.iter().map(|e| e.path().to_string()).collect()
    }

    fn store(list: &[&str]) -> RuleStore {
        RuleStore::build(list.iter().map(|p| entry(p))).unwrap()
    }

    #[test]
    fn exact_lookup() {
        let s = store(&["a", "a/b/c"]);
        assert_eq!(s.exact_entry("a").map(PackageRules::path), Some("a"));
        assert_eq!(s.exact_entry("a/b/c").map(PackageRules::path), Some("a/b/c"));
        // Intermediate node without an entry.
        assert!(s.exact_entry("a/b").is_none());
        assert!(s.exact_entry("x").is_none());
        assert!(s.exact_entry("a/b/c/d").is_none());
    }

    #[test]
    fn ancestors_root_to_leaf_excluding_self() {
        let s = store(&["a", "a/b", "a/b/c", "a/b/c/d"]);
        assert_eq!(paths(&s.ancestor_entries("a/b/c")), vec!["a", "a/b"]);
        assert_eq!(
            paths(&s.ancestor_entries("a/b/c/d/e")),
            vec!["a", "a/b", "a/b/c", "a/b/c/d"]
        );
        assert!(s.ancestor_entries("a").is_empty());
    }

    #[test]
    fn ancestors_of_unconfigured_path() {
        let s = store(&["a", "a/b/c"]);
        assert_eq!(paths(&s.ancestor_entries("a/b/x/y")), vec!["a"]);
        assert_eq!(paths(&s.ancestor_entries("a/b")), vec!["a"]);
        assert!(s.ancestor_entries("z/a").is_empty());
    }

    #[test]
    fn ancestry_is_by_whole_segments() {
        let s = store(&["a/c"]);
        assert!(s.ancestor_entries("a/c_test").is_empty());
        assert_eq!(paths(&s.ancestor_entries("a/c/test")), vec!["a/c"]);
    }

    #[test]
    fn root_entry_is_ancestor_of_everything() {
        let s = store(&["", "a"]);
        assert_eq!(paths(&s.ancestor_entries("a/b")), vec!["", "a"]);
        assert_eq!(paths(&s.ancestor_entries("zzz")), vec![""]);
        assert!(s.ancestor_entries("").is_empty());
        assert_eq!(s.exact_entry("").map(PackageRules::path), Some(""));
    }

    #[test]
    fn duplicate_normalized_path_rejected() {
        let err = RuleStore::build(vec![entry("a/b"), entry("a/b/")]).unwrap_err();
        assert!(matches!(err, ModelError::DuplicatePackage { ref path } if path == "a/b"));
    }

    #[test]
    fn entries_sorted_and_counted() {
        let s = store(&["b", "a/x", "a"]);
        assert_eq!(paths(&s.entries()), vec!["a", "a/x", "b"]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert!(RuleStore::new().is_empty());
    }
}
