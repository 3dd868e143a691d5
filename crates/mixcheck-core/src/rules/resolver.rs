//! Effective rule computation for a calling package.

use super::model::{PackageRules, Rule};
use super::store::RuleStore;

/// A resolved rule together with the package entry that contributed it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRule<'s> {
    /// Path of the configured package the rule comes from.
    pub origin: &'s str,
    /// The rule itself.
    pub rule: &'s Rule,
}

/// Computes the ordered rule list that applies to a package.
///
/// Own rules come first, followed by inherited rules ordered from the
/// nearest ancestor to the farthest. An entry with `ignore_parent_rules`
/// cuts inheritance at that point.
#[derive(Debug, Clone, Copy)]
pub struct RuleResolver<'s> {
    store: &'s RuleStore,
}

impl<'s> RuleResolver<'s> {
    /// Creates a resolver over a built store.
    #[must_use]
    pub fn new(store: &'s RuleStore) -> Self {
        Self { store }
    }

    /// Returns the effective rules for `package_path`.
    #[must_use]
    pub fn resolve(&self, package_path: &str) -> Vec<&'s Rule> {
        self.resolve_traced(package_path)
            .into_iter()
            .map(|r| r.rule)
            .collect()
    }

    /// Same as [`RuleResolver::resolve`], keeping the origin of each rule.
    #[must_use]
    pub fn resolve_traced(&self, package_path: &str) -> Vec<ResolvedRule<'s>> {
        let own = self.store.exact_entry(package_path);

        if let Some(entry) = own {
            if entry.ignore_parent_rules() {
                return traced(entry).collect();
            }
        }

        let mut inherited: Vec<ResolvedRule<'s>> = Vec::new();
        for ancestor in self.store.ancestor_entries(package_path) {
            if ancestor.ignore_parent_rules() {
                inherited.clear();
            }
            inherited.extend(traced(ancestor));
        }
        inherited.reverse();

        let mut resolved: Vec<ResolvedRule<'s>> =
            own.map(|e| traced(e).collect()).unwrap_or_default();
        resolved.extend(inherited);
        resolved
    }
}

fn traced(entry: &PackageRules) -> impl Iterator<Item = ResolvedRule<'_>> {
    entry.rules().iter().map(move |rule| ResolvedRule {
        origin: entry.path(),
        rule,
    })
}
