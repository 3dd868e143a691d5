//! Per-file mapping from import alias to import path.

use std::collections::{HashMap, HashSet};

use crate::syntax::ImportSpec;

/// Maps the identifier used at reference sites to the imported path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportAliasTable {
    aliases: HashMap<String, String>,
}

impl ImportAliasTable {
    /// Builds the table for one file.
    ///
    /// Explicit aliases win over derived ones regardless of order; among
    /// bindings of the same sort the later import replaces the earlier one.
    /// Blank (`_`) and dot (`.`) imports cannot qualify a selector and are
    /// not registered.
    #[must_use]
    pub fn from_imports(imports: &[ImportSpec]) -> Self {
        let mut aliases: HashMap<String, String> = HashMap::with_capacity(imports.len());
        let mut explicit: HashSet<String> = HashSet::new();
        for import in imports {
            let path = unquote(&import.path);
            if path.is_empty() {
                continue;
            }
            let (alias, is_explicit) = match import.alias.as_deref() {
                Some("_" | ".") => continue,
                Some(alias) => (alias.to_string(), true),
                None => (default_alias(path).to_string(), false),
            };
            if !is_explicit && explicit.contains(&alias) {
                tracing::debug!(
                    %alias,
                    ignored = %path,
                    "Derived alias shadowed by explicit alias"
                );
                continue;
            }
            if is_explicit {
                explicit.insert(alias.clone());
            }
            if let Some(previous) = aliases.insert(alias.clone(), path.to_string()) {
                if previous != path {
                    tracing::debug!(%alias, %previous, current = %path, "Import alias rebound");
                }
            }
        }
        Self { aliases }
    }

    /// Returns the import path bound to `alias`.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Number of registered aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns `true` if the file has no usable imports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Strips the quotes a front end may keep from the source literal.
fn unquote(path: &str) -> &str {
    path.trim().trim_matches(|c| c == '"' || c == '`')
}

/// Derives the identifier a package is referenced by when imported
/// without an alias.
///
/// Uses the last path segment, skipping a trailing major-version segment
/// (`v2`, `v10`), and drops anything from the first `.` on.
#[must_use]
pub fn default_alias(path: &str) -> &str {
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let last = segments.next().unwrap_or(path);
    let name = if is_major_version(last) {
        segments.next().unwrap_or(last)
    } else {
        last
    };
    name.split('.').next().unwrap_or(name)
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alias_is_last_segment() {
        assert_eq!(default_alias("sort"), "sort");
        assert_eq!(default_alias("a/c"), "c");
        assert_eq!(default_alias("x/y/sort"), "sort");
    }

    #[test]
    fn default_alias_strips_dotted_suffix() {
        assert_eq!(default_alias("gopkg.in/yaml.v2"), "yaml");
        assert_eq!(default_alias("example.com/pkg.name"), "pkg");
    }

    #[test]
    fn default_alias_skips_major_version_segment() {
        assert_eq!(default_alias("example.com/mod/v2"), "mod");
        assert_eq!(default_alias("example.com/mod/v12"), "mod");
        // Not a version segment.
        assert_eq!(default_alias("example.com/mod/vendor"), "vendor");
        assert_eq!(default_alias("example.com/mod/v"), "v");
        // Nothing before it.
        assert_eq!(default_alias("v2"), "v2");
    }

    #[test]
    fn table_resolves_default_and_explicit_aliases() {
        let table = ImportAliasTable::from_imports(&[
            ImportSpec::new("\"fmt\""),
            ImportSpec::new("\"a/c\""),
            ImportSpec::aliased("another_sort", "\"x/y/sort\""),
        ]);
        assert_eq!(table.resolve("fmt"), Some("fmt"));
        assert_eq!(table.resolve("c"), Some("a/c"));
        assert_eq!(table.resolve("another_sort"), Some("x/y/sort"));
        assert_eq!(table.resolve("sort"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn blank_and_dot_imports_are_skipped() {
        let table = ImportAliasTable::from_imports(&[
            ImportSpec::aliased("_", "\"net/http/pprof\""),
            ImportSpec::aliased(".", "\"math\""),
        ]);
        assert!(table.is_empty());
        assert_eq!(table.resolve("_"), None);
    }

    #[test]
    fn unquoted_and_raw_paths() {
        let table = ImportAliasTable::from_imports(&[
            ImportSpec::new("strings"),
            ImportSpec::new("`bytes`"),
        ]);
        assert_eq!(table.resolve("strings"), Some("strings"));
        assert_eq!(table.resolve("bytes"), Some("bytes"));
    }

    #[test]
    fn explicit_alias_survives_later_derived_alias() {
        let table = ImportAliasTable::from_imports(&[
            ImportSpec::aliased("sort", "\"x/y/sort\""),
            ImportSpec::new("\"sort\""),
        ]);
        assert_eq!(table.resolve("sort"), Some("x/y/sort"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn later_explicit_alias_replaces_earlier_explicit_alias() {
        let table = ImportAliasTable::from_imports(&[
            ImportSpec::aliased("s", "\"sort\""),
            ImportSpec::aliased("s", "\"x/y/sort\""),
        ]);
        assert_eq!(table.resolve("s"), Some("x/y/sort"));
    }

    #[test]
    fn later_import_replaces_earlier_alias() {
        let table = ImportAliasTable::from_imports(&[
            ImportSpec::new("\"sort\""),
            ImportSpec::aliased("sort", "\"x/y/sort\""),
        ]);
        assert_eq!(table.resolve("sort"), Some("x/y/sort"));
    }
}
