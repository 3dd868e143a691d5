//! Orchestrates rule resolution and matching over syntax dumps.

use crate::config::Config;
use crate::matcher;
use crate::rules::{loader, LoadError, RuleResolver, RuleStore};
use crate::syntax::PackageUnit;
use crate::types::CheckResult;

use std::num::NonZeroUsize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while building a [`Checker`].
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Glob pattern error.
    #[error("Invalid exclude pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Rule configuration error.
    #[error("Invalid rule configuration: {0}")]
    Load(#[from] LoadError),
}

/// Builder for configuring a [`Checker`].
#[derive(Default)]
pub struct CheckerBuilder {
    store: Option<RuleStore>,
    config: Option<Config>,
    exclude_patterns: Vec<String>,
    parallelism: Option<usize>,
}

impl CheckerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an already built rule store. Takes precedence over the
    /// configured packages.
    #[must_use]
    pub fn store(mut self, store: RuleStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the configuration. Its packages are loaded into the rule store
    /// unless [`CheckerBuilder::store`] was given.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds an exclude glob over package paths.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude globs.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the number of worker threads. Overrides the configuration.
    #[must_use]
    pub fn parallelism(mut self, jobs: usize) -> Self {
        self.parallelism = Some(jobs);
        self
    }

    /// Builds the checker.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is not a valid glob or the
    /// configured rules fail validation.
    pub fn build(self) -> Result<Checker, CheckerError> {
        let config = self.config.unwrap_or_default();

        let mut patterns = self.exclude_patterns;
        patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = patterns
            .iter()
            .map(String::as_str)
            .map(glob::Pattern::new)
            .collect::<Result<Vec<_>, _>>()?;

        let store = match self.store {
            Some(store) => store,
            None => loader::load(config.packages)?,
        };

        let parallelism = self
            .parallelism
            .or(config.analyzer.parallelism)
            .and_then(NonZeroUsize::new)
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get);

        Ok(Checker {
            store,
            exclude,
            parallelism,
        })
    }
}

/// Checks packages against the rules of a validated [`RuleStore`].
///
/// Use [`Checker::builder()`] to construct an instance.
pub struct Checker {
    store: RuleStore,
    exclude: Vec<glob::Pattern>,
    parallelism: usize,
}

impl Checker {
    /// Creates a new builder for configuring a checker.
    #[must_use]
    pub fn builder() -> CheckerBuilder {
        CheckerBuilder::new()
    }

    /// Returns the rule store.
    #[must_use]
    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Returns a resolver over the rule store.
    #[must_use]
    pub fn resolver(&self) -> RuleResolver<'_> {
        RuleResolver::new(&self.store)
    }

    /// Returns the number of configured rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.store.rule_count()
    }

    /// Returns the number of worker threads used by [`Checker::check`].
    #[must_use]
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Returns true if the package path matches an exclude pattern.
    #[must_use]
    pub fn is_excluded(&self, package_path: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(package_path))
    }

    /// Checks every package and returns the merged, sorted result.
    #[must_use]
    pub fn check(&self, packages: &[PackageUnit]) -> CheckResult {
        info!(
            "Checking {} packages against {} rules",
            packages.len(),
            self.rule_count()
        );

        let jobs = self.parallelism.min(packages.len()).max(1);
        let mut result = if jobs == 1 {
            self.check_all(packages)
        } else {
            let chunk_size = packages.len().div_ceil(jobs);
            std::thread::scope(|scope| {
                let handles: Vec<_> = packages
                    .chunks(chunk_size)
                    .map(|chunk| scope.spawn(move || self.check_all(chunk)))
                    .collect();

                let mut merged = CheckResult::new();
                for handle in handles {
                    match handle.join() {
                        Ok(partial) => merged.extend(partial),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
                merged
            })
        };

        result.sort();

        info!(
            "Check complete: {} hits in {} files",
            result.diagnostics.len(),
            result.files_checked
        );
        result
    }

    /// Checks a single package.
    ///
    /// Excluded packages are counted as skipped and produce no hits.
    #[must_use]
    pub fn check_package(&self, package: &PackageUnit) -> CheckResult {
        let mut result = CheckResult::new();
        if self.is_excluded(&package.path) {
            debug!("Excluding package: {}", package.path);
            result.packages_skipped = 1;
            return result;
        }

        let rules = self.resolver().resolve(&package.path);
        debug!(
            "Package {}: {} effective rules, {} files",
            package.path,
            rules.len(),
            package.files.len()
        );

        for file in &package.files {
            result
                .diagnostics
                .extend(matcher::check_file(&package.path, file, &rules));
        }
        result.packages_checked = 1;
        result.files_checked = package.files.len();
        result
    }

    fn check_all(&self, packages: &[PackageUnit]) -> CheckResult {
        let mut result = CheckResult::new();
        for package in packages {
            result.extend(self.check_package(package));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ImportSpec, Node, Position, SourceFile};

    const CONFIG: &str = r#"
[packages."a"]
[[packages."a".rules]]
type = "call"
name = "Ints"
package = "sort"

[[packages."a".rules]]
type = "struct"
name = "CDA"
package = "a/c"
"#;

    fn package(path: &str, nodes: Vec<Node>) -> PackageUnit {
        let pos = Position::new(3, 2);
        let file = SourceFile {
            path: format!("{path}/main.go").into(),
            imports: vec![ImportSpec::new("\"sort\"")],
            nodes: nodes
                .into_iter()
                .chain([Node::call(
                    Node::selector(Node::ident("sort", pos), "Ints", pos),
                    vec![],
                    pos,
                )])
                .collect(),
        };
        PackageUnit {
            path: path.to_string(),
            files: vec![file],
        }
    }

    fn checker(builder: CheckerBuilder) -> Checker {
        builder
            .config(Config::parse(CONFIG).unwrap())
            .build()
            .expect("Failed to build checker")
    }

    #[test]
    fn test_builder_loads_config() {
        let checker = checker(Checker::builder().parallelism(3));
        assert_eq!(checker.rule_count(), 2);
        assert_eq!(checker.parallelism(), 3);
        assert_eq!(checker.store().len(), 1);
    }

    #[test]
    fn test_builder_rejects_bad_glob() {
        let err = Checker::builder().exclude("a/[").build().err().unwrap();
        assert!(matches!(err, CheckerError::Glob(_)));
    }

    #[test]
    fn test_builder_rejects_bad_rules() {
        let config = Config::parse(
            r#"
[packages."a"]
[[packages."a".rules]]
type = "method"
name = "X"
package = "y"
"#,
        )
        .unwrap();
        let err = Checker::builder().config(config).build().err().unwrap();
        assert!(matches!(err, CheckerError::Load(_)));
    }

    #[test]
    fn test_zero_parallelism_falls_back() {
        let checker = checker(Checker::builder().parallelism(0));
        assert!(checker.parallelism() >= 1);
    }

    #[test]
    fn test_inherited_rules_apply_to_subpackage() {
        let checker = checker(Checker::builder());
        let result = checker.check_package(&package("a/b", vec![]));
        assert_eq!(result.messages(), vec!["hit call rule sort.Ints"]);
        assert_eq!(result.packages_checked, 1);
        assert_eq!(result.files_checked, 1);
    }

    #[test]
    fn test_unrelated_package_has_no_hits() {
        let checker = checker(Checker::builder());
        let result = checker.check_package(&package("b", vec![]));
        assert!(!result.has_hits());
    }

    #[test]
    fn test_excluded_package_is_skipped() {
        let checker = checker(Checker::builder().exclude("a/gen/**"));
        assert!(checker.is_excluded("a/gen/x"));
        assert!(!checker.is_excluded("a/c"));

        let result = checker.check(&[package("a/gen/x", vec![]), package("a", vec![])]);
        assert_eq!(result.packages_skipped, 1);
        assert_eq!(result.packages_checked, 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].package, "a");
    }

    #[test]
    fn test_parallel_check_matches_sequential() {
        let packages: Vec<_> = ["a/z", "a", "a/m", "b", "a/b/c"]
            .iter()
            .map(|p| package(p, vec![]))
            .collect();

        let sequential = checker(Checker::builder().parallelism(1)).check(&packages);
        let parallel = checker(Checker::builder().parallelism(4)).check(&packages);

        assert_eq!(sequential.diagnostics, parallel.diagnostics);
        assert_eq!(parallel.packages_checked, 5);
        assert_eq!(parallel.diagnostics.len(), 4);
        // Sorted by file path.
        assert_eq!(parallel.diagnostics[0].file, std::path::Path::new("a/b/c/main.go"));
    }

    #[test]
    fn test_empty_input() {
        let result = checker(Checker::builder()).check(&[]);
        assert!(!result.has_hits());
        assert_eq!(result.packages_checked, 0);
    }
}
