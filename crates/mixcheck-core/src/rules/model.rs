//! Pure domain model for forbidden-usage rules.
//!
//! This module contains no I/O dependencies.
//! All invariants are enforced at construction time: a [`Pattern`] only
//! exists in compiled form, and a [`Rule`] is only built from valid patterns.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Invariant violations raised while building model values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A pattern value was empty.
    #[error("pattern must not be empty")]
    EmptyPattern,

    /// A regex pattern failed to compile.
    #[error("invalid regex `{pattern}`")]
    InvalidRegex {
        /// The offending regex source.
        pattern: String,
        /// The compiler error.
        source: regex::Error,
    },

    /// A rule kind string was neither `struct` nor `call`.
    #[error("unknown rule type `{0}`, expected: struct, call")]
    UnknownKind(String),

    /// Two configured packages normalize to the same path.
    #[error("package `{path}` is configured more than once")]
    DuplicatePackage {
        /// The normalized package path.
        path: String,
    },
}

// ────────────────────────────────────────────
// Pattern
// ────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Matcher {
    Literal(String),
    Regex(Regex),
}

/// A string matched either literally or as a regular expression.
///
/// The regex is compiled once at construction and reused for every
/// [`Pattern::matches`] call.
#[derive(Debug, Clone)]
pub struct Pattern {
    matcher: Matcher,
}

impl Pattern {
    /// Compiles a pattern from its configured value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyPattern`] for an empty value and
    /// [`ModelError::InvalidRegex`] when `is_regex` is set and the value does
    /// not compile.
    pub fn new(value: &str, is_regex: bool) -> Result<Self, ModelError> {
        if value.is_empty() {
            return Err(ModelError::EmptyPattern);
        }
        let matcher = if is_regex {
            let compiled = Regex::new(value).map_err(|e| ModelError::InvalidRegex {
                pattern: value.to_string(),
                source: e,
            })?;
            Matcher::Regex(compiled)
        } else {
            Matcher::Literal(value.to_string())
        };
        Ok(Self { matcher })
    }

    /// Creates a literal pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty.
    pub fn literal(value: &str) -> Result<Self, ModelError> {
        Self::new(value, false)
    }

    /// Creates a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or is not a valid regex.
    pub fn regex(value: &str) -> Result<Self, ModelError> {
        Self::new(value, true)
    }

    /// Tests a candidate string.
    ///
    /// Literal patterns require exact equality. Regex patterns match
    /// anywhere in the candidate (unanchored).
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.matcher {
            Matcher::Literal(value) => value == candidate,
            Matcher::Regex(regex) => regex.is_match(candidate),
        }
    }

    /// Returns `true` for regex patterns.
    #[must_use]
    pub fn is_regex(&self) -> bool {
        matches!(self.matcher, Matcher::Regex(_))
    }

    /// Returns the text shown in messages: the regex source or the literal.
    #[must_use]
    pub fn render(&self) -> &str {
        match &self.matcher {
            Matcher::Literal(value) => value,
            Matcher::Regex(regex) => regex.as_str(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render())
    }
}

// ────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────

/// What kind of usage a rule forbids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Referencing (constructing) a struct type, `pkg.Type{...}`.
    Struct,
    /// Calling a function or method, `pkg.Func(...)`.
    Call,
}

impl RuleKind {
    /// Parses the configuration spelling of a kind.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownKind`] for anything but `struct`/`call`.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value {
            "struct" => Ok(Self::Struct),
            "call" => Ok(Self::Call),
            other => Err(ModelError::UnknownKind(other.to_string())),
        }
    }

    /// Returns the configuration spelling of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Call => "call",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single forbidden-usage rule.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    name: Pattern,
    package: Pattern,
}

impl Rule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(kind: RuleKind, name: Pattern, package: Pattern) -> Self {
        Self {
            kind,
            name,
            package,
        }
    }

    /// Returns the rule kind.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Returns the pattern for the referenced identifier.
    #[must_use]
    pub fn name(&self) -> &Pattern {
        &self.name
    }

    /// Returns the pattern for the package the identifier comes from.
    #[must_use]
    pub fn package(&self) -> &Pattern {
        &self.package
    }

    /// Tests a usage of `name` from the package imported as `import_path`.
    #[must_use]
    pub fn matches(&self, name: &str, import_path: &str) -> bool {
        self.name.matches(name) && self.package.matches(import_path)
    }

    /// Returns the diagnostic message for a hit of this rule.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hit {} rule {}.{}", self.kind, self.package, self.name)
    }
}

/// The rules configured for one package path.
#[derive(Debug, Clone)]
pub struct PackageRules {
    path: String,
    ignore_parent_rules: bool,
    rules: Vec<Rule>,
}

impl PackageRules {
    /// Creates a package entry. The path is stored in normalized form.
    #[must_use]
    pub fn new(path: &str, ignore_parent_rules: bool, rules: Vec<Rule>) -> Self {
        Self {
            path: normalize_path(path),
            ignore_parent_rules,
            rules,
        }
    }

    /// Returns the normalized package path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether rules of ancestor packages are dropped at this package.
    #[must_use]
    pub fn ignore_parent_rules(&self) -> bool {
        self.ignore_parent_rules
    }

    /// Returns this package's own rules, in configuration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Splits a package path into its non-empty `/` segments.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Normalizes a package path: `"/a//b/"` becomes `"a/b"`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path_segments(path).collect::<Vec<_>>().join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_only_equal_strings() {
        let p = Pattern::literal("sort").unwrap();
        assert!(p.matches("sort"));
        assert!(!p.matches("x/y/sort"));
        assert!(!p.matches("sor"));
        assert!(!p.matches(""));
        assert!(!p.is_regex());
    }

    #[test]
    fn regex_matches_anywhere() {
        let p = Pattern::regex("sort").unwrap();
        assert!(p.matches("sort"));
        assert!(p.matches("x/y/sort"));
        assert!(p.matches("sorted"));
        assert!(!p.matches("fmt"));
        assert!(p.is_regex());
    }

    #[test]
    fn anchored_regex_is_respected() {
        let p = Pattern::regex("^Ints$").unwrap();
        assert!(p.matches("Ints"));
        assert!(!p.matches("IntsAreSorted"));
    }

    #[test]
    fn empty_pattern_rejected() {
        assert!(matches!(Pattern::literal(""), Err(ModelError::EmptyPattern)));
        assert!(matches!(Pattern::regex(""), Err(ModelError::EmptyPattern)));
    }

    #[test]
    fn invalid_regex_rejected() {
        let err = Pattern::regex("(unclosed").unwrap_err();
        assert!(matches!(err, ModelError::InvalidRegex { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn invalid_regex_cause_is_chained_not_repeated() {
        use std::error::Error;

        let err = Pattern::regex("(unclosed").unwrap_err();
        assert_eq!(err.to_string(), "invalid regex `(unclosed`");
        let cause = err.source().unwrap().to_string();
        assert!(cause.contains("unclosed group"), "unexpected cause: {cause}");
    }

    #[test]
    fn invalid_regex_text_is_fine_as_literal() {
        let p = Pattern::literal("(unclosed").unwrap();
        assert!(p.matches("(unclosed"));
    }

    #[test]
    fn render_uses_source_text() {
        assert_eq!(Pattern::regex(".*").unwrap().render(), ".*");
        assert_eq!(Pattern::literal("a/c").unwrap().render(), "a/c");
    }

    #[test]
    fn rule_message_format() {
        let rule = Rule::new(
            RuleKind::Call,
            Pattern::literal("Ints").unwrap(),
            Pattern::regex(".*").unwrap(),
        );
        assert_eq!(rule.message(), "hit call rule .*.Ints");

        let rule = Rule::new(
            RuleKind::Struct,
            Pattern::literal("CDA").unwrap(),
            Pattern::literal("a/c").unwrap(),
        );
        assert_eq!(rule.message(), "hit struct rule a/c.CDA");
    }

    #[test]
    fn name_pattern_compiles_its_own_value() {
        // Name regex must not be compiled from the package pattern's source.
        let rule = Rule::new(
            RuleKind::Call,
            Pattern::regex("^Int").unwrap(),
            Pattern::literal("sort").unwrap(),
        );
        assert!(rule.matches("Ints", "sort"));
        assert!(!rule.matches("sort", "sort"));
    }

    #[test]
    fn kind_parse() {
        assert_eq!(RuleKind::parse("struct").unwrap(), RuleKind::Struct);
        assert_eq!(RuleKind::parse("call").unwrap(), RuleKind::Call);
        assert!(matches!(
            RuleKind::parse("method"),
            Err(ModelError::UnknownKind(ref k)) if k == "method"
        ));
    }

    #[test]
    fn path_normalization() {
        assert_eq!(normalize_path("/a//b/"), "a/b");
        assert_eq!(normalize_path(""), "");
        assert_eq!(PackageRules::new("a/c/", false, vec![]).path(), "a/c");
    }
}
