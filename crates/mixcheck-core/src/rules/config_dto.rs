//! Configuration deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::{Deserialize, Serialize};

/// Raw representation of one configured package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageDto {
    /// Drop rules inherited from ancestor packages.
    #[serde(default, alias = "ignore_parent_rules", alias = "ignoreParentRules")]
    pub ignore_parent_rules: bool,

    /// Rules for this package, in priority order.
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

/// Raw representation of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDto {
    /// Rule type, `"struct"` or `"call"`. Validated by the loader.
    #[serde(rename = "type")]
    pub kind: String,
    /// Pattern for the referenced identifier.
    pub name: PatternDto,
    /// Pattern for the import path the identifier comes from.
    pub package: PatternDto,
}

/// A pattern: either a bare string (literal) or a `{ value, regex }` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternDto {
    /// Shorthand for a literal pattern.
    Plain(String),
    /// Full form.
    Full {
        /// Literal text or regex source.
        #[serde(default)]
        value: String,
        /// Whether `value` is a regular expression.
        #[serde(default)]
        regex: bool,
    },
}

impl PatternDto {
    /// Returns the pattern text.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Plain(value) | Self::Full { value, .. } => value,
        }
    }

    /// Returns whether the pattern is a regular expression.
    #[must_use]
    pub fn is_regex(&self) -> bool {
        match self {
            Self::Plain(_) => false,
            Self::Full { regex, .. } => *regex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Deserialize)]
    struct Packages {
        packages: BTreeMap<String, PackageDto>,
    }

    #[test]
    fn deserialize_toml_package() {
        let toml_str = r#"
[packages."a"]
ignore-parent-rules = true

[[packages."a".rules]]
type = "call"
name = "Ints"
package = { value = ".*", regex = true }

[[packages."a".rules]]
type = "struct"
name = { value = "CDA" }
package = "a/c"
"#;
        let dto: Packages = toml::from_str(toml_str).unwrap();
        let a = &dto.packages["a"];
        assert!(a.ignore_parent_rules);
        assert_eq!(a.rules.len(), 2);
        assert_eq!(a.rules[0].kind, "call");
        assert_eq!(a.rules[0].name, PatternDto::Plain("Ints".to_string()));
        assert!(a.rules[0].package.is_regex());
        assert_eq!(a.rules[0].package.value(), ".*");
        assert!(!a.rules[1].name.is_regex());
        assert_eq!(a.rules[1].name.value(), "CDA");
    }

    #[test]
    fn defaults_when_fields_missing() {
        let dto: Packages = toml::from_str("[packages.\"a/c\"]\n").unwrap();
        assert_eq!(dto.packages["a/c"], PackageDto::default());
    }

    #[test]
    fn accepts_alternate_flag_spellings() {
        let dto: PackageDto = serde_json::from_str(r#"{"ignoreParentRules": true}"#).unwrap();
        assert!(dto.ignore_parent_rules);
        let dto: PackageDto = serde_json::from_str(r#"{"ignore_parent_rules": true}"#).unwrap();
        assert!(dto.ignore_parent_rules);
    }

    #[test]
    fn deserialize_json_rule() {
        let dto: RuleDto = serde_json::from_str(
            r#"{"type": "call", "name": {"value": "A"}, "package": {"value": "a/c", "regex": false}}"#,
        )
        .unwrap();
        assert_eq!(dto.kind, "call");
        assert_eq!(dto.name.value(), "A");
        assert!(!dto.package.is_regex());
    }
}
