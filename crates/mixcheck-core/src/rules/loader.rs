//! DTO → Domain model conversion with validation.

use std::collections::BTreeMap;

use super::config_dto::{PackageDto, PatternDto, RuleDto};
use super::model::{ModelError, PackageRules, Pattern, Rule, RuleKind};
use super::store::RuleStore;

/// Errors during configuration → rule store conversion.
///
/// Every rule-level variant names the package and the rule index so the
/// offending entry can be found in the configuration file.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LoadError {
    /// The rule type is neither `struct` nor `call`.
    #[error("rule {index} in {package} has invalid type `{kind}`")]
    #[diagnostic(code(mixcheck::config::invalid_type), help("use `struct` or `call`"))]
    InvalidKind {
        /// Configured package path.
        package: String,
        /// Index of the rule within the package.
        index: usize,
        /// The rejected type string.
        kind: String,
    },

    /// The rule's `name` pattern is empty.
    #[error("rule {index} in {package} has empty name")]
    #[diagnostic(code(mixcheck::config::empty_name))]
    EmptyName {
        /// Configured package path.
        package: String,
        /// Index of the rule within the package.
        index: usize,
    },

    /// The rule's `package` pattern is empty.
    #[error("rule {index} in {package} has empty package")]
    #[diagnostic(code(mixcheck::config::empty_package))]
    EmptyPackage {
        /// Configured package path.
        package: String,
        /// Index of the rule within the package.
        index: usize,
    },

    /// A regex pattern failed to compile.
    #[error("rule {index} in {package} has invalid {field} regex")]
    #[diagnostic(code(mixcheck::config::invalid_regex))]
    InvalidRegex {
        /// Configured package path.
        package: String,
        /// Index of the rule within the package.
        index: usize,
        /// Which pattern failed: `name` or `package`.
        field: &'static str,
        /// The underlying model error.
        source: ModelError,
    },

    /// Store construction failed.
    #[error("{0}")]
    #[diagnostic(code(mixcheck::config::store))]
    Store(#[from] ModelError),
}

/// Validates configured packages and builds the rule store.
///
/// Packages are processed in path order, so the returned error is the first
/// one by path and then by rule index.
///
/// # Errors
///
/// Returns the first validation error encountered.
pub fn load(packages: BTreeMap<String, PackageDto>) -> Result<RuleStore, LoadError> {
    let entries = packages
        .into_iter()
        .map(|(path, dto)| convert_package(&path, dto))
        .collect::<Result<Vec<_>, _>>()?;

    let store = RuleStore::build(entries)?;
    tracing::debug!(
        packages = store.len(),
        rules = store.rule_count(),
        "Rule store built"
    );
    Ok(store)
}

fn convert_package(path: &str, dto: PackageDto) -> Result<PackageRules, LoadError> {
    let rules = dto
        .rules
        .iter()
        .enumerate()
        .map(|(index, rule)| convert_rule(path, index, rule))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PackageRules::new(path, dto.ignore_parent_rules, rules))
}

fn convert_rule(package: &str, index: usize, dto: &RuleDto) -> Result<Rule, LoadError> {
    let kind = RuleKind::parse(&dto.kind).map_err(|_| LoadError::InvalidKind {
        package: package.to_string(),
        index,
        kind: dto.kind.clone(),
    })?;

    if dto.package.value().is_empty() {
        return Err(LoadError::EmptyPackage {
            package: package.to_string(),
            index,
        });
    }
    let target = convert_pattern(&dto.package, package, index, "package")?;

    if dto.name.value().is_empty() {
        return Err(LoadError::EmptyName {
            package: package.to_string(),
            index,
        });
    }
    let name = convert_pattern(&dto.name, package, index, "name")?;

    Ok(Rule::new(kind, name, target))
}

fn convert_pattern(
    dto: &PatternDto,
    package: &str,
    index: usize,
    field: &'static str,
) -> Result<Pattern, LoadError> {
    Pattern::new(dto.value(), dto.is_regex()).map_err(|e| LoadError::InvalidRegex {
        package: package.to_string(),
        index,
        field,
        source: e,
    })
}
