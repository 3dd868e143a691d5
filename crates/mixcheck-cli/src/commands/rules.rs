//! Rules command implementation.

use anyhow::Result;
use mixcheck_core::rules::model::normalize_path;
use mixcheck_core::{ResolvedRule, RuleResolver};
use std::fmt::Write;

use crate::config_resolver::ConfigSource;

/// Runs the rules command.
pub fn run(package: &str, source: &ConfigSource) -> Result<()> {
    let config = super::load_config(source)?;
    let store = super::load_store(&config);

    let package = normalize_path(package);
    let resolved = RuleResolver::new(&store).resolve_traced(&package);

    print!("{}", format_rules(&package, &resolved));
    Ok(())
}

/// Formats the effective rules of `package` in resolution order.
fn format_rules(package: &str, resolved: &[ResolvedRule<'_>]) -> String {
    let mut out = String::new();

    if resolved.is_empty() {
        let _ = writeln!(out, "No rules apply to {}", display_package(package));
        return out;
    }

    let _ = writeln!(out, "Effective rules for {}:\n", display_package(package));
    let _ = writeln!(out, "{:<4} {:<7} {:<30} From", "#", "Type", "Rule");
    let _ = writeln!(out, "{}", "-".repeat(60));

    for (i, resolved) in resolved.iter().enumerate() {
        let rule = resolved.rule;
        let _ = writeln!(
            out,
            "{:<4} {:<7} {:<30} {}",
            i + 1,
            rule.kind(),
            format!("{}.{}", rule.package(), rule.name()),
            display_package(resolved.origin)
        );
    }
    out
}

fn display_package(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
