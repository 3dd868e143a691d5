//! Validate command implementation.

use anyhow::Result;
use mixcheck_core::RuleStore;

use crate::config_resolver::ConfigSource;

/// Runs the validate command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = super::load_config(source)?;
    let store = super::load_store(&config);

    if let Some(path) = source.path() {
        println!("{}: OK", path.display());
    }
    println!("{}", summarize(&store));
    Ok(())
}

fn summarize(store: &RuleStore) -> String {
    let opted_out = store
        .entries()
        .iter()
        .filter(|e| e.ignore_parent_rules())
        .count();
    format!(
        "{} package(s), {} rule(s), {} ignoring parent rules",
        store.len(),
        store.rule_count(),
        opted_out
    )
}
