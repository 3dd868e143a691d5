//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod output;
pub mod rules;
pub mod validate;

use anyhow::{Context, Result};
use mixcheck_core::rules::loader;
use mixcheck_core::{Config, RuleStore};

use crate::config_resolver::ConfigSource;

/// Loads the configuration the resolver found, or defaults.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => {
            tracing::warn!("No configuration found, no rules will be applied");
            Ok(Config::default())
        }
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            } else {
                tracing::debug!("Using config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Validates the configured rules and builds the rule store.
///
/// A validation failure is rendered with its diagnostic code and help and
/// exits with status 1 before anything is checked.
pub fn load_store(config: &Config) -> RuleStore {
    match loader::load(config.packages.clone()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(1);
        }
    }
}
