//! Forbidden-usage rules and their package hierarchy.
//!
//! # Architecture
//!
//! ```text
//! TOML / JSON text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert (loader)
//! RuleStore (segment arena of PackageRules)
//!   ↓ RuleResolver::resolve(package path)
//! Vec<&Rule>
//! ```

pub mod config_dto;
pub mod loader;
pub mod model;
pub mod resolver;
pub mod store;

pub use loader::LoadError;
pub use model::{ModelError, PackageRules, Pattern, Rule, RuleKind};
pub use resolver::{ResolvedRule, RuleResolver};
pub use store::RuleStore;

/// Errors from parsing configuration text and loading rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// Configuration decoding failed.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Rule validation failed.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Parses TOML configuration content and builds the rule store.
///
/// # Errors
///
/// Returns an error if decoding or rule validation fails.
pub fn load_store_from_toml(content: &str) -> Result<RuleStore, LoadRulesError> {
    let config = crate::config::Config::parse(content)?;
    Ok(loader::load(config.packages)?)
}
