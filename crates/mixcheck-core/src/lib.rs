//! # mixcheck-core
//!
//! Detects forbidden struct and call usages in a package hierarchy.
//!
//! Rules are configured per package path and inherited by sub-packages
//! unless a package opts out with `ignore-parent-rules`. Source code is
//! never parsed here: an external front end emits a JSON syntax dump
//! (see [`syntax`]) which the [`Checker`] walks.
//!
//! - [`RuleStore`] and [`RuleResolver`] for the rule hierarchy
//! - [`UsageMatcher`] for matching selector and call nodes
//! - [`Checker`] for orchestrating a run
//! - [`CheckResult`] and [`Diagnostic`] for reporting hits
//!
//! ## Example
//!
//! ```ignore
//! use mixcheck_core::{Checker, Config, SyntaxDump};
//!
//! let checker = Checker::builder()
//!     .config(Config::from_file("mixcheck.toml".as_ref())?)
//!     .build()?;
//!
//! let dump = SyntaxDump::from_file("mixcheck-dump.json".as_ref())?;
//! let result = checker.check(&dump.packages);
//! result.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod checker;
mod config;
mod imports;
mod matcher;
mod types;

pub mod rules;
pub mod syntax;

pub use checker::{Checker, CheckerBuilder, CheckerError};
pub use config::{AnalyzerConfig, Config, ConfigError};
pub use imports::{default_alias, ImportAliasTable};
pub use matcher::{check_file, UsageMatcher};
pub use rules::{
    LoadError, LoadRulesError, ModelError, PackageRules, Pattern, ResolvedRule, Rule, RuleKind,
    RuleResolver, RuleStore,
};
pub use syntax::{PackageUnit, Position, SourceFile, SyntaxDump, SyntaxError};
pub use types::{CheckResult, Diagnostic};
