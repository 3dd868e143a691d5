//! Check command implementation.

use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;
use mixcheck_core::{Checker, PackageUnit, SyntaxDump};
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    inputs: &[PathBuf],
    format: OutputFormat,
    jobs: Option<usize>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = super::load_config(source)?;
    // Rules are validated before any dump is read.
    let store = super::load_store(&config);

    let packages = load_packages(inputs)?;

    let mut builder = Checker::builder().store(store).config(config).excludes(exclude);
    if let Some(jobs) = jobs {
        builder = builder.parallelism(jobs);
    }
    let checker = builder.build().context("Failed to build checker")?;

    tracing::info!(
        "Checking {} packages with {} rules on {} threads",
        packages.len(),
        checker.rule_count(),
        checker.parallelism()
    );

    let result = checker.check(&packages);

    super::output::print(&result, format)?;

    // Exit with error code if any rule was hit
    if result.has_hits() {
        std::process::exit(1);
    }

    Ok(())
}

/// A dump file and whether it was named on the command line.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct DumpFile {
    path: PathBuf,
    explicit: bool,
}

/// Reads every dump and concatenates their packages.
///
/// Explicitly named dumps must decode; JSON files found while walking a
/// directory are skipped with a warning when they are not syntax dumps.
fn load_packages(inputs: &[PathBuf]) -> Result<Vec<PackageUnit>> {
    let files = discover_dumps(inputs)?;
    if files.is_empty() {
        bail!("No syntax dumps found");
    }

    let mut packages = Vec::new();
    for file in &files {
        match SyntaxDump::from_file(&file.path) {
            Ok(dump) => {
                tracing::debug!(
                    "Loaded {}: {} packages, {} files",
                    file.path.display(),
                    dump.packages.len(),
                    dump.file_count()
                );
                packages.extend(dump.packages);
            }
            Err(e) if !file.explicit => {
                tracing::warn!("Skipping {}: {}", file.path.display(), e);
            }
            Err(e) => return Err(e).context("Failed to load syntax dump"),
        }
    }
    Ok(packages)
}

/// Expands directories into the `*.json` files below them.
///
/// Walking honors `.gitignore` and skips hidden files, so a `.mixcheck.json`
/// configuration next to the dumps is never picked up.
fn discover_dumps(inputs: &[PathBuf]) -> Result<Vec<DumpFile>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(DumpFile {
                path: input.clone(),
                explicit: true,
            });
            continue;
        }

        for entry in WalkBuilder::new(input).build() {
            let entry =
                entry.with_context(|| format!("Failed to walk {}", input.display()))?;
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            if is_file && is_json(entry.path()) {
                files.push(DumpFile {
                    path: entry.into_path(),
                    explicit: false,
                });
            }
        }
    }

    files.sort();
    files.dedup_by(|a, b| a.path == b.path);
    Ok(files)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}
