//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# mixcheck configuration
#
# Rules are keyed by calling package path and apply to that package and
# every package below it. A rule forbids either building a struct
# (`type = "struct"`) or calling a function (`type = "call"`) from an
# imported package.

[analyzer]
# Package path globs that are never checked
exclude = [
    "vendor/**",
]

# Worker threads (default: available parallelism)
# parallelism = 4

# [packages."example.com/app"]
#
# [[packages."example.com/app".rules]]
# type = "call"
# name = "Ints"
# package = "sort"
#
# [[packages."example.com/app".rules]]
# type = "struct"
# name = { value = "^Client$", regex = true }
# package = { value = "/internal/db$", regex = true }

# Drop everything inherited from "example.com/app" below this package
# [packages."example.com/app/legacy"]
# ignore-parent-rules = true
"#;

const CONFIG_NAME: &str = ".mixcheck.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_NAME);
    write_template(config_path, force)?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to configure rules");
    println!("  2. Run: mixcheck validate");
    println!("  3. Run: mixcheck check <DUMP>");

    Ok(())
}

fn write_template(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}
