//! Shared output formatting for check results.

use anyhow::Result;
use mixcheck_core::{CheckResult, RuleKind};

use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(result: &CheckResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &CheckResult) {
    for diagnostic in &result.diagnostics {
        let kind_indicator = match diagnostic.kind {
            RuleKind::Struct => "\x1b[35mstruct\x1b[0m",
            RuleKind::Call => "\x1b[33mcall\x1b[0m",
        };

        println!(
            "{}:{}:{}: {}",
            diagnostic.file.display(),
            diagnostic.position.line,
            diagnostic.position.column,
            diagnostic.message,
        );
        println!("  {} in package {}", kind_indicator, diagnostic.package);
    }

    if result.has_hits() {
        println!();
    }

    let summary_color = if result.has_hits() {
        "\x1b[31m"
    } else {
        "\x1b[32m"
    };

    println!("{}{}\x1b[0m", summary_color, result.summary());
    if result.packages_skipped > 0 {
        println!("Skipped {} excluded package(s)", result.packages_skipped);
    }
}

fn print_json(result: &CheckResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &CheckResult) {
    for diagnostic in &result.diagnostics {
        println!("{}", diagnostic.format_compact());
    }
}
