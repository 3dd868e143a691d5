//! Core types for rule hits and check results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::rules::RuleKind;
use crate::syntax::Position;

/// A reported rule hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the hit was found in.
    pub file: PathBuf,
    /// Position of the offending selector or call.
    pub position: Position,
    /// Kind of the rule that was hit.
    pub kind: RuleKind,
    /// Calling package the file belongs to.
    pub package: String,
    /// Human-readable message, e.g. `hit call rule sort.Ints`.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        file: impl Into<PathBuf>,
        position: Position,
        kind: RuleKind,
        package: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            position,
            kind,
            package: package.into(),
            message: message.into(),
        }
    }

    /// Formats the diagnostic as a single compact line.
    #[must_use]
    pub fn format_compact(&self) -> String {
        format!(
            "{}:{}:{}: [{}] {}",
            self.file.display(),
            self.position.line,
            self.position.column,
            self.kind,
            self.message
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file.display(),
            self.position.line,
            self.position.column,
            self.message
        )
    }
}

/// Result of running a check.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CheckResult {
    /// All hits, sorted by file and position.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of packages checked.
    pub packages_checked: usize,
    /// Number of packages skipped by exclude patterns.
    #[serde(default)]
    pub packages_skipped: usize,
    /// Number of files checked.
    pub files_checked: usize,
}

impl CheckResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any rule was hit.
    #[must_use]
    pub fn has_hits(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Counts hits by rule kind as `(struct, call)`.
    #[must_use]
    pub fn count_by_kind(&self) -> (usize, usize) {
        let structs = self
            .diagnostics
            .iter()
            .filter(|d| d.kind == RuleKind::Struct)
            .count();
        (structs, self.diagnostics.len() - structs)
    }

    /// Returns hits for one calling package.
    #[must_use]
    pub fn for_package(&self, package: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.package == package)
            .collect()
    }

    /// Returns just the messages, in report order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    /// Sorts hits by file, then line, then column. Stable, so rule order is
    /// kept for hits at the same position.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| a.file.cmp(&b.file).then(a.position.cmp(&b.position)));
    }

    /// Adds hits and counters from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.packages_checked += other.packages_checked;
        self.packages_skipped += other.packages_skipped;
        self.files_checked += other.files_checked;
    }

    /// Formats the summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        let (structs, calls) = self.count_by_kind();
        format!(
            "Found {} hit(s) ({} struct, {} call) in {} package(s), {} file(s)",
            self.diagnostics.len(),
            structs,
            calls,
            self.packages_checked,
            self.files_checked
        )
    }

    /// Formats all hits followed by the summary line.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for diagnostic in &self.diagnostics {
            let _ = writeln!(report, "{diagnostic}");
        }
        if !self.diagnostics.is_empty() {
            report.push('\n');
        }
        report.push_str(&self.summary());
        report
    }

    /// Prints the report to stdout.
    pub fn print_report(&self) {
        println!("{}", self.format_report());
    }
}
