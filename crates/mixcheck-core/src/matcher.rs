//! Matching of selector and call nodes against resolved rules.

use std::path::Path;

use crate::imports::ImportAliasTable;
use crate::rules::{Rule, RuleKind};
use crate::syntax::visit::{self, Visit};
use crate::syntax::{CallExpr, Position, SelectorExpr, SourceFile};
use crate::types::Diagnostic;

/// Matches usages in one file against the rules of its package.
///
/// Holds no mutable state; every `check_*` call is a pure function of the
/// node, the rules, and the alias table.
pub struct UsageMatcher<'a> {
    package: &'a str,
    file: &'a Path,
    aliases: &'a ImportAliasTable,
    struct_rules: Vec<&'a Rule>,
    call_rules: Vec<&'a Rule>,
}

impl<'a> UsageMatcher<'a> {
    /// Creates a matcher for one file of `package`.
    #[must_use]
    pub fn new(
        package: &'a str,
        file: &'a Path,
        aliases: &'a ImportAliasTable,
        rules: &[&'a Rule],
    ) -> Self {
        let (struct_rules, call_rules) = rules
            .iter()
            .copied()
            .partition(|r| r.kind() == RuleKind::Struct);
        Self {
            package,
            file,
            aliases,
            struct_rules,
            call_rules,
        }
    }

    /// Checks a `<ident>.<name>` reference against struct rules.
    ///
    /// Compound qualifiers and unknown aliases produce no diagnostics.
    #[must_use]
    pub fn check_selector(&self, selector: &SelectorExpr) -> Vec<Diagnostic> {
        self.check(selector, &self.struct_rules, selector.pos)
    }

    /// Checks a `<ident>.<name>(...)` call against call rules.
    ///
    /// Calls whose callee is not a selector produce no diagnostics.
    #[must_use]
    pub fn check_call(&self, call: &CallExpr) -> Vec<Diagnostic> {
        match call.callee_selector() {
            Some(selector) => self.check(selector, &self.call_rules, call.pos),
            None => Vec::new(),
        }
    }

    fn check(
        &self,
        selector: &SelectorExpr,
        rules: &[&'a Rule],
        pos: Position,
    ) -> Vec<Diagnostic> {
        if rules.is_empty() {
            return Vec::new();
        }
        let Some(qualifier) = selector.qualifier_ident() else {
            return Vec::new();
        };
        let Some(import_path) = self.aliases.resolve(qualifier) else {
            return Vec::new();
        };

        rules
            .iter()
            .filter(|rule| rule.matches(&selector.name, import_path))
            .map(|rule| {
                Diagnostic::new(self.file, pos, rule.kind(), self.package, rule.message())
            })
            .collect()
    }

    /// Checks every selector and call node of `file`, returning hits sorted
    /// by position.
    #[must_use]
    pub fn check_file(&self, file: &SourceFile) -> Vec<Diagnostic> {
        if self.struct_rules.is_empty() && self.call_rules.is_empty() {
            return Vec::new();
        }
        let mut visitor = UsageVisitor {
            matcher: self,
            diagnostics: Vec::new(),
        };
        visitor.visit_file(file);

        let mut diagnostics = visitor.diagnostics;
        diagnostics.sort_by_key(|d| d.position);
        diagnostics
    }
}

/// Builds the alias table for `file` and checks it against `rules`.
#[must_use]
pub fn check_file(package: &str, file: &SourceFile, rules: &[&Rule]) -> Vec<Diagnostic> {
    if rules.is_empty() {
        return Vec::new();
    }
    let aliases = ImportAliasTable::from_imports(&file.imports);
    let diagnostics = UsageMatcher::new(package, &file.path, &aliases, rules).check_file(file);
    tracing::debug!(
        file = %file.path.display(),
        aliases = aliases.len(),
        hits = diagnostics.len(),
        "File checked"
    );
    diagnostics
}

struct UsageVisitor<'m, 'a> {
    matcher: &'m UsageMatcher<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'ast> Visit<'ast> for UsageVisitor<'_, '_> {
    fn visit_selector(&mut self, selector: &'ast SelectorExpr) {
        self.diagnostics.extend(self.matcher.check_selector(selector));
        visit::walk_selector(self, selector);
    }

    // The callee goes first so that a struct hit on the callee selector is
    // reported before the call hit at the same position.
    fn visit_call(&mut self, call: &'ast CallExpr) {
        self.visit_node(&call.callee);
        self.diagnostics.extend(self.matcher.check_call(call));
        for arg in &call.args {
            self.visit_node(arg);
        }
    }
}
