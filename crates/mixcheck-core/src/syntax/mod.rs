//! Syntax interchange model produced by an external front end.
//!
//! mixcheck never parses source text. A front end walks its own syntax tree
//! and emits the closed node set below, plus each file's import specs, as a
//! JSON syntax dump:
//!
//! ```text
//! SyntaxDump
//!   └── PackageUnit { path, files }
//!         └── SourceFile { path, imports, nodes }
//!               └── Node = Ident | Selector | Call | Other
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod visit;

pub use visit::Visit;

/// A position in a source file (1-indexed line and column).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A bare identifier, e.g. `sort`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    /// Identifier text.
    pub name: String,
    /// Start position.
    #[serde(default)]
    pub pos: Position,
}

/// A qualified reference `<qualifier>.<name>`, e.g. `c.CDA` or `sort.Ints`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorExpr {
    /// The expression before the dot.
    pub qualifier: Box<Node>,
    /// The selected identifier.
    pub name: String,
    /// Start position of the whole selector.
    #[serde(default)]
    pub pos: Position,
}

impl SelectorExpr {
    /// Returns the qualifier identifier when it is a bare identifier.
    #[must_use]
    pub fn qualifier_ident(&self) -> Option<&str> {
        match self.qualifier.as_ref() {
            Node::Ident(ident) => Some(&ident.name),
            _ => None,
        }
    }
}

/// A call `<callee>(<args>)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallExpr {
    /// The called expression.
    pub callee: Box<Node>,
    /// Call arguments.
    #[serde(default)]
    pub args: Vec<Node>,
    /// Start position of the call.
    #[serde(default)]
    pub pos: Position,
}

impl CallExpr {
    /// Returns the callee when it is a selector expression.
    #[must_use]
    pub fn callee_selector(&self) -> Option<&SelectorExpr> {
        match self.callee.as_ref() {
            Node::Selector(selector) => Some(selector),
            _ => None,
        }
    }
}

/// Any other node kind. Only its children are relevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherNode {
    /// Front-end specific node label, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Child nodes.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Start position.
    #[serde(default)]
    pub pos: Position,
}

/// The closed set of node shapes the checker distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Bare identifier.
    Ident(Ident),
    /// Qualified reference.
    Selector(SelectorExpr),
    /// Call expression.
    Call(CallExpr),
    /// Anything else.
    Other(OtherNode),
}

impl Node {
    /// Builds an identifier node.
    #[must_use]
    pub fn ident(name: impl Into<String>, pos: Position) -> Self {
        Self::Ident(Ident {
            name: name.into(),
            pos,
        })
    }

    /// Builds a selector node.
    #[must_use]
    pub fn selector(qualifier: Node, name: impl Into<String>, pos: Position) -> Self {
        Self::Selector(SelectorExpr {
            qualifier: Box::new(qualifier),
            name: name.into(),
            pos,
        })
    }

    /// Builds a call node.
    #[must_use]
    pub fn call(callee: Node, args: Vec<Node>, pos: Position) -> Self {
        Self::Call(CallExpr {
            callee: Box::new(callee),
            args,
            pos,
        })
    }

    /// Builds an opaque node with children.
    #[must_use]
    pub fn other(children: Vec<Node>, pos: Position) -> Self {
        Self::Other(OtherNode {
            label: None,
            children,
            pos,
        })
    }
}

/// One import declaration of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Explicit alias, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Import path, possibly still quoted as written in source.
    pub path: String,
}

impl ImportSpec {
    /// Creates an import without alias.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
        }
    }

    /// Creates an aliased import.
    #[must_use]
    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            path: path.into(),
        }
    }
}

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path as reported in diagnostics.
    pub path: PathBuf,
    /// Import declarations.
    #[serde(default)]
    pub imports: Vec<ImportSpec>,
    /// Top-level syntax nodes.
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// A package: the unit rules are resolved for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUnit {
    /// `/`-delimited package path, e.g. `a/c` or `a/c_test`.
    pub path: String,
    /// Files of the package.
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

/// The document an external front end hands to the checker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxDump {
    /// Packages to check.
    #[serde(default)]
    pub packages: Vec<PackageUnit>,
}

impl SyntaxDump {
    /// Reads a JSON syntax dump from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn from_file(path: &Path) -> Result<Self, SyntaxError> {
        let content = std::fs::read_to_string(path).map_err(|e| SyntaxError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content).map_err(|e| match e {
            SyntaxError::Decode { message, .. } => SyntaxError::Decode {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Decodes a JSON syntax dump.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the interchange model.
    pub fn from_json(content: &str) -> Result<Self, SyntaxError> {
        serde_json::from_str(content).map_err(|e| SyntaxError::Decode {
            path: None,
            message: e.to_string(),
        })
    }

    /// Total number of files across packages.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.packages.iter().map(|p| p.files.len()).sum()
    }
}

/// Errors reading syntax dumps.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    /// IO error reading a dump.
    #[error("Failed to read syntax dump {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The dump is not valid interchange JSON.
    #[error("Failed to decode syntax dump{}: {message}", describe(.path.as_deref()))]
    Decode {
        /// Dump path, when read from disk.
        path: Option<PathBuf>,
        /// Decoder message.
        message: String,
    },
}

fn describe(path: Option<&Path>) -> String {
    path.map(|p| format!(" {}", p.display())).unwrap_or_default()
}
