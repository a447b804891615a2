//! Markdown Conversion
//!
//! Two halves of one grammar:
//!
//! - [`parse`] / [`parse_document`] - markup → [`Tree`], never failing
//! - [`serialize`] - [`Tree`] → normalized markup
//!
//! For any markup `m`, `parse(serialize(parse(m)))` is structurally equal to
//! `parse(m)`.

mod parser;
mod serializer;
mod syntax;

pub use parser::{parse, parse_document};
pub use serializer::serialize;

use crate::models::{NodeId, Tree};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of problem found while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A block could not be read and was kept as an error marker
    BlockMalformed,
    /// A directive name the registry does not know; kept as a component
    UnknownNodeType,
}

/// One parse finding, tied to a 1-based source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Full parse output
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub tree: Tree,
    pub diagnostics: Vec<ParseDiagnostic>,
    /// 1-based line each node starts on (the root maps to 1)
    pub source_lines: HashMap<NodeId, usize>,
}

impl ParsedDocument {
    pub fn source_line(&self, id: &str) -> Option<usize> {
        self.source_lines.get(id).copied()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::BlockMalformed)
    }
}
