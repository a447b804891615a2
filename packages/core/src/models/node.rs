//! Node Data Structures
//!
//! This module defines the `Node` struct and its typed payloads.
//!
//! # Architecture
//!
//! - **Closed type set**: `NodeType` is a fixed enum; every node's type is
//!   derived from its `Payload` variant, so the two can never disagree
//! - **Arena storage**: nodes reference children by id, never by handle
//! - **Layout-owned fields**: `position` and `size` are written by the layout
//!   engine and ignored by structural comparison
//!
//! # Examples
//!
//! ```rust
//! use docmap_core::models::{Node, NodeType, Payload};
//!
//! let node = Node::new(Payload::Code {
//!     language: Some("rust".to_string()),
//!     code: "fn main() {}".to_string(),
//! });
//!
//! assert_eq!(node.node_type(), NodeType::Code);
//! assert!(node.children.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Node identifier.
///
/// Parsed nodes get deterministic UUID v5 strings; nodes created by commands
/// get random UUID v4 strings.
pub type NodeId = String;

/// Namespace for deterministic parse-time ids
const NODE_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_3c2a_8b4e_4f07_9a55_0c3e_d2b1_7a64);

/// Closed set of node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Root,
    Section,
    List,
    Table,
    Code,
    Blockquote,
    Chart,
    Math,
    Stats,
    Component,
}

impl NodeType {
    /// All node types in declaration order
    pub const ALL: [NodeType; 10] = [
        NodeType::Root,
        NodeType::Section,
        NodeType::List,
        NodeType::Table,
        NodeType::Code,
        NodeType::Blockquote,
        NodeType::Chart,
        NodeType::Math,
        NodeType::Stats,
        NodeType::Component,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Section => "section",
            NodeType::List => "list",
            NodeType::Table => "table",
            NodeType::Code => "code",
            NodeType::Blockquote => "blockquote",
            NodeType::Chart => "chart",
            NodeType::Math => "math",
            NodeType::Stats => "stats",
            NodeType::Component => "component",
        }
    }

    /// Whether a node of type `child` may be placed under a node of this type
    ///
    /// Only containers hold children. Sections may only hang off the root or
    /// other sections because a heading cannot be expressed inside a list item.
    pub fn accepts_child(&self, child: NodeType) -> bool {
        match (self, child) {
            (_, NodeType::Root) => false,
            (NodeType::Root, _) | (NodeType::Section, _) => true,
            (NodeType::List, NodeType::Section) => false,
            (NodeType::List, _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column alignment of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// One `label: value` entry of a stats block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatItem {
    pub label: String,
    pub value: String,
}

/// Type-specific node content.
///
/// The variant determines the node type. `Malformed` is the error marker a
/// bad block degrades to; it is typed as a component so it stays an opaque
/// leaf in the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Payload {
    Root {
        body: String,
    },
    Section {
        title: String,
        body: String,
    },
    ListItem {
        text: String,
        ordered: bool,
        checked: Option<bool>,
    },
    Table {
        header: Vec<String>,
        alignments: Vec<Alignment>,
        rows: Vec<Vec<String>>,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    Blockquote {
        text: String,
    },
    Chart {
        attrs: String,
        body: String,
    },
    Math {
        tex: String,
    },
    Stats {
        items: Vec<StatItem>,
    },
    Component {
        name: String,
        attrs: String,
        body: String,
    },
    Malformed {
        reason: String,
        raw: String,
    },
}

impl Payload {
    pub fn node_type(&self) -> NodeType {
        match self {
            Payload::Root { .. } => NodeType::Root,
            Payload::Section { .. } => NodeType::Section,
            Payload::ListItem { .. } => NodeType::List,
            Payload::Table { .. } => NodeType::Table,
            Payload::Code { .. } => NodeType::Code,
            Payload::Blockquote { .. } => NodeType::Blockquote,
            Payload::Chart { .. } => NodeType::Chart,
            Payload::Math { .. } => NodeType::Math,
            Payload::Stats { .. } => NodeType::Stats,
            Payload::Component { .. } | Payload::Malformed { .. } => NodeType::Component,
        }
    }

    /// Whether this payload is an error marker produced by the parser
    pub fn is_malformed(&self) -> bool {
        matches!(self, Payload::Malformed { .. })
    }

    /// The primary editable text of the payload.
    ///
    /// Tables and stats have no single text field; they render their cells and
    /// entries as lines instead.
    pub fn text(&self) -> String {
        match self {
            Payload::Root { body } => body.clone(),
            Payload::Section { title, .. } => title.clone(),
            Payload::ListItem { text, .. } | Payload::Blockquote { text } => text.clone(),
            Payload::Table { header, rows, .. } => std::iter::once(header)
                .chain(rows.iter())
                .map(|row| row.join(" | "))
                .collect::<Vec<_>>()
                .join("\n"),
            Payload::Code { code, .. } => code.clone(),
            Payload::Chart { body, .. } | Payload::Component { body, .. } => body.clone(),
            Payload::Math { tex } => tex.clone(),
            Payload::Stats { items } => items
                .iter()
                .map(|item| format!("{}: {}", item.label, item.value))
                .collect::<Vec<_>>()
                .join("\n"),
            Payload::Malformed { raw, .. } => raw.clone(),
        }
    }

    /// Return a copy of this payload with its primary text replaced.
    ///
    /// Returns `None` for tables and stats, whose content is structured and
    /// has to be replaced as a whole payload.
    pub fn with_text(&self, new_text: impl Into<String>) -> Option<Payload> {
        let new_text = new_text.into();
        let mut payload = self.clone();
        match &mut payload {
            Payload::Root { body } => *body = new_text,
            Payload::Section { title, .. } => *title = new_text,
            Payload::ListItem { text, .. } | Payload::Blockquote { text } => *text = new_text,
            Payload::Code { code, .. } => *code = new_text,
            Payload::Chart { body, .. } | Payload::Component { body, .. } => *body = new_text,
            Payload::Math { tex } => *tex = new_text,
            Payload::Malformed { raw, .. } => *raw = new_text,
            Payload::Table { .. } | Payload::Stats { .. } => return None,
        }
        Some(payload)
    }
}

impl Payload {
    /// Check that the payload has a markdown form that reads back unchanged.
    ///
    /// Parsed payloads always pass. Payloads built by hand must keep
    /// one-line fields (titles, languages, attrs, reasons, cells, stats
    /// entries) on one line without surrounding whitespace, keep prose
    /// trimmed with single blank lines between paragraphs, and give
    /// components a directive name no other block type claims.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Payload::Root { body } => prose("body", body),
            Payload::Section { title, body } => {
                single_line("title", title)?;
                prose("body", body)
            }
            Payload::ListItem { text, .. } => prose("text", text),
            Payload::Table {
                header,
                alignments,
                rows,
            } => {
                if header.is_empty() {
                    return Err("table header must have at least one column".to_string());
                }
                if alignments.len() != header.len() {
                    return Err(format!(
                        "table has {} alignments for {} columns",
                        alignments.len(),
                        header.len()
                    ));
                }
                if let Some(row) = rows.iter().find(|row| row.len() != header.len()) {
                    return Err(format!(
                        "table row has {} cells for {} columns",
                        row.len(),
                        header.len()
                    ));
                }
                header
                    .iter()
                    .chain(rows.iter().flatten())
                    .try_for_each(|cell| single_line("table cell", cell))
            }
            Payload::Code { language, code } => {
                if let Some(language) = language {
                    if language.is_empty() {
                        return Err("empty code language; use no language instead".to_string());
                    }
                    single_line("code language", language)?;
                }
                verbatim("code", code)
            }
            Payload::Blockquote { text } => verbatim("quote", text),
            Payload::Chart { attrs, body } => {
                directive_line("chart attrs", attrs)?;
                verbatim("chart body", body)
            }
            Payload::Math { tex } => verbatim("math", tex),
            Payload::Stats { items } => items.iter().try_for_each(|item| {
                single_line("stats label", &item.label)?;
                single_line("stats value", &item.value)?;
                if item.label.contains(':') {
                    return Err(format!("stats label '{}' contains ':'", item.label));
                }
                Ok(())
            }),
            Payload::Component { name, attrs, body } => {
                component_name(name, attrs)?;
                directive_line("component attrs", attrs)?;
                verbatim("component body", body)
            }
            Payload::Malformed { reason, raw } => {
                directive_line("error reason", reason)?;
                verbatim("error text", raw)
            }
        }
    }
}

fn single_line(field: &str, value: &str) -> Result<(), String> {
    if value.contains('\n') {
        return Err(format!("{} must be a single line", field));
    }
    if value.trim() != value {
        return Err(format!("{} must not start or end with whitespace", field));
    }
    Ok(())
}

/// Text after a directive name; only spaces and tabs separate it from the name
fn directive_line(field: &str, value: &str) -> Result<(), String> {
    if value.contains('\n') {
        return Err(format!("{} must be a single line", field));
    }
    if value.trim_end() != value || value.starts_with([' ', '\t']) {
        return Err(format!("{} must not start or end with whitespace", field));
    }
    Ok(())
}

fn verbatim(field: &str, value: &str) -> Result<(), String> {
    if value.contains("\r\n") || value.ends_with('\r') {
        return Err(format!("{} must not end a line with a carriage return", field));
    }
    Ok(())
}

/// Trimmed lines, paragraphs separated by exactly one blank line
fn prose(field: &str, value: &str) -> Result<(), String> {
    verbatim(field, value)?;
    if value.trim() != value {
        return Err(format!("{} must not start or end with whitespace", field));
    }
    let mut previous_blank = false;
    for line in value.split('\n') {
        if line.trim() != line {
            return Err(format!("{} lines must not start or end with whitespace", field));
        }
        if line.is_empty() && previous_blank {
            return Err(format!("{} must not contain consecutive blank lines", field));
        }
        previous_blank = line.is_empty();
    }
    Ok(())
}

/// Component names follow the directive grammar and stay clear of the
/// names that read back as charts, math, stats or error markers
fn component_name(name: &str, attrs: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !well_formed {
        return Err(format!("'{}' is not a valid directive name", name));
    }
    if name.eq_ignore_ascii_case("error") {
        return Err("component name 'error' is reserved for error markers".to_string());
    }
    match NodeType::from_directive(name) {
        NodeType::Component => Ok(()),
        NodeType::Math | NodeType::Stats if !attrs.is_empty() => Ok(()),
        claimed => Err(format!("component name '{}' reads back as {}", name, claimed)),
    }
}

/// Point in layout space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

/// Width/height pair reported by a measurer or the style registry
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A node of the document tree.
///
/// # Fields
///
/// - `id`: stable identifier, see [`NodeId`]
/// - `payload`: typed content; determines [`Node::node_type`]
/// - `children`: ordered child ids (document order)
/// - `parent_id`: back reference kept in sync with the parent's `children`
/// - `position`/`size`: written by layout, never part of identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    pub payload: Payload,

    #[serde(default)]
    pub children: Vec<NodeId>,

    #[serde(default)]
    pub parent_id: Option<NodeId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LayoutPoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl Node {
    /// Create a detached node with a fresh random id
    pub fn new(payload: Payload) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), payload)
    }

    /// Create a detached node with an explicit id
    pub fn new_with_id(id: impl Into<NodeId>, payload: Payload) -> Self {
        Self {
            id: id.into(),
            payload,
            children: Vec::new(),
            parent_id: None,
            position: None,
            size: None,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.payload.node_type()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Compute the deterministic id of a parsed node.
///
/// The id hashes the node type, its structural path (child indices from the
/// root) and its content, so re-parsing the same markup yields the same ids.
pub fn derive_node_id(node_type: NodeType, path: &[usize], payload: &Payload) -> NodeId {
    let path_key = path
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(".");
    let content = serde_json::to_string(payload).unwrap_or_else(|_| payload.text());
    let name = format!("{}|{}|{}", node_type, path_key, content);
    Uuid::new_v5(&NODE_ID_NAMESPACE, name.as_bytes()).to_string()
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
