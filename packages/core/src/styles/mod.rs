//! Node Style Registry
//!
//! Static lookup from node type to the metadata the rest of the engine needs:
//!
//! - `NodeCategory` - container, block or embed (drives default sizing and
//!   which types may hold children)
//! - `default_size` - fallback box when the measurer has no answer
//! - `MarkupGrammar` - which syntax the serializer emits for the type
//!
//! The registry is a pure table; it has no state and no side effects.

use crate::models::{NodeType, Size};

/// Broad rendering category of a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Holds other nodes (root, section, list item)
    Container,
    /// Self-contained text block (table, code, blockquote)
    Block,
    /// Opaque embedded payload (chart, math, stats, component)
    Embed,
}

/// Markup form a node type is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupGrammar {
    /// Document preamble, no marker of its own
    Document,
    /// `#` heading followed by body prose
    Heading,
    /// `-` / `1.` list item
    ListItem,
    /// Pipe table
    PipeTable,
    /// Backtick fence with language tag
    FencedCode,
    /// `>` prefixed lines
    Quote,
    /// `$$` fenced block
    MathBlock,
    /// `:::name` directive; the name is carried by the grammar
    Directive(&'static str),
    /// `:::name` directive whose name comes from the payload
    NamedDirective,
}

/// Rendering metadata for one node type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub node_type: NodeType,
    pub category: NodeCategory,
    pub default_size: Size,
    pub grammar: MarkupGrammar,
}

const fn style(
    node_type: NodeType,
    category: NodeCategory,
    width: f64,
    height: f64,
    grammar: MarkupGrammar,
) -> NodeStyle {
    NodeStyle {
        node_type,
        category,
        default_size: Size::new(width, height),
        grammar,
    }
}

static STYLES: [NodeStyle; 10] = [
    style(NodeType::Root, NodeCategory::Container, 200.0, 60.0, MarkupGrammar::Document),
    style(NodeType::Section, NodeCategory::Container, 180.0, 48.0, MarkupGrammar::Heading),
    style(NodeType::List, NodeCategory::Container, 160.0, 32.0, MarkupGrammar::ListItem),
    style(NodeType::Table, NodeCategory::Block, 240.0, 120.0, MarkupGrammar::PipeTable),
    style(NodeType::Code, NodeCategory::Block, 240.0, 96.0, MarkupGrammar::FencedCode),
    style(NodeType::Blockquote, NodeCategory::Block, 200.0, 64.0, MarkupGrammar::Quote),
    style(NodeType::Chart, NodeCategory::Embed, 240.0, 160.0, MarkupGrammar::Directive("chart")),
    style(NodeType::Math, NodeCategory::Embed, 160.0, 48.0, MarkupGrammar::MathBlock),
    style(NodeType::Stats, NodeCategory::Embed, 200.0, 80.0, MarkupGrammar::Directive("stats")),
    style(NodeType::Component, NodeCategory::Embed, 200.0, 80.0, MarkupGrammar::NamedDirective),
];

/// Look up the style entry for a node type
pub fn style_of(node_type: NodeType) -> &'static NodeStyle {
    let index = NodeType::ALL
        .iter()
        .position(|candidate| *candidate == node_type)
        .unwrap_or(STYLES.len() - 1);
    &STYLES[index]
}

impl NodeType {
    /// Map a `:::name` directive to its node type.
    ///
    /// `math` is accepted as a directive alias of the `$$` block. Unknown
    /// names become components.
    pub fn from_directive(name: &str) -> NodeType {
        let name = name.to_ascii_lowercase();
        if name == "math" {
            return NodeType::Math;
        }
        STYLES
            .iter()
            .find(|entry| matches!(entry.grammar, MarkupGrammar::Directive(n) if n == name))
            .map(|entry| entry.node_type)
            .unwrap_or(NodeType::Component)
    }

    pub fn category(&self) -> NodeCategory {
        style_of(*self).category
    }
}
