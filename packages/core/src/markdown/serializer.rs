//! Document tree → markdown.
//!
//! Structural inverse of the parser. Nesting is re-encoded the way the parser
//! reads it back: heading depth for sections, indentation to the item content
//! column for anything under a list item. Output is normalized (list markers,
//! numbering, blank lines, fence lengths), never lossy.

use super::syntax;
use crate::models::{Alignment, NodeId, NodeType, Payload, Tree};
use crate::styles::{style_of, MarkupGrammar};

/// Serialize the whole document
pub fn serialize(tree: &Tree) -> String {
    let mut writer = Writer {
        tree,
        lines: Vec::new(),
        after_item: false,
    };

    if let Payload::Root { body } = &tree.root().payload {
        writer.prose(body, 0);
    }
    writer.children(tree.root_id(), 0);

    let mut output = writer.lines.join("\n");
    output.push('\n');
    output
}

struct Writer<'t> {
    tree: &'t Tree,
    lines: Vec<String>,
    /// The last thing written was list item text, so a following item
    /// needs no blank line
    after_item: bool,
}

impl<'t> Writer<'t> {
    fn push(&mut self, indent: usize, line: &str) {
        if line.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", " ".repeat(indent), line));
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn prose(&mut self, text: &str, indent: usize) {
        self.prose_lines(text.trim().lines(), indent);
    }

    /// Prose lines, trimmed and escaped; empty lines become paragraph breaks
    fn prose_lines<'l>(&mut self, lines: impl Iterator<Item = &'l str>, indent: usize) {
        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                self.blank();
            } else {
                self.push(indent, &syntax::escape_prose(line));
            }
        }
    }

    fn children(&mut self, parent_id: &NodeId, indent: usize) {
        let mut ordinal = 0;
        for child_id in self.tree.children_of(parent_id) {
            let ordered = matches!(
                self.tree.get(child_id).map(|n| &n.payload),
                Some(Payload::ListItem { ordered: true, .. })
            );
            ordinal = if ordered { ordinal + 1 } else { 0 };
            self.node(child_id, indent, ordinal);
        }
    }

    fn node(&mut self, id: &NodeId, indent: usize, ordinal: usize) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        let is_item = node.node_type() == NodeType::List;
        if !(is_item && self.after_item) {
            self.blank();
        }
        self.after_item = false;

        match &node.payload {
            Payload::Root { body } => self.prose(body, indent),
            Payload::Section { title, body } => {
                let level = (self.tree.section_depth(id) + 1).min(syntax::MAX_HEADING_LEVEL);
                let title = single_line(title);
                self.push(0, format!("{} {}", "#".repeat(level), title).trim_end());
                self.prose(body, 0);
                self.children(id, 0);
            }
            Payload::ListItem {
                text,
                ordered,
                checked,
            } => {
                let marker = if *ordered {
                    format!("{}.", ordinal.max(1))
                } else {
                    "-".to_string()
                };
                let content_indent = indent + marker.len() + 1;
                let mut text_lines = text.trim().lines();
                let first = text_lines.next().unwrap_or("").trim();
                let mut head = marker;
                match checked {
                    Some(true) => head.push_str(" [x]"),
                    Some(false) => head.push_str(" [ ]"),
                    None => {}
                }
                if !first.is_empty() {
                    head.push(' ');
                    head.push_str(&syntax::escape_item_text(first));
                }
                self.push(indent, &head);
                self.prose_lines(text_lines, content_indent);
                self.after_item = true;
                self.children(id, content_indent);
            }
            Payload::Table {
                header,
                alignments,
                rows,
            } => {
                self.push(indent, &table_row(header));
                let delimiters: Vec<String> = (0..header.len())
                    .map(|col| {
                        match alignments.get(col).copied().unwrap_or_default() {
                            Alignment::None => "---",
                            Alignment::Left => ":---",
                            Alignment::Center => ":---:",
                            Alignment::Right => "---:",
                        }
                        .to_string()
                    })
                    .collect();
                self.push(indent, &format!("| {} |", delimiters.join(" | ")));
                for row in rows {
                    let mut cells = row.clone();
                    cells.resize(header.len(), String::new());
                    self.push(indent, &table_row(&cells));
                }
            }
            Payload::Code { language, code } => {
                let run = code
                    .lines()
                    .map(|line| syntax::leading_run(line, '`'))
                    .max()
                    .unwrap_or(0);
                let fence = "`".repeat((run + 1).max(3));
                let info = language.as_deref().unwrap_or("").trim();
                let gap = if info.starts_with('`') { " " } else { "" };
                self.push(indent, format!("{}{}{}", fence, gap, info).trim_end());
                self.verbatim(code, indent);
                self.push(indent, &fence);
            }
            Payload::Blockquote { text } => {
                for line in text.split('\n') {
                    if line.is_empty() {
                        self.push(indent, ">");
                    } else {
                        self.push(indent, &format!("> {}", line));
                    }
                }
            }
            Payload::Math { tex } if !tex.split('\n').any(|line| line.trim() == "$$") => {
                self.push(indent, "$$");
                self.verbatim(tex, indent);
                self.push(indent, "$$");
            }
            Payload::Math { tex } => self.directive("math", "", tex, indent),
            Payload::Chart { attrs, body } => {
                let name = directive_name(NodeType::Chart).unwrap_or("chart");
                self.directive(name, attrs, body, indent);
            }
            Payload::Stats { items } => {
                let body = items
                    .iter()
                    .map(|item| format!("{}: {}", item.label, item.value))
                    .collect::<Vec<_>>()
                    .join("\n");
                let name = directive_name(NodeType::Stats).unwrap_or("stats");
                self.directive(name, "", &body, indent);
            }
            Payload::Component { name, attrs, body } => self.directive(name, attrs, body, indent),
            Payload::Malformed { reason, raw } => {
                self.directive("error", reason, raw, indent);
            }
        }
    }

    /// Content lines written as-is below the block's indentation
    fn verbatim(&mut self, content: &str, indent: usize) {
        for line in content.split('\n') {
            self.push(indent, line);
        }
    }

    fn directive(&mut self, name: &str, attrs: &str, body: &str, indent: usize) {
        let run = body
            .split('\n')
            .map(|line| syntax::leading_run(line, ':'))
            .max()
            .unwrap_or(0);
        let fence = ":".repeat((run + 1).max(3));
        let attrs = single_line(attrs);
        self.push(indent, format!("{}{} {}", fence, name, attrs).trim_end());
        self.verbatim(body, indent);
        self.push(indent, &fence);
    }
}

fn table_row(cells: &[String]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| syntax::escape_cell(c)).collect();
    format!("| {} |", cells.join(" | "))
}

/// Fold a multi-line value onto one line
fn single_line(value: &str) -> String {
    value
        .split('\n')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Directive name the style registry assigns to a type
fn directive_name(node_type: NodeType) -> Option<&'static str> {
    match style_of(node_type).grammar {
        MarkupGrammar::Directive(name) => Some(name),
        _ => None,
    }
}

#[cfg(test)]
#[path = "serializer_test.rs"]
mod serializer_test;
