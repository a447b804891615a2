//! Markdown → document tree.
//!
//! The document is scanned line by line as a flat sequence of blocks. Each
//! block gets a structural level and becomes a child of the nearest open
//! container whose level is strictly smaller:
//!
//! | Block | Level |
//! |---|---|
//! | root | 0 |
//! | `#`..`######` heading | number of `#` |
//! | anything else | 7 + indentation columns |
//!
//! Only containers (root, sections, list items) stay open; leaves never adopt
//! later blocks. Prose is not a node of its own: it is appended to the body
//! of the owning section/root or to the text of the owning list item.
//!
//! A bad block never aborts the document. It degrades to one error-marker
//! leaf carrying the raw text, and scanning resumes with the next line.

use super::syntax::{self, BlockStart, BODY_LEVEL};
use super::{DiagnosticKind, ParseDiagnostic, ParsedDocument};
use crate::config::ParserConfig;
use crate::models::{derive_node_id, Alignment, Node, NodeId, Payload, StatItem, Tree};
use crate::styles::{style_of, MarkupGrammar};
use std::collections::HashMap;

/// Node under construction; ids are assigned once the content is final
#[derive(Debug)]
struct Draft {
    payload: Payload,
    children: Vec<usize>,
    line: usize,
}

/// An open container on the nesting stack
#[derive(Debug, Clone, Copy)]
struct Open {
    draft: usize,
    level: usize,
}

/// Parse markup into a tree with default settings
pub fn parse(markup: &str) -> Tree {
    parse_document(markup, &ParserConfig::default()).tree
}

/// Parse markup, returning the tree plus diagnostics and source lines
pub fn parse_document(markup: &str, config: &ParserConfig) -> ParsedDocument {
    let lines: Vec<&str> = markup.lines().collect();
    let mut parser = Parser {
        lines: &lines,
        tab_width: config.tab_width.max(1),
        drafts: vec![Draft {
            payload: Payload::Root {
                body: String::new(),
            },
            children: Vec::new(),
            line: 0,
        }],
        stack: vec![Open { draft: 0, level: 0 }],
        prose_owner: None,
        diagnostics: Vec::new(),
    };
    parser.run();

    let malformed = parser
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::BlockMalformed)
        .count();
    tracing::debug!(
        lines = lines.len(),
        nodes = parser.drafts.len(),
        malformed,
        "Parsed markdown document"
    );

    let (tree, source_lines) = finalize(parser.drafts);
    ParsedDocument {
        tree,
        diagnostics: parser.diagnostics,
        source_lines,
    }
}

struct Parser<'a> {
    lines: &'a [&'a str],
    tab_width: usize,
    drafts: Vec<Draft>,
    stack: Vec<Open>,
    /// Container whose prose the previous line extended (lazy continuation)
    prose_owner: Option<usize>,
    diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> Parser<'a> {
    fn run(&mut self) {
        let mut i = 0;
        while i < self.lines.len() {
            let line = self.lines[i];
            if line.trim().is_empty() {
                self.prose_owner = None;
                i += 1;
                continue;
            }

            let (columns, bytes) = self.indentation(line);
            let content = &line[bytes..];
            let level = BODY_LEVEL + columns;

            i = match syntax::classify(content) {
                Some(BlockStart::Heading { level, title }) => {
                    let id = self.open_container(
                        level,
                        i,
                        Payload::Section {
                            title: title.trim().to_string(),
                            body: String::new(),
                        },
                    );
                    self.prose_owner = Some(id);
                    i + 1
                }
                Some(BlockStart::ListItem {
                    ordered,
                    checked,
                    text,
                    ..
                }) => {
                    let id = self.open_container(
                        level,
                        i,
                        Payload::ListItem {
                            text: syntax::unescape_item_text(text.trim()).to_string(),
                            ordered,
                            checked,
                        },
                    );
                    self.prose_owner = Some(id);
                    i + 1
                }
                Some(BlockStart::CodeFence { fence, len, info }) => {
                    self.fenced_code(i, columns, fence, len, info)
                }
                Some(BlockStart::MathFence) => self.math_block(i, columns),
                Some(BlockStart::Directive {
                    colons,
                    name,
                    attrs,
                }) => self.directive(i, columns, colons, name, attrs),
                Some(BlockStart::Quote) => self.blockquote(i),
                Some(BlockStart::TableRow) => self.table(i, columns),
                None => {
                    self.prose(level, syntax::unescape_prose(content.trim()));
                    i + 1
                }
            };
        }
    }

    /// Indentation of `line` as (columns, bytes)
    fn indentation(&self, line: &str) -> (usize, usize) {
        let mut columns = 0;
        let mut bytes = 0;
        for c in line.chars() {
            match c {
                ' ' => columns += 1,
                '\t' => columns += self.tab_width,
                _ => break,
            }
            bytes += 1;
        }
        (columns, bytes)
    }

    /// Strip at most `columns` columns of indentation from a content line
    fn strip_indent<'l>(&self, line: &'l str, columns: usize) -> &'l str {
        let mut used = 0;
        let mut bytes = 0;
        for c in line.chars() {
            let width = match c {
                ' ' => 1,
                '\t' => self.tab_width,
                _ => break,
            };
            if used + width > columns {
                break;
            }
            used += width;
            bytes += 1;
        }
        &line[bytes..]
    }

    /// Pop containers at `level` or deeper and return the parent draft
    fn parent_for(&mut self, level: usize) -> usize {
        while self.stack.len() > 1 && self.stack.last().is_some_and(|open| open.level >= level) {
            self.stack.pop();
        }
        self.stack.last().map_or(0, |open| open.draft)
    }

    fn add_draft(&mut self, parent: usize, line: usize, payload: Payload) -> usize {
        let id = self.drafts.len();
        self.drafts.push(Draft {
            payload,
            children: Vec::new(),
            line,
        });
        self.drafts[parent].children.push(id);
        id
    }

    fn open_container(&mut self, level: usize, line: usize, payload: Payload) -> usize {
        let parent = self.parent_for(level);
        let id = self.add_draft(parent, line, payload);
        self.stack.push(Open { draft: id, level });
        id
    }

    fn add_leaf(&mut self, level: usize, line: usize, payload: Payload) {
        let parent = self.parent_for(level);
        if let Payload::Malformed { reason, .. } = &payload {
            tracing::warn!(line = line + 1, reason = %reason, "Malformed markdown block");
            self.diagnostics.push(ParseDiagnostic {
                line: line + 1,
                kind: DiagnosticKind::BlockMalformed,
                message: reason.clone(),
            });
        }
        self.add_draft(parent, line, payload);
        self.prose_owner = None;
    }

    fn malformed(&mut self, level: usize, line: usize, reason: &str, raw: String) {
        self.add_leaf(
            level,
            line,
            Payload::Malformed {
                reason: reason.to_string(),
                raw,
            },
        );
    }

    /// Append a prose line to its owner's body or item text
    fn prose(&mut self, level: usize, text: &str) {
        let (owner, separator) = match self.prose_owner {
            Some(owner) => (owner, "\n"),
            None => (self.parent_for(level), "\n\n"),
        };
        let target = match &mut self.drafts[owner].payload {
            Payload::Root { body } | Payload::Section { body, .. } => body,
            Payload::ListItem { text, .. } => text,
            // Only containers are ever open or prose owners
            _ => return,
        };
        if !target.is_empty() {
            target.push_str(separator);
        }
        target.push_str(text);
        self.prose_owner = Some(owner);
    }

    /// Collect content lines up to a closing line; `None` if never closed
    fn collect_until(
        &self,
        start: usize,
        columns: usize,
        is_close: impl Fn(&str) -> bool,
    ) -> Option<(Vec<&'a str>, usize)> {
        let mut content = Vec::new();
        for j in (start + 1)..self.lines.len() {
            let line = self.lines[j];
            if is_close(line) {
                return Some((content, j + 1));
            }
            content.push(self.strip_indent(line, columns));
        }
        None
    }

    fn fenced_code(&mut self, i: usize, columns: usize, fence: char, len: usize, info: &str) -> usize {
        let level = BODY_LEVEL + columns;
        match self.collect_until(i, columns, |line| syntax::is_closing_run(line, fence, len)) {
            Some((content, next)) => {
                let language = (!info.is_empty()).then(|| info.to_string());
                self.add_leaf(
                    level,
                    i,
                    Payload::Code {
                        language,
                        code: content.join("\n"),
                    },
                );
                next
            }
            None => {
                let raw = self.lines[i].trim().to_string();
                self.malformed(level, i, "unterminated code fence", raw);
                i + 1
            }
        }
    }

    fn math_block(&mut self, i: usize, columns: usize) -> usize {
        let level = BODY_LEVEL + columns;
        match self.collect_until(i, columns, |line| line.trim() == "$$") {
            Some((content, next)) => {
                self.add_leaf(
                    level,
                    i,
                    Payload::Math {
                        tex: content.join("\n"),
                    },
                );
                next
            }
            None => {
                self.malformed(level, i, "unterminated math block", "$$".to_string());
                i + 1
            }
        }
    }

    fn directive(&mut self, i: usize, columns: usize, colons: usize, name: &str, attrs: &str) -> usize {
        let level = BODY_LEVEL + columns;
        let Some((content, next)) =
            self.collect_until(i, columns, |line| syntax::is_closing_run(line, ':', colons))
        else {
            let raw = self.lines[i].trim().to_string();
            self.malformed(level, i, "unterminated directive", raw);
            return i + 1;
        };

        let body = content.join("\n");
        let lowered = name.to_ascii_lowercase();
        if lowered == "error" {
            self.malformed(level, i, attrs, body);
            return next;
        }

        let payload = match style_of(crate::models::NodeType::from_directive(&lowered)).grammar {
            MarkupGrammar::Directive("chart") => Payload::Chart {
                attrs: attrs.to_string(),
                body,
            },
            MarkupGrammar::MathBlock if attrs.is_empty() => Payload::Math { tex: body },
            MarkupGrammar::Directive("stats") if attrs.is_empty() => match parse_stats(&content) {
                Ok(items) => Payload::Stats { items },
                Err(reason) => {
                    let raw = std::iter::once(self.lines[i].trim())
                        .chain(content.iter().copied())
                        .chain(std::iter::once(self.lines[next - 1].trim()))
                        .collect::<Vec<_>>()
                        .join("\n");
                    self.malformed(level, i, &reason, raw);
                    return next;
                }
            },
            _ => {
                self.diagnostics.push(ParseDiagnostic {
                    line: i + 1,
                    kind: DiagnosticKind::UnknownNodeType,
                    message: format!("directive '{}' kept as an opaque component", name),
                });
                Payload::Component {
                    name: name.to_string(),
                    attrs: attrs.to_string(),
                    body,
                }
            }
        };
        self.add_leaf(level, i, payload);
        next
    }

    fn blockquote(&mut self, i: usize) -> usize {
        let (columns, _) = self.indentation(self.lines[i]);
        let mut text_lines = Vec::new();
        let mut j = i;
        while j < self.lines.len() {
            let trimmed = self.lines[j].trim_start();
            let Some(rest) = trimmed.strip_prefix('>') else {
                break;
            };
            text_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
            j += 1;
        }
        self.add_leaf(
            BODY_LEVEL + columns,
            i,
            Payload::Blockquote {
                text: text_lines.join("\n"),
            },
        );
        j
    }

    fn table(&mut self, i: usize, columns: usize) -> usize {
        let level = BODY_LEVEL + columns;
        let mut rows = Vec::new();
        let mut j = i;
        while j < self.lines.len() && self.lines[j].trim_start().starts_with('|') {
            rows.push(self.lines[j].trim());
            j += 1;
        }

        match parse_table(&rows) {
            Ok(payload) => self.add_leaf(level, i, payload),
            Err(reason) => self.malformed(level, i, &reason, rows.join("\n")),
        }
        j
    }
}

fn parse_table(rows: &[&str]) -> Result<Payload, String> {
    let Some((header_row, rest)) = rows.split_first() else {
        return Err("empty table".to_string());
    };
    let Some((delimiter_row, body)) = rest.split_first() else {
        return Err("table without delimiter row".to_string());
    };

    let header = syntax::split_row(header_row);
    let delimiters = syntax::split_row(delimiter_row);
    if delimiters.len() != header.len() || !delimiters.iter().all(|c| syntax::is_delimiter_cell(c)) {
        return Err("invalid table delimiter row".to_string());
    }

    let alignments = delimiters
        .iter()
        .map(|cell| match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::None,
        })
        .collect();

    let mut table_rows = Vec::with_capacity(body.len());
    for row in body {
        let mut cells = syntax::split_row(row);
        if cells.len() > header.len() {
            return Err(format!(
                "table row has {} cells but the header has {}",
                cells.len(),
                header.len()
            ));
        }
        cells.resize(header.len(), String::new());
        table_rows.push(cells);
    }

    Ok(Payload::Table {
        header,
        alignments,
        rows: table_rows,
    })
}

fn parse_stats(lines: &[&str]) -> Result<Vec<StatItem>, String> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_once(':')
                .map(|(label, value)| StatItem {
                    label: label.trim().to_string(),
                    value: value.trim().to_string(),
                })
                .ok_or_else(|| format!("stats entry without ':' in '{}'", line.trim()))
        })
        .collect()
}

/// Assign deterministic ids (type + path + content) and build the arena
fn finalize(drafts: Vec<Draft>) -> (Tree, HashMap<NodeId, usize>) {
    let mut ids: Vec<NodeId> = vec![String::new(); drafts.len()];
    let mut parents: Vec<Option<usize>> = vec![None; drafts.len()];

    let mut stack: Vec<(usize, Vec<usize>)> = vec![(0, Vec::new())];
    while let Some((index, path)) = stack.pop() {
        let draft = &drafts[index];
        ids[index] = derive_node_id(draft.payload.node_type(), &path, &draft.payload);
        for (position, child) in draft.children.iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(position);
            parents[*child] = Some(index);
            stack.push((*child, child_path));
        }
    }

    let mut nodes = HashMap::with_capacity(drafts.len());
    let mut source_lines = HashMap::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let mut node = Node::new_with_id(ids[index].clone(), draft.payload);
        node.children = draft.children.iter().map(|c| ids[*c].clone()).collect();
        node.parent_id = parents[index].map(|p| ids[p].clone());
        source_lines.insert(node.id.clone(), draft.line + 1);
        nodes.insert(node.id.clone(), node);
    }

    (Tree::from_parts(ids[0].clone(), nodes), source_lines)
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod parser_test;
