//! Line-level markdown syntax shared by the parser and the serializer.
//!
//! The serializer must never write a prose line that the parser would read as
//! a block start, so both sides classify lines with the same function and use
//! the same backslash escape.

use regex::Regex;
use std::sync::OnceLock;

/// Deepest heading level the grammar knows
pub(crate) const MAX_HEADING_LEVEL: usize = 6;

/// Structural level of every non-heading block at indentation zero
pub(crate) const BODY_LEVEL: usize = MAX_HEADING_LEVEL + 1;

/// What a (left-trimmed) line opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockStart<'a> {
    Heading {
        level: usize,
        title: &'a str,
    },
    ListItem {
        ordered: bool,
        checked: Option<bool>,
        text: &'a str,
        /// Bytes from the marker to the start of the item content
        content_offset: usize,
    },
    CodeFence {
        fence: char,
        len: usize,
        info: &'a str,
    },
    MathFence,
    Directive {
        colons: usize,
        name: &'a str,
        attrs: &'a str,
    },
    Quote,
    TableRow,
}

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})(?:[ \t]+(.*?))?[ \t]*$").expect("valid heading regex"))
}

fn ordered_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{1,9}[.)]").expect("valid ordered marker regex"))
}

fn directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(:{3,})[ \t]*([A-Za-z][A-Za-z0-9_.-]*)[ \t]*(.*?)[ \t]*$")
            .expect("valid directive regex")
    })
}

fn delimiter_cell_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^:?-+:?$").expect("valid delimiter regex"))
}

/// Classify a line with its indentation already removed
pub(crate) fn classify(line: &str) -> Option<BlockStart<'_>> {
    let line = line.trim_end();

    if line.starts_with('#') {
        if let Some(caps) = heading_regex().captures(line) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len());
            let title = caps.get(2).map_or("", |m| m.as_str());
            return Some(BlockStart::Heading { level, title });
        }
        return None;
    }

    if let Some(item) = list_item(line) {
        return Some(item);
    }

    if let Some(fence) = ["```", "~~~"].iter().find(|f| line.starts_with(*f)) {
        let fence = fence.chars().next().unwrap_or('`');
        let len = line.chars().take_while(|c| *c == fence).count();
        let info = line[len * fence.len_utf8()..].trim();
        return Some(BlockStart::CodeFence { fence, len, info });
    }

    if line == "$$" {
        return Some(BlockStart::MathFence);
    }

    if line.starts_with(":::") {
        if let Some(caps) = directive_regex().captures(line) {
            return Some(BlockStart::Directive {
                colons: caps.get(1).map_or(3, |m| m.as_str().len()),
                name: caps.get(2).map_or("", |m| m.as_str()),
                attrs: caps.get(3).map_or("", |m| m.as_str()),
            });
        }
        return None;
    }

    if line.starts_with('>') {
        return Some(BlockStart::Quote);
    }

    if line.starts_with('|') {
        return Some(BlockStart::TableRow);
    }

    None
}

fn list_item(line: &str) -> Option<BlockStart<'_>> {
    let (ordered, marker_len) = match line.chars().next()? {
        '-' | '*' | '+' => (false, 1),
        '0'..='9' => (true, ordered_marker_regex().find(line)?.end()),
        _ => return None,
    };

    let rest = &line[marker_len..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let content = rest.trim_start();
    let content_offset = line.len() - content.len();

    let (checked, text) = match checkbox(content) {
        Some((checked, after)) => (Some(checked), after),
        None => (None, content),
    };

    Some(BlockStart::ListItem {
        ordered,
        checked,
        text,
        content_offset,
    })
}

/// Split a leading `[ ]` / `[x]` task box off list item content
pub(crate) fn checkbox(content: &str) -> Option<(bool, &str)> {
    let checked = match content.get(..3)? {
        "[ ]" => false,
        "[x]" | "[X]" => true,
        _ => return None,
    };
    let after = &content[3..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return None;
    }
    Some((checked, after.trim_start()))
}

/// Whether `cell` is a table delimiter cell such as `---` or `:-:`
pub(crate) fn is_delimiter_cell(cell: &str) -> bool {
    delimiter_cell_regex().is_match(cell)
}

/// Length of the run of `ch` at the start of `line` after indentation
pub(crate) fn leading_run(line: &str, ch: char) -> usize {
    line.trim_start().chars().take_while(|c| *c == ch).count()
}

/// Whether `line` consists only of at least `min` copies of `ch`
pub(crate) fn is_closing_run(line: &str, ch: char, min: usize) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == ch) && trimmed.chars().count() >= min
}

// ----------------------------------------------------------------------------
// Escaping
// ----------------------------------------------------------------------------

/// Remove a protective backslash from a prose line
pub(crate) fn unescape_prose(line: &str) -> &str {
    match line.strip_prefix('\\') {
        Some(rest) if classify(rest).is_some() || rest.starts_with('\\') => rest,
        _ => line,
    }
}

/// Protect a prose line from being read back as a block start
pub(crate) fn escape_prose(line: &str) -> String {
    if classify(line).is_some() || unescape_prose(line) != line {
        format!("\\{}", line)
    } else {
        line.to_string()
    }
}

/// Remove a protective backslash from the first line of a list item
pub(crate) fn unescape_item_text(text: &str) -> &str {
    match text.strip_prefix('\\') {
        Some(rest) if checkbox(rest).is_some() || rest.starts_with('\\') => rest,
        _ => text,
    }
}

/// Protect list item text that would be read back as a task box
pub(crate) fn escape_item_text(text: &str) -> String {
    if checkbox(text).is_some() || unescape_item_text(text) != text {
        format!("\\{}", text)
    } else {
        text.to_string()
    }
}

/// Split a pipe-table row into trimmed cells, honouring `\|`
pub(crate) fn split_row(row: &str) -> Vec<String> {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = match row.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => row,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells.into_iter().map(|cell| cell.trim().to_string()).collect()
}

/// Escape a table cell for output
pub(crate) fn escape_cell(cell: &str) -> String {
    cell.replace('\n', " ").replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_headings() {
        assert_eq!(
            classify("## Intro"),
            Some(BlockStart::Heading {
                level: 2,
                title: "Intro"
            })
        );
        assert_eq!(
            classify("#"),
            Some(BlockStart::Heading { level: 1, title: "" })
        );
        assert_eq!(classify("####### seven"), None);
        assert_eq!(classify("#hashtag"), None);
    }

    #[test]
    fn test_classify_list_items() {
        assert_eq!(
            classify("- [x] done"),
            Some(BlockStart::ListItem {
                ordered: false,
                checked: Some(true),
                text: "done",
                content_offset: 2,
            })
        );
        assert_eq!(
            classify("12. twelve"),
            Some(BlockStart::ListItem {
                ordered: true,
                checked: None,
                text: "twelve",
                content_offset: 4,
            })
        );
        assert_eq!(classify("1.5 million"), None);
        assert_eq!(classify("-5 degrees"), None);
    }

    #[test]
    fn test_classify_fences_and_directives() {
        assert_eq!(
            classify("```rust"),
            Some(BlockStart::CodeFence {
                fence: '`',
                len: 3,
                info: "rust"
            })
        );
        assert_eq!(classify("$$"), Some(BlockStart::MathFence));
        assert_eq!(
            classify("::::chart type=bar"),
            Some(BlockStart::Directive {
                colons: 4,
                name: "chart",
                attrs: "type=bar"
            })
        );
        assert_eq!(classify(":::"), None);
    }

    #[test]
    fn test_prose_escape_is_reversible() {
        for line in ["- not a list", "# not a heading", "\\plain", "\\\\double", "| pipe", "ok"] {
            let escaped = escape_prose(line);
            assert_eq!(unescape_prose(&escaped), line, "escaped as {}", escaped);
        }
        assert_eq!(escape_prose("plain text"), "plain text");
        assert_eq!(escape_prose("\\plain"), "\\plain");
    }

    #[test]
    fn test_item_text_escape_is_reversible() {
        for text in ["[ ] literal box", "[link](url)", "\\[x] odd", "normal"] {
            assert_eq!(unescape_item_text(&escape_item_text(text)), text);
        }
        assert_eq!(escape_item_text("[link](url)"), "[link](url)");
    }

    #[test]
    fn test_split_row() {
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_row("| a | b"), vec!["a", "b"]);
        assert_eq!(split_row("| a \\| b | c |"), vec!["a | b", "c"]);
        assert_eq!(split_row("|"), vec![""]);
    }
}
