//! Printing trees back to text
//!
//! Untouched nodes print as their original source slice, so a freshly
//! parsed tree prints byte for byte. Touched containers are stitched from
//! the source gaps between their surviving children, minus removed ranges,
//! with inserted statements laid out at insertion time.

use std::ops::Range;

use super::kind::NodeKind;
use super::tree::{Origin, SyntaxNode, SyntaxTree};
use crate::buffer::LineIndex;

pub(crate) fn print_tree(tree: &SyntaxTree) -> String {
    let source = tree.source();
    if !tree.is_modified() {
        return source.to_string();
    }
    let mut out = String::with_capacity(source.len() + 64);
    print_node(tree.root(), source, &mut out);
    out
}

fn print_node(node: &SyntaxNode, source: &str, out: &mut String) {
    match &node.origin {
        Origin::Inserted(text) => out.push_str(text),
        Origin::Source { touched: false, .. } => out.push_str(&source[node.bytes.clone()]),
        Origin::Source {
            touched: true,
            removed,
        } => {
            let inner = inner_start(node);
            out.push_str(&source[node.bytes.start..inner]);
            let mut cursor = inner;
            for child in &node.children {
                if let Origin::Inserted(text) = &child.origin {
                    let at = insertion_byte(source, node.bytes.start, cursor);
                    push_gap(out, source, cursor..at, removed);
                    cursor = at;
                    out.push_str(text);
                    continue;
                }
                push_gap(out, source, cursor..child.bytes.start, removed);
                print_node(child, source, out);
                cursor = child.bytes.end;
            }
            push_gap(out, source, cursor..node.bytes.end, removed);
        }
    }
}

/// Copy `range` of the source, skipping any removed sub-ranges
fn push_gap(out: &mut String, source: &str, range: Range<usize>, removed: &[Range<usize>]) {
    let mut at = range.start;
    for cut in removed {
        if cut.end <= at || cut.start >= range.end {
            continue;
        }
        if cut.start > at {
            out.push_str(&source[at..cut.start]);
        }
        at = cut.end.min(range.end).max(at);
    }
    if at < range.end {
        out.push_str(&source[at..range.end]);
    }
}

/// First byte after a container's opening delimiter
fn inner_start(node: &SyntaxNode) -> usize {
    match node.kind {
        NodeKind::BlockStatement => node.bytes.start + 1,
        _ => node.bytes.start,
    }
}

/// Text to emit for a statement inserted into `parent` at `index`.
///
/// The result is emitted right after the previous sibling (or right after
/// the container's opening delimiter), past any comment trailing it on the
/// same line, and carries its own line breaks in the buffer's style.
pub(crate) fn insertion_text(
    source: &str,
    parent: &SyntaxNode,
    index: usize,
    statement: &str,
    indent_unit: &str,
) -> String {
    let lines = LineIndex::new(source);
    let outer = lines.indentation(parent.span.start.line());
    let nested = match parent.kind {
        NodeKind::Program => String::new(),
        _ => format!("{}{}", outer, indent_unit),
    };

    let before = parent.children[..index].iter().rev().find(|c| !c.is_inserted());
    let after = parent.children[index..].iter().find(|c| !c.is_inserted());
    let indent = before
        .or(after)
        .filter(|anchor| starts_line(&lines, anchor))
        .map(|anchor| lines.indentation(anchor.span.start.line()).to_string())
        .unwrap_or(nested);

    let eol = line_ending(source);
    let body = reindent(statement, &indent, eol);
    let at = before.map(|c| c.bytes.end).unwrap_or_else(|| inner_start(parent));
    let at = insertion_byte(source, parent.bytes.start, at);

    let mut text = String::new();
    let leads_program = parent.kind == NodeKind::Program && before.is_none();
    if !leads_program {
        text.push_str(eol);
        text.push_str(&indent);
    }
    text.push_str(&body);

    // Whatever followed the insertion point on its line moves to a new line
    let rest = source[at..].split('\n').next().unwrap_or("");
    let rest = rest.trim();
    if !rest.is_empty() {
        text.push_str(eol);
        if rest.starts_with('}') {
            text.push_str(outer);
        } else {
            text.push_str(&indent);
        }
    } else if leads_program && at < source.len() {
        text.push_str(eol);
    }
    text
}

/// Byte an inserted statement is emitted at, given the end of what precedes
/// it. A comment trailing that point on the same line stays in front.
///
/// Nothing moves at the very start of a container (the program's first
/// statement).
fn insertion_byte(source: &str, container_start: usize, at: usize) -> usize {
    if at <= container_start {
        return at;
    }
    let line_end = source[at..].find('\n').map(|i| at + i).unwrap_or(source.len());
    let rest = source[at..line_end].trim_end_matches('\r');
    let trimmed = rest.trim_start_matches(is_horizontal);

    let comment_only = trimmed.starts_with("//")
        || (trimmed.starts_with("/*")
            && trimmed[2..]
                .find("*/")
                .is_some_and(|i| trimmed[i + 4..].trim().is_empty()));
    if comment_only {
        at + rest.len()
    } else {
        at
    }
}

/// `\r\n` when the buffer uses it, otherwise `\n`
fn line_ending(source: &str) -> &'static str {
    if source.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Source bytes to drop when removing `parent.children[index]`.
///
/// A statement alone on its line(s) takes the whole line with it.
pub(crate) fn removal_range(source: &str, parent: &SyntaxNode, index: usize) -> Range<usize> {
    let node = &parent.children[index];
    let (start, end) = (node.bytes.start, node.bytes.end);
    let bytes = source.as_bytes();
    let line_start = source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let newline = source[end..].find('\n').map(|i| end + i);
    // A CRLF break starts at its `\r`
    let line_end = match newline {
        Some(i) if i > end && bytes[i - 1] == b'\r' => i - 1,
        Some(i) => i,
        None => source.len(),
    };
    let prev_break = match line_start {
        0 => 0,
        n if n >= 2 && bytes[n - 2] == b'\r' => n - 2,
        n => n - 1,
    };

    let prefix_blank = source[line_start..start].trim().is_empty();
    let suffix_blank = source[end..line_end].trim().is_empty();

    match (prefix_blank, suffix_blank, newline) {
        (true, true, Some(i)) => line_start..i + 1,
        (true, true, None) => prev_break..line_end,
        (true, false, _) => start..end + horizontal_space(&source[end..line_end]),
        (false, true, _) => {
            let prefix = &source[line_start..start];
            let leading = prefix.len() - prefix.trim_end_matches(is_horizontal).len();
            start - leading..line_end
        }
        (false, false, _) => start..end,
    }
}

/// Whether `node` is the first thing on its line
fn starts_line(lines: &LineIndex, node: &SyntaxNode) -> bool {
    let line = lines.line_text(node.span.start.line()).unwrap_or("");
    line.chars()
        .take(node.span.start.column())
        .all(is_horizontal)
}

fn is_horizontal(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn horizontal_space(text: &str) -> usize {
    text.len() - text.trim_start_matches(is_horizontal).len()
}

/// Indent every line after the first; blank lines stay empty
fn reindent(statement: &str, indent: &str, eol: &str) -> String {
    let mut out = String::with_capacity(statement.len());
    for (i, line) in statement.lines().enumerate() {
        if i > 0 {
            out.push_str(eol);
            if !line.trim().is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}
