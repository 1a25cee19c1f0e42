//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use brick::engine::StructuralEditor;
use brick::host::MemoryHost;
use brick::session::{HighlightStyles, Session};
use brick::syntax::{JavaScriptSyntax, SyntaxService, SyntaxTree, Visit};
use brick::templates::TemplateCatalog;
use brick::{EditorHost, Position};

/// Position shorthand (1-based line, 0-based column)
pub fn pos(line: usize, column: usize) -> Position {
    Position::new(line, column).unwrap()
}

/// Join lines with `\n` (no trailing newline)
pub fn lines(lines: &[&str]) -> String {
    lines.join("\n")
}

pub fn parse(text: &str) -> SyntaxTree {
    JavaScriptSyntax::new()
        .unwrap()
        .parse(text)
        .unwrap_or_else(|e| panic!("test buffer does not parse: {}", e))
}

pub fn editor() -> StructuralEditor<JavaScriptSyntax> {
    StructuralEditor::new(JavaScriptSyntax::new().unwrap())
}

/// A session over an in-memory host with the cursor at (line, column)
pub fn test_session(text: &str, line: usize, column: usize) -> Session<MemoryHost> {
    let mut host = MemoryHost::new(text);
    host.set_cursor_position(pos(line, column));
    Session::new(
        editor(),
        host,
        TemplateCatalog::builtin(),
        HighlightStyles::default(),
    )
}

/// Assert a located node's kind and span
#[track_caller]
pub fn assert_node(
    visit: Option<&Visit<'_>>,
    kind: &str,
    start: (usize, usize),
    end: (usize, usize),
) {
    let visit = visit.unwrap_or_else(|| panic!("expected {} but found nothing", kind));
    let span = visit.node.span();
    assert_eq!(visit.node.kind().name(), kind, "kind at {}", span);
    assert_eq!(span.start, pos(start.0, start.1), "start of {}", kind);
    assert_eq!(span.end, pos(end.0, end.1), "end of {}", kind);
}
