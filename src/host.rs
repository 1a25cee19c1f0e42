//! Host editor boundary
//!
//! The engine never talks to a widget directly. A host implements
//! [`EditorHost`]; [`MemoryHost`] is the in-process one used by the CLI and
//! the tests.

use ropey::Rope;

use crate::buffer::{line_col, rope_line_len};
use crate::position::{Position, TextRange};

/// Accessors the session calls on the host editor
pub trait EditorHost {
    fn get_text(&self) -> String;
    /// Replace the whole text as one undoable step
    fn set_text(&mut self, text: &str);
    fn get_cursor_position(&self) -> Position;
    fn set_cursor_position(&mut self, position: Position);
    fn get_selection(&self) -> Option<TextRange>;
    fn highlight_range(&mut self, range: TextRange, style: &str);
    fn clear_highlight(&mut self);
}

/// A highlighted range and its style tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub range: TextRange,
    pub style: String,
}

/// Rope-backed host with a whole-text undo stack
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    rope: Rope,
    cursor: Position,
    selection: Option<TextRange>,
    highlight: Option<Highlight>,
    undo_stack: Vec<String>,
}

impl MemoryHost {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            ..Default::default()
        }
    }

    pub fn set_selection(&mut self, selection: Option<TextRange>) {
        self.selection = selection;
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Restore the text from before the last `set_text`
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.rope = Rope::from_str(&previous);
        self.cursor = self.clamp(self.cursor);
        true
    }

    /// Nearest position inside the text, with lines split the same way
    /// as [`crate::buffer::LineIndex`]
    fn clamp(&self, position: Position) -> Position {
        match rope_line_len(&self.rope, position.line() - 1) {
            Some(len) => position.with_column(position.column().min(len)),
            None => self.end(),
        }
    }

    fn end(&self) -> Position {
        let last = self.rope.len_lines().max(1);
        line_col(last, rope_line_len(&self.rope, last - 1).unwrap_or(0))
    }
}

impl EditorHost for MemoryHost {
    fn get_text(&self) -> String {
        self.rope.to_string()
    }

    fn set_text(&mut self, text: &str) {
        let previous = self.rope.to_string();
        if previous == text {
            return;
        }
        self.undo_stack.push(previous);
        self.rope = Rope::from_str(text);
        self.cursor = self.clamp(self.cursor);
        self.selection = None;
    }

    fn get_cursor_position(&self) -> Position {
        self.cursor
    }

    fn set_cursor_position(&mut self, position: Position) {
        self.cursor = self.clamp(position);
    }

    fn get_selection(&self) -> Option<TextRange> {
        self.selection
    }

    fn highlight_range(&mut self, range: TextRange, style: &str) {
        self.highlight = Some(Highlight {
            range,
            style: style.to_string(),
        });
    }

    fn clear_highlight(&mut self) {
        self.highlight = None;
    }
}
