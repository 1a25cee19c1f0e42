//! Position model: 1-based lines, 0-based columns.
//!
//! Columns count chars from the start of the line. This is the coordinate
//! convention of the syntax tree; converting from whatever the host widget
//! uses is the host's job.

use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// A location in the buffer (line >= 1, column >= 0).
///
/// Ordering is lexicographic on (line, column).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    line: usize,
    column: usize,
}

impl Position {
    /// Start of the buffer
    pub const START: Position = Position { line: 1, column: 0 };

    pub fn new(line: usize, column: usize) -> Result<Self, EditError> {
        if line < 1 {
            return Err(EditError::InvalidPosition { line, column });
        }
        Ok(Self { line, column })
    }

    pub const fn line(&self) -> usize {
        self.line
    }

    pub const fn column(&self) -> usize {
        self.column
    }

    /// Same line, column moved by `delta` (saturating at 0)
    pub fn offset_column(&self, delta: isize) -> Self {
        Self {
            line: self.line,
            column: self.column.saturating_add_signed(delta),
        }
    }

    pub fn with_column(&self, column: usize) -> Self {
        Self {
            line: self.line,
            column,
        }
    }

    pub fn is_before(&self, other: &Position) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &Position) -> bool {
        self > other
    }

    /// Strictly between `start` and `end`: both boundaries are excluded.
    ///
    /// A cursor sitting exactly on a boundary character is outside, which is
    /// what the punctuation guard relies on.
    pub fn is_between(&self, start: &Position, end: &Position) -> bool {
        self.is_after(start) && self.is_before(end)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl TryFrom<(usize, usize)> for Position {
    type Error = EditError;

    fn try_from((line, column): (usize, usize)) -> Result<Self, Self::Error> {
        Position::new(line, column)
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> Self {
        (pos.line, pos.column)
    }
}

/// A span of text. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Build a range from two endpoints in either order
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A collapsed range (cursor with no selection)
    pub fn collapsed(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Strict interior test, see [`Position::is_between`]
    pub fn strictly_contains(&self, pos: &Position) -> bool {
        pos.is_between(&self.start, &self.end)
    }

    /// Inclusive on both ends
    pub fn encloses(&self, pos: &Position) -> bool {
        *pos >= self.start && *pos <= self.end
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
