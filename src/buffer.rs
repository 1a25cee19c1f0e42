//! Buffer splitting and line/column <-> byte conversions.
//!
//! Lines are counted the way ropey counts them: `\n`, `\r\n`, a lone `\r`
//! and the Unicode breaks (VT, FF, NEL, LS, PS) all end a line.

use std::ops::Range;

use ropey::Rope;

use crate::position::{Position, TextRange};

/// Byte offset for a split position.
///
/// The column is walked forward from the start of the position's line and may
/// run past the line break into the following lines. Anything past the end of
/// the buffer clamps to its length.
pub fn split_offset(buffer: &str, pos: Position) -> usize {
    let rope = Rope::from_str(buffer);
    let line_idx = pos.line() - 1;
    if line_idx >= rope.len_lines() {
        return buffer.len();
    }
    let char_idx = rope.line_to_char(line_idx) + pos.column();
    if char_idx >= rope.len_chars() {
        return buffer.len();
    }
    rope.char_to_byte(char_idx)
}

/// Cut `buffer` at each position, returning `positions.len() + 1` segments.
///
/// `positions` must be sorted ascending. Concatenating the segments always
/// reproduces `buffer`.
pub fn split_at_positions<'a>(buffer: &'a str, positions: &[Position]) -> Vec<&'a str> {
    debug_assert!(
        positions.windows(2).all(|w| w[0] <= w[1]),
        "split positions must be sorted"
    );

    let mut sections = Vec::with_capacity(positions.len() + 1);
    let mut last = 0usize;
    for pos in positions {
        let offset = split_offset(buffer, *pos).max(last);
        sections.push(&buffer[last..offset]);
        last = offset;
    }
    sections.push(&buffer[last..]);
    sections
}

/// Replace `range` (bytes) with `text`
pub fn splice(buffer: &str, range: Range<usize>, text: &str) -> String {
    let mut out = String::with_capacity(buffer.len() + text.len());
    out.push_str(&buffer[..range.start]);
    out.push_str(text);
    out.push_str(&buffer[range.end..]);
    out
}

/// Chars a line break occupies at the end of a rope line
fn line_break_len(line: ropey::RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    match line.char(len - 1) {
        '\n' if len >= 2 && line.char(len - 2) == '\r' => 2,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}' => 1,
        _ => 0,
    }
}

/// Chars on a 0-based rope line, excluding its line break
pub(crate) fn rope_line_len(rope: &Rope, line_idx: usize) -> Option<usize> {
    if line_idx >= rope.len_lines() {
        return None;
    }
    let line = rope.line(line_idx);
    Some(line.len_chars() - line_break_len(line))
}

/// Line table over a borrowed buffer, backed by a rope.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    rope: Rope,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            rope: Rope::from_str(text),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Number of lines (always >= 1)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its line break
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let idx = line.checked_sub(1)?;
        let len = rope_line_len(&self.rope, idx)?;
        let first_char = self.rope.line_to_char(idx);
        let start = self.rope.char_to_byte(first_char);
        let end = self.rope.char_to_byte(first_char + len);
        self.text.get(start..end)
    }

    /// Line length in chars
    pub fn line_len(&self, line: usize) -> Option<usize> {
        rope_line_len(&self.rope, line.checked_sub(1)?)
    }

    /// Whether `pos` names an existing line and a column within it
    /// (one past the last char is allowed)
    pub fn contains(&self, pos: Position) -> bool {
        self.line_len(pos.line())
            .is_some_and(|len| pos.column() <= len)
    }

    /// Byte offset of `pos`, or None when it lies outside the buffer
    pub fn byte_of(&self, pos: Position) -> Option<usize> {
        let len = self.line_len(pos.line())?;
        if pos.column() > len {
            return None;
        }
        let char_idx = self.rope.line_to_char(pos.line() - 1) + pos.column();
        Some(self.rope.char_to_byte(char_idx))
    }

    /// Position of a byte offset (clamped to the buffer end)
    pub fn position_of(&self, byte: usize) -> Position {
        let char_idx = self.rope.byte_to_char(byte.min(self.text.len()));
        let line_idx = self.rope.char_to_line(char_idx);
        line_col(line_idx + 1, char_idx - self.rope.line_to_char(line_idx))
    }

    /// Position one past the last char of the buffer
    pub fn end(&self) -> Position {
        let last = self.line_count();
        line_col(last, self.line_len(last).unwrap_or(0))
    }

    /// The whole buffer as a range
    pub fn full_range(&self) -> TextRange {
        TextRange::new(Position::START, self.end())
    }

    /// Position one char before `pos`, wrapping onto the previous line's end
    pub fn step_back(&self, pos: Position) -> Option<Position> {
        if pos.column() > 0 {
            return Some(pos.offset_column(-1));
        }
        let prev = pos.line().checked_sub(1).filter(|l| *l >= 1)?;
        Some(line_col(prev, self.line_len(prev)?))
    }

    /// Position one char after `pos`, wrapping onto the next line's start
    pub fn step_forward(&self, pos: Position) -> Option<Position> {
        let len = self.line_len(pos.line())?;
        if pos.column() < len {
            return Some(pos.offset_column(1));
        }
        if pos.line() < self.line_count() {
            return Some(line_col(pos.line() + 1, 0));
        }
        None
    }

    /// Nearest position inside the buffer
    pub fn clamp(&self, pos: Position) -> Position {
        if pos.line() > self.line_count() {
            return self.end();
        }
        let len = self.line_len(pos.line()).unwrap_or(0);
        pos.with_column(pos.column().min(len))
    }

    /// Leading whitespace of a line
    pub fn indentation(&self, line: usize) -> &'a str {
        let text = self.line_text(line).unwrap_or("");
        let trimmed = text.trim_start_matches(|c: char| c == ' ' || c == '\t');
        &text[..text.len() - trimmed.len()]
    }
}

/// Which side a position sticks to when text is inserted exactly on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Stay before the inserted text
    Left,
    /// Move past the inserted text
    Right,
}

/// Replacement of `range` (old buffer coordinates) with `text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub text: String,
}

impl TextEdit {
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::collapsed(at),
            text: text.into(),
        }
    }

    pub fn delete(range: TextRange) -> Self {
        Self {
            range,
            text: String::new(),
        }
    }

    /// Apply to `buffer`; None when the range lies outside it
    pub fn apply(&self, buffer: &str) -> Option<String> {
        let lines = LineIndex::new(buffer);
        let start = lines.byte_of(self.range.start)?;
        let end = lines.byte_of(self.range.end)?;
        (start <= end).then(|| splice(buffer, start..end, &self.text))
    }

    /// Position just after the inserted text, in new buffer coordinates
    pub fn inserted_end(&self) -> Position {
        let start = self.range.start;
        let end = LineIndex::new(&self.text).end();
        if end.line() == 1 {
            start.offset_column(end.column() as isize)
        } else {
            line_col(start.line() + end.line() - 1, end.column())
        }
    }

    /// Where `pos` (old coordinates) ends up once the edit is applied.
    ///
    /// Positions inside the replaced range collapse onto the inserted text's
    /// start (`Left`) or end (`Right`).
    pub fn map(&self, pos: Position, bias: Bias) -> Position {
        let TextRange { start, end } = self.range;
        if pos < start || (pos == start && bias == Bias::Left) {
            return pos;
        }
        if pos < end {
            return match bias {
                Bias::Left => start,
                Bias::Right => self.inserted_end(),
            };
        }

        let new_end = self.inserted_end();
        if pos.line() == end.line() {
            line_col(new_end.line(), new_end.column() + (pos.column() - end.column()))
        } else {
            let line = pos.line() + new_end.line() - end.line();
            line_col(line, pos.column())
        }
    }
}

/// The single edit turning `old` into `new`, found by trimming their common
/// prefix and suffix. None when the texts are identical.
pub fn diff_edit(old: &str, new: &str) -> Option<TextEdit> {
    if old == new {
        return None;
    }
    let (old_bytes, new_bytes) = (old.as_bytes(), new.as_bytes());

    let max_start = old_bytes.len().min(new_bytes.len());
    let mut start = 0;
    while start < max_start && old_bytes[start] == new_bytes[start] {
        start += 1;
    }
    while !old.is_char_boundary(start) || !new.is_char_boundary(start) {
        start -= 1;
    }

    let mut old_end = old_bytes.len();
    let mut new_end = new_bytes.len();
    while old_end > start && new_end > start && old_bytes[old_end - 1] == new_bytes[new_end - 1] {
        old_end -= 1;
        new_end -= 1;
    }
    while !old.is_char_boundary(old_end) || !new.is_char_boundary(new_end) {
        old_end += 1;
        new_end += 1;
    }

    let lines = LineIndex::new(old);
    Some(TextEdit {
        range: TextRange::new(lines.position_of(start), lines.position_of(old_end)),
        text: new[start..new_end].to_string(),
    })
}

/// Internal constructor for positions that are valid by construction
pub(crate) fn line_col(line: usize, column: usize) -> Position {
    debug_assert!(line >= 1);
    Position::new(line.max(1), column).unwrap_or(Position::START)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column).unwrap()
    }

    #[test]
    fn test_line_index_basics() {
        let index = LineIndex::new("ab\n\ncdé\n");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_text(1), Some("ab"));
        assert_eq!(index.line_text(2), Some(""));
        assert_eq!(index.line_text(3), Some("cdé"));
        assert_eq!(index.line_text(4), Some(""));
        assert_eq!(index.line_text(5), None);
        assert_eq!(index.line_len(3), Some(3));
        assert_eq!(index.end(), pos(4, 0));
    }

    #[test]
    fn test_byte_position_round_trip() {
        let text = "ab\n\ncdé\nx";
        let index = LineIndex::new(text);
        for (byte, _) in text.char_indices() {
            let p = index.position_of(byte);
            assert_eq!(index.byte_of(p), Some(byte), "byte {}", byte);
        }
        assert_eq!(index.byte_of(pos(3, 3)), Some(text.find("\nx").unwrap()));
        assert_eq!(index.byte_of(pos(3, 4)), None);
        assert_eq!(index.byte_of(pos(9, 0)), None);
    }

    #[test]
    fn test_step_back_and_forward() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.step_back(pos(2, 0)), Some(pos(1, 2)));
        assert_eq!(index.step_back(pos(1, 0)), None);
        assert_eq!(index.step_forward(pos(1, 2)), Some(pos(2, 0)));
        assert_eq!(index.step_forward(pos(2, 2)), None);
    }

    #[test]
    fn test_indentation() {
        let index = LineIndex::new("fn\n    x;\n\t\ty;");
        assert_eq!(index.indentation(1), "");
        assert_eq!(index.indentation(2), "    ");
        assert_eq!(index.indentation(3), "\t\t");
    }

    #[test]
    fn test_text_edit_apply() {
        let edit = TextEdit::insert(pos(2, 1), "X\nY");
        assert_eq!(edit.apply("ab\ncd").as_deref(), Some("ab\ncX\nYd"));
        assert_eq!(edit.inserted_end(), pos(3, 1));

        let delete = TextEdit::delete(TextRange::new(pos(1, 1), pos(2, 1)));
        assert_eq!(delete.apply("ab\ncd").as_deref(), Some("ad"));
        assert_eq!(TextEdit::insert(pos(5, 0), "x").apply("ab"), None);
    }

    #[test]
    fn test_text_edit_map_insertion() {
        let edit = TextEdit::insert(pos(1, 4), "==");
        assert_eq!(edit.map(pos(1, 2), Bias::Right), pos(1, 2));
        assert_eq!(edit.map(pos(1, 4), Bias::Left), pos(1, 4));
        assert_eq!(edit.map(pos(1, 4), Bias::Right), pos(1, 6));
        assert_eq!(edit.map(pos(1, 9), Bias::Left), pos(1, 11));
        assert_eq!(edit.map(pos(3, 9), Bias::Left), pos(3, 9));
    }

    #[test]
    fn test_text_edit_map_deletion() {
        let edit = TextEdit::delete(TextRange::new(pos(1, 4), pos(2, 2)));
        assert_eq!(edit.map(pos(1, 6), Bias::Left), pos(1, 4));
        assert_eq!(edit.map(pos(2, 1), Bias::Right), pos(1, 4));
        assert_eq!(edit.map(pos(2, 5), Bias::Left), pos(1, 7));
        assert_eq!(edit.map(pos(4, 3), Bias::Left), pos(3, 3));
    }

    #[test]
    fn test_diff_edit() {
        assert_eq!(diff_edit("same", "same"), None);

        let edit = diff_edit("if (a) {\n}", "if (ab) {\n}").unwrap();
        assert_eq!(edit, TextEdit::insert(pos(1, 5), "b"));

        let edit = diff_edit("a();\nb();\n", "a();\n").unwrap();
        assert_eq!(edit.range, TextRange::new(pos(2, 0), pos(3, 0)));
        assert_eq!(edit.text, "");
        assert_eq!(edit.apply("a();\nb();\n").as_deref(), Some("a();\n"));

        let edit = diff_edit("é", "è").unwrap();
        assert_eq!(edit.apply("é").as_deref(), Some("è"));
    }

    #[test]
    fn test_unicode_and_crlf_line_breaks() {
        let text = "a\u{2028}b\r\nc\rd";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_text(1), Some("a"));
        assert_eq!(index.line_text(2), Some("b"));
        assert_eq!(index.line_text(3), Some("c"));
        assert_eq!(index.line_text(4), Some("d"));
        assert_eq!(index.line_len(2), Some(1));

        let d = text.find('d').unwrap();
        assert_eq!(index.position_of(d), pos(4, 0));
        assert_eq!(index.byte_of(pos(4, 0)), Some(d));
        assert_eq!(index.byte_of(pos(2, 2)), None);
        assert_eq!(index.step_forward(pos(2, 1)), Some(pos(3, 0)));
    }

    #[test]
    fn test_inserted_end_spans_line_breaks() {
        assert_eq!(TextEdit::insert(pos(2, 3), "ab").inserted_end(), pos(2, 5));
        assert_eq!(TextEdit::insert(pos(2, 3), "x\r\nyz").inserted_end(), pos(3, 2));
        assert_eq!(TextEdit::insert(pos(1, 0), "\u{2029}").inserted_end(), pos(2, 0));
    }

    #[test]
    fn test_clamp() {
        let index = LineIndex::new("abc\nd");
        assert_eq!(index.clamp(pos(1, 9)), pos(1, 3));
        assert_eq!(index.clamp(pos(7, 1)), pos(2, 1));
        assert_eq!(index.clamp(pos(2, 0)), pos(2, 0));
    }

    #[test]
    fn test_splice() {
        assert_eq!(splice("hello world", 5..11, "!"), "hello!");
        assert_eq!(splice("ac", 1..1, "b"), "abc");
    }
}
