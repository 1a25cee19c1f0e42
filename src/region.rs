//! Editable region tracker
//!
//! While the buffer parses, every character is editable (the punctuation
//! guard still applies). The moment an edit breaks the parse, the tracker
//! freezes a tight region around the edit point: the interior of the
//! enclosing header parens if there is one, otherwise the edited line.
//! Further edits must stay inside that region, which follows the text as the
//! user types, until the buffer parses again.

use serde::Serialize;

use crate::buffer::{Bias, LineIndex, TextEdit};
use crate::guard::enclosing_paren_pair;
use crate::position::{Position, TextRange};
use crate::syntax::SyntaxTree;

/// A span in which raw character edits are allowed (inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditableRegion {
    pub start: Position,
    pub end: Position,
}

impl EditableRegion {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Whether an edit replacing `range` stays inside the region
    pub fn permits(&self, range: &TextRange) -> bool {
        range.start >= self.start && range.end <= self.end
    }

    /// The region after `edit` has been applied
    pub fn follow(&self, edit: &TextEdit) -> Self {
        Self {
            start: edit.map(self.start, Bias::Left),
            end: edit.map(self.end, Bias::Right),
        }
    }
}

impl From<TextRange> for EditableRegion {
    fn from(range: TextRange) -> Self {
        Self::new(range.start, range.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionState {
    /// The buffer parses; all of it is editable
    #[default]
    WholeBuffer,
    /// The buffer does not parse; only these regions are editable
    Constrained(Vec<EditableRegion>),
}

impl RegionState {
    pub fn is_constrained(&self) -> bool {
        matches!(self, RegionState::Constrained(_))
    }

    /// Whether an edit of `range` is allowed in this state
    pub fn permits(&self, range: &TextRange) -> bool {
        match self {
            RegionState::WholeBuffer => true,
            RegionState::Constrained(regions) => regions.iter().any(|r| r.permits(range)),
        }
    }

    /// The current regions; a parsable buffer yields one covering all of it
    pub fn regions(&self, buffer: &str) -> Vec<EditableRegion> {
        match self {
            RegionState::WholeBuffer => vec![LineIndex::new(buffer).full_range().into()],
            RegionState::Constrained(regions) => regions.clone(),
        }
    }

    /// State after `edit` turned `previous_buffer` into a buffer that
    /// does (`parsable`) or does not parse.
    ///
    /// `previous_tree` is the parse of `previous_buffer`, when it parsed.
    pub fn after_edit(
        &self,
        edit: &TextEdit,
        previous_buffer: &str,
        previous_tree: Option<&SyntaxTree>,
        parsable: bool,
    ) -> RegionState {
        if parsable {
            if self.is_constrained() {
                tracing::debug!("buffer parses again, whole buffer editable");
            }
            return RegionState::WholeBuffer;
        }

        match self {
            RegionState::Constrained(regions) => {
                RegionState::Constrained(regions.iter().map(|r| r.follow(edit)).collect())
            }
            RegionState::WholeBuffer => {
                let frozen = frozen_region(previous_buffer, previous_tree, edit.range.start);
                let region = frozen.follow(edit);
                tracing::debug!(
                    "buffer became unparsable, editable region {}..{}",
                    region.start,
                    region.end
                );
                RegionState::Constrained(vec![region])
            }
        }
    }
}

/// Region frozen around `point` in the last parsable buffer
fn frozen_region(
    previous_buffer: &str,
    previous_tree: Option<&SyntaxTree>,
    point: Position,
) -> EditableRegion {
    if let Some(pair) = previous_tree.and_then(|tree| enclosing_paren_pair(tree, point)) {
        return pair.interior().into();
    }
    let len = LineIndex::new(previous_buffer)
        .line_len(point.line())
        .unwrap_or(0)
        .max(point.column());
    EditableRegion::new(point.with_column(0), point.with_column(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{JavaScriptSyntax, SyntaxService};

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column).unwrap()
    }

    #[test]
    fn test_whole_buffer_permits_everything() {
        let state = RegionState::WholeBuffer;
        assert!(state.permits(&TextRange::collapsed(pos(40, 2))));
        assert_eq!(
            state.regions("ab\ncd"),
            vec![EditableRegion::new(pos(1, 0), pos(2, 2))]
        );
    }

    #[test]
    fn test_breaking_edit_inside_parens_freezes_interior() {
        let buffer = "if (a) {\n}";
        let tree = JavaScriptSyntax::new().unwrap().parse(buffer).unwrap();
        let edit = TextEdit::insert(pos(1, 5), "=");

        let state = RegionState::WholeBuffer.after_edit(&edit, buffer, Some(&tree), false);
        assert_eq!(
            state,
            RegionState::Constrained(vec![EditableRegion::new(pos(1, 4), pos(1, 6))])
        );
        assert!(state.permits(&TextRange::collapsed(pos(1, 6))));
        assert!(!state.permits(&TextRange::collapsed(pos(2, 0))));
        assert!(!state.permits(&TextRange::new(pos(1, 3), pos(1, 4))));
    }

    #[test]
    fn test_breaking_edit_outside_parens_freezes_line() {
        let buffer = "a();\nb();\n";
        let tree = JavaScriptSyntax::new().unwrap().parse(buffer).unwrap();
        let edit = TextEdit::insert(pos(2, 4), "(");

        let state = RegionState::WholeBuffer.after_edit(&edit, buffer, Some(&tree), false);
        assert_eq!(
            state,
            RegionState::Constrained(vec![EditableRegion::new(pos(2, 0), pos(2, 5))])
        );
    }

    #[test]
    fn test_constrained_region_follows_edits() {
        let state =
            RegionState::Constrained(vec![EditableRegion::new(pos(2, 0), pos(2, 4))]);

        let grown = state.after_edit(&TextEdit::insert(pos(2, 4), "x"), "", None, false);
        assert_eq!(
            grown,
            RegionState::Constrained(vec![EditableRegion::new(pos(2, 0), pos(2, 5))])
        );

        let shrunk = grown.after_edit(
            &TextEdit::delete(TextRange::new(pos(2, 1), pos(2, 2))),
            "",
            None,
            false,
        );
        assert_eq!(
            shrunk,
            RegionState::Constrained(vec![EditableRegion::new(pos(2, 0), pos(2, 4))])
        );
    }

    #[test]
    fn test_parsable_resets_to_whole_buffer() {
        let state =
            RegionState::Constrained(vec![EditableRegion::new(pos(1, 0), pos(1, 3))]);
        let next = state.after_edit(&TextEdit::insert(pos(1, 3), ")"), "", None, true);
        assert_eq!(next, RegionState::WholeBuffer);
    }
}
