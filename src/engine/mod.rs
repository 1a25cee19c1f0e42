//! Structural edit engine
//!
//! Every operation takes the current [`EditorState`] by reference and either
//! returns a [`Transition`] carrying the next state, or an error. On error
//! the caller keeps the old state, so a rejected operation has no effect.
//!
//! Deletions are two-phase: `delete_block`/`delete_selection` only return a
//! [`PendingDeletion`]; the buffer changes when the host passes it back to
//! [`StructuralEditor::confirm`]. Until then every other modifying operation
//! fails with [`EditError::ConcurrentDeletionPending`].

mod state;

pub use state::{EditorState, PendingDeletion, StateSnapshot};

use crate::buffer::{diff_edit, LineIndex, TextEdit};
use crate::error::{EditError, ParseFailure};
use crate::guard::spans_protected_punctuation;
use crate::locate::{
    closest_common_deletable_block, closest_deletable_block, deletable_block_at_boundary,
    insertion_point, Boundary,
};
use crate::position::{Position, TextRange};
use crate::region::RegionState;
use crate::syntax::{KindSet, SyntaxService, SyntaxTree, Visit};
use crate::templates::BlockTemplate;

/// Tunables for a [`StructuralEditor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// One level of indentation for inserted statements
    pub indent: String,
    /// Statement kinds eligible for atomic deletion
    pub deletable: KindSet,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            deletable: KindSet::deletable(),
        }
    }
}

/// A single-character edit at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharEdit {
    Backspace,
    Delete,
    Insert(char),
}

/// What an accepted operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The buffer changed; the host should move its cursor here
    Applied { cursor: Position },
    /// A deletion target was found and awaits confirmation
    DeletionRequested(PendingDeletion),
    /// The pending deletion was dropped
    Cancelled,
    /// State refreshed from text the host changed on its own
    Synced,
    /// Nothing to do (no target, or the edit hit the buffer edge)
    Unchanged,
}

/// Result of an accepted operation
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: EditorState,
    pub outcome: EditOutcome,
}

impl Transition {
    pub(crate) fn unchanged(state: &EditorState) -> Self {
        Self {
            state: state.clone(),
            outcome: EditOutcome::Unchanged,
        }
    }
}

pub struct StructuralEditor<S: SyntaxService> {
    syntax: S,
    options: EngineOptions,
}

impl<S: SyntaxService> StructuralEditor<S> {
    pub fn new(syntax: S) -> Self {
        Self::with_options(syntax, EngineOptions::default())
    }

    pub fn with_options(syntax: S, options: EngineOptions) -> Self {
        Self { syntax, options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn syntax_mut(&mut self) -> &mut S {
        &mut self.syntax
    }

    /// Initial state for a freshly opened buffer
    pub fn load(&mut self, text: &str) -> EditorState {
        let parsed = self.syntax.parse(text);
        if let Err(failure) = &parsed {
            tracing::debug!("loaded buffer does not parse: {}", failure);
        }
        let (parsable, last_tree, failure) = split_parse(parsed, None);
        EditorState {
            last_buffer: text.to_string(),
            last_parsable: parsable,
            last_tree,
            failure,
            selection: None,
            regions: RegionState::WholeBuffer,
            pending: None,
            revision: 0,
        }
    }

    /// Insert `template` as a statement after the cursor's previous sibling
    pub fn insert_block(
        &mut self,
        state: &EditorState,
        template: &BlockTemplate,
        cursor: Position,
    ) -> Result<Transition, EditError> {
        ensure_no_pending(state)?;
        let tree = require_tree(state)?;

        let snippet = template.parse(&mut self.syntax)?;
        let statement = snippet.root().statements().first().ok_or_else(|| {
            EditError::InvalidTemplate {
                name: template.name.clone(),
                reason: "template has no statement".to_string(),
            }
        })?;

        let point = insertion_point(tree, cursor)?;
        let edited = tree.with_statement_inserted(
            &point.container,
            point.index,
            statement,
            snippet.source(),
            &self.options.indent,
        )?;
        let text = self.syntax.print(&edited);
        let reparsed = self.reparse_structural(&text, "insertion")?;

        let inserted_at = reparsed
            .node_at(&point.container.child(point.index))
            .map(|node| node.span().start)
            .unwrap_or(cursor);
        tracing::info!(
            template = %template.name,
            index = point.index,
            "inserted {} at {}",
            statement.kind(),
            inserted_at
        );

        Ok(Transition {
            state: self.committed(state, text, Ok(reparsed), RegionState::WholeBuffer),
            outcome: EditOutcome::Applied {
                cursor: inserted_at,
            },
        })
    }

    /// Request removal of the deletable statement around the cursor
    pub fn delete_block(
        &mut self,
        state: &EditorState,
        cursor: Position,
    ) -> Result<Transition, EditError> {
        ensure_no_pending(state)?;
        let tree = require_tree(state)?;
        let target = closest_deletable_block(tree, cursor, &self.options.deletable)?;
        Ok(self.request_deletion(state, target))
    }

    /// Request removal of the smallest deletable statement covering `range`
    pub fn delete_selection(
        &mut self,
        state: &EditorState,
        range: TextRange,
    ) -> Result<Transition, EditError> {
        ensure_no_pending(state)?;
        let tree = require_tree(state)?;
        let target =
            closest_common_deletable_block(tree, &[range.start, range.end], &self.options.deletable)?;
        let mut transition = self.request_deletion(state, target);
        transition.state.selection = Some(range);
        Ok(transition)
    }

    /// Commit a deletion previously returned by `delete_block`/`delete_selection`
    pub fn confirm(
        &mut self,
        state: &EditorState,
        pending: &PendingDeletion,
    ) -> Result<Transition, EditError> {
        if state.pending.as_ref() != Some(pending) {
            return Err(EditError::NoPendingDeletion);
        }
        let tree = require_tree(state)?;

        let edited = tree.with_statement_removed(&pending.path)?;
        let text = self.syntax.print(&edited);
        let reparsed = self.reparse_structural(&text, "deletion")?;
        let cursor = LineIndex::new(&text).clamp(pending.target.start);
        tracing::info!("deleted {} at {}", pending.kind, pending.target);

        let mut next = self.committed(state, text, Ok(reparsed), RegionState::WholeBuffer);
        next.pending = None;
        next.selection = None;
        Ok(Transition {
            state: next,
            outcome: EditOutcome::Applied { cursor },
        })
    }

    /// Drop a pending deletion, leaving the buffer as it was
    pub fn cancel(
        &mut self,
        state: &EditorState,
        pending: &PendingDeletion,
    ) -> Result<Transition, EditError> {
        if state.pending.as_ref() != Some(pending) {
            return Err(EditError::NoPendingDeletion);
        }
        tracing::debug!("cancelled deletion of {}", pending.kind);
        let mut next = state.clone();
        next.pending = None;
        next.selection = None;
        next.revision += 1;
        Ok(Transition {
            state: next,
            outcome: EditOutcome::Cancelled,
        })
    }

    /// Backspace, forward delete or character insertion at the cursor.
    ///
    /// With a non-empty `selection`, backspace and delete act on the
    /// selection instead. Against a deletable statement's boundary they turn
    /// into a deletion request.
    pub fn guarded_char_edit(
        &mut self,
        state: &EditorState,
        cursor: Position,
        selection: Option<TextRange>,
        edit: CharEdit,
    ) -> Result<Transition, EditError> {
        ensure_no_pending(state)?;

        let boundary = match edit {
            CharEdit::Insert(ch) => return self.type_char(state, cursor, ch),
            CharEdit::Backspace => Boundary::End,
            CharEdit::Delete => Boundary::Start,
        };

        if let Some(range) = selection.filter(|r| !r.is_empty()) {
            return self.delete_selection(state, range);
        }

        if let Some(tree) = state.tree() {
            let target =
                deletable_block_at_boundary(tree, cursor, boundary, &self.options.deletable)?;
            if target.is_some() {
                return Ok(self.request_deletion(state, target));
            }
        }

        let lines = LineIndex::new(&state.last_buffer);
        if !lines.contains(cursor) {
            return Err(EditError::PositionOutOfRange(cursor));
        }
        let span = match boundary {
            Boundary::End => lines.step_back(cursor).map(|start| TextRange::new(start, cursor)),
            Boundary::Start => lines.step_forward(cursor).map(|end| TextRange::new(cursor, end)),
        };
        let Some(span) = span else {
            return Ok(Transition::unchanged(state));
        };

        if let Some(tree) = state.tree() {
            if spans_protected_punctuation(tree, span)? {
                tracing::warn!("rejected {:?} at {}: protected punctuation", edit, cursor);
                return Err(EditError::guard(format!(
                    "{} would split protected punctuation",
                    span
                )));
            }
        }
        self.apply_char_edit(state, TextEdit::delete(span))
    }

    /// Plain character insertion, bounded only by the editable regions
    pub fn type_char(
        &mut self,
        state: &EditorState,
        cursor: Position,
        ch: char,
    ) -> Result<Transition, EditError> {
        ensure_no_pending(state)?;
        if !LineIndex::new(&state.last_buffer).contains(cursor) {
            return Err(EditError::PositionOutOfRange(cursor));
        }
        self.apply_char_edit(state, TextEdit::insert(cursor, ch.to_string()))
    }

    /// Refresh the state from text the host changed behind the engine's back
    pub fn sync(&mut self, state: &EditorState, text: &str) -> Result<Transition, EditError> {
        let Some(edit) = diff_edit(&state.last_buffer, text) else {
            return Ok(Transition::unchanged(state));
        };
        if let Some(pending) = &state.pending {
            tracing::warn!(
                "host changed the buffer, dropping pending deletion of {} at {}",
                pending.kind,
                pending.target
            );
        }

        let parsed = self.syntax.parse(text);
        let regions = state.regions.after_edit(
            &edit,
            &state.last_buffer,
            state.tree(),
            parsed.is_ok(),
        );
        let mut next = self.committed(state, text.to_string(), parsed, regions);
        next.pending = None;
        Ok(Transition {
            state: next,
            outcome: EditOutcome::Synced,
        })
    }

    fn request_deletion(&self, state: &EditorState, target: Option<Visit<'_>>) -> Transition {
        let Some(target) = target else {
            tracing::debug!("no deletable statement found");
            return Transition::unchanged(state);
        };

        let revision = state.revision + 1;
        let pending = PendingDeletion {
            revision,
            kind: target.node.kind(),
            target: target.node.span(),
            path: target.path,
        };
        tracing::debug!("requesting deletion of {} at {}", pending.kind, pending.target);

        let mut next = state.clone();
        next.pending = Some(pending.clone());
        next.revision = revision;
        Transition {
            state: next,
            outcome: EditOutcome::DeletionRequested(pending),
        }
    }

    fn apply_char_edit(
        &mut self,
        state: &EditorState,
        edit: TextEdit,
    ) -> Result<Transition, EditError> {
        if !state.regions.permits(&edit.range) {
            tracing::warn!("rejected edit at {}: outside the editable region", edit.range);
            return Err(EditError::guard(format!(
                "{} is outside the editable region",
                edit.range
            )));
        }
        let text = edit
            .apply(&state.last_buffer)
            .ok_or(EditError::PositionOutOfRange(edit.range.end))?;

        let parsed = self.syntax.parse(&text);
        let regions = state.regions.after_edit(
            &edit,
            &state.last_buffer,
            state.tree(),
            parsed.is_ok(),
        );
        Ok(Transition {
            state: self.committed(state, text, parsed, regions),
            outcome: EditOutcome::Applied {
                cursor: edit.inserted_end(),
            },
        })
    }

    /// Parse the result of a structural edit, which must parse
    fn reparse_structural(&mut self, text: &str, what: &str) -> Result<SyntaxTree, EditError> {
        self.syntax.parse(text).map_err(|failure| {
            tracing::warn!("{} produced an unparsable buffer: {}", what, failure);
            EditError::Parse(failure)
        })
    }

    fn committed(
        &self,
        state: &EditorState,
        text: String,
        parsed: Result<SyntaxTree, ParseFailure>,
        regions: RegionState,
    ) -> EditorState {
        let (parsable, last_tree, failure) = split_parse(parsed, state.last_tree.clone());
        EditorState {
            last_buffer: text,
            last_parsable: parsable,
            last_tree,
            failure,
            selection: state.selection,
            regions,
            pending: state.pending.clone(),
            revision: state.revision + 1,
        }
    }
}

impl<S: SyntaxService> std::fmt::Debug for StructuralEditor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuralEditor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Keep the previous tree when the new text fails to parse
fn split_parse(
    parsed: Result<SyntaxTree, ParseFailure>,
    previous: Option<SyntaxTree>,
) -> (bool, Option<SyntaxTree>, Option<ParseFailure>) {
    match parsed {
        Ok(tree) => (true, Some(tree), None),
        Err(failure) => (false, previous, Some(failure)),
    }
}

fn ensure_no_pending(state: &EditorState) -> Result<(), EditError> {
    match state.pending {
        Some(_) => Err(EditError::ConcurrentDeletionPending),
        None => Ok(()),
    }
}

/// Structural operations need a tree of the current buffer
fn require_tree(state: &EditorState) -> Result<&SyntaxTree, EditError> {
    state.tree().ok_or_else(|| {
        EditError::Parse(
            state
                .failure
                .clone()
                .unwrap_or_else(|| ParseFailure::new(None, "buffer does not parse")),
        )
    })
}
