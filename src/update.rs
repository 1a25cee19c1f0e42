//! Update function for the Elm-style architecture
//!
//! All edits flow through [`update`].

use crate::engine::{CharEdit, EditOutcome, Transition};
use crate::error::EditError;
use crate::host::EditorHost;
use crate::messages::EditMsg;
use crate::session::Session;
use crate::syntax::SyntaxService;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

/// Main update function
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update<H: EditorHost, S: SyntaxService>(
    session: &mut Session<H, S>,
    msg: EditMsg,
) -> Result<EditOutcome, EditError> {
    #[cfg(debug_assertions)]
    {
        update_traced(session, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(session, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner<H: EditorHost, S: SyntaxService>(
    session: &mut Session<H, S>,
    msg: EditMsg,
) -> Result<EditOutcome, EditError> {
    let cursor = session.host.get_cursor_position();
    let state = &session.state;
    let engine = &mut session.engine;

    let result = match msg {
        EditMsg::InsertBlock(name) => match session.catalog.find(&name) {
            Ok(template) => engine.insert_block(state, template, cursor),
            Err(e) => Err(e),
        },
        EditMsg::DeleteBlock => engine.delete_block(state, cursor),
        EditMsg::DeleteSelection => match session.host.get_selection() {
            Some(range) if !range.is_empty() => engine.delete_selection(state, range),
            _ => Ok(Transition::unchanged(state)),
        },
        EditMsg::Backspace => engine.guarded_char_edit(
            state,
            cursor,
            session.host.get_selection(),
            CharEdit::Backspace,
        ),
        EditMsg::Delete => engine.guarded_char_edit(
            state,
            cursor,
            session.host.get_selection(),
            CharEdit::Delete,
        ),
        EditMsg::TypeChar(ch) => engine.type_char(state, cursor, ch),
        EditMsg::Confirm => match state.pending() {
            Some(pending) => engine.confirm(state, pending),
            None => Err(EditError::NoPendingDeletion),
        },
        EditMsg::Cancel => match state.pending() {
            Some(pending) => engine.cancel(state, pending),
            None => Err(EditError::NoPendingDeletion),
        },
        EditMsg::Sync => {
            let text = session.host.get_text();
            engine.sync(state, &text)
        }
    };

    session.apply(result)
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after state snapshots and logs the diff.
#[cfg(debug_assertions)]
fn update_traced<H: EditorHost, S: SyntaxService>(
    session: &mut Session<H, S>,
    msg: EditMsg,
) -> Result<EditOutcome, EditError> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = session.state.snapshot();
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(session, msg);

    if let Some(diff) = before.diff(&session.state.snapshot()) {
        debug!(target: "edit", %diff, "state changed");
    }
    if let Err(ref e) = result {
        debug!(target: "edit", error = %e, "operation failed");
    }

    result
}

/// Display name for a message, e.g. `TypeChar('x')`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &EditMsg) -> String {
    format!("{:?}", msg)
}
