//! Deletable-block locator
//!
//! Same walk as the container locator, restricted to deletable statement
//! kinds and using the inclusive end rule: a cursor resting right after a
//! statement's last character still counts as inside it.

use super::{check_positions, last_covering, EndRule};
use crate::error::EditError;
use crate::position::Position;
use crate::syntax::{KindSet, SyntaxTree, Visit};

/// Which edge of a statement a char edit is pressing against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The statement ends at the cursor (backspace)
    End,
    /// The statement starts at the cursor (forward delete)
    Start,
}

/// A deletable node must be a statement of a container, so a declaration
/// inside a `for` header resolves to the `for` itself.
fn is_candidate(visit: &Visit<'_>, kinds: &KindSet) -> bool {
    kinds.contains(visit.node.kind())
        && visit
            .parent
            .is_some_and(|parent| parent.kind().is_container())
}

pub fn closest_deletable_block<'t>(
    tree: &'t SyntaxTree,
    position: Position,
    kinds: &KindSet,
) -> Result<Option<Visit<'t>>, EditError> {
    closest_common_deletable_block(tree, &[position], kinds)
}

/// Smallest deletable statement covering every position, if any
pub fn closest_common_deletable_block<'t>(
    tree: &'t SyntaxTree,
    positions: &[Position],
    kinds: &KindSet,
) -> Result<Option<Visit<'t>>, EditError> {
    check_positions(tree, positions)?;
    Ok(last_covering(tree, positions, EndRule::Inclusive, |v| {
        is_candidate(v, kinds)
    }))
}

/// Innermost deletable statement whose start or end sits exactly on `cursor`
pub fn deletable_block_at_boundary<'t>(
    tree: &'t SyntaxTree,
    cursor: Position,
    boundary: Boundary,
    kinds: &KindSet,
) -> Result<Option<Visit<'t>>, EditError> {
    check_positions(tree, &[cursor])?;
    let mut found = None;
    for visit in tree.descendants() {
        let span = visit.node.span();
        if span.start > cursor {
            break;
        }
        let edge = match boundary {
            Boundary::End => span.end,
            Boundary::Start => span.start,
        };
        if edge == cursor && is_candidate(&visit, kinds) {
            found = Some(visit);
        }
    }
    Ok(found)
}
