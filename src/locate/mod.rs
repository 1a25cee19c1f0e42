//! Node locators: mapping text positions onto syntax tree nodes
//!
//! All locators share one walk: a pre-order traversal that keeps the last
//! node covering every input position. Pre-order visits ancestors before
//! descendants, so the last match is the innermost one.

mod deletable;
mod sibling;

pub use deletable::{
    closest_common_deletable_block, closest_deletable_block, deletable_block_at_boundary,
    Boundary,
};
pub use sibling::{insertion_point, previous_sibling, InsertionPoint};

use crate::error::EditError;
use crate::position::{Position, TextRange};
use crate::syntax::{KindSet, NodePath, SyntaxTree, Visit};

/// How a position on a node's last line is tested against the node's end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndRule {
    /// Covered only if the node ends after the column (container lookups)
    Exclusive,
    /// Covered if the node ends at or after the column (deletable lookups)
    Inclusive,
}

/// Whether a node spanning `span` covers `pos`
pub fn covers(span: &TextRange, pos: Position, rule: EndRule) -> bool {
    let line = pos.line();
    if line < span.start.line() || line > span.end.line() {
        return false;
    }
    if line == span.start.line() && span.start.column() > pos.column() {
        return false;
    }
    if line == span.end.line() {
        return match rule {
            EndRule::Exclusive => span.end.column() > pos.column(),
            EndRule::Inclusive => span.end.column() >= pos.column(),
        };
    }
    true
}

/// Reject positions that do not name a line and column of the buffer
pub fn check_positions(tree: &SyntaxTree, positions: &[Position]) -> Result<(), EditError> {
    let lines = tree.line_index();
    match positions.iter().find(|p| !lines.contains(**p)) {
        Some(pos) => Err(EditError::PositionOutOfRange(*pos)),
        None => Ok(()),
    }
}

/// Last node in pre-order that covers every position and passes `accept`
pub(crate) fn last_covering<'t>(
    tree: &'t SyntaxTree,
    positions: &[Position],
    rule: EndRule,
    accept: impl Fn(&Visit<'t>) -> bool,
) -> Option<Visit<'t>> {
    let earliest = positions.iter().min()?;
    let mut found = None;
    for visit in tree.descendants() {
        // Nodes come in start order; nothing from here on can cover `earliest`
        if visit.node.span().start > *earliest {
            break;
        }
        let span = visit.node.span();
        if accept(&visit) && positions.iter().all(|p| covers(&span, *p, rule)) {
            found = Some(visit);
        }
    }
    found
}

/// Smallest node of one of `kinds` enclosing all `positions`.
///
/// Falls back to the root `Program` when nothing else matches, which is
/// also what a position after the last character resolves to.
pub fn closest_common_ancestor<'t>(
    tree: &'t SyntaxTree,
    positions: &[Position],
    kinds: &KindSet,
) -> Result<Visit<'t>, EditError> {
    check_positions(tree, positions)?;
    let found = last_covering(tree, positions, EndRule::Exclusive, |v| {
        kinds.contains(v.node.kind())
    });
    Ok(found.unwrap_or_else(|| root_visit(tree)))
}

/// Single-position form of [`closest_common_ancestor`]
pub fn closest_parent<'t>(
    tree: &'t SyntaxTree,
    position: Position,
    kinds: &KindSet,
) -> Result<Visit<'t>, EditError> {
    closest_common_ancestor(tree, &[position], kinds)
}

fn root_visit(tree: &SyntaxTree) -> Visit<'_> {
    Visit {
        node: tree.root(),
        parent: None,
        path: NodePath::root(),
    }
}
