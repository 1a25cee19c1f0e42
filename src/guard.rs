//! Punctuation guard
//!
//! Protected punctuation is the paren pair around a function's parameters
//! or an if/while/for header, and the brace pair of every block. An edit may
//! not have one end strictly inside such a pair and the other end outside.

use crate::error::EditError;
use crate::locate::closest_parent;
use crate::position::{Position, TextRange};
use crate::syntax::{KindSet, NodeKind, SyntaxNode, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    Paren,
    Brace,
}

/// A protected delimiter pair.
///
/// `open` is the position of the opening char, `close` the position just
/// after the closing char, so the pair's text is `open..close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedPair {
    pub kind: PairKind,
    pub open: Position,
    pub close: Position,
}

impl ProtectedPair {
    /// Strictly between the delimiters, see [`Position::is_between`]
    pub fn strictly_contains(&self, pos: &Position) -> bool {
        pos.is_between(&self.open, &self.close)
    }

    /// Text between the delimiters, exclusive of both
    pub fn interior(&self) -> TextRange {
        TextRange::new(self.open.offset_column(1), self.close.offset_column(-1))
    }
}

/// Header parens of a punctuated construct: the first `(` after the
/// construct's start and the last `)` before its body.
pub fn paren_pair(tree: &SyntaxTree, node: &SyntaxNode) -> Option<ProtectedPair> {
    if node.is_inserted() || !KindSet::punctuated().contains(node.kind()) {
        return None;
    }
    let body = node.body()?;
    let start = node.byte_range().start;
    let header = tree.source().get(start..body.byte_range().start)?;
    let open = header.find('(')?;
    let close = header.rfind(')')?;
    if close < open {
        return None;
    }

    let lines = tree.line_index();
    Some(ProtectedPair {
        kind: PairKind::Paren,
        open: lines.position_of(start + open),
        close: lines.position_of(start + close + 1),
    })
}

/// Braces of a block, straight from its span
pub fn brace_pair(node: &SyntaxNode) -> Option<ProtectedPair> {
    (node.kind() == NodeKind::BlockStatement && !node.is_inserted()).then(|| ProtectedPair {
        kind: PairKind::Brace,
        open: node.span().start,
        close: node.span().end,
    })
}

/// The pair surrounding `pos`, taken from its closest punctuated or
/// container ancestor. None when that ancestor is the program.
pub fn protected_pair_at(tree: &SyntaxTree, pos: Position) -> Result<Option<ProtectedPair>, EditError> {
    let relevant = KindSet::punctuated().union(&KindSet::containers());
    let ancestor = closest_parent(tree, pos, &relevant)?;
    Ok(paren_pair(tree, ancestor.node).or_else(|| brace_pair(ancestor.node)))
}

/// Innermost header paren pair whose interior encloses `pos` (inclusive)
pub fn enclosing_paren_pair(tree: &SyntaxTree, pos: Position) -> Option<ProtectedPair> {
    tree.descendants()
        .take_while(|v| v.node.span().start <= pos)
        .filter_map(|v| paren_pair(tree, v.node))
        .filter(|pair| pair.interior().encloses(&pos))
        .last()
}

/// Whether editing `range` would split a protected pair
pub fn spans_protected_punctuation(tree: &SyntaxTree, range: TextRange) -> Result<bool, EditError> {
    let start_pair = protected_pair_at(tree, range.start)?;
    let end_pair = protected_pair_at(tree, range.end)?;

    let splits = |pair: Option<ProtectedPair>, inside: &Position, other: &Position, kind: PairKind| {
        pair.is_some_and(|p| {
            p.kind == kind && p.strictly_contains(inside) && !p.strictly_contains(other)
        })
    };

    let rejected = [PairKind::Paren, PairKind::Brace].into_iter().any(|kind| {
        splits(start_pair, &range.start, &range.end, kind)
            || splits(end_pair, &range.end, &range.start, kind)
    });
    if rejected {
        tracing::debug!("range {} splits protected punctuation", range);
    }
    Ok(rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{JavaScriptSyntax, SyntaxService};

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column).unwrap()
    }

    fn parse(text: &str) -> SyntaxTree {
        JavaScriptSyntax::new().unwrap().parse(text).unwrap()
    }

    #[test]
    fn test_paren_pair_of_function() {
        let tree = parse("function f(a,b) { return a; }");
        let function = &tree.root().children()[0];
        let pair = paren_pair(&tree, function).unwrap();
        assert_eq!(pair.open, pos(1, 10));
        assert_eq!(pair.close, pos(1, 15));
        assert_eq!(pair.interior(), TextRange::new(pos(1, 11), pos(1, 14)));
    }

    #[test]
    fn test_paren_pair_skips_nested_parens() {
        let tree = parse("while ( (nested) ) {}");
        let pair = paren_pair(&tree, &tree.root().children()[0]).unwrap();
        assert_eq!(pair.open, pos(1, 6));
        assert_eq!(pair.close, pos(1, 18));
    }

    #[test]
    fn test_no_pair_at_top_level() {
        let tree = parse("a();\n");
        assert_eq!(protected_pair_at(&tree, pos(1, 2)).unwrap(), None);
    }

    #[test]
    fn test_enclosing_paren_pair_prefers_innermost() {
        let tree = parse("function f(a) {\n    if (a) {}\n}");
        let pair = enclosing_paren_pair(&tree, pos(2, 8)).unwrap();
        assert_eq!(pair.open, pos(2, 7));
        assert!(enclosing_paren_pair(&tree, pos(2, 11)).is_none());
        let outer = enclosing_paren_pair(&tree, pos(1, 11)).unwrap();
        assert_eq!(outer.open, pos(1, 10));
    }

    #[test]
    fn test_selection_across_parameter_list() {
        let tree = parse("function f(a,b) { return a; }");
        let across = TextRange::new(pos(1, 12), pos(1, 29));
        assert!(spans_protected_punctuation(&tree, across).unwrap());

        let within = TextRange::new(pos(1, 11), pos(1, 14));
        assert!(!spans_protected_punctuation(&tree, within).unwrap());
    }

    #[test]
    fn test_out_of_range_endpoint_is_an_error() {
        let tree = parse("a();");
        let range = TextRange::new(pos(1, 0), pos(3, 0));
        assert!(matches!(
            spans_protected_punctuation(&tree, range),
            Err(EditError::PositionOutOfRange(_))
        ));
    }
}
