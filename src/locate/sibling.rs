//! Sibling locator: where a new statement goes relative to the cursor

use super::closest_parent;
use crate::error::EditError;
use crate::position::Position;
use crate::syntax::{KindSet, NodePath, SyntaxTree, Visit};

/// The statement immediately before `position` in its enclosing container.
///
/// `None` means the position comes before every statement of the container.
pub fn previous_sibling(
    tree: &SyntaxTree,
    position: Position,
) -> Result<Option<Visit<'_>>, EditError> {
    let container = closest_parent(tree, position, &KindSet::containers())?;

    let mut previous = None;
    for (i, child) in container.node.statements().iter().enumerate() {
        let span = child.span();
        if span.end.line() < position.line()
            || (span.end.line() == position.line() && span.end.column() <= position.column())
        {
            previous = Some(Visit {
                node: child,
                parent: Some(container.node),
                path: container.path.child(i),
            });
        } else if span.start.line() > position.line() {
            break;
        }
    }
    Ok(previous)
}

/// Container and child index a statement inserted at a cursor lands at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPoint {
    pub container: NodePath,
    pub index: usize,
}

pub fn insertion_point(tree: &SyntaxTree, cursor: Position) -> Result<InsertionPoint, EditError> {
    if let Some(sibling) = previous_sibling(tree, cursor)? {
        if let (Some(container), Some(index)) = (sibling.path.parent(), sibling.path.index()) {
            return Ok(InsertionPoint {
                container,
                index: index + 1,
            });
        }
    }
    let container = closest_parent(tree, cursor, &KindSet::containers())?;
    Ok(InsertionPoint {
        container: container.path,
        index: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{JavaScriptSyntax, SyntaxService};

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column).unwrap()
    }

    #[test]
    fn test_insertion_point_after_sibling() {
        let tree = JavaScriptSyntax::new()
            .unwrap()
            .parse("function f() {\n    a();\n    b();\n}\n")
            .unwrap();
        let point = insertion_point(&tree, pos(2, 8)).unwrap();
        assert_eq!(point.container, NodePath::root().child(0).child(2));
        assert_eq!(point.index, 1);
    }

    #[test]
    fn test_insertion_point_first_in_block() {
        let tree = JavaScriptSyntax::new()
            .unwrap()
            .parse("function f() {\n    a();\n}\n")
            .unwrap();
        let point = insertion_point(&tree, pos(1, 14)).unwrap();
        assert_eq!(point.container, NodePath::root().child(0).child(2));
        assert_eq!(point.index, 0);
    }

    #[test]
    fn test_insertion_point_end_of_program() {
        let tree = JavaScriptSyntax::new()
            .unwrap()
            .parse("a();\nb();\n")
            .unwrap();
        let point = insertion_point(&tree, pos(3, 0)).unwrap();
        assert_eq!(point.container, NodePath::root());
        assert_eq!(point.index, 2);
    }
}
