//! JavaScript Syntax Service backed by tree-sitter
//!
//! Every call reparses the whole buffer. tree-sitter always produces a tree,
//! so "does not parse" means the tree contains an ERROR or MISSING node.

use std::sync::Arc;

use tree_sitter::{Node, Parser};

use super::kind::NodeKind;
use super::printer;
use super::tree::{SyntaxNode, SyntaxTree};
use super::SyntaxService;
use crate::buffer::LineIndex;
use crate::error::{EditError, ParseFailure};
use crate::position::TextRange;

/// tree-sitter-javascript wrapped as a [`SyntaxService`]
pub struct JavaScriptSyntax {
    parser: Parser,
}

impl JavaScriptSyntax {
    pub fn new() -> Result<Self, EditError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| {
                tracing::error!("Failed to set language for JavaScript: {}", e);
                EditError::Language(e.to_string())
            })?;
        Ok(Self { parser })
    }
}

impl std::fmt::Debug for JavaScriptSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaScriptSyntax").finish_non_exhaustive()
    }
}

impl SyntaxService for JavaScriptSyntax {
    fn parse(&mut self, text: &str) -> Result<SyntaxTree, ParseFailure> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| ParseFailure::new(None, "parser produced no tree"))?;
        let root = tree.root_node();
        let lines = LineIndex::new(text);

        if root.has_error() {
            let failure = match first_error(root) {
                Some(node) if node.is_missing() => ParseFailure::new(
                    Some(lines.position_of(node.start_byte())),
                    format!("missing `{}`", node.kind()),
                ),
                Some(node) => ParseFailure::new(
                    Some(lines.position_of(node.start_byte())),
                    "unexpected syntax",
                ),
                None => ParseFailure::new(None, "syntax error"),
            };
            tracing::trace!("parse failed: {}", failure);
            return Err(failure);
        }

        let mut program = build_node(root, &lines);
        program.span = lines.full_range();
        program.bytes = 0..text.len();
        Ok(SyntaxTree::new(Arc::from(text), program))
    }

    fn print(&self, tree: &SyntaxTree) -> String {
        printer::print_tree(tree)
    }
}

/// Grammar field holding a construct's body
fn body_field(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::IfStatement => Some("consequence"),
        NodeKind::ForStatement
        | NodeKind::WhileStatement
        | NodeKind::FunctionDeclaration
        | NodeKind::FunctionExpression => Some("body"),
        _ => None,
    }
}

fn build_node(node: Node<'_>, lines: &LineIndex) -> SyntaxNode {
    let kind = NodeKind::from_grammar(node.kind());
    let body_id = body_field(kind)
        .and_then(|field| node.child_by_field_name(field))
        .map(|n| n.id());

    let mut children = Vec::with_capacity(node.named_child_count());
    let mut body = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        // Comments are extras, not statements
        if child.is_extra() {
            continue;
        }
        if Some(child.id()) == body_id {
            body = Some(children.len());
        }
        children.push(build_node(child, lines));
    }

    let span = TextRange::new(
        lines.position_of(node.start_byte()),
        lines.position_of(node.end_byte()),
    );
    SyntaxNode::from_source(kind, span, node.byte_range(), children, body)
}

/// First ERROR or MISSING node in document order
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}
