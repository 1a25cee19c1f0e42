//! Immutable syntax tree produced by the Syntax Service
//!
//! Trees are never mutated after parsing. Structural edits clone the tree,
//! mark the path to the changed container as touched, and return the new
//! tree; the printer reproduces untouched nodes straight from the source.

use std::ops::Range;
use std::sync::Arc;

use super::kind::NodeKind;
use super::printer;
use crate::buffer::LineIndex;
use crate::error::EditError;
use crate::position::TextRange;

/// Where a node's text comes from when printing
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Origin {
    /// A node of the parsed source. `touched` nodes have a modified
    /// descendant; `removed` lists source bytes elided from between children.
    Source {
        touched: bool,
        removed: Vec<Range<usize>>,
    },
    /// A statement spliced in by an edit, with its already-laid-out text
    Inserted(String),
}

/// A node of the syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub(crate) kind: NodeKind,
    pub(crate) span: TextRange,
    pub(crate) bytes: Range<usize>,
    pub(crate) children: Vec<SyntaxNode>,
    /// Index of the function/loop body or the if consequence in `children`
    pub(crate) body: Option<usize>,
    pub(crate) origin: Origin,
}

impl SyntaxNode {
    pub(crate) fn from_source(
        kind: NodeKind,
        span: TextRange,
        bytes: Range<usize>,
        children: Vec<SyntaxNode>,
        body: Option<usize>,
    ) -> Self {
        Self {
            kind,
            span,
            bytes,
            children,
            body,
            origin: Origin::Source {
                touched: false,
                removed: Vec::new(),
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Span in (line, column) terms. Inserted nodes keep the span they had
    /// in their template; reparse the printed buffer for real coordinates.
    pub fn span(&self) -> TextRange {
        self.span
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.bytes.clone()
    }

    /// Named children in source order (statements, for containers)
    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    /// Ordered statement list of a container, empty for other kinds
    pub fn statements(&self) -> &[SyntaxNode] {
        if self.kind.is_container() {
            &self.children
        } else {
            &[]
        }
    }

    pub fn body(&self) -> Option<&SyntaxNode> {
        self.body.and_then(|i| self.children.get(i))
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self.origin, Origin::Inserted(_))
    }

    /// Source text of this node
    pub fn text<'a>(&'a self, source: &'a str) -> &'a str {
        match &self.origin {
            Origin::Inserted(text) => text.trim(),
            Origin::Source { .. } => source.get(self.bytes.clone()).unwrap_or(""),
        }
    }

    /// Lazy pre-order walk over this node and all of its descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![Visit {
                node: self,
                parent: None,
                path: NodePath::root(),
            }],
        }
    }

    fn touch(&mut self) {
        if let Origin::Source { touched, .. } = &mut self.origin {
            *touched = true;
        }
    }
}

/// Child indices leading from the root to a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<NodePath> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Index of the node within its parent (None for the root)
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `self` is `other` or one of its ancestors
    pub fn is_prefix_of(&self, other: &NodePath) -> bool {
        other.0.starts_with(&self.0)
    }
}

/// A node yielded by [`Descendants`]
#[derive(Debug, Clone)]
pub struct Visit<'a> {
    pub node: &'a SyntaxNode,
    pub parent: Option<&'a SyntaxNode>,
    pub path: NodePath,
}

/// Pre-order iterator over a subtree. Clone it to restart from any point.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        for (i, child) in visit.node.children.iter().enumerate().rev() {
            self.stack.push(Visit {
                node: child,
                parent: Some(visit.node),
                path: visit.path.child(i),
            });
        }
        Some(visit)
    }
}

/// A parsed buffer: the source text and its root `Program` node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    source: Arc<str>,
    root: SyntaxNode,
}

impl SyntaxTree {
    pub(crate) fn new(source: Arc<str>, root: SyntaxNode) -> Self {
        Self { source, root }
    }

    /// The text this tree was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn line_index(&self) -> LineIndex<'_> {
        LineIndex::new(&self.source)
    }

    pub fn descendants(&self) -> Descendants<'_> {
        self.root.descendants()
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&SyntaxNode> {
        path.indices()
            .iter()
            .try_fold(&self.root, |node, i| node.children.get(*i))
    }

    /// Whether any structural edit has been applied since parsing
    pub fn is_modified(&self) -> bool {
        matches!(self.root.origin, Origin::Source { touched: true, .. })
    }

    /// A new tree with `statement` spliced into `container` at `index`.
    ///
    /// `statement_source` is the text `statement` was parsed from. The
    /// statement is re-indented to fit its new container using `indent_unit`
    /// for one nesting level.
    pub fn with_statement_inserted(
        &self,
        container: &NodePath,
        index: usize,
        statement: &SyntaxNode,
        statement_source: &str,
        indent_unit: &str,
    ) -> Result<SyntaxTree, EditError> {
        let parent = self.container_at(container)?;
        if index > parent.children.len() {
            return Err(EditError::guard(format!(
                "insertion index {} past the end of {}",
                index,
                parent.kind()
            )));
        }

        let text = printer::insertion_text(
            &self.source,
            parent,
            index,
            statement.text(statement_source),
            indent_unit,
        );
        let inserted = SyntaxNode {
            kind: statement.kind,
            span: statement.span,
            bytes: statement.bytes.clone(),
            children: statement.children.clone(),
            body: statement.body,
            origin: Origin::Inserted(text),
        };

        let mut root = self.root.clone();
        let target = touch_path(&mut root, container.indices()).ok_or_else(|| {
            EditError::guard(format!("no node at {:?}", container.indices()))
        })?;
        target.children.insert(index, inserted);

        Ok(SyntaxTree {
            source: Arc::clone(&self.source),
            root,
        })
    }

    /// A new tree without the statement at `statement`
    pub fn with_statement_removed(&self, statement: &NodePath) -> Result<SyntaxTree, EditError> {
        let (container, index) = match (statement.parent(), statement.index()) {
            (Some(container), Some(index)) => (container, index),
            _ => return Err(EditError::guard("the program itself cannot be removed")),
        };
        let parent = self.container_at(&container)?;
        let removed = parent
            .children
            .get(index)
            .ok_or_else(|| EditError::guard(format!("no statement at {:?}", statement.indices())))?;

        let elided = match removed.origin {
            Origin::Source { .. } => Some(printer::removal_range(&self.source, parent, index)),
            Origin::Inserted(_) => None,
        };

        let mut root = self.root.clone();
        let target = touch_path(&mut root, container.indices()).ok_or_else(|| {
            EditError::guard(format!("no node at {:?}", container.indices()))
        })?;
        target.children.remove(index);
        if let (Some(range), Origin::Source { removed, .. }) = (elided, &mut target.origin) {
            removed.push(range);
            removed.sort_by_key(|r| r.start);
        }

        Ok(SyntaxTree {
            source: Arc::clone(&self.source),
            root,
        })
    }

    fn container_at(&self, path: &NodePath) -> Result<&SyntaxNode, EditError> {
        let node = self
            .node_at(path)
            .ok_or_else(|| EditError::guard(format!("no node at {:?}", path.indices())))?;
        if !node.kind().is_container() {
            return Err(EditError::guard(format!(
                "{} does not hold statements",
                node.kind()
            )));
        }
        Ok(node)
    }
}

/// Walk `path` from `node`, marking every node on the way as touched
fn touch_path<'a>(node: &'a mut SyntaxNode, path: &[usize]) -> Option<&'a mut SyntaxNode> {
    node.touch();
    match path.split_first() {
        None => Some(node),
        Some((i, rest)) => node.children.get_mut(*i).and_then(|c| touch_path(c, rest)),
    }
}
