//! Node kinds and kind sets
//!
//! Maps tree-sitter-javascript grammar kinds onto the handful of statement
//! kinds the engine interprets. Everything else is carried as `Other`.

use std::borrow::Cow;

/// Kind tag of a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    BlockStatement,
    IfStatement,
    ForStatement,
    WhileStatement,
    FunctionDeclaration,
    FunctionExpression,
    ExpressionStatement,
    ReturnStatement,
    VariableDeclaration,
    /// A grammar kind the engine does not interpret (raw tree-sitter name)
    Other(&'static str),
}

impl NodeKind {
    /// Map a tree-sitter-javascript node kind
    pub fn from_grammar(kind: &'static str) -> Self {
        match kind {
            "program" => NodeKind::Program,
            "statement_block" => NodeKind::BlockStatement,
            "if_statement" => NodeKind::IfStatement,
            "for_statement" => NodeKind::ForStatement,
            "while_statement" => NodeKind::WhileStatement,
            "function_declaration" => NodeKind::FunctionDeclaration,
            // Older grammars call function expressions `function`
            "function_expression" | "function" => NodeKind::FunctionExpression,
            "expression_statement" => NodeKind::ExpressionStatement,
            "return_statement" => NodeKind::ReturnStatement,
            "variable_declaration" | "lexical_declaration" => NodeKind::VariableDeclaration,
            other => NodeKind::Other(other),
        }
    }

    /// Display name (`IfStatement`, ...) or the raw grammar kind for `Other`
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::BlockStatement => "BlockStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::FunctionExpression => "FunctionExpression",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::Other(raw) => raw,
        }
    }

    /// Kinds holding an ordered list of statements
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::BlockStatement | NodeKind::Program)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of node kinds, matched by name so configuration can extend it
/// with grammar kinds the engine has no variant for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KindSet {
    names: Vec<Cow<'static, str>>,
}

impl KindSet {
    pub fn from_kinds(kinds: &[NodeKind]) -> Self {
        Self {
            names: kinds.iter().map(|k| Cow::Borrowed(k.name())).collect(),
        }
    }

    /// Node kinds that are valid parents for insertion
    pub fn containers() -> Self {
        Self::from_kinds(&[NodeKind::BlockStatement, NodeKind::Program])
    }

    /// Statement kinds eligible for atomic deletion
    pub fn deletable() -> Self {
        Self::from_kinds(&[
            NodeKind::IfStatement,
            NodeKind::ForStatement,
            NodeKind::FunctionDeclaration,
            NodeKind::WhileStatement,
            NodeKind::ExpressionStatement,
            NodeKind::ReturnStatement,
            NodeKind::VariableDeclaration,
        ])
    }

    /// Constructs whose header parens are protected
    pub fn punctuated() -> Self {
        Self::from_kinds(&[
            NodeKind::FunctionDeclaration,
            NodeKind::FunctionExpression,
            NodeKind::IfStatement,
            NodeKind::WhileStatement,
            NodeKind::ForStatement,
        ])
    }

    /// Add a kind by name (display name or raw grammar kind)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.insert_name(name);
        self
    }

    pub fn insert_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.names.iter().any(|n| *n == name) {
            self.names.push(Cow::Owned(name));
        }
    }

    pub fn union(&self, other: &KindSet) -> KindSet {
        let mut merged = self.clone();
        for name in &other.names {
            merged.insert_name(name.to_string());
        }
        merged
    }

    pub fn contains(&self, kind: NodeKind) -> bool {
        let name = kind.name();
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_ref())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
