//! Syntax Service
//!
//! Parses a buffer into an immutable [`SyntaxTree`] and prints trees back to
//! text. The engine only talks to the [`SyntaxService`] trait.
//!
//! ## Architecture
//!
//! ```text
//! text → JavaScriptSyntax::parse → SyntaxTree (immutable)
//!      → with_statement_inserted / with_statement_removed → SyntaxTree
//!      → JavaScriptSyntax::print → text
//! ```

mod kind;
mod parser;
mod printer;
mod tree;

pub use kind::{KindSet, NodeKind};
pub use parser::JavaScriptSyntax;
pub use tree::{Descendants, NodePath, SyntaxNode, SyntaxTree, Visit};

use crate::error::ParseFailure;

/// Parse and print contract the engine depends on.
///
/// `print` must reproduce the parsed text exactly for a tree that has not
/// been structurally edited.
pub trait SyntaxService {
    fn parse(&mut self, text: &str) -> Result<SyntaxTree, ParseFailure>;
    fn print(&self, tree: &SyntaxTree) -> String;
}
