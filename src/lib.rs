//! Brick - structural block editing for JavaScript buffers
//!
//! Maps cursor positions onto a tree-sitter syntax tree and performs
//! tree-aware edits: whole-statement insertion and deletion, and character
//! edits that cannot break the structure around them. State changes flow
//! through an Elm-style [`EditMsg`]/[`update`] loop.

pub mod buffer;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod engine;
pub mod error;
pub mod guard;
pub mod host;
pub mod locate;
pub mod messages;
pub mod position;
pub mod region;
pub mod session;
pub mod syntax;
pub mod templates;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use config::BrickConfig;
pub use engine::{EditOutcome, EditorState, StructuralEditor};
pub use error::{EditError, ParseFailure};
pub use host::{EditorHost, MemoryHost};
pub use messages::EditMsg;
pub use position::{Position, TextRange};
pub use session::Session;
pub use update::update;
