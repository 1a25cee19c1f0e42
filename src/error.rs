//! Error taxonomy for the structural edit engine.
//!
//! Every variant is locally recoverable: an operation that returns an error
//! leaves the buffer and the `EditorState` exactly as they were.

use crate::position::Position;

/// Why a buffer (or template) failed to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Location of the first error or missing node, if the parser reported one
    pub position: Option<Position>,
    pub message: String,
}

impl ParseFailure {
    pub fn new(position: Option<Position>, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} at {}", self.message, pos),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseFailure {}

/// Errors surfaced by the engine entry points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Buffer or template does not parse
    Parse(ParseFailure),
    /// A position with line < 1
    InvalidPosition { line: usize, column: usize },
    /// A position that lies outside the buffer
    PositionOutOfRange(Position),
    /// The edit would cross protected punctuation or leave the editable region
    GuardRejected { reason: String },
    /// A structural deletion is awaiting confirmation
    ConcurrentDeletionPending,
    /// confirm/cancel called with a deletion the engine is not waiting on
    NoPendingDeletion,
    /// Template parsed, but not to exactly one statement
    InvalidTemplate { name: String, reason: String },
    /// No template with this name in the catalog
    UnknownTemplate(String),
    /// The tree-sitter grammar could not be loaded
    Language(String),
}

impl EditError {
    pub fn guard(reason: impl Into<String>) -> Self {
        Self::GuardRejected {
            reason: reason.into(),
        }
    }

    /// Whether the host should give visual "flash" feedback for this error
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::GuardRejected { .. } | Self::ConcurrentDeletionPending
        )
    }
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(failure) => write!(f, "Parse failure: {}", failure),
            Self::InvalidPosition { line, column } => {
                write!(f, "Invalid position {}:{} (lines start at 1)", line, column)
            }
            Self::PositionOutOfRange(pos) => write!(f, "Position {} is outside the buffer", pos),
            Self::GuardRejected { reason } => write!(f, "Edit rejected: {}", reason),
            Self::ConcurrentDeletionPending => {
                write!(f, "A block deletion is awaiting confirmation")
            }
            Self::NoPendingDeletion => write!(f, "No matching deletion is pending"),
            Self::InvalidTemplate { name, reason } => {
                write!(f, "Invalid template '{}': {}", name, reason)
            }
            Self::UnknownTemplate(name) => write!(f, "Unknown template: {}", name),
            Self::Language(e) => write!(f, "Language error: {}", e),
        }
    }
}

impl std::error::Error for EditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<ParseFailure> for EditError {
    fn from(failure: ParseFailure) -> Self {
        Self::Parse(failure)
    }
}
