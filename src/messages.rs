//! Message types for the Elm-style architecture
//!
//! Every edit a host can request flows through [`EditMsg`] and
//! [`crate::update::update`].

/// Edit requests from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMsg {
    /// Insert the named template at the host cursor
    InsertBlock(String),
    /// Request deletion of the statement around the host cursor
    DeleteBlock,
    /// Request deletion of the statement covering the host selection
    DeleteSelection,
    /// Backspace key
    Backspace,
    /// Forward delete key
    Delete,
    /// Insert a character at the host cursor
    TypeChar(char),
    /// Commit the pending deletion
    Confirm,
    /// Drop the pending deletion
    Cancel,
    /// Re-read the host text after an outside change
    Sync,
}

