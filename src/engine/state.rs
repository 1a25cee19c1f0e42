//! Session state carried between engine operations

use serde::Serialize;

use crate::error::ParseFailure;
use crate::position::TextRange;
use crate::region::{EditableRegion, RegionState};
use crate::syntax::{NodeKind, NodePath, SyntaxTree};

/// A structural deletion waiting for the host to confirm or cancel it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    /// Revision of the state the deletion was requested against
    pub revision: u64,
    pub kind: NodeKind,
    /// Span of the statement to remove
    pub target: TextRange,
    pub(crate) path: NodePath,
}

/// Everything the engine remembers about the buffer.
///
/// Replaced wholesale by each accepted operation; rejected operations leave
/// it untouched.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub(crate) last_buffer: String,
    pub(crate) last_parsable: bool,
    /// Parse of the most recent buffer that parsed
    pub(crate) last_tree: Option<SyntaxTree>,
    pub(crate) failure: Option<ParseFailure>,
    pub(crate) selection: Option<TextRange>,
    pub(crate) regions: RegionState,
    pub(crate) pending: Option<PendingDeletion>,
    pub(crate) revision: u64,
}

impl EditorState {
    pub fn buffer(&self) -> &str {
        &self.last_buffer
    }

    pub fn is_parsable(&self) -> bool {
        self.last_parsable
    }

    /// Tree of the current buffer (None while it does not parse)
    pub fn tree(&self) -> Option<&SyntaxTree> {
        self.last_tree.as_ref().filter(|_| self.last_parsable)
    }

    /// Tree of the last buffer that parsed, possibly older than the buffer
    pub fn last_tree(&self) -> Option<&SyntaxTree> {
        self.last_tree.as_ref()
    }

    pub fn parse_failure(&self) -> Option<&ParseFailure> {
        self.failure.as_ref()
    }

    pub fn selection(&self) -> Option<TextRange> {
        self.selection
    }

    pub fn region_state(&self) -> &RegionState {
        &self.regions
    }

    pub fn editable_regions(&self) -> Vec<EditableRegion> {
        self.regions.regions(&self.last_buffer)
    }

    pub fn pending(&self) -> Option<&PendingDeletion> {
        self.pending.as_ref()
    }

    /// Bumped by every accepted operation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            revision: self.revision,
            parsable: self.last_parsable,
            buffer_len: self.last_buffer.len(),
            regions: match &self.regions {
                RegionState::WholeBuffer => None,
                RegionState::Constrained(regions) => Some(regions.clone()),
            },
            pending: self.pending.as_ref().map(|p| p.target),
        }
    }
}

/// Compact view of an [`EditorState`] for logging and diffing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub revision: u64,
    pub parsable: bool,
    pub buffer_len: usize,
    /// None while the whole buffer is editable
    pub regions: Option<Vec<EditableRegion>>,
    pub pending: Option<TextRange>,
}

impl StateSnapshot {
    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &StateSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.revision != other.revision {
            changes.push(format!("revision: {} → {}", self.revision, other.revision));
        }
        if self.parsable != other.parsable {
            changes.push(format!("parsable: {} → {}", self.parsable, other.parsable));
        }
        if self.buffer_len != other.buffer_len {
            changes.push(format!("len: {} → {}", self.buffer_len, other.buffer_len));
        }
        if self.regions != other.regions {
            let describe = |r: &Option<Vec<EditableRegion>>| match r {
                None => "whole buffer".to_string(),
                Some(regions) => regions
                    .iter()
                    .map(|r| format!("{}..{}", r.start, r.end))
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            changes.push(format!(
                "regions: {} → {}",
                describe(&self.regions),
                describe(&other.regions)
            ));
        }
        match (&self.pending, &other.pending) {
            (None, Some(target)) => changes.push(format!("pending delete {}", target)),
            (Some(_), None) => changes.push("pending delete resolved".to_string()),
            _ => {}
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
