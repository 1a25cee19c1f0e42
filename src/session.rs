//! A document session: engine, state and host wired together
//!
//! The session owns the only [`EditorState`] and swaps it wholesale for the
//! state of each accepted [`Transition`]. Outcomes are mirrored onto the
//! host (text, cursor, highlights).

use crate::buffer::LineIndex;
use crate::config::BrickConfig;
use crate::engine::{EditOutcome, EditorState, StructuralEditor, Transition};
use crate::error::EditError;
use crate::host::EditorHost;
use crate::position::TextRange;
use crate::syntax::{JavaScriptSyntax, SyntaxService};
use crate::templates::TemplateCatalog;

/// Highlight style tags handed to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyles {
    pub pending_delete: String,
    pub rejected_edit: String,
}

impl From<&BrickConfig> for HighlightStyles {
    fn from(config: &BrickConfig) -> Self {
        Self {
            pending_delete: config.pending_delete_style.clone(),
            rejected_edit: config.rejected_edit_style.clone(),
        }
    }
}

impl Default for HighlightStyles {
    fn default() -> Self {
        (&BrickConfig::default()).into()
    }
}

pub struct Session<H: EditorHost, S: SyntaxService = JavaScriptSyntax> {
    pub(crate) engine: StructuralEditor<S>,
    pub(crate) state: EditorState,
    pub(crate) host: H,
    pub(crate) catalog: TemplateCatalog,
    styles: HighlightStyles,
}

impl<H: EditorHost> Session<H, JavaScriptSyntax> {
    /// JavaScript session configured from `config`
    pub fn from_config(
        host: H,
        config: &BrickConfig,
        catalog: TemplateCatalog,
    ) -> Result<Self, EditError> {
        let engine =
            StructuralEditor::with_options(JavaScriptSyntax::new()?, config.engine_options());
        Ok(Self::new(engine, host, catalog, config.into()))
    }
}

impl<H: EditorHost, S: SyntaxService> Session<H, S> {
    /// Start a session on the host's current text
    pub fn new(
        mut engine: StructuralEditor<S>,
        host: H,
        catalog: TemplateCatalog,
        styles: HighlightStyles,
    ) -> Self {
        let state = engine.load(&host.get_text());
        tracing::debug!(
            parsable = state.is_parsable(),
            templates = catalog.len(),
            "session started"
        );
        Self {
            engine,
            state,
            host,
            catalog,
            styles,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access; call [`crate::messages::EditMsg::Sync`] after
    /// changing the text through it
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Adopt an operation's result and mirror it onto the host
    pub(crate) fn apply(
        &mut self,
        result: Result<Transition, EditError>,
    ) -> Result<EditOutcome, EditError> {
        let Transition { state, outcome } = match result {
            Ok(transition) => transition,
            Err(err) => {
                if err.is_rejection() {
                    tracing::warn!("edit rejected: {}", err);
                }
                // Keep the pending-delete highlight visible
                if matches!(err, EditError::GuardRejected { .. }) {
                    self.flash_rejection();
                }
                return Err(err);
            }
        };

        match &outcome {
            EditOutcome::Applied { cursor } => {
                self.host.clear_highlight();
                if self.host.get_text() != state.buffer() {
                    self.host.set_text(state.buffer());
                }
                self.host.set_cursor_position(*cursor);
            }
            EditOutcome::DeletionRequested(pending) => {
                self.host
                    .highlight_range(pending.target, &self.styles.pending_delete);
            }
            EditOutcome::Cancelled => self.host.clear_highlight(),
            EditOutcome::Synced if self.state.pending().is_some() => self.host.clear_highlight(),
            EditOutcome::Synced | EditOutcome::Unchanged => {}
        }

        self.state = state;
        Ok(outcome)
    }

    /// Flash the cursor's line
    fn flash_rejection(&mut self) {
        let lines = LineIndex::new(self.state.buffer());
        let start = lines.clamp(self.host.get_cursor_position()).with_column(0);
        let end = lines.clamp(start.with_column(usize::MAX));
        let range = TextRange::new(start, end);
        self.host.highlight_range(range, &self.styles.rejected_edit);
    }
}
