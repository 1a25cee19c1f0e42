//! Command-line interface
//!
//! Supports:
//! - Locating the nodes a cursor maps to
//! - Inserting a template block at a cursor
//! - Deleting the block at a cursor or covering a selection
//! - Listing and validating templates
//!
//! Lines are 1-based and columns 0-based, the same as the engine.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::BrickConfig;
use crate::engine::{EditOutcome, EditorState};
use crate::guard::{protected_pair_at, PairKind};
use crate::host::{EditorHost, MemoryHost};
use crate::locate::{closest_deletable_block, closest_parent, previous_sibling};
use crate::messages::EditMsg;
use crate::position::{Position, TextRange};
use crate::region::EditableRegion;
use crate::session::Session;
use crate::syntax::{JavaScriptSyntax, KindSet, SyntaxService, Visit};
use crate::templates::TemplateCatalog;
use crate::update::update;

/// Structural block editing for JavaScript
#[derive(Parser, Debug)]
#[command(name = "brick", version, about = "Structural block editing for JavaScript")]
pub struct CliArgs {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the nodes a cursor position resolves to
    Locate {
        file: PathBuf,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        column: usize,
    },
    /// Insert a template block after the statement before the cursor
    Insert {
        file: PathBuf,
        /// Template name (case-insensitive)
        #[arg(short, long)]
        template: String,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        column: usize,
        /// Write the result back to the file instead of printing it
        #[arg(short, long)]
        write: bool,
    },
    /// Delete the block at the cursor, or the block covering a selection
    Delete {
        file: PathBuf,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        column: usize,
        /// Selection end line
        #[arg(long, requires = "to_column")]
        to_line: Option<usize>,
        /// Selection end column
        #[arg(long, requires = "to_line")]
        to_column: Option<usize>,
        /// Write the result back to the file instead of printing it
        #[arg(short, long)]
        write: bool,
    },
    /// List the available block templates
    Templates {
        /// Check that every template parses to one statement
        #[arg(long)]
        validate: bool,
    },
}

/// A node as reported on the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeReport {
    pub kind: String,
    pub start: Position,
    pub end: Position,
    pub path: Vec<usize>,
}

impl From<&Visit<'_>> for NodeReport {
    fn from(visit: &Visit<'_>) -> Self {
        let span = visit.node.span();
        Self {
            kind: visit.node.kind().to_string(),
            start: span.start,
            end: span.end,
            path: visit.path.indices().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairReport {
    pub kind: &'static str,
    pub open: Position,
    pub close: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocateReport {
    pub position: Position,
    pub container: NodeReport,
    pub deletable: Option<NodeReport>,
    pub previous_sibling: Option<NodeReport>,
    pub protected_pair: Option<PairReport>,
}

/// Result of an insert or delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditReport {
    pub changed: bool,
    pub cursor: Position,
    pub text: String,
    pub editable_regions: Vec<EditableRegion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateReport {
    pub name: String,
    pub description: Option<String>,
    pub code: String,
    pub valid: Option<bool>,
}

/// Run a command and render its output
pub fn run(args: &CliArgs, config: &BrickConfig, catalog: TemplateCatalog) -> Result<String> {
    match &args.command {
        Command::Locate { file, line, column } => {
            let report = locate(&read(file)?, position(*line, *column)?, config)?;
            render(args.json, &report, |r| {
                let mut out = format!(
                    "container: {} {}..{}\n",
                    r.container.kind, r.container.start, r.container.end
                );
                let optional = |label: &str, node: &Option<NodeReport>| match node {
                    Some(n) => format!("{}: {} {}..{}\n", label, n.kind, n.start, n.end),
                    None => format!("{}: none\n", label),
                };
                out.push_str(&optional("deletable", &r.deletable));
                out.push_str(&optional("previous sibling", &r.previous_sibling));
                if let Some(pair) = &r.protected_pair {
                    out.push_str(&format!(
                        "protected {}: {}..{}\n",
                        pair.kind, pair.open, pair.close
                    ));
                }
                out
            })
        }
        Command::Insert {
            file,
            template,
            line,
            column,
            write,
        } => {
            let cursor = position(*line, *column)?;
            let msg = EditMsg::InsertBlock(template.clone());
            let report = edit(file, config, catalog, cursor, None, msg)?;
            finish_edit(args.json, file, *write, report)
        }
        Command::Delete {
            file,
            line,
            column,
            to_line,
            to_column,
            write,
        } => {
            let cursor = position(*line, *column)?;
            let selection = match (to_line, to_column) {
                (Some(l), Some(c)) => Some(TextRange::ordered(cursor, position(*l, *c)?)),
                _ => None,
            };
            let msg = match selection {
                Some(_) => EditMsg::DeleteSelection,
                None => EditMsg::DeleteBlock,
            };
            let report = edit(file, config, catalog, cursor, selection, msg)?;
            finish_edit(args.json, file, *write, report)
        }
        Command::Templates { validate } => {
            let mut syntax = JavaScriptSyntax::new()?;
            let reports: Vec<TemplateReport> = catalog
                .iter()
                .map(|t| TemplateReport {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    code: t.code.clone(),
                    valid: validate.then(|| t.parse(&mut syntax).is_ok()),
                })
                .collect();
            render(args.json, &reports, |reports| {
                reports
                    .iter()
                    .map(|t| {
                        let status = match t.valid {
                            Some(true) => " [ok]",
                            Some(false) => " [invalid]",
                            None => "",
                        };
                        let description = t.description.as_deref().unwrap_or("");
                        format!("{}{}: {}\n", t.name, status, description)
                    })
                    .collect()
            })
        }
    }
}

fn position(line: usize, column: usize) -> Result<Position> {
    Position::new(line, column).context("invalid position")
}

fn read(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

fn render<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

/// Everything the locators say about `pos`
pub fn locate(text: &str, pos: Position, config: &BrickConfig) -> Result<LocateReport> {
    let tree = JavaScriptSyntax::new()?
        .parse(text)
        .map_err(|failure| anyhow::anyhow!("buffer does not parse: {}", failure))?;

    let container = closest_parent(&tree, pos, &KindSet::containers())?;
    let deletable = closest_deletable_block(&tree, pos, &config.deletable_kinds())?;
    let sibling = previous_sibling(&tree, pos)?;
    let pair = protected_pair_at(&tree, pos)?;

    Ok(LocateReport {
        position: pos,
        container: (&container).into(),
        deletable: deletable.as_ref().map(NodeReport::from),
        previous_sibling: sibling.as_ref().map(NodeReport::from),
        protected_pair: pair.map(|p| PairReport {
            kind: match p.kind {
                PairKind::Paren => "parens",
                PairKind::Brace => "braces",
            },
            open: p.open,
            close: p.close,
        }),
    })
}

/// Drive one message through a session on the file's text. Deletions are
/// confirmed straight away.
fn edit(
    file: &Path,
    config: &BrickConfig,
    catalog: TemplateCatalog,
    cursor: Position,
    selection: Option<TextRange>,
    msg: EditMsg,
) -> Result<EditReport> {
    let mut host = MemoryHost::new(&read(file)?);
    host.set_cursor_position(cursor);
    host.set_selection(selection);

    let mut session = Session::from_config(host, config, catalog)?;
    let mut outcome = update(&mut session, msg)?;
    if let EditOutcome::DeletionRequested(pending) = &outcome {
        tracing::debug!("confirming deletion of {}", pending.kind);
        outcome = update(&mut session, EditMsg::Confirm)?;
    }

    let state: &EditorState = session.state();
    Ok(EditReport {
        changed: matches!(outcome, EditOutcome::Applied { .. }),
        cursor: session.host().get_cursor_position(),
        text: state.buffer().to_string(),
        editable_regions: state.editable_regions(),
    })
}

fn finish_edit(json: bool, file: &Path, write: bool, report: EditReport) -> Result<String> {
    if write {
        if !report.changed {
            bail!("nothing to change in {}", file.display());
        }
        std::fs::write(file, &report.text)
            .with_context(|| format!("writing {}", file.display()))?;
        tracing::info!("wrote {}", file.display());
    }
    render(json, &report, |r| {
        if write {
            format!("cursor: {}\n", r.cursor)
        } else {
            r.text.clone()
        }
    })
}
