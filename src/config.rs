//! Engine configuration
//!
//! Stored in `~/.config/brick-editor/config.yaml`. Every field is optional;
//! a missing or broken file falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::EngineOptions;
use crate::syntax::KindSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickConfig {
    /// One level of indentation for inserted blocks
    #[serde(default = "default_indent")]
    pub indent: String,
    /// Kinds added to the deletable set, by display or grammar name
    #[serde(default)]
    pub extra_deletable_kinds: Vec<String>,
    /// Style tag for the statement awaiting delete confirmation
    #[serde(default = "default_pending_delete_style")]
    pub pending_delete_style: String,
    /// Style tag flashed when an edit is rejected
    #[serde(default = "default_rejected_edit_style")]
    pub rejected_edit_style: String,
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_pending_delete_style() -> String {
    "pending-delete".to_string()
}

fn default_rejected_edit_style() -> String {
    "rejected-edit".to_string()
}

impl Default for BrickConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            extra_deletable_kinds: Vec::new(),
            pending_delete_style: default_pending_delete_style(),
            rejected_edit_style: default_rejected_edit_style(),
        }
    }
}

impl BrickConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk, creating the config directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Deletable kinds: the defaults plus `extra_deletable_kinds`
    pub fn deletable_kinds(&self) -> KindSet {
        self.extra_deletable_kinds
            .iter()
            .fold(KindSet::deletable(), |set, name| set.with_name(name.as_str()))
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            indent: self.indent.clone(),
            deletable: self.deletable_kinds(),
        }
    }
}
