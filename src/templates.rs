//! Block template catalog
//!
//! Templates ship embedded in the binary; a `templates.yaml` in the user's
//! config dir overrides entries by name or adds new ones.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::syntax::{SyntaxService, SyntaxTree};

/// Default templates embedded at compile time
const DEFAULT_TEMPLATES_YAML: &str = include_str!("../templates.yaml");

/// A named snippet that inserts as one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BlockTemplate {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            description: None,
        }
    }

    /// Parse the template, requiring exactly one statement
    pub fn parse<S: SyntaxService>(&self, syntax: &mut S) -> Result<SyntaxTree, EditError> {
        let tree = syntax.parse(&self.code)?;
        match tree.root().statements().len() {
            1 => Ok(tree),
            n => Err(EditError::InvalidTemplate {
                name: self.name.clone(),
                reason: format!("expected exactly one statement, found {}", n),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: Vec<BlockTemplate>,
}

/// Errors loading a template file
#[derive(Debug, Clone)]
pub enum TemplateError {
    IoError(String),
    ParseError(String),
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::IoError(e) => write!(f, "IO error: {}", e),
            TemplateError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Ordered set of templates, unique by name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateCatalog {
    templates: Vec<BlockTemplate>,
}

impl TemplateCatalog {
    pub fn parse_yaml(yaml: &str) -> Result<Self, TemplateError> {
        let file: TemplateFile =
            serde_yaml::from_str(yaml).map_err(|e| TemplateError::ParseError(e.to_string()))?;
        let mut catalog = Self::default();
        for template in file.templates {
            catalog.upsert(template);
        }
        Ok(catalog)
    }

    pub fn load_file(path: &Path) -> Result<Self, TemplateError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TemplateError::IoError(e.to_string()))?;
        Self::parse_yaml(&content)
    }

    /// The embedded default catalog
    pub fn builtin() -> Self {
        match Self::parse_yaml(DEFAULT_TEMPLATES_YAML) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("Failed to parse embedded templates: {}", e);
                Self::default()
            }
        }
    }

    /// Builtin templates merged with the user's templates file, if any
    pub fn load() -> Self {
        let mut catalog = Self::builtin();
        let Some(path) = crate::config_paths::templates_file() else {
            return catalog;
        };
        if !path.exists() {
            return catalog;
        }
        match Self::load_file(&path) {
            Ok(user) => {
                tracing::info!(
                    "Merging user templates from {} ({} templates)",
                    path.display(),
                    user.len()
                );
                catalog.merge(user);
            }
            Err(e) => {
                tracing::warn!("Failed to load user templates from {}: {}", path.display(), e);
            }
        }
        catalog
    }

    /// Replace the template with the same name, or append
    pub fn upsert(&mut self, template: BlockTemplate) {
        match self.templates.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn merge(&mut self, other: TemplateCatalog) {
        for template in other.templates {
            self.upsert(template);
        }
    }

    pub fn get(&self, name: &str) -> Option<&BlockTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Look up by name, ignoring ASCII case
    pub fn find(&self, name: &str) -> Result<&BlockTemplate, EditError> {
        self.get(name)
            .or_else(|| self.templates.iter().find(|t| t.name.eq_ignore_ascii_case(name)))
            .ok_or_else(|| EditError::UnknownTemplate(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Check that every template parses to exactly one statement
    pub fn validate<S: SyntaxService>(&self, syntax: &mut S) -> Result<(), EditError> {
        for template in &self.templates {
            template.parse(syntax).map_err(|e| match e {
                EditError::Parse(failure) => EditError::InvalidTemplate {
                    name: template.name.clone(),
                    reason: failure.to_string(),
                },
                other => other,
            })?;
        }
        Ok(())
    }
}
