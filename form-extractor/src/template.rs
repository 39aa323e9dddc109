use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed-shape record produced by a [`LineTemplate`]; absent fields serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateRecord(IndexMap<String, Option<String>>);

impl TemplateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Setting a field again replaces its value in place.
    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) {
        self.0.insert(name.into(), value);
    }

    /// Matched value of `name`; `None` both for unknown fields and unmatched ones.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.as_deref())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Document-type specific extractor working on LINE texts only.
///
/// Positional and anchor heuristics live behind this trait so a layout can be
/// re-described without touching key/value reconstruction.
pub trait LineTemplate: Send + Sync {
    /// Label callers pass to select this template.
    fn document_type(&self) -> &str;
    fn extract(&self, lines: &[&str]) -> TemplateRecord;
}

/// How one template field is located among the LINE texts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum LineRule {
    /// First line starting with `anchor`; the value runs up to the next `anchor`
    /// on that line, or to its end.
    Prefix { anchor: String },
    /// First line containing `anchor`; the value is the text between it and the
    /// next `anchor`, or the end of the line.
    Contains { anchor: String },
    /// The line at a fixed zero-based position.
    Index { index: usize },
}

impl LineRule {
    pub fn apply(&self, lines: &[&str]) -> Option<String> {
        let value = match self {
            LineRule::Prefix { anchor } => lines
                .iter()
                .find_map(|l| l.strip_prefix(anchor.as_str()))
                .map(|rest| up_to_anchor(rest, anchor))?,
            LineRule::Contains { anchor } => lines
                .iter()
                .find_map(|l| l.split_once(anchor.as_str()).map(|(_, rest)| rest))
                .map(|rest| up_to_anchor(rest, anchor))?,
            LineRule::Index { index } => lines.get(*index).copied()?,
        };
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

fn up_to_anchor<'l>(rest: &'l str, anchor: &str) -> &'l str {
    rest.split_once(anchor).map_or(rest, |(head, _)| head)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldRule {
    pub name: String,
    #[serde(flatten)]
    pub rule: LineRule,
}

/// Data-driven [`LineTemplate`]: a document type plus one rule per output field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleTemplate {
    pub document_type: String,
    pub fields: Vec<FieldRule>,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template has an empty document type")]
    EmptyDocumentType,
    #[error("template `{document_type}` declares field `{field}` more than once")]
    DuplicateField { document_type: String, field: String },
    #[error("template `{document_type}` field `{field}` has an empty anchor")]
    EmptyAnchor { document_type: String, field: String },
    #[error("invalid template definition: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RuleTemplate {
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.document_type.trim().is_empty() {
            return Err(TemplateError::EmptyDocumentType);
        }
        let mut seen = HashSet::new();
        for f in &self.fields {
            if let LineRule::Prefix { anchor } | LineRule::Contains { anchor } = &f.rule {
                if anchor.is_empty() {
                    return Err(TemplateError::EmptyAnchor {
                        document_type: self.document_type.clone(),
                        field: f.name.clone(),
                    });
                }
            }
            if !seen.insert(f.name.as_str()) {
                return Err(TemplateError::DuplicateField {
                    document_type: self.document_type.clone(),
                    field: f.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON array of templates.
    pub fn list_from_json(bytes: &[u8]) -> Result<Vec<RuleTemplate>, TemplateError> {
        let templates: Vec<RuleTemplate> = serde_json::from_slice(bytes)?;
        for t in &templates {
            t.validate()?;
        }
        Ok(templates)
    }
}

impl LineTemplate for RuleTemplate {
    fn document_type(&self) -> &str {
        &self.document_type
    }

    fn extract(&self, lines: &[&str]) -> TemplateRecord {
        let mut record = TemplateRecord::new();
        for f in &self.fields {
            record.set(f.name.clone(), f.rule.apply(lines));
        }
        record
    }
}

/// Templates keyed by document-type label.
#[derive(Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Box<dyn LineTemplate>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template`, returning the one it replaced for the same label.
    pub fn register(&mut self, template: Box<dyn LineTemplate>) -> Option<Box<dyn LineTemplate>> {
        self.templates.insert(template.document_type().to_string(), template)
    }

    pub fn get(&self, document_type: &str) -> Option<&dyn LineTemplate> {
        self.templates.get(document_type).map(|t| t.as_ref())
    }

    pub fn document_types(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("document_types", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}
