use std::fs;
use std::path::{Path, PathBuf};

use form_extractor::RuleTemplate;
use serde::Deserialize;

use crate::ServiceError;

/// What to do with a key block that has no VALUE edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Fail the whole extraction.
    Abort,
    /// Drop that key, log it and report it in the response meta.
    Skip,
}

/// Shape of the generic (non-template) response data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueMode {
    /// First value per field. Extra values of repeated fields are dropped.
    First,
    /// Every recognized value per field.
    All,
}

/// Default settings for the extraction service.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionDefaults {
    pub missing_value_policy: MissingValuePolicy,
    pub value_mode: ValueMode,
    pub success_code: u16,
    pub failure_code: u16,
    pub success_msg: &'static str,
    pub failure_msg: &'static str,
}

/// Shared defaults so CLI, service and tests stay in sync.
pub const EXTRACTION_DEFAULTS: ExtractionDefaults = ExtractionDefaults {
    missing_value_policy: MissingValuePolicy::Abort,
    value_mode: ValueMode::First,
    success_code: 200,
    failure_code: 400,
    success_msg: "Successful",
    failure_msg: "Failed",
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub missing_value_policy: MissingValuePolicy,
    pub value_mode: ValueMode,
    /// Rule templates declared inline.
    pub templates: Vec<RuleTemplate>,
    /// Optional JSON file holding an array of additional rule templates.
    pub templates_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            missing_value_policy: EXTRACTION_DEFAULTS.missing_value_policy,
            value_mode: EXTRACTION_DEFAULTS.value_mode,
            templates: Vec::new(),
            templates_path: None,
        }
    }
}

impl ServiceConfig {
    /// Read a JSON config file. A relative `templates_path` is resolved against the file's directory.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| ServiceError::Io(format!("{}: {e}", path.display())))?;
        let mut cfg: ServiceConfig = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))?;
        if let (Some(tp), Some(dir)) = (cfg.templates_path.as_ref(), path.parent()) {
            if tp.is_relative() {
                cfg.templates_path = Some(dir.join(tp));
            }
        }
        Ok(cfg)
    }

    /// Inline templates followed by those from `templates_path`, all validated.
    pub fn load_templates(&self) -> Result<Vec<RuleTemplate>, ServiceError> {
        let mut out = Vec::with_capacity(self.templates.len());
        for t in &self.templates {
            t.validate().map_err(|e| ServiceError::Config(e.to_string()))?;
            out.push(t.clone());
        }
        if let Some(path) = &self.templates_path {
            let bytes = fs::read(path).map_err(|e| ServiceError::Io(format!("{}: {e}", path.display())))?;
            let more = RuleTemplate::list_from_json(&bytes)
                .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))?;
            out.extend(more);
        }
        Ok(out)
    }
}
