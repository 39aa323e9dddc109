//! Caller layer around `form-extractor`: decodes analysis results, picks the
//! generic key/value path or a registered template, applies the configured
//! policies and wraps the outcome in an [`Envelope`].

pub mod config;
pub mod envelope;

use block_model::{AnalysisDocument, Block};
use chrono::Utc;
use form_extractor::{
    line_texts, reconstruct_with, BlockIndex, ExtractError, FieldValues, LineTemplate, TemplateRegistry,
};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

pub use config::{MissingValuePolicy, ServiceConfig, ValueMode, EXTRACTION_DEFAULTS};
pub use envelope::{Envelope, EnvelopeData, ErrorBody, ResponseMeta};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(String),
}

impl ServiceError {
    /// Taxonomy label reported in the error envelope.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput(_) => "InvalidInput",
            ServiceError::Extract(e) => e.label(),
            ServiceError::Config(_) => "ConfigError",
            ServiceError::Io(_) => "IoError",
        }
    }
}

/// Result of one extraction before it is wrapped.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub data: EnvelopeData,
    /// Ids of key blocks dropped under [`MissingValuePolicy::Skip`].
    pub skipped_keys: Vec<String>,
}

pub struct ExtractionService {
    cfg: ServiceConfig,
    templates: TemplateRegistry,
}

impl ExtractionService {
    /// Build a service and register every template the config declares.
    pub fn new(cfg: ServiceConfig) -> Result<Self, ServiceError> {
        let mut svc = Self { cfg, templates: TemplateRegistry::new() };
        for t in svc.cfg.load_templates()? {
            svc.register_template(Box::new(t));
        }
        info!(templates = svc.templates.len(), "extraction service ready");
        Ok(svc)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.cfg
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn register_template(&mut self, template: Box<dyn LineTemplate>) {
        let label = template.document_type().to_string();
        if self.templates.register(template).is_some() {
            warn!(document_type = %label, "template replaced an earlier one with the same label");
        }
    }

    /// Run one extraction. A registered `document_type` selects its template;
    /// anything else (including no label) takes the generic key/value path.
    pub fn extract(&self, document_type: Option<&str>, blocks: &[Block]) -> Result<Extraction, ServiceError> {
        if let Some(template) = document_type.and_then(|d| self.templates.get(d)) {
            let lines = line_texts(blocks);
            debug!(document_type = template.document_type(), lines = lines.len(), "applying template");
            return Ok(Extraction { data: EnvelopeData::Template(template.extract(&lines)), skipped_keys: Vec::new() });
        }
        if let Some(label) = document_type {
            debug!(document_type = label, "no template registered; using key/value fields");
        }

        let (fields, skipped_keys) = self.collect_fields(blocks)?;
        let data = match self.cfg.value_mode {
            ValueMode::First => EnvelopeData::Fields(fields.flatten()),
            ValueMode::All => EnvelopeData::AllFields(fields),
        };
        Ok(Extraction { data, skipped_keys })
    }

    fn collect_fields(&self, blocks: &[Block]) -> Result<(FieldValues, Vec<String>), ServiceError> {
        let index = BlockIndex::build(blocks);
        let policy = self.cfg.missing_value_policy;
        let mut skipped = Vec::new();
        let fields = reconstruct_with(&index, |key_id| match policy {
            MissingValuePolicy::Skip => {
                warn!(key_id = %key_id, "key block has no value link; skipped");
                skipped.push(key_id.to_string());
                Ok(())
            }
            MissingValuePolicy::Abort => {
                Err(ExtractError::MissingValueLink { key_id: key_id.to_string() })
            }
        })?;
        Ok((fields, skipped))
    }

    /// Extract and wrap; failures are logged with the invocation id and turned into an error envelope.
    pub fn handle(&self, invocation_id: &str, document_type: Option<&str>, document: &AnalysisDocument) -> Envelope {
        let document_type = document_type.filter(|d| !d.trim().is_empty());
        let mut meta = ResponseMeta {
            invocation_id: invocation_id.to_string(),
            document_type: document_type.map(str::to_string),
            block_count: document.blocks.len(),
            extracted_at: Utc::now().to_rfc3339(),
            ..Default::default()
        };
        match self.extract(document_type, &document.blocks) {
            Ok(extraction) => {
                meta.skipped_keys = extraction.skipped_keys;
                info!(invocation_id, blocks = meta.block_count, skipped = meta.skipped_keys.len(), "extraction succeeded");
                Envelope::success(extraction.data, meta)
            }
            Err(e) => {
                error!(invocation_id, error = %e, label = e.label(), "extraction failed");
                Envelope::failure(&e, meta)
            }
        }
    }

    /// Decode a raw JSON analysis response, then [`handle`](Self::handle) it.
    pub fn handle_json(&self, invocation_id: &str, document_type: Option<&str>, raw: &[u8]) -> Envelope {
        let digest = hex::encode(Sha256::digest(raw));
        let mut envelope = match AnalysisDocument::from_slice(raw) {
            Ok(document) => self.handle(invocation_id, document_type, &document),
            Err(e) => {
                let err = ServiceError::InvalidInput(e.to_string());
                error!(invocation_id, error = %err, "analysis result could not be decoded");
                let meta = ResponseMeta {
                    invocation_id: invocation_id.to_string(),
                    document_type: document_type.map(str::to_string),
                    extracted_at: Utc::now().to_rfc3339(),
                    ..Default::default()
                };
                Envelope::failure(&err, meta)
            }
        };
        envelope.meta.input_sha256 = Some(digest);
        envelope
    }
}

impl std::fmt::Debug for ExtractionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionService")
            .field("cfg", &self.cfg)
            .field("templates", &self.templates)
            .finish()
    }
}
