use form_extractor::{FieldValues, FlatFields, TemplateRecord};
use serde::Serialize;

use crate::config::EXTRACTION_DEFAULTS;
use crate::ServiceError;

/// Uniform response wrapper around either extracted data or an error.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub code: u16,
    pub msg: String,
    pub data: EnvelopeData,
    pub meta: ResponseMeta,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EnvelopeData {
    Fields(FlatFields),
    AllFields(FieldValues),
    Template(TemplateRecord),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorBody {
    /// Taxonomy label, e.g. `MissingValueLink`.
    pub error: String,
    pub error_message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseMeta {
    pub invocation_id: String,
    pub document_type: Option<String>,
    pub block_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_sha256: Option<String>,
    pub extracted_at: String,
}

impl Envelope {
    pub fn success(data: EnvelopeData, meta: ResponseMeta) -> Self {
        Self {
            code: EXTRACTION_DEFAULTS.success_code,
            msg: EXTRACTION_DEFAULTS.success_msg.into(),
            data,
            meta,
        }
    }

    pub fn failure(err: &ServiceError, meta: ResponseMeta) -> Self {
        Self {
            code: EXTRACTION_DEFAULTS.failure_code,
            msg: EXTRACTION_DEFAULTS.failure_msg.into(),
            data: EnvelopeData::Error(ErrorBody {
                error: err.label().into(),
                error_message: user_message(err),
            }),
            meta,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == EXTRACTION_DEFAULTS.success_code
    }
}

fn user_message(err: &ServiceError) -> String {
    match err {
        ServiceError::InvalidInput(detail) => format!("Couldn't read analysis result. {detail}"),
        ServiceError::Extract(e) => format!("Couldn't reconstruct form fields. {e}"),
        other => other.to_string(),
    }
}
