//! Request types for the tax engine API.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::extraction::{detect_document_type, normalize_fields, normalize_text};
use crate::models::{DocumentType, FilerConfig, NormalizedDocument, RawFields};

/// Request body for `/extract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// Document text as produced by OCR or PDF-to-text conversion.
    pub text: String,
    /// Form type, when the caller already knows it; detected from the text otherwise.
    #[serde(default)]
    pub document_type: Option<DocumentType>,
}

/// One tax document, supplied as text, as label/value pairs, or both.
///
/// When `fields` is present it is used as-is and `text` only helps detect the
/// form type. When only `text` is present its label/value pairs are extracted
/// first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Form type, when known.
    #[serde(default)]
    pub document_type: Option<DocumentType>,
    /// Raw document text.
    #[serde(default)]
    pub text: Option<String>,
    /// Label/value pairs from an upstream extractor.
    #[serde(default)]
    pub fields: Option<RawFields>,
}

impl DocumentRequest {
    /// Normalizes the document, or fails when it carries neither text nor fields.
    pub fn normalize(&self, index: usize) -> EngineResult<NormalizedDocument> {
        let text = self.text.as_deref().filter(|text| !text.trim().is_empty());
        let explicit = self
            .document_type
            .filter(|document_type| *document_type != DocumentType::Unknown);

        match (&self.fields, text) {
            (Some(fields), _) => {
                let document_type = explicit
                    .or_else(|| text.map(detect_document_type))
                    .unwrap_or(DocumentType::Unknown);
                Ok(normalize_fields(fields, document_type))
            }
            (None, Some(text)) => Ok(normalize_text(text, explicit)),
            (None, None) => Err(EngineError::InvalidDocument {
                index,
                message: "document has neither text nor fields".to_string(),
            }),
        }
    }
}

/// Request body for `/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The filer's documents. An empty list calculates on zero income.
    pub documents: Vec<DocumentRequest>,
    /// Filer options; defaults to a Single filer with the standard deduction.
    #[serde(default)]
    pub filer: FilerConfig,
}
