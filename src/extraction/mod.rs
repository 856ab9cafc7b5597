//! Field extraction and normalization.
//!
//! Turns semi-structured document text into label/value pairs, classifies the
//! document, and maps the labels onto the canonical field vocabulary through an
//! ordered keyword rule table.

mod document_type;
mod normalizer;
mod numeric_pairs;
mod rules;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{CanonicalField, DocumentType, NormalizedDocument, RawFields, RawValue};

pub use document_type::detect_document_type;
pub use normalizer::{LabelMatch, normalize_fields, normalize_label, resolve_label};
pub use numeric_pairs::{ExtractedIdentifiers, clean_label, extract_identifiers, extract_numeric_pairs};
pub use rules::{EXACT_NAME_PRIORITY, FALLBACK_RULES, FallbackRule, MAPPING_RULES, MappingRule};

/// Everything read from one document's text, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Detected or caller-supplied form type.
    pub document_type: DocumentType,
    /// Cleaned label to amount.
    pub pairs: BTreeMap<String, Decimal>,
    /// SSNs and EINs found in the text.
    pub identifiers: ExtractedIdentifiers,
}

impl ExtractedDocument {
    /// Converts the extraction into the raw bag the normalizer consumes.
    ///
    /// The first SSN and EIN found are attached under canonical identifier names:
    /// employee/employer on a W-2 (or unknown form), recipient/payer on a 1099.
    pub fn to_raw_fields(&self) -> RawFields {
        let mut raw: RawFields = self
            .pairs
            .iter()
            .map(|(label, value)| (label.clone(), RawValue::Number(*value)))
            .collect();

        let (ssn_field, ein_field) = match self.document_type {
            DocumentType::W2 | DocumentType::Unknown => {
                (CanonicalField::EmployeeSsn, CanonicalField::EmployerEin)
            }
            _ => (CanonicalField::RecipientTin, CanonicalField::PayerTin),
        };
        if let Some(ssn) = self.identifiers.ssns.first() {
            raw.insert(ssn_field.as_str().to_string(), RawValue::from(ssn.as_str()));
        }
        if let Some(ein) = self.identifiers.eins.first() {
            raw.insert(ein_field.as_str().to_string(), RawValue::from(ein.as_str()));
        }
        raw
    }
}

/// Extracts pairs and identifiers from text, detecting the form type unless one is
/// given (an explicit [`DocumentType::Unknown`] also triggers detection).
pub fn extract_document(text: &str, document_type: Option<DocumentType>) -> ExtractedDocument {
    let document_type = match document_type {
        Some(known) if known != DocumentType::Unknown => known,
        _ => detect_document_type(text),
    };

    ExtractedDocument {
        document_type,
        pairs: extract_numeric_pairs(text),
        identifiers: extract_identifiers(text),
    }
}

/// Runs extraction and normalization on one document's text.
///
/// # Example
///
/// ```
/// use tax_engine::extraction::normalize_text;
/// use tax_engine::models::{CanonicalField, DocumentType};
/// use rust_decimal::Decimal;
///
/// let doc = normalize_text(
///     "Form W-2\nBox 1 Wages, tips, other comp.    23500.00\nBox 2 - Federal income tax withheld: $1,500.00",
///     None,
/// );
/// assert_eq!(doc.document_type(), DocumentType::W2);
/// assert_eq!(doc.amount(CanonicalField::Wages), Decimal::from(23500));
/// assert_eq!(doc.amount(CanonicalField::FederalIncomeTaxWithheld), Decimal::from(1500));
/// ```
pub fn normalize_text(text: &str, document_type: Option<DocumentType>) -> NormalizedDocument {
    let extracted = extract_document(text, document_type);
    let doc = normalize_fields(&extracted.to_raw_fields(), extracted.document_type);
    info!(
        document_type = %doc.document_type(),
        pairs = extracted.pairs.len(),
        mapped = doc.mappings().len(),
        unmapped = doc.unmapped_labels().len(),
        "normalized document text"
    );
    doc
}
