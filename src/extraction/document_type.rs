//! Tax form classification from document text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::models::DocumentType;

struct DetectionPattern {
    document_type: DocumentType,
    pattern: Regex,
}

fn pattern(document_type: DocumentType, regex: &str) -> DetectionPattern {
    DetectionPattern {
        document_type,
        pattern: Regex::new(regex).expect("detection pattern is valid"),
    }
}

/// Form titles. The 1099 variants come first because 1099s also mention federal
/// withholding and would otherwise look like a W-2.
static FORM_TITLES: LazyLock<Vec<DetectionPattern>> = LazyLock::new(|| {
    vec![
        pattern(DocumentType::Form1099Nec, r"(?i)\b1099[\s-]*nec\b"),
        pattern(DocumentType::Form1099Misc, r"(?i)\b1099[\s-]*misc\b"),
        pattern(DocumentType::Form1099Int, r"(?i)\b1099[\s-]*int\b"),
        pattern(DocumentType::Form1099Div, r"(?i)\b1099[\s-]*div\b"),
        pattern(DocumentType::Form1099B, r"(?i)\b1099[\s-]*b\b"),
        pattern(DocumentType::W2, r"(?i)\bform\s*w[\s-]?2\b|\bw-?2\b"),
    ]
});

/// Box captions, used when no title is present.
static CONTENT_PHRASES: LazyLock<Vec<DetectionPattern>> = LazyLock::new(|| {
    vec![
        pattern(DocumentType::W2, r"(?i)wage\s+and\s+tax\s+statement|wages,?\s+tips"),
        pattern(DocumentType::Form1099Nec, r"(?i)nonemployee\s+compensation"),
        pattern(
            DocumentType::Form1099Misc,
            r"(?i)miscellaneous\s+(?:income|information)|fishing\s+boat\s+proceeds|\brents\b",
        ),
        pattern(DocumentType::Form1099Int, r"(?i)interest\s+income"),
        pattern(
            DocumentType::Form1099Div,
            r"(?i)ordinary\s+dividends|dividends\s+and\s+distributions|dividend\s+income",
        ),
        pattern(
            DocumentType::Form1099B,
            r"(?i)proceeds\s+from\s+broker|cost\s+or\s+other\s+basis|barter\s+exchange",
        ),
    ]
});

/// Classifies a document by its text.
///
/// Form titles win over box captions; within each group the first matching pattern
/// decides. Returns [`DocumentType::Unknown`] when nothing matches.
///
/// # Example
///
/// ```
/// use tax_engine::extraction::detect_document_type;
/// use tax_engine::models::DocumentType;
///
/// assert_eq!(detect_document_type("Form 1099-NEC\nFederal income tax withheld: 0"), DocumentType::Form1099Nec);
/// assert_eq!(detect_document_type("Wages, tips, other compensation  50000"), DocumentType::W2);
/// assert_eq!(detect_document_type("grocery receipt"), DocumentType::Unknown);
/// ```
pub fn detect_document_type(text: &str) -> DocumentType {
    for group in [&*FORM_TITLES, &*CONTENT_PHRASES] {
        if let Some(found) = group.iter().find(|p| p.pattern.is_match(text)) {
            debug!(document_type = %found.document_type, "detected document type");
            return found.document_type;
        }
    }

    warn!("could not determine document type");
    DocumentType::Unknown
}
