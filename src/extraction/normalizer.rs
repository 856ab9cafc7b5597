//! Maps raw extracted labels onto the canonical field vocabulary.

use tracing::{debug, warn};

use super::numeric_pairs::clean_label;
use super::rules::{EXACT_NAME_PRIORITY, FALLBACK_RULES, MAPPING_RULES, MappingRule};
use crate::models::{
    CanonicalField, DocumentType, FieldMapping, MatchSource, NormalizedDocument, RawFields,
};

/// Puts a label in the form rule keywords are written in.
///
/// Lowercases, drops apostrophes, turns every other non-alphanumeric run into a
/// single space and pads the result with one space on each side.
///
/// # Example
///
/// ```
/// use tax_engine::extraction::normalize_label;
///
/// assert_eq!(normalize_label("Box 1: Wages, tips"), " box 1 wages tips ");
/// assert_eq!(normalize_label("payer's_TIN"), " payers tin ");
/// ```
pub fn normalize_label(label: &str) -> String {
    let mut normalized = String::with_capacity(label.len() + 2);
    normalized.push(' ');
    for c in label.chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() {
            normalized.extend(c.to_lowercase());
        } else if !normalized.ends_with(' ') {
            normalized.push(' ');
        }
    }
    if !normalized.ends_with(' ') {
        normalized.push(' ');
    }
    normalized
}

/// The outcome of resolving one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMatch {
    /// The canonical field.
    pub field: CanonicalField,
    /// Which stage matched.
    pub source: MatchSource,
    /// Priority of the winning rule; 0 for fallbacks.
    pub priority: u8,
}

/// Resolves a single raw label for a document type.
///
/// Exact canonical names win outright. Otherwise the highest-priority rule whose
/// keywords all occur wins, with ties going to the earlier rule. Labels that no rule
/// matches go through the fallback heuristics; `None` means the label is dropped.
pub fn resolve_label(label: &str, document_type: DocumentType) -> Option<LabelMatch> {
    if let Some(field) = CanonicalField::from_name(&clean_label(label)) {
        return Some(LabelMatch {
            field,
            source: MatchSource::Exact,
            priority: EXACT_NAME_PRIORITY,
        });
    }

    let normalized = normalize_label(label);

    let mut best: Option<&MappingRule> = None;
    for rule in MAPPING_RULES {
        if rule.matches(&normalized, document_type)
            && best.is_none_or(|current| rule.priority > current.priority)
        {
            best = Some(rule);
        }
    }
    if let Some(rule) = best {
        return Some(LabelMatch {
            field: rule.field,
            source: MatchSource::Rule,
            priority: rule.priority,
        });
    }

    FALLBACK_RULES
        .iter()
        .find(|rule| rule.matches(&normalized))
        .map(|rule| LabelMatch {
            field: rule.field,
            source: MatchSource::Fallback,
            priority: 0,
        })
}

/// Normalizes one document's raw label/value bag.
///
/// Every amount field of the result is present and non-negative. When two labels
/// resolve to the same field the larger value is kept; they are never summed, since
/// on a single form they are the same box read twice. A non-numeric or out of range
/// value for an amount field leaves the field at zero and is listed in
/// `skipped_values`; a label
/// nothing matches is listed in `unmapped_labels`. Identifiers keep the trimmed
/// string, first one wins.
///
/// Normalizing a map that already uses canonical names returns the same amounts.
///
/// # Example
///
/// ```
/// use tax_engine::extraction::normalize_fields;
/// use tax_engine::models::{CanonicalField, DocumentType, RawFields, RawValue};
/// use rust_decimal::Decimal;
///
/// let mut raw = RawFields::new();
/// raw.insert("Box 1 Wages, tips, other comp.".to_string(), RawValue::from("$23,500.00"));
/// raw.insert("Employee's SSN".to_string(), RawValue::from("123-45-6789"));
///
/// let doc = normalize_fields(&raw, DocumentType::W2);
/// assert_eq!(doc.amount(CanonicalField::Wages), Decimal::new(2350000, 2));
/// assert_eq!(doc.identifier(CanonicalField::EmployeeSsn), Some("123-45-6789"));
/// ```
pub fn normalize_fields(raw: &RawFields, document_type: DocumentType) -> NormalizedDocument {
    let mut doc = NormalizedDocument::empty(document_type);

    for (label, value) in raw {
        let Some(found) = resolve_label(label, document_type) else {
            warn!(label = %label, document_type = %document_type, "dropping unmapped label");
            doc.record_unmapped(label);
            continue;
        };

        debug!(
            label = %label,
            field = %found.field,
            priority = found.priority,
            source = ?found.source,
            "mapped label"
        );

        if found.field.is_amount() {
            match value.as_amount() {
                Some(amount) => {
                    doc.offer_amount(found.field, amount);
                }
                None => {
                    warn!(label = %label, field = %found.field, "skipping unreadable value");
                    doc.record_skipped(label);
                    continue;
                }
            }
        } else {
            let text = value.as_text();
            if text.is_empty() || doc.identifier(found.field).is_some() {
                continue;
            }
            doc.set_identifier(found.field, text);
        }

        doc.record_mapping(FieldMapping {
            raw_label: label.clone(),
            field: found.field,
            source: found.source,
            priority: found.priority,
        });
    }

    doc
}
