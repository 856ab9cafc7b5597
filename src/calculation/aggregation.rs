//! Multi-document aggregation.
//!
//! Sums canonical fields across a filer's documents while keeping each income
//! source separate: only the fields that belong to self-employment feed the
//! self-employment base, and informational boxes never reach total income.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::info;

use crate::models::{
    AggregatedTotals, AuditWarning, CanonicalField, DocumentType, NormalizedDocument, WarningCode,
};

/// The 1099-MISC boxes that are reported but not taxable to the recipient.
pub const NON_TAXABLE_FIELDS: [CanonicalField; 4] = [
    CanonicalField::MedicalPayments,
    CanonicalField::DirectSales,
    CanonicalField::FishPurchasedForResale,
    CanonicalField::Section409aDeferrals,
];

const WITHHOLDING_FIELDS: [CanonicalField; 3] = [
    CanonicalField::FederalIncomeTaxWithheld,
    CanonicalField::SocialSecurityTaxWithheld,
    CanonicalField::MedicareTaxWithheld,
];

/// Aggregates any number of normalized documents.
///
/// Every amount field is summed across documents. Derived totals:
/// - `total_income`: the sum of every taxable income field
/// - `self_employment_income`: `nonemployee_compensation + fishing_boat_proceeds`
/// - `total_withheld`: federal, social security and medicare withholding
/// - `non_taxable_total`: the non-taxable 1099-MISC boxes
///
/// An empty slice yields all-zero totals. Sums saturate at `Decimal::MAX` instead
/// of overflowing.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::aggregate_documents;
/// use tax_engine::models::{CanonicalField, DocumentType, NormalizedDocument};
/// use rust_decimal::Decimal;
///
/// let w2 = |wages: i64| {
///     NormalizedDocument::from_amounts(DocumentType::W2, [(CanonicalField::Wages, Decimal::from(wages))])
/// };
/// let totals = aggregate_documents(&[w2(10000), w2(10000)]);
/// assert_eq!(totals.amount(CanonicalField::Wages), Decimal::from(20000));
/// assert_eq!(totals.total_income(), Decimal::from(20000));
/// assert_eq!(totals.self_employment_income(), Decimal::ZERO);
/// ```
pub fn aggregate_documents(documents: &[NormalizedDocument]) -> AggregatedTotals {
    let mut amounts: BTreeMap<CanonicalField, Decimal> = CanonicalField::amounts()
        .map(|field| (field, Decimal::ZERO))
        .collect();

    for doc in documents {
        for (field, value) in doc.amounts() {
            let slot = amounts.entry(*field).or_insert(Decimal::ZERO);
            *slot = slot.saturating_add(*value);
        }
    }

    let mut income_by_source: BTreeMap<DocumentType, Decimal> = BTreeMap::new();
    let mut total_income = Decimal::ZERO;
    for (field, value) in &amounts {
        if !field.is_taxable_income() {
            continue;
        }
        total_income = total_income.saturating_add(*value);
        if let Some(form) = field.source_form() {
            let slot = income_by_source.entry(form).or_insert(Decimal::ZERO);
            *slot = slot.saturating_add(*value);
        }
    }

    let sum_of = |fields: &[CanonicalField]| -> Decimal {
        fields
            .iter()
            .map(|field| amounts.get(field).copied().unwrap_or(Decimal::ZERO))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    };
    let self_employment_income = sum_of(&[
        CanonicalField::NonemployeeCompensation,
        CanonicalField::FishingBoatProceeds,
    ]);
    let total_withheld = sum_of(&WITHHOLDING_FIELDS);
    let non_taxable_total = sum_of(&NON_TAXABLE_FIELDS);

    info!(
        documents = documents.len(),
        total_income = %total_income,
        self_employment_income = %self_employment_income,
        "aggregated documents"
    );

    AggregatedTotals::new(
        amounts,
        income_by_source,
        total_income,
        self_employment_income,
        total_withheld,
        non_taxable_total,
        documents.len(),
    )
}

/// Audit warnings for problems found while normalizing documents.
///
/// Each dropped label becomes an `UNMAPPED_LABEL` warning and each unreadable
/// value for an amount field an `EXTRACTION_GAP` warning.
pub fn document_warnings(documents: &[NormalizedDocument]) -> Vec<AuditWarning> {
    let mut warnings = Vec::new();
    for (index, doc) in documents.iter().enumerate() {
        for label in doc.unmapped_labels() {
            warnings.push(AuditWarning::new(
                WarningCode::UnmappedLabel,
                format!(
                    "Document {index} ({}): label '{label}' matched no field and was dropped",
                    doc.document_type()
                ),
                "low",
            ));
        }
        for label in doc.skipped_values() {
            warnings.push(AuditWarning::new(
                WarningCode::ExtractionGap,
                format!(
                    "Document {index} ({}): value for '{label}' is not a readable amount; field left at 0",
                    doc.document_type()
                ),
                "medium",
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::normalize_fields;
    use crate::models::{RawFields, RawValue};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn doc(document_type: DocumentType, amounts: &[(CanonicalField, &str)]) -> NormalizedDocument {
        NormalizedDocument::from_amounts(
            document_type,
            amounts.iter().map(|(field, value)| (*field, dec(value))),
        )
    }

    #[test]
    fn test_empty_input_yields_zero_totals() {
        let totals = aggregate_documents(&[]);
        assert_eq!(totals.total_income(), Decimal::ZERO);
        assert_eq!(totals.self_employment_income(), Decimal::ZERO);
        assert_eq!(totals.total_withheld(), Decimal::ZERO);
        assert_eq!(totals.documents_processed(), 0);
        assert_eq!(totals.amounts().len(), CanonicalField::amounts().count());
    }

    #[test]
    fn test_same_field_sums_across_documents() {
        let totals = aggregate_documents(&[
            doc(DocumentType::W2, &[(CanonicalField::Wages, "10000")]),
            doc(DocumentType::W2, &[(CanonicalField::Wages, "10000")]),
        ]);
        assert_eq!(totals.amount(CanonicalField::Wages), dec("20000"));
        assert_eq!(totals.documents_processed(), 2);
    }

    #[test]
    fn test_keep_larger_within_document_then_sum_across() {
        let mut raw = RawFields::new();
        raw.insert("Wages".to_string(), RawValue::from("100"));
        raw.insert("Box 1 Wages, tips, other comp.".to_string(), RawValue::from("23500"));
        let first = normalize_fields(&raw, DocumentType::W2);
        assert_eq!(first.amount(CanonicalField::Wages), dec("23500"));

        let totals = aggregate_documents(&[first.clone(), first]);
        assert_eq!(totals.amount(CanonicalField::Wages), dec("47000"));
    }

    #[test]
    fn test_self_employment_income_is_nec_plus_fishing_only() {
        let totals = aggregate_documents(&[
            doc(DocumentType::Form1099Nec, &[(CanonicalField::NonemployeeCompensation, "6750")]),
            doc(
                DocumentType::Form1099Misc,
                &[
                    (CanonicalField::OtherIncome, "1000"),
                    (CanonicalField::FishingBoatProceeds, "250"),
                    (CanonicalField::Rents, "500"),
                ],
            ),
            doc(DocumentType::W2, &[(CanonicalField::Wages, "40000")]),
        ]);
        assert_eq!(totals.self_employment_income(), dec("7000"));
        assert_eq!(totals.total_income(), dec("48500"));
    }

    #[test]
    fn test_non_taxable_fields_excluded_from_income() {
        let totals = aggregate_documents(&[doc(
            DocumentType::Form1099Misc,
            &[
                (CanonicalField::MedicalPayments, "900"),
                (CanonicalField::DirectSales, "5000"),
                (CanonicalField::Royalties, "300"),
            ],
        )]);
        assert_eq!(totals.total_income(), dec("300"));
        assert_eq!(totals.non_taxable_total(), dec("5900"));
        assert_eq!(totals.amount(CanonicalField::MedicalPayments), dec("900"));
    }

    #[test]
    fn test_informational_w2_boxes_excluded_from_income() {
        let totals = aggregate_documents(&[doc(
            DocumentType::W2,
            &[
                (CanonicalField::Wages, "50000"),
                (CanonicalField::SocialSecurityWages, "50000"),
                (CanonicalField::MedicareWages, "50000"),
                (CanonicalField::StateWages, "50000"),
            ],
        )]);
        assert_eq!(totals.total_income(), dec("50000"));
    }

    #[test]
    fn test_total_withheld_and_income_by_source() {
        let totals = aggregate_documents(&[
            doc(
                DocumentType::W2,
                &[
                    (CanonicalField::Wages, "50000"),
                    (CanonicalField::FederalIncomeTaxWithheld, "6000"),
                    (CanonicalField::SocialSecurityTaxWithheld, "3100"),
                    (CanonicalField::MedicareTaxWithheld, "725"),
                    (CanonicalField::StateIncomeTaxWithheld, "2000"),
                ],
            ),
            doc(
                DocumentType::Form1099Int,
                &[
                    (CanonicalField::InterestIncome, "120"),
                    (CanonicalField::FederalIncomeTaxWithheld, "12"),
                ],
            ),
        ]);
        assert_eq!(totals.total_withheld(), dec("9837"));
        assert_eq!(totals.federal_withheld(), dec("6012"));
        assert_eq!(totals.income_by_source()[&DocumentType::W2], dec("50000"));
        assert_eq!(totals.income_by_source()[&DocumentType::Form1099Int], dec("120"));
    }

    #[test]
    fn test_sums_saturate_instead_of_overflowing() {
        let huge = (Decimal::MAX - dec("1")).to_string();
        let totals = aggregate_documents(&[
            doc(DocumentType::W2, &[(CanonicalField::Wages, huge.as_str())]),
            doc(DocumentType::W2, &[(CanonicalField::Wages, huge.as_str())]),
            doc(DocumentType::Form1099Nec, &[(CanonicalField::NonemployeeCompensation, "10")]),
        ]);
        assert_eq!(totals.amount(CanonicalField::Wages), Decimal::MAX);
        assert_eq!(totals.total_income(), Decimal::MAX);
        assert_eq!(totals.income_by_source()[&DocumentType::W2], Decimal::MAX);
        assert_eq!(totals.self_employment_income(), dec("10"));
    }

    #[test]
    fn test_out_of_range_field_value_becomes_extraction_gap() {
        let mut raw = RawFields::new();
        raw.insert(
            "wages".to_string(),
            RawValue::Number(dec("50000000000000000000000000000")),
        );
        let first = normalize_fields(&raw, DocumentType::W2);
        assert_eq!(first.amount(CanonicalField::Wages), Decimal::ZERO);

        let totals = aggregate_documents(&[first.clone(), first.clone()]);
        assert_eq!(totals.total_income(), Decimal::ZERO);

        let warnings = document_warnings(&[first]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::ExtractionGap);
    }

    #[test]
    fn test_document_warnings() {
        let mut raw = RawFields::new();
        raw.insert("Control number".to_string(), RawValue::from("A1"));
        raw.insert("Wages".to_string(), RawValue::from("n/a"));
        let doc = normalize_fields(&raw, DocumentType::W2);

        let warnings = document_warnings(&[doc]);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].code, WarningCode::UnmappedLabel);
        assert_eq!(warnings[1].code, WarningCode::ExtractionGap);
        assert!(warnings[1].message.contains("Wages"));
    }
}
