//! Aggregated totals across all of a filer's documents.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CanonicalField, DocumentType};

/// Canonical amounts summed across documents, plus the derived totals the engine
/// consumes.
///
/// Produced by [`crate::calculation::aggregate_documents`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTotals {
    amounts: BTreeMap<CanonicalField, Decimal>,
    income_by_source: BTreeMap<DocumentType, Decimal>,
    total_income: Decimal,
    self_employment_income: Decimal,
    total_withheld: Decimal,
    non_taxable_total: Decimal,
    documents_processed: usize,
}

impl AggregatedTotals {
    pub(crate) fn new(
        amounts: BTreeMap<CanonicalField, Decimal>,
        income_by_source: BTreeMap<DocumentType, Decimal>,
        total_income: Decimal,
        self_employment_income: Decimal,
        total_withheld: Decimal,
        non_taxable_total: Decimal,
        documents_processed: usize,
    ) -> Self {
        Self {
            amounts,
            income_by_source,
            total_income,
            self_employment_income,
            total_withheld,
            non_taxable_total,
            documents_processed,
        }
    }

    /// The summed amount for one canonical field.
    pub fn amount(&self, field: CanonicalField) -> Decimal {
        self.amounts.get(&field).copied().unwrap_or(Decimal::ZERO)
    }

    /// Every summed amount field.
    pub fn amounts(&self) -> &BTreeMap<CanonicalField, Decimal> {
        &self.amounts
    }

    /// Taxable income broken down by the form it is reported on.
    pub fn income_by_source(&self) -> &BTreeMap<DocumentType, Decimal> {
        &self.income_by_source
    }

    /// Sum of every taxable income field.
    pub fn total_income(&self) -> Decimal {
        self.total_income
    }

    /// Nonemployee compensation plus fishing boat proceeds.
    pub fn self_employment_income(&self) -> Decimal {
        self.self_employment_income
    }

    /// Federal, social security and medicare withholding combined.
    pub fn total_withheld(&self) -> Decimal {
        self.total_withheld
    }

    /// Federal income tax withheld; the only withholding credited against liability.
    pub fn federal_withheld(&self) -> Decimal {
        self.amount(CanonicalField::FederalIncomeTaxWithheld)
    }

    /// Sum of the explicitly non-taxable 1099-MISC boxes.
    pub fn non_taxable_total(&self) -> Decimal {
        self.non_taxable_total
    }

    /// How many documents were aggregated.
    pub fn documents_processed(&self) -> usize {
        self.documents_processed
    }
}
