//! The output of a federal tax calculation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, DeductionType, DocumentType, FilingStatus};

/// Whether the filer gets money back, owes money, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultType {
    /// Withholding exceeds liability.
    Refund,
    /// Liability exceeds withholding.
    #[serde(rename = "Tax Due")]
    TaxDue,
    /// Withholding exactly covers liability.
    Zero,
}

impl ResultType {
    /// Classifies a signed `refund_or_due` amount.
    pub fn from_balance(refund_or_due: Decimal) -> Self {
        if refund_or_due > Decimal::ZERO {
            Self::Refund
        } else if refund_or_due < Decimal::ZERO {
            Self::TaxDue
        } else {
            Self::Zero
        }
    }
}

/// Income that fed the calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummary {
    /// Taxable income by source form.
    pub by_source: BTreeMap<DocumentType, Decimal>,
    /// Income subject to self-employment tax.
    pub self_employment_income: Decimal,
    /// Amounts reported as non-taxable; shown but never taxed.
    pub non_taxable_total: Decimal,
    /// Sum of all taxable income.
    pub total_income: Decimal,
}

/// The deduction that was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionSummary {
    /// Standard or itemized.
    pub deduction_type: DeductionType,
    /// The amount subtracted from total income.
    pub amount: Decimal,
}

/// The slice of taxable income taxed within one bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketSlice {
    /// Lower bound of the bracket.
    pub floor: Decimal,
    /// Upper bound, `None` for the top bracket.
    pub ceiling: Option<Decimal>,
    /// Marginal rate.
    pub rate: Decimal,
    /// Income taxed at this rate.
    pub taxable_amount: Decimal,
    /// Tax from this slice.
    pub tax: Decimal,
}

/// Credits applied against liability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSummary {
    /// Child tax credit.
    pub child_tax_credit: Decimal,
    /// Earned income tax credit.
    pub earned_income_credit: Decimal,
    /// Education credits.
    pub education_credits: Decimal,
    /// Other credits.
    pub other_credits: Decimal,
    /// Sum of all four.
    pub total_credits: Decimal,
}

/// Withholding reported on the filer's forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithholdingSummary {
    /// Federal income tax withheld; credited against liability.
    pub federal_income_tax_withheld: Decimal,
    /// Social security tax withheld.
    pub social_security_tax_withheld: Decimal,
    /// Medicare tax withheld.
    pub medicare_tax_withheld: Decimal,
    /// The three combined.
    pub total_withheld: Decimal,
}

/// The complete result of a federal tax calculation.
///
/// All amounts are rounded to cents. The audit trace lists every step taken and any
/// fallback applied along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Tax year of the tables used.
    pub tax_year: u16,
    /// The resolved filing status.
    pub filing_status: FilingStatus,
    /// Dependents after clamping.
    pub num_dependents: u32,
    /// Income summary.
    pub income: IncomeSummary,
    /// Deduction applied.
    pub deduction: DeductionSummary,
    /// `max(0, total_income - deduction)`.
    pub taxable_income: Decimal,
    /// Progressive income tax on taxable income.
    pub federal_tax: Decimal,
    /// Per-bracket breakdown of `federal_tax`.
    pub bracket_breakdown: Vec<BracketSlice>,
    /// Self-employment tax.
    pub self_employment_tax: Decimal,
    /// Federal plus self-employment tax.
    pub total_tax_before_credits: Decimal,
    /// Credits applied.
    pub credits: CreditSummary,
    /// `max(0, total_tax_before_credits - total_credits)`.
    pub total_tax_liability: Decimal,
    /// Withholding summary.
    pub withholding: WithholdingSummary,
    /// Federal withholding minus liability; positive is a refund.
    pub refund_or_due: Decimal,
    /// Sign classification of `refund_or_due`.
    pub result_type: ResultType,
    /// Absolute value of `refund_or_due`.
    pub result_amount: Decimal,
    /// Steps and warnings.
    pub audit_trace: AuditTrace,
}
