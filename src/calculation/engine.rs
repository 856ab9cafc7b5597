//! The federal tax calculation.
//!
//! [`calculate_tax`] runs every step in order against aggregated totals and a
//! validated tax year, recording one audit step per rule. It never fails: bad
//! filer options fall back to safe defaults and are reported as warnings.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::TaxYearConfig;
use crate::models::{
    AggregatedTotals, AuditStep, AuditTrace, AuditWarning, BracketSlice, CanonicalField,
    DeductionSummary, DeductionType, FilerConfig, FilingStatus, IncomeSummary, MAX_AMOUNT,
    NormalizedDocument, ResultType, TaxResult, WarningCode, WithholdingSummary,
};

use super::aggregation::{aggregate_documents, document_warnings};
use super::brackets::calculate_federal_tax;
use super::credits::{calculate_child_tax_credit, total_credits};
use super::deduction::determine_deduction;
use super::eitc::calculate_eitc;
use super::rounding::round_currency;
use super::self_employment::calculate_self_employment_tax;

/// Filer options after fallbacks and clamping.
#[derive(Debug, Clone)]
struct ResolvedFiler {
    status: FilingStatus,
    deduction_type: DeductionType,
    itemized_amount: Decimal,
    dependents: u32,
    child_tax_credit: Decimal,
    earned_income_credit: Decimal,
    education_credits: Decimal,
    other_credits: Decimal,
}

fn resolve_filer(filer: &FilerConfig, warnings: &mut Vec<AuditWarning>) -> ResolvedFiler {
    let status = FilingStatus::parse(&filer.filing_status).unwrap_or_else(|| {
        warn!(filing_status = %filer.filing_status, "unrecognized filing status, using Single");
        warnings.push(AuditWarning::new(
            WarningCode::InvalidConfig,
            format!(
                "Unrecognized filing status '{}'; calculated as Single",
                filer.filing_status
            ),
            "high",
        ));
        FilingStatus::Single
    });

    let deduction_type = DeductionType::parse(&filer.deduction_type).unwrap_or_else(|| {
        warn!(deduction_type = %filer.deduction_type, "unrecognized deduction type, using standard");
        warnings.push(AuditWarning::new(
            WarningCode::InvalidConfig,
            format!(
                "Unrecognized deduction type '{}'; standard deduction applied",
                filer.deduction_type
            ),
            "medium",
        ));
        DeductionType::Standard
    });
    if deduction_type == DeductionType::Itemized && filer.itemized_amount <= Decimal::ZERO {
        warnings.push(AuditWarning::new(
            WarningCode::InvalidConfig,
            "Itemized deduction requested without a positive amount; standard deduction applied",
            "medium",
        ));
    }

    let dependents = if filer.num_dependents < 0 {
        warnings.push(AuditWarning::new(
            WarningCode::InvalidConfig,
            format!(
                "Negative dependent count {} treated as 0",
                filer.num_dependents
            ),
            "medium",
        ));
        0
    } else {
        u32::try_from(filer.num_dependents).unwrap_or(u32::MAX)
    };

    let mut non_negative = |name: &str, value: Decimal| -> Decimal {
        if value < Decimal::ZERO {
            warnings.push(AuditWarning::new(
                WarningCode::ArithmeticDomain,
                format!("Negative {name} {value} treated as 0"),
                "medium",
            ));
            Decimal::ZERO
        } else if value > MAX_AMOUNT {
            warnings.push(AuditWarning::new(
                WarningCode::ArithmeticDomain,
                format!("Requested {name} {value} exceeds the supported range; capped at {MAX_AMOUNT}"),
                "high",
            ));
            MAX_AMOUNT
        } else {
            value
        }
    };

    ResolvedFiler {
        status,
        deduction_type,
        itemized_amount: non_negative("itemized amount", filer.itemized_amount),
        dependents,
        child_tax_credit: non_negative("child tax credit", filer.child_tax_credit),
        earned_income_credit: non_negative("earned income credit", filer.earned_income_credit),
        education_credits: non_negative("education credits", filer.education_credits),
        other_credits: non_negative("other credits", filer.other_credits),
    }
}

fn income_step(totals: &AggregatedTotals, step_number: u32) -> AuditStep {
    let by_source: serde_json::Map<String, serde_json::Value> = totals
        .income_by_source()
        .iter()
        .map(|(form, amount)| (form.to_string(), amount.normalize().to_string().into()))
        .collect();

    AuditStep {
        step_number,
        rule_id: "total_income".to_string(),
        rule_name: "Total Income".to_string(),
        irs_reference: "Form 1040, line 9".to_string(),
        input: serde_json::json!({
            "documents_processed": totals.documents_processed(),
            "income_by_source": by_source
        }),
        output: serde_json::json!({
            "total_income": totals.total_income().normalize().to_string(),
            "self_employment_income": totals.self_employment_income().normalize().to_string(),
            "non_taxable_total": totals.non_taxable_total().normalize().to_string()
        }),
        reasoning: format!(
            "Taxable income from {} document(s) totals ${}; ${} reported as non-taxable",
            totals.documents_processed(),
            totals.total_income().normalize(),
            totals.non_taxable_total().normalize()
        ),
    }
}

/// Calculates federal income tax, self-employment tax, credits and the refund or
/// amount due for one filer.
///
/// Steps, each recorded in the audit trace:
/// 1. Total income
/// 2. Deduction
/// 3. Taxable income: `max(0, total_income - deduction)`
/// 4. Federal income tax over the progressive brackets
/// 5. Self-employment tax
/// 6. Child tax credit
/// 7. Earned income credit
/// 8. Total credits
/// 9. Liability: `max(0, federal + self-employment - credits)`
/// 10. Refund or due: `federal_withheld - liability`
///
/// Amounts keep full precision throughout and are rounded to cents in the result.
///
/// # Examples
///
/// ```no_run
/// use tax_engine::calculation::{aggregate_documents, calculate_tax};
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::{CanonicalField, DocumentType, FilerConfig, NormalizedDocument, ResultType};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/irs_2024").unwrap();
/// let w2 = NormalizedDocument::from_amounts(
///     DocumentType::W2,
///     [
///         (CanonicalField::Wages, Decimal::from(50000)),
///         (CanonicalField::FederalIncomeTaxWithheld, Decimal::from(6000)),
///     ],
/// );
/// let totals = aggregate_documents(&[w2]);
/// let result = calculate_tax(&totals, &FilerConfig::default(), loader.config());
/// assert_eq!(result.result_type, ResultType::Refund);
/// assert_eq!(result.result_amount, Decimal::from(1984));
/// ```
pub fn calculate_tax(
    totals: &AggregatedTotals,
    filer: &FilerConfig,
    config: &TaxYearConfig,
) -> TaxResult {
    let mut warnings = Vec::new();
    let resolved = resolve_filer(filer, &mut warnings);
    let mut steps = Vec::new();
    let mut step_number = 1;

    if totals.total_income() == Decimal::ZERO {
        warnings.push(AuditWarning::new(
            WarningCode::LowExtractionQuality,
            "No taxable income found in any document",
            "high",
        ));
    }
    if totals.total_income() > MAX_AMOUNT {
        warn!(total_income = %totals.total_income(), "total income beyond supported range");
        warnings.push(AuditWarning::new(
            WarningCode::ArithmeticDomain,
            format!(
                "Total income {} exceeds the supported range; figures may be saturated",
                totals.total_income()
            ),
            "high",
        ));
    }

    steps.push(income_step(totals, step_number));
    step_number += 1;

    let deduction = determine_deduction(
        resolved.status,
        resolved.deduction_type,
        resolved.itemized_amount,
        config.standard_deductions(),
        step_number,
    );
    steps.push(deduction.audit_step);
    step_number += 1;

    let taxable_income = (totals.total_income() - deduction.amount).max(Decimal::ZERO);
    steps.push(AuditStep {
        step_number,
        rule_id: "taxable_income".to_string(),
        rule_name: "Taxable Income".to_string(),
        irs_reference: "Form 1040, line 15".to_string(),
        input: serde_json::json!({
            "total_income": totals.total_income().normalize().to_string(),
            "deduction": deduction.amount.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string()
        }),
        reasoning: format!(
            "max(0, ${} - ${}) = ${}",
            totals.total_income().normalize(),
            deduction.amount.normalize(),
            taxable_income.normalize()
        ),
    });
    step_number += 1;

    let federal = calculate_federal_tax(
        taxable_income,
        config.brackets().for_status(resolved.status),
        resolved.status,
        step_number,
    );
    steps.push(federal.audit_step);
    step_number += 1;

    let self_employment = calculate_self_employment_tax(
        totals.self_employment_income(),
        config.self_employment(),
        step_number,
    );
    steps.push(self_employment.audit_step);
    step_number += 1;

    let total_tax_before_credits = federal.tax + self_employment.tax;

    let child = calculate_child_tax_credit(
        resolved.dependents,
        resolved.child_tax_credit,
        config.credits().child_tax_credit_per_dependent,
        step_number,
    );
    steps.push(child.audit_step);
    step_number += 1;

    let eitc = calculate_eitc(
        resolved.earned_income_credit,
        filer.compute_earned_income_credit,
        totals.amount(CanonicalField::Wages),
        resolved.status,
        resolved.dependents,
        &config.credits().earned_income_credit,
        step_number,
    );
    debug!(source = ?eitc.source, credit = %eitc.credit, "earned income credit");
    steps.push(eitc.audit_step);
    step_number += 1;

    let credits = total_credits(
        child.credit,
        eitc.credit,
        resolved.education_credits,
        resolved.other_credits,
        step_number,
    );
    steps.push(credits.audit_step);
    step_number += 1;

    let total_tax_liability =
        (total_tax_before_credits - credits.summary.total_credits).max(Decimal::ZERO);
    steps.push(AuditStep {
        step_number,
        rule_id: "total_tax_liability".to_string(),
        rule_name: "Total Tax Liability".to_string(),
        irs_reference: "Form 1040, line 24".to_string(),
        input: serde_json::json!({
            "federal_tax": federal.tax.normalize().to_string(),
            "self_employment_tax": self_employment.tax.normalize().to_string(),
            "total_credits": credits.summary.total_credits.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_tax_liability": total_tax_liability.normalize().to_string()
        }),
        reasoning: format!(
            "max(0, ${} + ${} - ${}) = ${}",
            federal.tax.normalize(),
            self_employment.tax.normalize(),
            credits.summary.total_credits.normalize(),
            total_tax_liability.normalize()
        ),
    });
    step_number += 1;

    let federal_withheld = totals.federal_withheld();
    let refund_or_due = round_currency(federal_withheld - total_tax_liability);
    let result_type = ResultType::from_balance(refund_or_due);
    steps.push(AuditStep {
        step_number,
        rule_id: "refund_or_due".to_string(),
        rule_name: "Refund or Amount Due".to_string(),
        irs_reference: "Form 1040, lines 34-37".to_string(),
        input: serde_json::json!({
            "federal_income_tax_withheld": federal_withheld.normalize().to_string(),
            "total_tax_liability": total_tax_liability.normalize().to_string()
        }),
        output: serde_json::json!({
            "refund_or_due": refund_or_due.to_string(),
            "result_type": result_type
        }),
        reasoning: format!(
            "${} withheld - ${} liability = ${}",
            federal_withheld.normalize(),
            total_tax_liability.normalize(),
            refund_or_due
        ),
    });

    info!(
        filing_status = %resolved.status,
        total_income = %totals.total_income(),
        liability = %round_currency(total_tax_liability),
        refund_or_due = %refund_or_due,
        warnings = warnings.len(),
        "tax calculated"
    );

    let mut credit_summary = credits.summary;
    credit_summary.child_tax_credit = round_currency(credit_summary.child_tax_credit);
    credit_summary.earned_income_credit = round_currency(credit_summary.earned_income_credit);
    credit_summary.education_credits = round_currency(credit_summary.education_credits);
    credit_summary.other_credits = round_currency(credit_summary.other_credits);
    credit_summary.total_credits = round_currency(credit_summary.total_credits);

    TaxResult {
        tax_year: config.metadata().tax_year,
        filing_status: resolved.status,
        num_dependents: resolved.dependents,
        income: IncomeSummary {
            by_source: totals
                .income_by_source()
                .iter()
                .map(|(form, amount)| (*form, round_currency(*amount)))
                .collect(),
            self_employment_income: round_currency(totals.self_employment_income()),
            non_taxable_total: round_currency(totals.non_taxable_total()),
            total_income: round_currency(totals.total_income()),
        },
        deduction: DeductionSummary {
            deduction_type: deduction.deduction_type,
            amount: round_currency(deduction.amount),
        },
        taxable_income: round_currency(taxable_income),
        federal_tax: round_currency(federal.tax),
        bracket_breakdown: federal
            .breakdown
            .into_iter()
            .map(|slice| BracketSlice {
                taxable_amount: round_currency(slice.taxable_amount),
                tax: round_currency(slice.tax),
                ..slice
            })
            .collect(),
        self_employment_tax: round_currency(self_employment.tax),
        total_tax_before_credits: round_currency(total_tax_before_credits),
        credits: credit_summary,
        total_tax_liability: round_currency(total_tax_liability),
        withholding: WithholdingSummary {
            federal_income_tax_withheld: round_currency(federal_withheld),
            social_security_tax_withheld: round_currency(
                totals.amount(CanonicalField::SocialSecurityTaxWithheld),
            ),
            medicare_tax_withheld: round_currency(
                totals.amount(CanonicalField::MedicareTaxWithheld),
            ),
            total_withheld: round_currency(totals.total_withheld()),
        },
        refund_or_due,
        result_type,
        result_amount: refund_or_due.abs(),
        audit_trace: AuditTrace { steps, warnings },
    }
}

/// Aggregates normalized documents and calculates tax on the totals.
///
/// Warnings from normalization (dropped labels, non-numeric values) are placed ahead
/// of the calculation's own warnings.
pub fn calculate_for_documents(
    documents: &[NormalizedDocument],
    filer: &FilerConfig,
    config: &TaxYearConfig,
) -> (AggregatedTotals, TaxResult) {
    let totals = aggregate_documents(documents);
    let mut result = calculate_tax(&totals, filer, config);

    let mut warnings = document_warnings(documents);
    warnings.append(&mut result.audit_trace.warnings);
    result.audit_trace.warnings = warnings;

    (totals, result)
}
