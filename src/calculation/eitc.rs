//! Earned income tax credit.

use rust_decimal::Decimal;

use crate::config::EitcTables;
use crate::models::{AuditStep, FilingStatus};

/// How the earned income credit amount was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EitcSource {
    /// The filer supplied the amount.
    Supplied,
    /// Computed from the phase-in/phase-out tables.
    Computed,
    /// Neither supplied nor requested.
    NotClaimed,
}

/// The result of the EITC step, including the audit step.
#[derive(Debug, Clone)]
pub struct EitcResult {
    /// Credit at full precision.
    pub credit: Decimal,
    /// Where the amount came from.
    pub source: EitcSource,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The phase-in/phase-out formula.
///
/// `min(earned x phase_in_rate, max_credit)`, less `(earned - phase_out_start) x
/// phase_out_rate` above the phase-out start, floored at zero. Returns zero when
/// earned income is not positive or no table row exists for the status and
/// dependent count.
pub fn eitc_amount(
    earned_income: Decimal,
    status: FilingStatus,
    dependents: u32,
    tables: &EitcTables,
) -> Decimal {
    if earned_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let Some(params) = tables.lookup(status, dependents) else {
        return Decimal::ZERO;
    };

    let mut credit = (earned_income * params.phase_in_rate).min(params.max_credit);
    if earned_income > params.phase_out_start {
        credit -= (earned_income - params.phase_out_start) * params.phase_out_rate;
    }
    credit.max(Decimal::ZERO)
}

/// Resolves the earned income credit.
///
/// A positive supplied amount wins. Otherwise the credit is computed from W-2
/// wages only when `compute` is set, and is zero when it is not.
///
/// # IRS Reference
///
/// Form 1040, line 27 (Schedule EIC).
pub fn calculate_eitc(
    supplied: Decimal,
    compute: bool,
    earned_income: Decimal,
    status: FilingStatus,
    dependents: u32,
    tables: &EitcTables,
    step_number: u32,
) -> EitcResult {
    let (credit, source, reasoning) = if supplied > Decimal::ZERO {
        (
            supplied,
            EitcSource::Supplied,
            format!("Earned income credit of ${} as supplied", supplied.normalize()),
        )
    } else if compute {
        let credit = eitc_amount(earned_income, status, dependents, tables);
        let reasoning = match tables.lookup(status, dependents) {
            Some(params) => format!(
                "Earned income ${} with {} dependent(s): phase-in {}, max ${}, phase-out above ${} at {} = ${}",
                earned_income.normalize(),
                dependents,
                params.phase_in_rate.normalize(),
                params.max_credit.normalize(),
                params.phase_out_start.normalize(),
                params.phase_out_rate.normalize(),
                credit.normalize()
            ),
            None => format!(
                "No earned income credit table for {} dependents; credit is $0",
                dependents
            ),
        };
        (credit, EitcSource::Computed, reasoning)
    } else {
        (
            Decimal::ZERO,
            EitcSource::NotClaimed,
            "Earned income credit not claimed".to_string(),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "earned_income_credit".to_string(),
        rule_name: "Earned Income Credit".to_string(),
        irs_reference: "Form 1040, line 27".to_string(),
        input: serde_json::json!({
            "supplied": supplied.normalize().to_string(),
            "compute": compute,
            "earned_income": earned_income.normalize().to_string(),
            "filing_status": status.as_str(),
            "dependents": dependents
        }),
        output: serde_json::json!({
            "earned_income_credit": credit.normalize().to_string()
        }),
        reasoning,
    };

    EitcResult {
        credit,
        source,
        audit_step,
    }
}
