//! Child tax credit and the credit total.

use rust_decimal::Decimal;

use crate::models::{AuditStep, CreditSummary};

/// The result of the child tax credit step, including the audit step.
#[derive(Debug, Clone)]
pub struct ChildTaxCreditResult {
    /// Credit at full precision.
    pub credit: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The child tax credit: the larger of the supplied amount and
/// `dependents x per_dependent`.
///
/// # IRS Reference
///
/// Schedule 8812.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_child_tax_credit;
/// use rust_decimal::Decimal;
///
/// let result = calculate_child_tax_credit(2, Decimal::ZERO, Decimal::from(2000), 6);
/// assert_eq!(result.credit, Decimal::from(4000));
///
/// let result = calculate_child_tax_credit(1, Decimal::from(2500), Decimal::from(2000), 6);
/// assert_eq!(result.credit, Decimal::from(2500));
/// ```
pub fn calculate_child_tax_credit(
    dependents: u32,
    supplied: Decimal,
    per_dependent: Decimal,
    step_number: u32,
) -> ChildTaxCreditResult {
    let computed = Decimal::from(dependents) * per_dependent;
    let credit = computed.max(supplied);

    let reasoning = if supplied > computed {
        format!(
            "Supplied child tax credit ${} exceeds {} x ${} = ${}",
            supplied.normalize(),
            dependents,
            per_dependent.normalize(),
            computed.normalize()
        )
    } else {
        format!(
            "{} dependent(s) x ${} = ${}",
            dependents,
            per_dependent.normalize(),
            computed.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "child_tax_credit".to_string(),
        rule_name: "Child Tax Credit".to_string(),
        irs_reference: "Schedule 8812".to_string(),
        input: serde_json::json!({
            "dependents": dependents,
            "per_dependent": per_dependent.normalize().to_string(),
            "supplied": supplied.normalize().to_string()
        }),
        output: serde_json::json!({
            "child_tax_credit": credit.normalize().to_string()
        }),
        reasoning,
    };

    ChildTaxCreditResult { credit, audit_step }
}

/// The result of totalling credits, including the audit step.
#[derive(Debug, Clone)]
pub struct CreditTotalResult {
    /// Every credit and their total, at full precision.
    pub summary: CreditSummary,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Sums the child tax credit, earned income credit and the pass-through
/// education and other credits.
pub fn total_credits(
    child_tax_credit: Decimal,
    earned_income_credit: Decimal,
    education_credits: Decimal,
    other_credits: Decimal,
    step_number: u32,
) -> CreditTotalResult {
    let total = child_tax_credit + earned_income_credit + education_credits + other_credits;

    let audit_step = AuditStep {
        step_number,
        rule_id: "total_credits".to_string(),
        rule_name: "Total Credits".to_string(),
        irs_reference: "Form 1040, lines 19-21".to_string(),
        input: serde_json::json!({
            "child_tax_credit": child_tax_credit.normalize().to_string(),
            "earned_income_credit": earned_income_credit.normalize().to_string(),
            "education_credits": education_credits.normalize().to_string(),
            "other_credits": other_credits.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_credits": total.normalize().to_string()
        }),
        reasoning: format!(
            "${} + ${} + ${} + ${} = ${}",
            child_tax_credit.normalize(),
            earned_income_credit.normalize(),
            education_credits.normalize(),
            other_credits.normalize(),
            total.normalize()
        ),
    };

    CreditTotalResult {
        summary: CreditSummary {
            child_tax_credit,
            earned_income_credit,
            education_credits,
            other_credits,
            total_credits: total,
        },
        audit_step,
    }
}
