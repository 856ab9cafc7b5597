//! Progressive bracket tax.

use rust_decimal::Decimal;

use crate::config::TaxBracket;
use crate::models::{AuditStep, BracketSlice, FilingStatus};

/// The result of the bracket computation, including the audit step.
#[derive(Debug, Clone)]
pub struct FederalTaxResult {
    /// Federal income tax at full precision.
    pub tax: Decimal,
    /// The income taxed in each bracket reached.
    pub breakdown: Vec<BracketSlice>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Walks the brackets from the lowest up and returns the per-bracket slices.
///
/// Fully consumed brackets contribute `(upper - floor) * rate`; the bracket that
/// contains `taxable_income` contributes `(taxable_income - floor) * rate` and the
/// walk stops. Non-positive income yields no slices.
pub fn bracket_slices(taxable_income: Decimal, brackets: &[TaxBracket]) -> Vec<BracketSlice> {
    let mut slices = Vec::new();
    let mut floor = Decimal::ZERO;

    for bracket in brackets {
        if taxable_income <= floor {
            break;
        }
        let top = match bracket.upper_bound {
            Some(upper) if taxable_income > upper => upper,
            _ => taxable_income,
        };
        let taxable_amount = top - floor;
        slices.push(BracketSlice {
            floor,
            ceiling: bracket.upper_bound,
            rate: bracket.rate,
            taxable_amount,
            tax: taxable_amount * bracket.rate,
        });
        match bracket.upper_bound {
            Some(upper) if taxable_income > upper => floor = upper,
            _ => break,
        }
    }

    slices
}

/// `base_tax + (income - floor) * rate` for the bracket containing the income.
///
/// Agrees with the walk in [`bracket_slices`] whenever the table's cumulative bases
/// are consistent, which configuration loading enforces.
pub fn closed_form_tax(taxable_income: Decimal, brackets: &[TaxBracket]) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut floor = Decimal::ZERO;
    for bracket in brackets {
        match bracket.upper_bound {
            Some(upper) if taxable_income > upper => floor = upper,
            _ => return bracket.base_tax + (taxable_income - floor) * bracket.rate,
        }
    }
    Decimal::ZERO
}

/// Computes federal income tax on taxable income.
///
/// # IRS Reference
///
/// Form 1040, line 16 (Tax Rate Schedules).
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_federal_tax;
/// use tax_engine::config::TaxBracket;
/// use tax_engine::models::FilingStatus;
/// use rust_decimal::Decimal;
///
/// let brackets = vec![
///     TaxBracket { upper_bound: Some(Decimal::from(11600)), rate: Decimal::new(10, 2), base_tax: Decimal::ZERO },
///     TaxBracket { upper_bound: None, rate: Decimal::new(12, 2), base_tax: Decimal::from(1160) },
/// ];
/// let result = calculate_federal_tax(Decimal::from(35400), &brackets, FilingStatus::Single, 1);
/// assert_eq!(result.tax, Decimal::from(4016));
/// assert_eq!(result.breakdown.len(), 2);
/// ```
pub fn calculate_federal_tax(
    taxable_income: Decimal,
    brackets: &[TaxBracket],
    status: FilingStatus,
    step_number: u32,
) -> FederalTaxResult {
    let breakdown = bracket_slices(taxable_income, brackets);
    let tax: Decimal = breakdown.iter().map(|slice| slice.tax).sum();

    let reasoning = if breakdown.is_empty() {
        "No taxable income; federal tax is $0".to_string()
    } else {
        let parts: Vec<String> = breakdown
            .iter()
            .map(|slice| {
                format!(
                    "${} x {}%",
                    slice.taxable_amount.normalize(),
                    (slice.rate * Decimal::ONE_HUNDRED).normalize()
                )
            })
            .collect();
        format!("{} = ${}", parts.join(" + "), tax.normalize())
    };

    let marginal_rate = breakdown
        .last()
        .map(|slice| slice.rate)
        .unwrap_or(Decimal::ZERO);

    let audit_step = AuditStep {
        step_number,
        rule_id: "federal_income_tax".to_string(),
        rule_name: "Federal Income Tax".to_string(),
        irs_reference: "Form 1040, line 16".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "bracket_table": status.table_status().as_str()
        }),
        output: serde_json::json!({
            "federal_tax": tax.normalize().to_string(),
            "marginal_rate": marginal_rate.normalize().to_string(),
            "brackets_used": breakdown.len()
        }),
        reasoning,
    };

    FederalTaxResult {
        tax,
        breakdown,
        audit_step,
    }
}
