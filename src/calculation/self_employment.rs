//! Self-employment tax.

use rust_decimal::Decimal;

use crate::config::SelfEmploymentConfig;
use crate::models::AuditStep;

/// The result of the self-employment tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct SelfEmploymentTaxResult {
    /// Net earnings from self-employment (income x net earnings factor).
    pub net_earnings: Decimal,
    /// Self-employment tax at full precision.
    pub tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates self-employment tax on self-employment income.
///
/// `tax = income x net_earnings_factor x tax_rate` when income is positive,
/// otherwise zero. Only nonemployee compensation and fishing boat proceeds feed
/// this base; other 1099-MISC income does not.
///
/// # IRS Reference
///
/// Schedule SE, Part I.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_self_employment_tax;
/// use tax_engine::config::SelfEmploymentConfig;
/// use rust_decimal::Decimal;
///
/// let config = SelfEmploymentConfig {
///     net_earnings_factor: Decimal::new(9235, 4),
///     tax_rate: Decimal::new(153, 3),
/// };
/// let result = calculate_self_employment_tax(Decimal::from(75000), &config, 5);
/// assert_eq!(result.tax.round_dp(2), Decimal::new(1059716, 2));
/// ```
pub fn calculate_self_employment_tax(
    self_employment_income: Decimal,
    config: &SelfEmploymentConfig,
    step_number: u32,
) -> SelfEmploymentTaxResult {
    let (net_earnings, tax, reasoning) = if self_employment_income > Decimal::ZERO {
        let net_earnings = self_employment_income * config.net_earnings_factor;
        let tax = net_earnings * config.tax_rate;
        let reasoning = format!(
            "${} x {} = ${} net earnings; x {}% = ${}",
            self_employment_income.normalize(),
            config.net_earnings_factor.normalize(),
            net_earnings.normalize(),
            (config.tax_rate * Decimal::ONE_HUNDRED).normalize(),
            tax.normalize()
        );
        (net_earnings, tax, reasoning)
    } else {
        (
            Decimal::ZERO,
            Decimal::ZERO,
            "No self-employment income; self-employment tax is $0".to_string(),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "self_employment_tax".to_string(),
        rule_name: "Self-Employment Tax".to_string(),
        irs_reference: "Schedule SE, Part I".to_string(),
        input: serde_json::json!({
            "self_employment_income": self_employment_income.normalize().to_string(),
            "net_earnings_factor": config.net_earnings_factor.normalize().to_string(),
            "tax_rate": config.tax_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "net_earnings": net_earnings.normalize().to_string(),
            "self_employment_tax": tax.normalize().to_string()
        }),
        reasoning,
    };

    SelfEmploymentTaxResult {
        net_earnings,
        tax,
        audit_step,
    }
}
