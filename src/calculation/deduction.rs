//! Deduction selection.

use rust_decimal::Decimal;

use crate::config::StandardDeductions;
use crate::models::{AuditStep, DeductionType, FilingStatus};

/// The result of choosing a deduction, including the audit step.
#[derive(Debug, Clone)]
pub struct DeductionResult {
    /// The deduction actually applied.
    pub deduction_type: DeductionType,
    /// The amount subtracted from total income.
    pub amount: Decimal,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Chooses between the itemized amount and the standard deduction.
///
/// The itemized amount is used only when the filer asked for itemizing and gave a
/// positive amount; otherwise the standard deduction for the filing status applies.
///
/// # IRS Reference
///
/// Form 1040, line 12.
pub fn determine_deduction(
    status: FilingStatus,
    requested: DeductionType,
    itemized_amount: Decimal,
    standard: &StandardDeductions,
    step_number: u32,
) -> DeductionResult {
    let standard_amount = standard.for_status(status);
    let use_itemized = requested == DeductionType::Itemized && itemized_amount > Decimal::ZERO;

    let (deduction_type, amount, reasoning) = if use_itemized {
        (
            DeductionType::Itemized,
            itemized_amount,
            format!("Itemized deduction of ${} as requested", itemized_amount.normalize()),
        )
    } else {
        let reasoning = if requested == DeductionType::Itemized {
            format!(
                "Itemized deduction requested without a positive amount; standard deduction for {} is ${}",
                status,
                standard_amount.normalize()
            )
        } else {
            format!("Standard deduction for {} is ${}", status, standard_amount.normalize())
        };
        (DeductionType::Standard, standard_amount, reasoning)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "deduction".to_string(),
        rule_name: "Deduction Selection".to_string(),
        irs_reference: "Form 1040, line 12".to_string(),
        input: serde_json::json!({
            "filing_status": status.as_str(),
            "requested": requested,
            "itemized_amount": itemized_amount.normalize().to_string(),
            "standard_amount": standard_amount.normalize().to_string()
        }),
        output: serde_json::json!({
            "deduction_type": deduction_type,
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    DeductionResult {
        deduction_type,
        amount,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_standard_deduction_for_each_status() {
        let config = test_config();
        let expected = [
            (FilingStatus::Single, "14600"),
            (FilingStatus::MarriedFilingJointly, "29200"),
            (FilingStatus::MarriedFilingSeparately, "14600"),
            (FilingStatus::HeadOfHousehold, "21900"),
            (FilingStatus::QualifyingWidow, "29200"),
        ];
        for (status, amount) in expected {
            let result = determine_deduction(
                status,
                DeductionType::Standard,
                Decimal::ZERO,
                config.standard_deductions(),
                1,
            );
            assert_eq!(result.amount, dec(amount), "{status}");
            assert_eq!(result.deduction_type, DeductionType::Standard);
        }
    }

    #[test]
    fn test_itemized_amount_used_when_requested() {
        let config = test_config();
        let result = determine_deduction(
            FilingStatus::Single,
            DeductionType::Itemized,
            dec("18250.40"),
            config.standard_deductions(),
            2,
        );
        assert_eq!(result.deduction_type, DeductionType::Itemized);
        assert_eq!(result.amount, dec("18250.40"));
        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.output["deduction_type"], "itemized");
    }

    #[test]
    fn test_itemized_below_standard_is_still_honored() {
        let config = test_config();
        let result = determine_deduction(
            FilingStatus::Single,
            DeductionType::Itemized,
            dec("5000"),
            config.standard_deductions(),
            1,
        );
        assert_eq!(result.amount, dec("5000"));
    }

    #[test]
    fn test_itemized_without_amount_falls_back_to_standard() {
        let config = test_config();
        let result = determine_deduction(
            FilingStatus::HeadOfHousehold,
            DeductionType::Itemized,
            Decimal::ZERO,
            config.standard_deductions(),
            1,
        );
        assert_eq!(result.deduction_type, DeductionType::Standard);
        assert_eq!(result.amount, dec("21900"));
        assert!(result.audit_step.reasoning.contains("without a positive amount"));
    }
}
