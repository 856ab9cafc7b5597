//! Audit trail types recorded alongside every calculation.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The IRS form line or publication the rule implements.
    pub irs_reference: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Categories of recoverable problems found during a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// A mapped label carried no usable number.
    ExtractionGap,
    /// A label matched no canonical field and was dropped.
    UnmappedLabel,
    /// A filer option was unrecognized or out of range.
    InvalidConfig,
    /// A value fell outside its arithmetic domain and was clamped.
    ArithmeticDomain,
    /// No income was found in any document.
    LowExtractionQuality,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: WarningCode,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Builds a warning.
    pub fn new(code: WarningCode, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code,
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use tax_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert!(trace.warnings.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_code_serialization() {
        let json = serde_json::to_string(&WarningCode::LowExtractionQuality).unwrap();
        assert_eq!(json, "\"LOW_EXTRACTION_QUALITY\"");

        let code: WarningCode = serde_json::from_str("\"INVALID_CONFIG\"").unwrap();
        assert_eq!(code, WarningCode::InvalidConfig);
    }

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "deduction".to_string(),
            rule_name: "Standard Deduction".to_string(),
            irs_reference: "Form 1040, line 12".to_string(),
            input: serde_json::json!({"filing_status": "Single"}),
            output: serde_json::json!({"deduction": "14600"}),
            reasoning: "Standard deduction for Single".to_string(),
        };

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["irs_reference"], "Form 1040, line 12");
        assert_eq!(json["output"]["deduction"], "14600");
    }
}
