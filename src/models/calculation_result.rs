//! Calculation result models for the withholding engine.
//!
//! This module contains the [`CalculationResult`] envelope returned by the API
//! and the audit trace types that record how each figure was derived.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::DisplayValues;

use super::{FilingStatus, WithholdingResult};

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
    /// Reference to the form line or publication the rule comes from.
    pub reference: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag inputs that were accepted but produced a clamp or an
/// unusual figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use withholding_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 12,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a withholding calculation as returned by the API.
///
/// Wraps the raw [`WithholdingResult`] with identifying metadata, the
/// formatted display strings, and the audit trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The tax year whose tables were used.
    pub tax_year: i32,
    /// The filing status the schedule was selected for.
    pub filing_status: FilingStatus,
    /// Salary plus other income less deductions, floored at zero.
    pub taxable_income: Decimal,
    /// The six calculated figures.
    pub result: WithholdingResult,
    /// The six figures formatted for display.
    pub display: DisplayValues,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_result() -> CalculationResult {
        let result = WithholdingResult {
            federal_tax: dec("17400.00"),
            social_security_tax: dec("6200.000"),
            medicare_tax: dec("1450.0000"),
            total_tax: dec("25050.0000"),
            net_income: dec("74950.0000"),
            effective_rate_percent: dec("25.05"),
        };

        CalculationResult {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            tax_year: 2024,
            filing_status: FilingStatus::Single,
            taxable_income: dec("100000"),
            display: DisplayValues::from(&result),
            result,
            audit_trace: AuditTrace {
                steps: vec![AuditStep {
                    step_number: 1,
                    rule_id: "taxable_income".to_string(),
                    rule_name: "Taxable Income".to_string(),
                    reference: "W-4 Steps 4(a), 4(b)".to_string(),
                    input: serde_json::json!({ "gross_annual_salary": "100000" }),
                    output: serde_json::json!({ "taxable_income": "100000" }),
                    reasoning: "$100000 + $0 - $0 = $100000".to_string(),
                }],
                warnings: vec![],
                duration_us: 7,
            },
        }
    }

    #[test]
    fn test_calculation_result_round_trips_through_json() {
        let result = create_sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let parsed: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_calculation_result_json_shape() {
        let json = serde_json::to_value(create_sample_result()).unwrap();

        assert_eq!(json["tax_year"], 2024);
        assert_eq!(json["filing_status"], "single");
        assert_eq!(json["display"]["total_tax"], "$25,050");
        assert_eq!(json["audit_trace"]["steps"][0]["rule_id"], "taxable_income");
        assert!(json["calculation_id"].is_string());
    }

    #[test]
    fn test_audit_warning_serialization() {
        let warning = AuditWarning {
            code: "CREDIT_EXCEEDS_TAX".to_string(),
            message: "Step 3 credit exceeds federal tax".to_string(),
            severity: "low".to_string(),
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"CREDIT_EXCEEDS_TAX\""));
        assert!(json.contains("\"severity\":\"low\""));
    }
}
