//! Taxable income calculation.
//!
//! Combines the salary with the W-4 Step 4(a) other income and Step 4(b)
//! deductions, floored at zero.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, WithholdingInputs};

/// The result of the taxable income calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct TaxableIncomeResult {
    /// Salary plus other income less deductions, never below zero.
    pub taxable_income: Decimal,
    /// True when deductions exceeded income and the result was floored.
    pub floored: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Derives taxable income from the withholding inputs.
///
/// # Errors
///
/// Returns `InvalidInput` on `step4a_other_income` when salary plus other
/// income cannot be represented.
///
/// # Examples
///
/// ```
/// use withholding_engine::calculation::calculate_taxable_income;
/// use withholding_engine::models::{FilingStatus, WithholdingInputs};
/// use rust_decimal::Decimal;
///
/// let mut inputs = WithholdingInputs::new(Decimal::new(10_000, 0), FilingStatus::Single);
/// inputs.step4b_deductions = Decimal::new(20_000, 0);
///
/// let result = calculate_taxable_income(&inputs, 1).unwrap();
/// assert_eq!(result.taxable_income, Decimal::ZERO);
/// assert!(result.floored);
/// ```
pub fn calculate_taxable_income(
    inputs: &WithholdingInputs,
    step_number: u32,
) -> EngineResult<TaxableIncomeResult> {
    let combined = inputs
        .gross_annual_salary
        .checked_add(inputs.step4a_other_income)
        .and_then(|income| income.checked_sub(inputs.step4b_deductions))
        .ok_or_else(|| EngineError::invalid_input("step4a_other_income", "amount too large"))?;
    let floored = combined < Decimal::ZERO;
    let taxable_income = combined.max(Decimal::ZERO);

    let mut reasoning = format!(
        "${} + ${} - ${} = ${}",
        inputs.gross_annual_salary.normalize(),
        inputs.step4a_other_income.normalize(),
        inputs.step4b_deductions.normalize(),
        combined.normalize()
    );
    if floored {
        reasoning.push_str(" (floored at $0)");
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "taxable_income".to_string(),
        rule_name: "Taxable Income".to_string(),
        reference: "Form W-4 Steps 4(a) and 4(b)".to_string(),
        input: serde_json::json!({
            "gross_annual_salary": inputs.gross_annual_salary.normalize().to_string(),
            "step4a_other_income": inputs.step4a_other_income.normalize().to_string(),
            "step4b_deductions": inputs.step4b_deductions.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "floored": floored
        }),
        reasoning,
    };

    Ok(TaxableIncomeResult {
        taxable_income,
        floored,
        audit_step,
    })
}
