//! Withholding input and result models.
//!
//! This module defines the values that enter and leave the withholding
//! calculator: [`WithholdingInputs`] and [`WithholdingResult`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::FilingStatus;

/// The inputs to a withholding calculation.
///
/// Every monetary field must be non-negative; call [`WithholdingInputs::validate`]
/// (the calculator does this itself) before relying on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingInputs {
    /// Gross annual salary.
    pub gross_annual_salary: Decimal,
    /// W-4 Step 1 filing status.
    pub filing_status: FilingStatus,
    /// W-4 Step 3 credit for dependents and other credits.
    #[serde(default)]
    pub step3_credit: Decimal,
    /// W-4 Step 4(a) other income not from jobs.
    #[serde(default)]
    pub step4a_other_income: Decimal,
    /// W-4 Step 4(b) deductions beyond the standard deduction.
    #[serde(default)]
    pub step4b_deductions: Decimal,
}

impl WithholdingInputs {
    /// Creates inputs for a salary and filing status with no W-4 adjustments.
    ///
    /// # Examples
    ///
    /// ```
    /// use withholding_engine::models::{FilingStatus, WithholdingInputs};
    /// use rust_decimal::Decimal;
    ///
    /// let inputs = WithholdingInputs::new(Decimal::new(100_000, 0), FilingStatus::Single);
    /// assert!(inputs.step3_credit.is_zero());
    /// assert!(inputs.validate().is_ok());
    /// ```
    pub fn new(gross_annual_salary: Decimal, filing_status: FilingStatus) -> Self {
        Self {
            gross_annual_salary,
            filing_status,
            step3_credit: Decimal::ZERO,
            step4a_other_income: Decimal::ZERO,
            step4b_deductions: Decimal::ZERO,
        }
    }

    /// Checks that every monetary field is non-negative.
    ///
    /// Returns an `InvalidInput` error naming the first offending field.
    /// Values are never clamped here.
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("gross_annual_salary", self.gross_annual_salary),
            ("step3_credit", self.step3_credit),
            ("step4a_other_income", self.step4a_other_income),
            ("step4b_deductions", self.step4b_deductions),
        ];

        for (field, value) in fields {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must not be negative (got {})", value),
                ));
            }
        }

        Ok(())
    }
}

/// The six values produced by a withholding calculation.
///
/// All amounts are annual and unrounded; rounding is a display concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingResult {
    /// Federal income tax after the Step 3 credit.
    pub federal_tax: Decimal,
    /// Social Security tax on wages up to the wage base.
    pub social_security_tax: Decimal,
    /// Medicare tax on all wages.
    pub medicare_tax: Decimal,
    /// Sum of the three taxes above.
    pub total_tax: Decimal,
    /// Gross salary less total tax. Can be negative.
    pub net_income: Decimal,
    /// Total tax as a percentage of gross salary (0 when salary is 0).
    pub effective_rate_percent: Decimal,
}

impl WithholdingResult {
    /// A result with every field zero.
    pub fn zero() -> Self {
        Self {
            federal_tax: Decimal::ZERO,
            social_security_tax: Decimal::ZERO,
            medicare_tax: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            net_income: Decimal::ZERO,
            effective_rate_percent: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_inputs_defaults_adjustments_to_zero() {
        let json = r#"{
            "gross_annual_salary": "85000",
            "filing_status": "single"
        }"#;

        let inputs: WithholdingInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.gross_annual_salary, dec("85000"));
        assert_eq!(inputs.filing_status, FilingStatus::Single);
        assert_eq!(inputs.step3_credit, Decimal::ZERO);
        assert_eq!(inputs.step4a_other_income, Decimal::ZERO);
        assert_eq!(inputs.step4b_deductions, Decimal::ZERO);
    }

    #[test]
    fn test_validate_accepts_zero_inputs() {
        let inputs = WithholdingInputs::new(Decimal::ZERO, FilingStatus::HeadOfHousehold);
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_salary() {
        let inputs = WithholdingInputs::new(dec("-1"), FilingStatus::Single);

        match inputs.validate() {
            Err(EngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "gross_annual_salary");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_names_the_negative_adjustment() {
        let mut inputs = WithholdingInputs::new(dec("50000"), FilingStatus::Single);
        inputs.step4b_deductions = dec("-0.01");

        match inputs.validate() {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "step4b_deductions");
                assert!(message.contains("-0.01"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_does_not_modify_inputs() {
        let mut inputs = WithholdingInputs::new(dec("50000"), FilingStatus::Single);
        inputs.step3_credit = dec("-500");
        let before = inputs.clone();

        assert!(inputs.validate().is_err());
        assert_eq!(inputs, before);
    }

    #[test]
    fn test_zero_result_has_all_fields_zero() {
        let result = WithholdingResult::zero();
        assert!(result.federal_tax.is_zero());
        assert!(result.social_security_tax.is_zero());
        assert!(result.medicare_tax.is_zero());
        assert!(result.total_tax.is_zero());
        assert!(result.net_income.is_zero());
        assert!(result.effective_rate_percent.is_zero());
    }

    #[test]
    fn test_result_serializes_amounts_as_strings() {
        let mut result = WithholdingResult::zero();
        result.federal_tax = dec("17400.00");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["federal_tax"].as_str().unwrap(), "17400.00");
    }
}
