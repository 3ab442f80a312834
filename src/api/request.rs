//! Request types for the withholding API.
//!
//! This module defines the JSON request structure for the `/calculate` endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{FilingStatus, WithholdingInputs};

/// Request body for the `/calculate` endpoint.
///
/// Amounts may be given as JSON numbers or strings. The filing status is
/// kept as a string so an unknown value is reported as invalid input on
/// that field rather than as a generic body error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithholdingRequest {
    /// Gross annual salary.
    pub gross_annual_salary: Decimal,
    /// Filing status identifier, label, or short code.
    pub filing_status: String,
    /// W-4 Step 3 credit.
    #[serde(default)]
    pub step3_credit: Decimal,
    /// W-4 Step 4(a) other income.
    #[serde(default)]
    pub step4a_other_income: Decimal,
    /// W-4 Step 4(b) deductions.
    #[serde(default)]
    pub step4b_deductions: Decimal,
    /// Tax year to use; the server default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_year: Option<i32>,
}

impl TryFrom<&WithholdingRequest> for WithholdingInputs {
    type Error = EngineError;

    fn try_from(req: &WithholdingRequest) -> Result<Self, Self::Error> {
        let inputs = WithholdingInputs {
            gross_annual_salary: req.gross_annual_salary,
            filing_status: req.filing_status.parse::<FilingStatus>()?,
            step3_credit: req.step3_credit,
            step4a_other_income: req.step4a_other_income,
            step4b_deductions: req.step4b_deductions,
        };
        inputs.validate()?;
        Ok(inputs)
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
    fn test_deserialize_withholding_request() {
        let json = r#"{
            "gross_annual_salary": 100000,
            "filing_status": "single",
            "step3_credit": "2000",
            "step4a_other_income": 10000.50,
            "step4b_deductions": 0,
            "tax_year": 2024
        }"#;

        let request: WithholdingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.gross_annual_salary, dec("100000"));
        assert_eq!(request.step3_credit, dec("2000"));
        assert_eq!(request.step4a_other_income, dec("10000.5"));
        assert_eq!(request.tax_year, Some(2024));
    }

    #[test]
    fn test_deserialize_minimal_request() {
        let json = r#"{ "gross_annual_salary": "52000", "filing_status": "HOH" }"#;

        let request: WithholdingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.step3_credit, Decimal::ZERO);
        assert_eq!(request.step4b_deductions, Decimal::ZERO);
        assert_eq!(request.tax_year, None);
    }

    #[test]
    fn test_missing_salary_is_a_deserialization_error() {
        let json = r#"{ "filing_status": "single" }"#;
        let err = serde_json::from_str::<WithholdingRequest>(json).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_conversion_parses_filing_status() {
        let request: WithholdingRequest = serde_json::from_str(
            r#"{ "gross_annual_salary": "52000", "filing_status": "Married filing jointly" }"#,
        )
        .unwrap();

        let inputs = WithholdingInputs::try_from(&request).unwrap();
        assert_eq!(inputs.filing_status, FilingStatus::MarriedFilingJointly);
        assert_eq!(inputs.gross_annual_salary, dec("52000"));
    }

    #[test]
    fn test_conversion_rejects_unknown_filing_status() {
        let request: WithholdingRequest = serde_json::from_str(
            r#"{ "gross_annual_salary": "52000", "filing_status": "separate" }"#,
        )
        .unwrap();

        match WithholdingInputs::try_from(&request) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "filing_status"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_conversion_rejects_negative_credit() {
        let request: WithholdingRequest = serde_json::from_str(
            r#"{ "gross_annual_salary": "52000", "filing_status": "single", "step3_credit": -1 }"#,
        )
        .unwrap();

        match WithholdingInputs::try_from(&request) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "step3_credit"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
