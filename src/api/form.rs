//! HTML form submission type.
//!
//! Browser forms send every field as text, so amounts are parsed here:
//! blank means zero and commas are accepted as thousands separators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{FilingStatus, WithholdingInputs};

/// The fields posted by the calculator form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithholdingForm {
    /// Gross annual salary.
    pub gross_annual_salary: String,
    /// Filing status identifier.
    pub filing_status: String,
    /// W-4 Step 3 credit.
    pub step3_credit: String,
    /// W-4 Step 4(a) other income.
    pub step4a_other_income: String,
    /// W-4 Step 4(b) deductions.
    pub step4b_deductions: String,
    /// Tax year; blank for the server default.
    pub tax_year: String,
}

impl WithholdingForm {
    /// Parses the optional tax year field.
    pub fn tax_year(&self) -> EngineResult<Option<i32>> {
        let raw = self.tax_year.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<i32>()
            .map(Some)
            .map_err(|_| EngineError::invalid_input("tax_year", format!("'{}' is not a year", raw)))
    }
}

impl TryFrom<&WithholdingForm> for WithholdingInputs {
    type Error = EngineError;

    fn try_from(form: &WithholdingForm) -> Result<Self, Self::Error> {
        let inputs = WithholdingInputs {
            gross_annual_salary: parse_amount("gross_annual_salary", &form.gross_annual_salary)?,
            filing_status: form.filing_status.parse::<FilingStatus>()?,
            step3_credit: parse_amount("step3_credit", &form.step3_credit)?,
            step4a_other_income: parse_amount("step4a_other_income", &form.step4a_other_income)?,
            step4b_deductions: parse_amount("step4b_deductions", &form.step4b_deductions)?,
        };
        inputs.validate()?;
        Ok(inputs)
    }
}

/// Parses a form amount.
///
/// Surrounding whitespace and commas are ignored and blank input is zero.
pub fn parse_amount(field: &str, raw: &str) -> EngineResult<Decimal> {
    let normalized = raw.trim().replace(',', "");
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized
        .parse::<Decimal>()
        .map_err(|_| EngineError::invalid_input(field, format!("'{}' is not a number", raw.trim())))
}
