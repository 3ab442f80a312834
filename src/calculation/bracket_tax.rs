//! Bracket tax calculation functionality.
//!
//! This module applies a percentage-method bracket schedule to taxable
//! income, as described in IRS Publication 15-T.

use rust_decimal::Decimal;

use crate::config::{Bracket, BracketSchedule, TaxYearTables, builtin_tables};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, FilingStatus};

/// The result of a bracket tax calculation, including the matched bracket
/// and audit step.
#[derive(Debug, Clone)]
pub struct FederalTaxResult {
    /// Federal income tax before any credit.
    pub tax: Decimal,
    /// The bracket that was applied, or `None` when income is zero.
    pub bracket: Option<Bracket>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes federal income tax on `taxable_income` using the built-in 2024 tables.
///
/// # Examples
///
/// ```
/// use withholding_engine::calculation::compute_tax;
/// use withholding_engine::models::FilingStatus;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// // 16290 + (100000 - 95375) x 0.24
/// let tax = compute_tax(Decimal::new(100_000, 0), FilingStatus::Single).unwrap();
/// assert_eq!(tax, Decimal::from_str("17400").unwrap());
/// ```
pub fn compute_tax(taxable_income: Decimal, filing_status: FilingStatus) -> EngineResult<Decimal> {
    compute_tax_for_year(taxable_income, filing_status, builtin_tables())
}

/// Computes federal income tax on `taxable_income` using the given year's tables.
///
/// Selects the highest bracket whose threshold is strictly below the income
/// and returns `base_tax + (income - threshold) * rate`. Income of zero owes
/// nothing.
///
/// # Errors
///
/// Returns `InvalidInput` on the `taxable_income` field when it is negative.
pub fn compute_tax_for_year(
    taxable_income: Decimal,
    filing_status: FilingStatus,
    tables: &TaxYearTables,
) -> EngineResult<Decimal> {
    ensure_non_negative(taxable_income)?;
    let (tax, _) = apply_schedule(taxable_income, tables.schedule(filing_status));
    Ok(tax)
}

/// Calculates federal income tax and records the bracket that was applied.
///
/// # Arguments
///
/// * `taxable_income` - Income after W-4 Step 4 adjustments, non-negative
/// * `filing_status` - Selects the bracket schedule
/// * `tables` - The tax year's tables
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_federal_tax(
    taxable_income: Decimal,
    filing_status: FilingStatus,
    tables: &TaxYearTables,
    step_number: u32,
) -> EngineResult<FederalTaxResult> {
    ensure_non_negative(taxable_income)?;

    let (tax, bracket) = apply_schedule(taxable_income, tables.schedule(filing_status));

    let (output, reasoning) = match bracket {
        Some(b) => (
            serde_json::json!({
                "threshold": b.threshold.normalize().to_string(),
                "base_tax": b.base_tax.normalize().to_string(),
                "rate": b.rate.normalize().to_string(),
                "tax": tax.normalize().to_string()
            }),
            format!(
                "${} + (${} - ${}) x {} = ${}",
                b.base_tax.normalize(),
                taxable_income.normalize(),
                b.threshold.normalize(),
                b.rate.normalize(),
                tax.normalize()
            ),
        ),
        None => (
            serde_json::json!({ "tax": "0" }),
            "No taxable income - no bracket applies".to_string(),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "bracket_tax".to_string(),
        rule_name: "Percentage Method Bracket Tax".to_string(),
        reference: format!("Pub. 15-T ({}) annual percentage method", tables.tax_year),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "filing_status": filing_status.as_str()
        }),
        output,
        reasoning,
    };

    Ok(FederalTaxResult {
        tax,
        bracket: bracket.copied(),
        audit_step,
    })
}

fn apply_schedule(income: Decimal, schedule: &BracketSchedule) -> (Decimal, Option<&Bracket>) {
    match schedule.find_bracket(income) {
        Some(b) => (b.base_tax + (income - b.threshold) * b.rate, Some(b)),
        None => (Decimal::ZERO, None),
    }
}

fn ensure_non_negative(taxable_income: Decimal) -> EngineResult<()> {
    if taxable_income < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "taxable_income",
            format!("must not be negative (got {})", taxable_income),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tax(income: &str, status: FilingStatus) -> Decimal {
        compute_tax(dec(income), status).unwrap()
    }

    /// BT-001: zero income owes nothing under every schedule
    #[test]
    fn test_zero_income_is_zero_tax() {
        for status in FilingStatus::ALL {
            assert_eq!(tax("0", status), Decimal::ZERO);
        }
    }

    /// BT-002: single filer, 100000
    #[test]
    fn test_single_100000() {
        assert_eq!(tax("100000", FilingStatus::Single), dec("17400"));
    }

    #[test]
    fn test_married_filing_jointly_100000() {
        // 10294 + (100000 - 89450) x 0.22 = 12615
        assert_eq!(tax("100000", FilingStatus::MarriedFilingJointly), dec("12615"));
    }

    #[test]
    fn test_head_of_household_100000() {
        // 14678 + (100000 - 95350) x 0.24 = 15794
        assert_eq!(tax("100000", FilingStatus::HeadOfHousehold), dec("15794"));
    }

    #[test]
    fn test_lowest_bracket() {
        assert_eq!(tax("5000", FilingStatus::Single), dec("500"));
        assert_eq!(tax("0.01", FilingStatus::Single), dec("0.001"));
    }

    #[test]
    fn test_fractional_result() {
        // 5147 + (50000 - 44725) x 0.22 = 6307.5
        assert_eq!(tax("50000", FilingStatus::Single), dec("6307.5"));
    }

    #[test]
    fn test_top_bracket() {
        // 174238.25 + (1000000 - 578125) x 0.37 = 330332
        assert_eq!(tax("1000000", FilingStatus::Single), dec("330332"));
    }

    /// BT-003: income on a threshold is taxed by the bracket below it
    #[test]
    fn test_threshold_is_taxed_by_lower_bracket() {
        for status in FilingStatus::ALL {
            let brackets = builtin_tables().schedule(status).brackets();
            for pair in brackets.windows(2) {
                let (lower, upper) = (&pair[0], &pair[1]);
                let expected = lower.base_tax + (upper.threshold - lower.threshold) * lower.rate;
                assert_eq!(
                    tax(&upper.threshold.to_string(), status),
                    expected,
                    "{:?} at {}",
                    status,
                    upper.threshold
                );
            }
        }
    }

    #[test]
    fn test_one_cent_above_threshold_uses_upper_bracket() {
        // 1100 + 0.01 x 0.12
        assert_eq!(tax("11000.01", FilingStatus::Single), dec("1100.0012"));
    }

    #[test]
    fn test_negative_income_is_rejected() {
        match compute_tax(dec("-0.01"), FilingStatus::Single) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "taxable_income"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_calculate_federal_tax_records_bracket() {
        let result = calculate_federal_tax(
            dec("100000"),
            FilingStatus::Single,
            builtin_tables(),
            2,
        )
        .unwrap();

        assert_eq!(result.tax, dec("17400"));
        assert_eq!(result.bracket.unwrap().threshold, dec("95375"));
        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.rule_id, "bracket_tax");
        assert_eq!(result.audit_step.output["threshold"].as_str().unwrap(), "95375");
        assert_eq!(result.audit_step.output["rate"].as_str().unwrap(), "0.24");
        assert_eq!(result.audit_step.output["tax"].as_str().unwrap(), "17400");
        assert!(result.audit_step.reasoning.contains("$16290"));
        assert!(result.audit_step.reasoning.contains("$17400"));
    }

    #[test]
    fn test_calculate_federal_tax_without_income() {
        let result =
            calculate_federal_tax(Decimal::ZERO, FilingStatus::HeadOfHousehold, builtin_tables(), 1)
                .unwrap();

        assert_eq!(result.tax, Decimal::ZERO);
        assert!(result.bracket.is_none());
        assert!(result.audit_step.reasoning.contains("No taxable income"));
    }
}
