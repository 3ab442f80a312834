//! Annual withholding calculation.
//!
//! Chains the individual rules into the full calculation: taxable income,
//! bracket tax, Step 3 credit, Social Security, Medicare, and totals.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::{TaxYearTables, builtin_tables};
use crate::error::{EngineError, EngineResult};
use crate::format::DisplayValues;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CalculationResult, FilingStatus, WithholdingInputs,
    WithholdingResult,
};

use super::{
    apply_tax_credit, calculate_federal_tax, calculate_medicare, calculate_social_security,
    calculate_taxable_income,
};

/// A withholding result together with the intermediate figures and audit trace.
#[derive(Debug, Clone)]
pub struct WithholdingCalculation {
    /// The tax year whose tables were used.
    pub tax_year: i32,
    /// The filing status whose schedule was used.
    pub filing_status: FilingStatus,
    /// Salary plus other income less deductions, floored at zero.
    pub taxable_income: Decimal,
    /// Bracket tax before the Step 3 credit.
    pub federal_tax_before_credit: Decimal,
    /// The six calculated figures.
    pub result: WithholdingResult,
    /// One step per rule, plus any warnings.
    pub audit_trace: AuditTrace,
}

impl WithholdingCalculation {
    /// Wraps the calculation in an identified, timestamped result with
    /// display strings.
    pub fn into_result(self) -> CalculationResult {
        CalculationResult {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            tax_year: self.tax_year,
            filing_status: self.filing_status,
            taxable_income: self.taxable_income,
            display: DisplayValues::from(&self.result),
            result: self.result,
            audit_trace: self.audit_trace,
        }
    }
}

/// Computes annual withholding using the built-in 2024 tables.
///
/// # Examples
///
/// ```
/// use withholding_engine::calculation::compute_withholding;
/// use withholding_engine::models::{FilingStatus, WithholdingInputs};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let inputs = WithholdingInputs::new(Decimal::new(100_000, 0), FilingStatus::Single);
/// let result = compute_withholding(&inputs).unwrap();
///
/// assert_eq!(result.total_tax, Decimal::from_str("25050").unwrap());
/// assert_eq!(result.effective_rate_percent, Decimal::from_str("25.05").unwrap());
/// ```
pub fn compute_withholding(inputs: &WithholdingInputs) -> EngineResult<WithholdingResult> {
    compute_withholding_for_year(inputs, builtin_tables())
}

/// Computes annual withholding using the given year's tables.
///
/// # Errors
///
/// Returns `InvalidInput` naming the first negative monetary field, or the
/// field whose magnitude puts a figure outside the representable range.
pub fn compute_withholding_for_year(
    inputs: &WithholdingInputs,
    tables: &TaxYearTables,
) -> EngineResult<WithholdingResult> {
    calculate_withholding(inputs, tables).map(|calculation| calculation.result)
}

/// Runs the full withholding calculation and records an audit trace.
///
/// Inputs are validated first and rejected (not clamped) when a monetary
/// field is negative.
pub fn calculate_withholding(
    inputs: &WithholdingInputs,
    tables: &TaxYearTables,
) -> EngineResult<WithholdingCalculation> {
    let start_time = Instant::now();
    inputs.validate()?;

    let mut steps: Vec<AuditStep> = Vec::with_capacity(6);
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let gross = inputs.gross_annual_salary;

    let taxable = calculate_taxable_income(inputs, 1)?;
    if taxable.floored {
        warnings.push(AuditWarning {
            code: "DEDUCTIONS_EXCEED_INCOME".to_string(),
            message: "Step 4(b) deductions exceed salary plus other income; taxable income set to $0"
                .to_string(),
            severity: "low".to_string(),
        });
    }
    let taxable_income = taxable.taxable_income;
    steps.push(taxable.audit_step);

    let bracket_tax = calculate_federal_tax(taxable_income, inputs.filing_status, tables, 2)?;
    let federal_tax_before_credit = bracket_tax.tax;
    steps.push(bracket_tax.audit_step);

    let credit = apply_tax_credit(federal_tax_before_credit, inputs.step3_credit, 3);
    if credit.credit_applied < inputs.step3_credit {
        warnings.push(AuditWarning {
            code: "CREDIT_EXCEEDS_TAX".to_string(),
            message: format!(
                "Step 3 credit of ${} exceeds federal tax of ${}; ${} unused",
                inputs.step3_credit.normalize(),
                federal_tax_before_credit.normalize(),
                (inputs.step3_credit - credit.credit_applied).normalize()
            ),
            severity: "low".to_string(),
        });
    }
    let federal_tax = credit.federal_tax;
    steps.push(credit.audit_step);

    let social_security = calculate_social_security(gross, &tables.payroll, 4);
    let social_security_tax = social_security.tax;
    steps.push(social_security.audit_step);

    let medicare = calculate_medicare(gross, &tables.payroll, 5);
    let medicare_tax = medicare.tax;
    steps.push(medicare.audit_step);

    let too_large = || EngineError::invalid_input("gross_annual_salary", "amount too large");
    let total_tax = federal_tax
        .checked_add(social_security_tax)
        .and_then(|sum| sum.checked_add(medicare_tax))
        .ok_or_else(too_large)?;
    let net_income = gross.checked_sub(total_tax).ok_or_else(too_large)?;
    let effective_rate_percent = if gross > Decimal::ZERO {
        total_tax
            .checked_div(gross)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| {
                EngineError::invalid_input(
                    "step4a_other_income",
                    "amount too large relative to salary",
                )
            })?
    } else {
        Decimal::ZERO
    };

    if net_income < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_INCOME".to_string(),
            message: "Total tax exceeds gross salary".to_string(),
            severity: "medium".to_string(),
        });
    }

    steps.push(AuditStep {
        step_number: 6,
        rule_id: "totals".to_string(),
        rule_name: "Totals".to_string(),
        reference: "Pub. 15-T annual summary".to_string(),
        input: serde_json::json!({
            "federal_tax": federal_tax.normalize().to_string(),
            "social_security_tax": social_security_tax.normalize().to_string(),
            "medicare_tax": medicare_tax.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_tax": total_tax.normalize().to_string(),
            "net_income": net_income.normalize().to_string(),
            "effective_rate_percent": effective_rate_percent.normalize().to_string()
        }),
        reasoning: format!(
            "${} + ${} + ${} = ${}; ${} - ${} = ${}",
            federal_tax.normalize(),
            social_security_tax.normalize(),
            medicare_tax.normalize(),
            total_tax.normalize(),
            gross.normalize(),
            total_tax.normalize(),
            net_income.normalize()
        ),
    });

    Ok(WithholdingCalculation {
        tax_year: tables.tax_year,
        filing_status: inputs.filing_status,
        taxable_income,
        federal_tax_before_credit,
        result: WithholdingResult {
            federal_tax,
            social_security_tax,
            medicare_tax,
            total_tax,
            net_income,
            effective_rate_percent,
        },
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    })
}
