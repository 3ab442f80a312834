//! Social Security and Medicare (FICA) calculation.
//!
//! Social Security applies only to wages up to the annual wage base.
//! Medicare applies to all wages; the additional Medicare tier is not modelled.

use rust_decimal::Decimal;

use crate::config::PayrollTaxRates;
use crate::models::AuditStep;

/// The result of a payroll tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct PayrollTaxResult {
    /// The tax owed.
    pub tax: Decimal,
    /// The wages the rate was applied to.
    pub taxable_wages: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee Social Security tax.
///
/// # Examples
///
/// ```
/// use withholding_engine::calculation::calculate_social_security;
/// use withholding_engine::config::builtin_tables;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let payroll = &builtin_tables().payroll;
/// let result = calculate_social_security(Decimal::new(500_000, 0), payroll, 4);
/// assert_eq!(result.tax, Decimal::from_str("10453.20").unwrap());
/// ```
pub fn calculate_social_security(
    gross_annual_salary: Decimal,
    payroll: &PayrollTaxRates,
    step_number: u32,
) -> PayrollTaxResult {
    let wage_base = payroll.social_security_wage_base;
    let taxable_wages = gross_annual_salary.min(wage_base);
    let tax = taxable_wages * payroll.social_security_rate;
    let capped = gross_annual_salary > wage_base;

    let reasoning = if capped {
        format!(
            "Salary ${} capped at wage base ${}: ${} x {} = ${}",
            gross_annual_salary.normalize(),
            wage_base.normalize(),
            taxable_wages.normalize(),
            payroll.social_security_rate.normalize(),
            tax.normalize()
        )
    } else {
        format!(
            "${} x {} = ${}",
            taxable_wages.normalize(),
            payroll.social_security_rate.normalize(),
            tax.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "social_security".to_string(),
        rule_name: "Social Security Tax".to_string(),
        reference: "IRC 3101(a)".to_string(),
        input: serde_json::json!({
            "gross_annual_salary": gross_annual_salary.normalize().to_string(),
            "wage_base": wage_base.normalize().to_string(),
            "rate": payroll.social_security_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_wages": taxable_wages.normalize().to_string(),
            "tax": tax.normalize().to_string(),
            "capped": capped
        }),
        reasoning,
    };

    PayrollTaxResult {
        tax,
        taxable_wages,
        audit_step,
    }
}

/// Calculates the employee Medicare tax on all wages.
pub fn calculate_medicare(
    gross_annual_salary: Decimal,
    payroll: &PayrollTaxRates,
    step_number: u32,
) -> PayrollTaxResult {
    let tax = gross_annual_salary * payroll.medicare_rate;

    let audit_step = AuditStep {
        step_number,
        rule_id: "medicare".to_string(),
        rule_name: "Medicare Tax".to_string(),
        reference: "IRC 3101(b)".to_string(),
        input: serde_json::json!({
            "gross_annual_salary": gross_annual_salary.normalize().to_string(),
            "rate": payroll.medicare_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "tax": tax.normalize().to_string()
        }),
        reasoning: format!(
            "${} x {} = ${}",
            gross_annual_salary.normalize(),
            payroll.medicare_rate.normalize(),
            tax.normalize()
        ),
    };

    PayrollTaxResult {
        tax,
        taxable_wages: gross_annual_salary,
        audit_step,
    }
}
