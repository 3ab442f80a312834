//! W-4 Step 3 credit.
//!
//! The credit reduces federal income tax but never below zero.

use rust_decimal::Decimal;

use crate::models::AuditStep;

/// The result of applying the Step 3 credit.
#[derive(Debug, Clone)]
pub struct TaxCreditResult {
    /// Federal income tax after the credit.
    pub federal_tax: Decimal,
    /// The part of the credit that was actually used.
    pub credit_applied: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Subtracts the Step 3 credit from the bracket tax, flooring at zero.
///
/// # Examples
///
/// ```
/// use withholding_engine::calculation::apply_tax_credit;
/// use rust_decimal::Decimal;
///
/// let result = apply_tax_credit(Decimal::new(1_000, 0), Decimal::new(2_000, 0), 3);
/// assert_eq!(result.federal_tax, Decimal::ZERO);
/// assert_eq!(result.credit_applied, Decimal::new(1_000, 0));
/// ```
pub fn apply_tax_credit(tax_before_credit: Decimal, credit: Decimal, step_number: u32) -> TaxCreditResult {
    let federal_tax = (tax_before_credit - credit).max(Decimal::ZERO);
    let credit_applied = tax_before_credit - federal_tax;

    let reasoning = if credit > tax_before_credit {
        format!(
            "Credit ${} exceeds tax ${}; federal tax reduced to $0",
            credit.normalize(),
            tax_before_credit.normalize()
        )
    } else {
        format!(
            "${} - ${} = ${}",
            tax_before_credit.normalize(),
            credit.normalize(),
            federal_tax.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "step3_credit".to_string(),
        rule_name: "Dependents and Other Credits".to_string(),
        reference: "Form W-4 Step 3".to_string(),
        input: serde_json::json!({
            "tax_before_credit": tax_before_credit.normalize().to_string(),
            "step3_credit": credit.normalize().to_string()
        }),
        output: serde_json::json!({
            "federal_tax": federal_tax.normalize().to_string(),
            "credit_applied": credit_applied.normalize().to_string()
        }),
        reasoning,
    };

    TaxCreditResult {
        federal_tax,
        credit_applied,
        audit_step,
    }
}
