//! Calculation logic for the withholding engine.
//!
//! This module contains the calculation functions for annual withholding:
//! taxable income, percentage-method bracket tax, the W-4 Step 3 credit,
//! Social Security and Medicare, and the calculator that chains them.

mod bracket_tax;
mod payroll_tax;
mod tax_credit;
mod taxable_income;
mod withholding;

pub use bracket_tax::{FederalTaxResult, calculate_federal_tax, compute_tax, compute_tax_for_year};
pub use payroll_tax::{PayrollTaxResult, calculate_medicare, calculate_social_security};
pub use tax_credit::{TaxCreditResult, apply_tax_credit};
pub use taxable_income::{TaxableIncomeResult, calculate_taxable_income};
pub use withholding::{
    WithholdingCalculation, calculate_withholding, compute_withholding,
    compute_withholding_for_year,
};
