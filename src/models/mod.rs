//! Core data models for the withholding engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod filing_status;
mod withholding;

pub use calculation_result::{AuditStep, AuditTrace, AuditWarning, CalculationResult};
pub use filing_status::FilingStatus;
pub use withholding::{WithholdingInputs, WithholdingResult};
