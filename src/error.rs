//! Error types for the withholding engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can stop a calculation or a configuration load.

use thiserror::Error;

/// The main error type for the withholding engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to map failures onto HTTP responses or CLI exit codes.
///
/// # Example
///
/// ```
/// use withholding_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "step3_credit".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input 'step3_credit': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A calculation input was negative, unparseable, or not a known value.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was rejected.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No bracket tables are loaded for the requested tax year.
    #[error("Tax year not found: {year}")]
    TaxYearNotFound {
        /// The tax year that was requested.
        year: i32,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A bracket schedule is not internally consistent.
    #[error("Invalid {filing_status} schedule for tax year {tax_year}: {message}")]
    InvalidSchedule {
        /// The tax year the schedule belongs to.
        tax_year: i32,
        /// The filing status the schedule applies to.
        filing_status: String,
        /// A description of the inconsistency.
        message: String,
    },

    /// The Social Security or Medicare figures are out of range.
    #[error("Invalid payroll rates for tax year {tax_year}: {message}")]
    InvalidPayrollRates {
        /// The tax year the rates belong to.
        tax_year: i32,
        /// Which figure is out of range.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`] on `field`.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
