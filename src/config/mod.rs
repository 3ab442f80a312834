//! Configuration loading and management for the withholding engine.
//!
//! This module provides the bracket and payroll tables, either the
//! built-in 2024 tables or tables loaded from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use withholding_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/irs_15t").unwrap();
//! println!("Latest tax year: {}", config.latest_year());
//! ```

mod builtin;
mod loader;
mod types;

pub use builtin::{BUILTIN_TAX_YEAR, builtin_metadata, builtin_tables};
pub use loader::ConfigLoader;
pub use types::{
    Bracket, BracketSchedule, PayrollTaxRates, PublicationMetadata, Schedules, TaxYearTables,
};
