//! Application state for the withholding API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, TaxYearTables};
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the loaded tables and the tax year used when a request does not
/// name one.
#[derive(Clone)]
pub struct AppState {
    /// The loaded withholding tables.
    config: Arc<ConfigLoader>,
    /// Tax year used when a request does not specify one.
    default_tax_year: i32,
}

impl AppState {
    /// Creates a new application state defaulting to the latest loaded year.
    pub fn new(config: ConfigLoader) -> Self {
        let default_tax_year = config.latest_year();
        Self {
            config: Arc::new(config),
            default_tax_year,
        }
    }

    /// Changes the default tax year.
    ///
    /// Returns `TaxYearNotFound` if the year is not loaded.
    pub fn with_default_tax_year(mut self, year: i32) -> EngineResult<Self> {
        self.config.tax_year(year)?;
        self.default_tax_year = year;
        Ok(self)
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the default tax year.
    pub fn default_tax_year(&self) -> i32 {
        self.default_tax_year
    }

    /// Returns the tables for `year`, or for the default year when `None`.
    pub fn tables(&self, year: Option<i32>) -> EngineResult<&TaxYearTables> {
        self.config.tax_year(year.unwrap_or(self.default_tax_year))
    }
}
