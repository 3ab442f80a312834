//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading withholding
//! tables from YAML files, or wrapping the built-in 2024 tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::builtin::{builtin_metadata, builtin_tables};
use super::types::{PublicationMetadata, TaxYearTables};

/// Loads and provides access to withholding tables.
///
/// # Directory Structure
///
/// ```text
/// config/irs_15t/
/// ├── publication.yaml   # Publication metadata
/// └── years/
///     └── 2024.yaml      # Bracket and payroll tables for one tax year
/// ```
///
/// Every loaded year is validated; a table whose cumulative base taxes do
/// not agree with its marginal rates is rejected.
///
/// # Example
///
/// ```no_run
/// use withholding_engine::config::ConfigLoader;
/// use withholding_engine::models::FilingStatus;
///
/// let loader = ConfigLoader::load("./config/irs_15t")?;
/// let tables = loader.tax_year(2024)?;
/// println!("{} brackets", tables.schedule(FilingStatus::Single).brackets().len());
/// # Ok::<(), withholding_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    metadata: PublicationMetadata,
    years: BTreeMap<i32, TaxYearTables>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `publication.yaml` or the `years` directory is missing
    /// - Any file contains invalid YAML
    /// - No year files are present
    /// - Any schedule fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<PublicationMetadata>(&path.join("publication.yaml"))?;
        let years = Self::load_years(&path.join("years"))?;

        debug!(
            path = %path.display(),
            publication = %metadata.code,
            years = ?years.keys().collect::<Vec<_>>(),
            "Loaded withholding tables"
        );

        Ok(Self { metadata, years })
    }

    /// Wraps the built-in 2024 tables.
    pub fn builtin() -> Self {
        let tables = builtin_tables().clone();
        let mut years = BTreeMap::new();
        years.insert(tables.tax_year, tables);

        Self {
            metadata: builtin_metadata(),
            years,
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads and validates every year file in the years directory.
    fn load_years(years_dir: &Path) -> EngineResult<BTreeMap<i32, TaxYearTables>> {
        let years_dir_str = years_dir.display().to_string();

        let entries = fs::read_dir(years_dir).map_err(|_| EngineError::ConfigNotFound {
            path: years_dir_str.clone(),
        })?;

        let mut years = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: years_dir_str.clone(),
            })?;

            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "yaml") {
                continue;
            }

            let tables = Self::load_yaml::<TaxYearTables>(&path)?;
            tables.validate()?;

            if years.contains_key(&tables.tax_year) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("tax year {} is defined more than once", tables.tax_year),
                });
            }
            years.insert(tables.tax_year, tables);
        }

        if years.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax year files found)", years_dir_str),
            });
        }

        Ok(years)
    }

    /// Returns the publication metadata.
    pub fn publication(&self) -> &PublicationMetadata {
        &self.metadata
    }

    /// Gets the tables for a tax year.
    ///
    /// Returns `TaxYearNotFound` if the year was not loaded.
    pub fn tax_year(&self, year: i32) -> EngineResult<&TaxYearTables> {
        self.years
            .get(&year)
            .ok_or(EngineError::TaxYearNotFound { year })
    }

    /// Returns the most recent loaded tax year.
    pub fn latest_year(&self) -> i32 {
        // Both constructors guarantee at least one year.
        self.years.keys().next_back().copied().unwrap_or_default()
    }

    /// Returns every loaded year's tables, oldest first.
    pub fn years(&self) -> impl Iterator<Item = &TaxYearTables> {
        self.years.values()
    }
}
