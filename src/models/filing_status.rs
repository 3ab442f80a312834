//! Filing status model.
//!
//! This module defines the [`FilingStatus`] enum selected in W-4 Step 1,
//! which determines the bracket schedule used for the federal income tax.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The W-4 Step 1 filing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    /// Single or married filing separately.
    Single,
    /// Married filing jointly or qualifying surviving spouse.
    MarriedFilingJointly,
    /// Head of household.
    HeadOfHousehold,
}

impl FilingStatus {
    /// Every filing status, in the order they are offered on the form.
    pub const ALL: [FilingStatus; 3] = [
        FilingStatus::Single,
        FilingStatus::MarriedFilingJointly,
        FilingStatus::HeadOfHousehold,
    ];

    /// Returns the machine-readable identifier (e.g. `married_filing_jointly`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedFilingJointly => "married_filing_jointly",
            Self::HeadOfHousehold => "head_of_household",
        }
    }

    /// Returns the short code (e.g. `MFJ`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::HeadOfHousehold => "HOH",
        }
    }

    /// Returns the label shown on the form.
    ///
    /// # Examples
    ///
    /// ```
    /// use withholding_engine::models::FilingStatus;
    ///
    /// assert_eq!(FilingStatus::MarriedFilingJointly.label(), "Married filing jointly");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married filing jointly",
            Self::HeadOfHousehold => "Head of Household",
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilingStatus {
    type Err = EngineError;

    /// Parses an identifier, label, or short code, ignoring case and
    /// surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use withholding_engine::models::FilingStatus;
    ///
    /// assert_eq!("HOH".parse::<FilingStatus>().unwrap(), FilingStatus::HeadOfHousehold);
    /// assert_eq!("Single".parse::<FilingStatus>().unwrap(), FilingStatus::Single);
    /// assert!("widowed".parse::<FilingStatus>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| {
                [status.as_str(), status.label(), status.code()]
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| {
                EngineError::invalid_input(
                    "filing_status",
                    format!(
                        "unknown filing status '{}' (expected one of: single, married_filing_jointly, head_of_household)",
                        wanted
                    ),
                )
            })
    }
}
