//! Configuration types for withholding calculation.
//!
//! This module contains the strongly-typed bracket and payroll tables that
//! are either built into the engine or deserialized from YAML files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::FilingStatus;

/// Metadata about the publication the tables come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationMetadata {
    /// Short publication code (e.g., "15-T").
    pub code: String,
    /// The human-readable name of the publication.
    pub name: String,
    /// The withholding method the tables implement.
    pub method: String,
    /// URL to the official publication.
    pub source_url: String,
}

/// One row of a percentage-method bracket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Taxable income above which this bracket applies.
    pub threshold: Decimal,
    /// Cumulative tax owed at exactly `threshold`.
    pub base_tax: Decimal,
    /// Marginal rate applied to income above `threshold`.
    pub rate: Decimal,
}

impl Bracket {
    /// Creates a bracket row.
    pub fn new(threshold: Decimal, base_tax: Decimal, rate: Decimal) -> Self {
        Self {
            threshold,
            base_tax,
            rate,
        }
    }
}

/// A progressive bracket schedule, ordered ascending by threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracketSchedule {
    brackets: Vec<Bracket>,
}

impl BracketSchedule {
    /// Creates a schedule from brackets already in ascending order.
    ///
    /// Use [`BracketSchedule::validate`] to check the table before relying on it.
    pub fn new(brackets: Vec<Bracket>) -> Self {
        Self { brackets }
    }

    /// Returns the brackets in ascending threshold order.
    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Finds the bracket that applies to `income`.
    ///
    /// Returns the highest bracket whose threshold is strictly less than
    /// `income`. Income exactly on a threshold belongs to the bracket below
    /// it, and income of zero matches no bracket at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use withholding_engine::config::builtin_tables;
    /// use withholding_engine::models::FilingStatus;
    /// use rust_decimal::Decimal;
    ///
    /// let schedule = builtin_tables().schedule(FilingStatus::Single);
    /// let bracket = schedule.find_bracket(Decimal::new(11_000, 0)).unwrap();
    /// assert_eq!(bracket.threshold, Decimal::ZERO);
    /// assert!(schedule.find_bracket(Decimal::ZERO).is_none());
    /// ```
    pub fn find_bracket(&self, income: Decimal) -> Option<&Bracket> {
        self.brackets.iter().rev().find(|b| income > b.threshold)
    }

    /// Checks that the schedule is internally consistent.
    ///
    /// The first bracket must be `(0, 0)`, thresholds must be strictly
    /// increasing, rates must lie in `[0, 1]`, and each `base_tax` must equal
    /// the previous `base_tax` plus the previous rate applied to the gap
    /// between the two thresholds.
    pub fn validate(&self, tax_year: i32, filing_status: FilingStatus) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidSchedule {
            tax_year,
            filing_status: filing_status.as_str().to_string(),
            message,
        };

        let first = self
            .brackets
            .first()
            .ok_or_else(|| invalid("schedule has no brackets".to_string()))?;

        if !first.threshold.is_zero() || !first.base_tax.is_zero() {
            return Err(invalid(format!(
                "first bracket must be (0, 0), found ({}, {})",
                first.threshold, first.base_tax
            )));
        }

        for bracket in &self.brackets {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(invalid(format!(
                    "rate {} at threshold {} is outside [0, 1]",
                    bracket.rate, bracket.threshold
                )));
            }
        }

        for pair in self.brackets.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);

            if upper.threshold <= lower.threshold {
                return Err(invalid(format!(
                    "thresholds must be strictly increasing ({} follows {})",
                    upper.threshold, lower.threshold
                )));
            }

            let expected = lower.base_tax + (upper.threshold - lower.threshold) * lower.rate;
            if upper.base_tax != expected {
                return Err(invalid(format!(
                    "base tax at {} is {}, expected {}",
                    upper.threshold, upper.base_tax, expected
                )));
            }
        }

        Ok(())
    }
}

/// One schedule per filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedules {
    /// Schedule for single filers.
    pub single: BracketSchedule,
    /// Schedule for married couples filing jointly.
    pub married_filing_jointly: BracketSchedule,
    /// Schedule for heads of household.
    pub head_of_household: BracketSchedule,
}

impl Schedules {
    /// Returns the schedule for a filing status.
    pub fn get(&self, filing_status: FilingStatus) -> &BracketSchedule {
        match filing_status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        }
    }
}

/// Social Security and Medicare rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTaxRates {
    /// Employee Social Security rate (e.g., 0.062).
    pub social_security_rate: Decimal,
    /// Maximum annual wages subject to Social Security tax.
    pub social_security_wage_base: Decimal,
    /// Employee Medicare rate (e.g., 0.0145), applied to all wages.
    pub medicare_rate: Decimal,
}

impl PayrollTaxRates {
    /// Returns the largest Social Security tax any salary can incur.
    pub fn max_social_security_tax(&self) -> Decimal {
        self.social_security_wage_base * self.social_security_rate
    }
}

/// Every table needed to calculate withholding for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearTables {
    /// The tax year these tables apply to.
    pub tax_year: i32,
    /// Social Security and Medicare rates.
    pub payroll: PayrollTaxRates,
    /// Federal income tax bracket schedules.
    pub schedules: Schedules,
}

impl TaxYearTables {
    /// Returns the bracket schedule for a filing status.
    pub fn schedule(&self, filing_status: FilingStatus) -> &BracketSchedule {
        self.schedules.get(filing_status)
    }

    /// Validates every schedule and the payroll rates.
    pub fn validate(&self) -> EngineResult<()> {
        for status in FilingStatus::ALL {
            self.schedule(status).validate(self.tax_year, status)?;
        }

        let payroll = &self.payroll;
        let invalid = |message: String| EngineError::InvalidPayrollRates {
            tax_year: self.tax_year,
            message,
        };
        let rates = [
            ("social_security_rate", payroll.social_security_rate),
            ("medicare_rate", payroll.medicare_rate),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(invalid(format!("{} {} is outside [0, 1]", name, rate)));
            }
        }
        if payroll.social_security_wage_base < Decimal::ZERO {
            return Err(invalid(format!(
                "social_security_wage_base {} is negative",
                payroll.social_security_wage_base
            )));
        }

        Ok(())
    }
}
