//! Display formatting for calculated amounts.
//!
//! Currency is shown as whole dollars with thousands separators (`$#,##0`)
//! and rates as percentages with two decimals (`0.00%`). Both round half to
//! even.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::WithholdingResult;

/// Formats an amount as whole dollars, e.g. `$74,950` or `-$6,308`.
///
/// # Examples
///
/// ```
/// use withholding_engine::format::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(1_745_050, 2)), "$17,450");
/// assert_eq!(format_currency(Decimal::new(-63075, 1)), "-$6,308");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(0);

    let grouped = group_thousands(&rounded.abs().to_string());
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Formats a value that is already in percent units, e.g. `25.05%`.
///
/// # Examples
///
/// ```
/// use withholding_engine::format::format_percent;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_percent(Decimal::new(280926, 4)), "28.09%");
/// ```
pub fn format_percent(percent: Decimal) -> String {
    let mut rounded = percent.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded = rounded.abs();
    }
    format!("{}%", rounded)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// The six result figures formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayValues {
    /// Federal income tax, e.g. `$17,400`.
    pub federal_tax: String,
    /// Social Security tax.
    pub social_security_tax: String,
    /// Medicare tax.
    pub medicare_tax: String,
    /// Total tax.
    pub total_tax: String,
    /// Net income after tax.
    pub net_income: String,
    /// Effective withholding rate, e.g. `25.05%`.
    pub effective_rate: String,
}

impl From<&WithholdingResult> for DisplayValues {
    fn from(result: &WithholdingResult) -> Self {
        Self {
            federal_tax: format_currency(result.federal_tax),
            social_security_tax: format_currency(result.social_security_tax),
            medicare_tax: format_currency(result.medicare_tax),
            total_tax: format_currency(result.total_tax),
            net_income: format_currency(result.net_income),
            effective_rate: format_percent(result.effective_rate_percent),
        }
    }
}
