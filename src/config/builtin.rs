//! Built-in 2024 tables (IRS Publication 15-T, annual percentage method).

use std::sync::LazyLock;

use rust_decimal::Decimal;

use super::types::{
    Bracket, BracketSchedule, PayrollTaxRates, PublicationMetadata, Schedules, TaxYearTables,
};

/// The tax year of the built-in tables.
pub const BUILTIN_TAX_YEAR: i32 = 2024;

/// Marginal rates shared by every 2024 schedule, in basis points.
const RATES_BP: [i64; 7] = [1000, 1200, 2200, 2400, 3200, 3500, 3700];

static TAX_YEAR_2024: LazyLock<TaxYearTables> = LazyLock::new(|| TaxYearTables {
    tax_year: BUILTIN_TAX_YEAR,
    payroll: PayrollTaxRates {
        social_security_rate: Decimal::new(62, 3),
        social_security_wage_base: Decimal::new(168_600, 0),
        medicare_rate: Decimal::new(145, 4),
    },
    // Each base is the exact cumulative tax of the brackets below it, which
    // schedule validation enforces. Tables that truncate the single and
    // married top bases to 174,238 and 186,601 come out $0.25 and $0.50
    // lower for income above the top threshold.
    schedules: Schedules {
        single: schedule([
            (0, 0),
            (11_000_00, 1_100_00),
            (44_725_00, 5_147_00),
            (95_375_00, 16_290_00),
            (182_100_00, 37_104_00),
            (231_250_00, 52_832_00),
            (578_125_00, 174_238_25),
        ]),
        married_filing_jointly: schedule([
            (0, 0),
            (22_000_00, 2_200_00),
            (89_450_00, 10_294_00),
            (190_750_00, 32_580_00),
            (364_200_00, 74_208_00),
            (462_500_00, 105_664_00),
            (693_750_00, 186_601_50),
        ]),
        head_of_household: schedule([
            (0, 0),
            (15_700_00, 1_570_00),
            (59_850_00, 6_868_00),
            (95_350_00, 14_678_00),
            (182_100_00, 35_498_00),
            (231_250_00, 51_226_00),
            (578_100_00, 172_623_50),
        ]),
    },
});

/// Builds a schedule from `(threshold, base_tax)` pairs given in cents.
fn schedule(rows: [(i64, i64); 7]) -> BracketSchedule {
    let brackets = rows
        .iter()
        .zip(RATES_BP)
        .map(|(&(threshold, base_tax), rate)| {
            Bracket::new(
                Decimal::new(threshold, 2),
                Decimal::new(base_tax, 2),
                Decimal::new(rate, 4),
            )
        })
        .collect();
    BracketSchedule::new(brackets)
}

/// Returns the built-in 2024 tables, constructed once per process.
pub fn builtin_tables() -> &'static TaxYearTables {
    &TAX_YEAR_2024
}

/// Returns the publication metadata for the built-in tables.
pub fn builtin_metadata() -> PublicationMetadata {
    PublicationMetadata {
        code: "15-T".to_string(),
        name: "Federal Income Tax Withholding Methods".to_string(),
        method: "percentage_method_annual".to_string(),
        source_url: "https://www.irs.gov/pub/irs-pdf/p15t.pdf".to_string(),
    }
}
