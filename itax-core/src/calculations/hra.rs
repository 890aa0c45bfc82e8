//! House Rent Allowance exemption under section 10(13A).
//!
//! Each month's exemption is the least of:
//!
//! | Limit | Description |
//! |-------|-------------|
//! | 1     | HRA actually received |
//! | 2     | Rent paid minus 10% of salary (never below zero) |
//! | 3     | 50% of salary in a metro city, 40% elsewhere |
//!
//! Whatever part of the HRA is not exempt is taxable.
//!
//! # Clamping
//!
//! Monthly figures come straight from free-form entry and may be transiently
//! negative while a user is editing. Negative amounts are clamped to zero and
//! logged at `warn` instead of being rejected. This is the only calculator in
//! the crate that clamps.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itax_core::HraMonthInput;
//! use itax_core::calculations::calculate_monthly_exemption;
//!
//! let result = calculate_monthly_exemption(&HraMonthInput {
//!     month: "April".to_string(),
//!     salary: dec!(50000),
//!     hra_received: dec!(20000),
//!     rent_paid: dec!(18000),
//!     is_metro: true,
//! });
//!
//! assert_eq!(result.exemption(), dec!(13000));
//! assert_eq!(result.taxable(), dec!(7000));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::calculations::common::{checked_add, max, min};
use crate::error::TaxError;
use crate::models::{HraAnnualSummary, HraMonthInput, HraMonthResult};

/// Share of salary that rent must exceed before it counts.
pub const RENT_SALARY_OFFSET: Decimal = dec!(0.10);

/// Salary cap on the exemption for Delhi, Mumbai, Kolkata and Chennai.
pub const METRO_SALARY_SHARE: Decimal = dec!(0.50);

/// Salary cap on the exemption everywhere else.
pub const NON_METRO_SALARY_SHARE: Decimal = dec!(0.40);

/// Computes the exemption and taxable HRA for one month.
pub fn calculate_monthly_exemption(input: &HraMonthInput) -> HraMonthResult {
    let input = HraMonthInput {
        month: input.month.clone(),
        salary: clamp_to_zero(&input.month, "salary", input.salary),
        hra_received: clamp_to_zero(&input.month, "hra_received", input.hra_received),
        rent_paid: clamp_to_zero(&input.month, "rent_paid", input.rent_paid),
        is_metro: input.is_metro,
    };

    let rent_minus_ten_percent = max(
        Decimal::ZERO,
        input.rent_paid - RENT_SALARY_OFFSET * input.salary,
    );
    let salary_share = if input.is_metro {
        METRO_SALARY_SHARE
    } else {
        NON_METRO_SALARY_SHARE
    };
    let salary_percentage_cap = salary_share * input.salary;

    let exemption = max(
        Decimal::ZERO,
        min(
            input.hra_received,
            min(rent_minus_ten_percent, salary_percentage_cap),
        ),
    );
    let taxable = input.hra_received - exemption;

    HraMonthResult {
        input,
        rent_minus_ten_percent,
        salary_percentage_cap,
        exemption,
        taxable,
    }
}

/// Sums every month of one employee's year.
///
/// Addition is commutative, so row order never affects the totals. An empty
/// slice yields an all-zero summary.
///
/// # Errors
///
/// Returns [`TaxError::InvalidInput`] naming the column whose total is larger
/// than `Decimal` can represent.
pub fn calculate_annual_summary(rows: &[HraMonthResult]) -> Result<HraAnnualSummary, TaxError> {
    rows.iter()
        .try_fold(HraAnnualSummary::default(), |summary, row| {
            Ok(HraAnnualSummary {
                months: summary.months + 1,
                total_salary: checked_add("salary", summary.total_salary, row.salary())?,
                total_hra_received: checked_add(
                    "hra_received",
                    summary.total_hra_received,
                    row.hra_received(),
                )?,
                total_rent_paid: checked_add(
                    "rent_paid",
                    summary.total_rent_paid,
                    row.rent_paid(),
                )?,
                total_exemption: checked_add(
                    "exemption",
                    summary.total_exemption,
                    row.exemption(),
                )?,
                total_taxable: checked_add("taxable", summary.total_taxable, row.taxable())?,
            })
        })
}

fn clamp_to_zero(
    month: &str,
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(
            month = %month,
            field = field,
            value = %value,
            "negative HRA input clamped to zero"
        );
        return Decimal::ZERO;
    }
    value
}
