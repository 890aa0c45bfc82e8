//! Income tax under a single regime.
//!
//! The computation runs in a fixed order:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Base tax from the regime's slab schedule |
//! | 2    | Section 87A rebate: `min(base tax, cap)` when income ≤ rebate threshold |
//! | 3    | Surcharge on the post-rebate tax at the rate of the band income falls in |
//! | 4    | Health & education cess on post-rebate tax plus surcharge |
//! | 5    | Total = post-rebate tax + surcharge + cess |
//!
//! # Surcharge cliff
//!
//! No marginal relief is applied. An income one rupee above a surcharge band
//! threshold pays the band's rate on the whole tax, so the total can jump at
//! each threshold. The rebate threshold behaves the same way.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itax_core::calculations::compute_income_tax;
//! use itax_core::{RateTables, RegimeName};
//!
//! let tables = RateTables::fy2025_26().unwrap();
//! let result = compute_income_tax(dec!(1500000), tables.regime(RegimeName::New)).unwrap();
//!
//! assert_eq!(result.base_tax, dec!(105000));
//! assert_eq!(result.cess, dec!(4200));
//! assert_eq!(result.total, dec!(109200));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{
    checked_add, checked_mul, ensure_non_negative, min, round_to_rupee,
};
use crate::calculations::slab::compute_slab_tax;
use crate::error::TaxError;
use crate::models::{RegimeConfig, RegimeName};

/// Breakdown of the income tax owed under one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    pub regime: RegimeName,
    pub taxable_income: Decimal,
    pub base_tax: Decimal,
    pub rebate: Decimal,
    pub tax_after_rebate: Decimal,
    /// Rate of the surcharge band applied, zero when no band matched.
    pub surcharge_rate: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    /// Exact total: `tax_after_rebate + surcharge + cess`.
    pub total: Decimal,
    /// `total` rounded to the nearest rupee.
    pub rounded_total: Decimal,
}

/// Computes income tax on `income` under `regime`.
///
/// # Errors
///
/// Returns [`TaxError::InvalidInput`] if `income` is negative, or so large
/// that tax plus surcharge and cess cannot be represented.
pub fn compute_income_tax(
    income: Decimal,
    regime: &RegimeConfig,
) -> Result<IncomeTaxResult, TaxError> {
    let income = ensure_non_negative("income", income)?;

    let base_tax = compute_slab_tax(income, &regime.brackets)?;

    let rebate = if income <= regime.rebate_threshold {
        min(base_tax, regime.rebate_cap_amount)
    } else {
        Decimal::ZERO
    };
    let tax_after_rebate = base_tax - rebate;

    let surcharge_rate = regime
        .surcharge_bands
        .band_for(income)
        .map_or(Decimal::ZERO, |band| band.rate);
    let surcharge = checked_mul("income", tax_after_rebate, surcharge_rate)?;

    let tax_with_surcharge = checked_add("income", tax_after_rebate, surcharge)?;
    let cess = checked_mul("income", tax_with_surcharge, regime.cess_rate)?;
    let total = checked_add("income", tax_with_surcharge, cess)?;

    debug!(
        regime = %regime.name,
        income = %income,
        base_tax = %base_tax,
        rebate = %rebate,
        surcharge_rate = %surcharge_rate,
        total = %total,
        "computed income tax"
    );

    Ok(IncomeTaxResult {
        regime: regime.name,
        taxable_income: income,
        base_tax,
        rebate,
        tax_after_rebate,
        surcharge_rate,
        surcharge,
        cess,
        total,
        rounded_total: round_to_rupee(total),
    })
}

/// Side-by-side results under both regimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub old: IncomeTaxResult,
    pub new: IncomeTaxResult,
    /// The regime with the lower total. Ties go to the new regime, which is
    /// the default when no choice is made.
    pub recommended: RegimeName,
    /// Absolute difference between the two totals.
    pub savings: Decimal,
}

/// Computes `income` under both regimes and recommends the cheaper one.
///
/// # Errors
///
/// Returns [`TaxError::InvalidInput`] if `income` is negative.
pub fn compare_regimes(
    income: Decimal,
    old: &RegimeConfig,
    new: &RegimeConfig,
) -> Result<RegimeComparison, TaxError> {
    let old = compute_income_tax(income, old)?;
    let new = compute_income_tax(income, new)?;

    let recommended = if old.total < new.total {
        RegimeName::Old
    } else {
        RegimeName::New
    };
    let savings = (old.total - new.total).abs();

    Ok(RegimeComparison {
        old,
        new,
        recommended,
        savings,
    })
}
