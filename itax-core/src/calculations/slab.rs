//! Progressive slab evaluator.
//!
//! Walks a [`SlabSchedule`] from the lowest slab upwards and taxes each slice
//! of income at its slab's marginal rate. Upper bounds are inclusive, so an
//! income sitting exactly on a boundary is taxed entirely within the lower
//! slab. Arithmetic is exact; nothing is rounded here.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itax_core::calculations::compute_slab_tax;
//! use itax_core::{SlabBracket, SlabSchedule};
//!
//! let schedule = SlabSchedule::new(vec![
//!     SlabBracket::bounded(dec!(400000), dec!(0)),
//!     SlabBracket::bounded(dec!(800000), dec!(0.05)),
//!     SlabBracket::unbounded(dec!(0.10)),
//! ])
//! .unwrap();
//!
//! assert_eq!(compute_slab_tax(dec!(1000000), &schedule).unwrap(), dec!(40000));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{ensure_non_negative, max, min};
use crate::error::TaxError;
use crate::models::SlabSchedule;

/// Computes the tax owed on `income` under `schedule`.
///
/// # Errors
///
/// Returns [`TaxError::InvalidInput`] if `income` is negative. Callers that
/// hold possibly-negative figures must clamp them before calling.
pub fn compute_slab_tax(
    income: Decimal,
    schedule: &SlabSchedule,
) -> Result<Decimal, TaxError> {
    let income = ensure_non_negative("income", income)?;

    let mut tax = Decimal::ZERO;
    let mut previous_upper_bound = Decimal::ZERO;

    for bracket in schedule.brackets() {
        match bracket.upper_bound {
            Some(upper_bound) => {
                let slice = max(Decimal::ZERO, min(income, upper_bound) - previous_upper_bound);
                tax += slice * bracket.rate;
                if income <= upper_bound {
                    break;
                }
                previous_upper_bound = upper_bound;
            }
            None => {
                tax += (income - previous_upper_bound) * bracket.rate;
                break;
            }
        }
    }

    Ok(tax)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::SlabBracket;

    /// New regime slabs for FY 2025-26.
    fn new_regime_slabs() -> SlabSchedule {
        SlabSchedule::new(vec![
            SlabBracket::bounded(dec!(400000), dec!(0)),
            SlabBracket::bounded(dec!(800000), dec!(0.05)),
            SlabBracket::bounded(dec!(1200000), dec!(0.10)),
            SlabBracket::bounded(dec!(1600000), dec!(0.15)),
            SlabBracket::bounded(dec!(2000000), dec!(0.20)),
            SlabBracket::bounded(dec!(2400000), dec!(0.25)),
            SlabBracket::unbounded(dec!(0.30)),
        ])
        .expect("valid schedule")
    }

    #[test]
    fn zero_income_owes_nothing() {
        let result = compute_slab_tax(dec!(0), &new_regime_slabs());

        assert_eq!(result, Ok(dec!(0)));
    }

    #[test]
    fn income_inside_nil_slab_owes_nothing() {
        let result = compute_slab_tax(dec!(399999.99), &new_regime_slabs());

        assert_eq!(result, Ok(dec!(0)));
    }

    #[test]
    fn ten_lakh_matches_manual_slab_arithmetic() {
        // 4L-8L at 5% = 20,000; 8L-10L at 10% = 20,000
        let result = compute_slab_tax(dec!(1000000), &new_regime_slabs());

        assert_eq!(result, Ok(dec!(40000)));
    }

    #[test]
    fn income_on_boundary_is_taxed_in_lower_slab() {
        let result = compute_slab_tax(dec!(800000), &new_regime_slabs());

        assert_eq!(result, Ok(dec!(20000)));
    }

    #[test]
    fn tax_is_continuous_across_boundary() {
        let schedule = new_regime_slabs();

        let at = compute_slab_tax(dec!(1200000), &schedule).unwrap();
        let below = compute_slab_tax(dec!(1199999.99), &schedule).unwrap();
        let above = compute_slab_tax(dec!(1200000.01), &schedule).unwrap();

        assert_eq!(at, dec!(60000));
        assert_eq!(at - below, dec!(0.001));
        assert_eq!(above - at, dec!(0.0015));
    }

    #[test]
    fn income_in_unbounded_slab_accumulates_every_slice() {
        // 20,000 + 40,000 + 60,000 + 80,000 + 100,000 + 30% of 6L
        let result = compute_slab_tax(dec!(3000000), &new_regime_slabs());

        assert_eq!(result, Ok(dec!(480000)));
    }

    #[test]
    fn single_unbounded_bracket_is_flat_tax() {
        let schedule = SlabSchedule::new(vec![SlabBracket::unbounded(dec!(0.30))]).unwrap();

        let result = compute_slab_tax(dec!(1000), &schedule);

        assert_eq!(result, Ok(dec!(300)));
    }

    #[test]
    fn fractional_income_is_not_rounded() {
        let result = compute_slab_tax(dec!(400000.01), &new_regime_slabs());

        assert_eq!(result, Ok(dec!(0.0005)));
    }

    #[test]
    fn negative_income_is_rejected() {
        let result = compute_slab_tax(dec!(-1), &new_regime_slabs());

        assert_eq!(
            result,
            Err(TaxError::InvalidInput {
                field: "income",
                value: "-1".to_string(),
            })
        );
    }

    #[test]
    fn tax_never_decreases_as_income_grows() {
        let schedule = new_regime_slabs();
        let mut previous = Decimal::ZERO;

        for step in 0..=60 {
            let income = Decimal::from(step * 50000);
            let tax = compute_slab_tax(income, &schedule).unwrap();
            assert!(tax >= previous, "tax fell at income {income}");
            previous = tax;
        }
    }
}
