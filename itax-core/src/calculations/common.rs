//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used across the calculators:
//! rounding, min/max helpers and the input guards that turn out-of-contract
//! numbers into [`TaxError::InvalidInput`].

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::TaxError;

/// Rounds a decimal value to exactly two decimal places (paise) using
/// half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to the nearest whole rupee, half away from zero.
///
/// Engine results stay exact; this is applied once, to the final payable
/// figure.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::common::round_to_rupee;
///
/// assert_eq!(round_to_rupee(dec!(62400.49)), dec!(62400));
/// assert_eq!(round_to_rupee(dec!(62400.50)), dec!(62401));
/// ```
pub fn round_to_rupee(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the minimum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::common::min;
///
/// assert_eq!(min(dec!(100.00), dec!(200.00)), dec!(100.00));
/// ```
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// Fails with [`TaxError::InvalidInput`] when `value` is negative.
pub fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, TaxError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TaxError::invalid_input(field, value));
    }
    Ok(value)
}

/// Adds two amounts, failing with [`TaxError::InvalidInput`] on `field` when
/// the sum is larger than `Decimal` can represent.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::common::checked_add;
///
/// assert_eq!(checked_add("salary", dec!(1.5), dec!(2)).unwrap(), dec!(3.5));
/// assert!(checked_add("salary", Decimal::MAX, Decimal::ONE).is_err());
/// ```
pub fn checked_add(
    field: &'static str,
    lhs: Decimal,
    rhs: Decimal,
) -> Result<Decimal, TaxError> {
    lhs.checked_add(rhs)
        .ok_or_else(|| TaxError::invalid_input(field, lhs))
}

/// Multiplies an amount by a rate or factor, failing with
/// [`TaxError::InvalidInput`] on `field` when the product overflows.
pub fn checked_mul(
    field: &'static str,
    amount: Decimal,
    factor: Decimal,
) -> Result<Decimal, TaxError> {
    amount
        .checked_mul(factor)
        .ok_or_else(|| TaxError::invalid_input(field, amount))
}

/// Converts a floating-point amount coming from a form or JSON payload into a
/// [`Decimal`].
///
/// Library entry point for `f64` callers; nothing inside this crate produces
/// floats.
///
/// # Errors
///
/// Returns [`TaxError::InvalidInput`] for NaN, infinities, and values outside
/// the range `Decimal` can represent.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::common::amount_from_f64;
///
/// assert_eq!(amount_from_f64("income", 1250000.0).unwrap(), dec!(1250000));
/// assert!(amount_from_f64("income", f64::NAN).is_err());
/// ```
pub fn amount_from_f64(
    field: &'static str,
    value: f64,
) -> Result<Decimal, TaxError> {
    if !value.is_finite() {
        return Err(TaxError::invalid_input(field, value));
    }
    Decimal::from_f64(value).ok_or_else(|| TaxError::invalid_input(field, value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        let result = round_half_up(dec!(999999.999));

        assert_eq!(result, dec!(1000000.00));
    }

    // =========================================================================
    // round_to_rupee tests
    // =========================================================================

    #[test]
    fn round_to_rupee_rounds_down_below_half() {
        let result = round_to_rupee(dec!(2600.0000026));

        assert_eq!(result, dec!(2600));
    }

    #[test]
    fn round_to_rupee_rounds_up_at_half() {
        let result = round_to_rupee(dec!(10.5));

        assert_eq!(result, dec!(11));
    }

    #[test]
    fn round_to_rupee_preserves_whole_values() {
        let result = round_to_rupee(dec!(41600));

        assert_eq!(result, dec!(41600));
    }

    // =========================================================================
    // max / min tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_handles_negative_and_positive() {
        assert_eq!(max(dec!(-50.00), dec!(0)), dec!(0));
    }

    #[test]
    fn min_returns_smaller_value() {
        assert_eq!(min(dec!(13000), dec!(25000)), dec!(13000));
        assert_eq!(min(dec!(25000), dec!(13000)), dec!(13000));
    }

    #[test]
    fn min_handles_equal_values() {
        assert_eq!(min(dec!(150.00), dec!(150.00)), dec!(150.00));
    }

    // =========================================================================
    // ensure_non_negative tests
    // =========================================================================

    #[test]
    fn ensure_non_negative_passes_through_zero_and_positive() {
        assert_eq!(ensure_non_negative("income", dec!(0)), Ok(dec!(0)));
        assert_eq!(ensure_non_negative("income", dec!(12.5)), Ok(dec!(12.5)));
    }

    #[test]
    fn ensure_non_negative_accepts_negative_zero() {
        assert!(ensure_non_negative("income", -dec!(0)).is_ok());
    }

    #[test]
    fn ensure_non_negative_rejects_negative() {
        let result = ensure_non_negative("income", dec!(-0.01));

        assert_eq!(
            result,
            Err(TaxError::InvalidInput {
                field: "income",
                value: "-0.01".to_string(),
            })
        );
    }

    // =========================================================================
    // checked_add / checked_mul tests
    // =========================================================================

    #[test]
    fn checked_add_sums_in_range_values() {
        assert_eq!(checked_add("salary", dec!(0.10), dec!(0.20)), Ok(dec!(0.30)));
    }

    #[test]
    fn checked_add_reports_overflow_as_invalid_input() {
        let result = checked_add("salary", Decimal::MAX, Decimal::MAX);

        assert_eq!(
            result,
            Err(TaxError::InvalidInput {
                field: "salary",
                value: Decimal::MAX.to_string(),
            })
        );
    }

    #[test]
    fn checked_mul_scales_by_rate() {
        assert_eq!(checked_mul("income", dec!(200000), dec!(0.04)), Ok(dec!(8000)));
    }

    #[test]
    fn checked_mul_reports_overflow_as_invalid_input() {
        let result = checked_mul("income", Decimal::MAX, dec!(2));

        assert!(matches!(
            result,
            Err(TaxError::InvalidInput { field: "income", .. })
        ));
    }

    // =========================================================================
    // amount_from_f64 tests
    // =========================================================================

    #[test]
    fn amount_from_f64_converts_finite_values() {
        assert_eq!(amount_from_f64("payment", 30000.0), Ok(dec!(30000)));
    }

    #[test]
    fn amount_from_f64_rejects_nan() {
        let result = amount_from_f64("payment", f64::NAN);

        assert_eq!(
            result,
            Err(TaxError::InvalidInput {
                field: "payment",
                value: "NaN".to_string(),
            })
        );
    }

    #[test]
    fn amount_from_f64_rejects_infinity() {
        assert!(amount_from_f64("payment", f64::INFINITY).is_err());
        assert!(amount_from_f64("payment", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn amount_from_f64_rejects_out_of_range_values() {
        assert!(amount_from_f64("payment", 1e300).is_err());
    }
}
