use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, ensure_fraction};

/// One income slab taxed at a single marginal rate.
///
/// `upper_bound` is inclusive; `None` marks the open-ended top slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl SlabBracket {
    pub fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}

/// An ordered list of slabs covering `[0, ∞)` with no gaps or overlaps.
///
/// The only way to obtain a `SlabSchedule` is through [`SlabSchedule::new`]
/// (serde goes through it as well), so a schedule in hand is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SlabBracket>", into = "Vec<SlabBracket>")]
pub struct SlabSchedule(Vec<SlabBracket>);

impl SlabSchedule {
    /// Validates and wraps `brackets`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if:
    /// - `brackets` is empty
    /// - a bounded upper bound is not strictly greater than the previous one
    ///   (the first must be greater than zero)
    /// - an unbounded bracket appears before the end
    /// - the final bracket is bounded
    /// - any rate lies outside `[0, 1]`
    pub fn new(brackets: Vec<SlabBracket>) -> Result<Self, ConfigurationError> {
        if brackets.is_empty() {
            return Err(ConfigurationError::EmptySchedule);
        }

        let last = brackets.len() - 1;
        let mut previous = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            ensure_fraction(format!("bracket {index} rate"), bracket.rate)?;

            match bracket.upper_bound {
                Some(upper_bound) if index == last => {
                    return Err(ConfigurationError::FinalBracketBounded(upper_bound));
                }
                Some(upper_bound) if upper_bound <= previous => {
                    return Err(ConfigurationError::UnsortedBrackets {
                        index,
                        upper_bound,
                        previous,
                    });
                }
                Some(upper_bound) => previous = upper_bound,
                None if index != last => {
                    return Err(ConfigurationError::UnboundedBracketNotLast { index });
                }
                None => {}
            }
        }

        Ok(Self(brackets))
    }

    pub fn brackets(&self) -> &[SlabBracket] {
        &self.0
    }
}

impl TryFrom<Vec<SlabBracket>> for SlabSchedule {
    type Error = ConfigurationError;

    fn try_from(brackets: Vec<SlabBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<SlabSchedule> for Vec<SlabBracket> {
    fn from(schedule: SlabSchedule) -> Self {
        schedule.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_accepts_ascending_schedule_ending_unbounded() {
        let schedule = SlabSchedule::new(vec![
            SlabBracket::bounded(dec!(250000), dec!(0)),
            SlabBracket::bounded(dec!(500000), dec!(0.05)),
            SlabBracket::unbounded(dec!(0.30)),
        ])
        .expect("valid schedule");

        assert_eq!(schedule.brackets().len(), 3);
    }

    #[test]
    fn new_accepts_single_unbounded_bracket() {
        let result = SlabSchedule::new(vec![SlabBracket::unbounded(dec!(0.10))]);

        assert!(result.is_ok());
    }

    #[test]
    fn new_rejects_empty_schedule() {
        let result = SlabSchedule::new(vec![]);

        assert_eq!(result, Err(ConfigurationError::EmptySchedule));
    }

    #[test]
    fn new_rejects_bounded_final_bracket() {
        let result = SlabSchedule::new(vec![
            SlabBracket::bounded(dec!(250000), dec!(0)),
            SlabBracket::bounded(dec!(500000), dec!(0.05)),
        ]);

        assert_eq!(
            result,
            Err(ConfigurationError::FinalBracketBounded(dec!(500000)))
        );
    }

    #[test]
    fn new_rejects_unsorted_bounds() {
        let result = SlabSchedule::new(vec![
            SlabBracket::bounded(dec!(500000), dec!(0)),
            SlabBracket::bounded(dec!(250000), dec!(0.05)),
            SlabBracket::unbounded(dec!(0.30)),
        ]);

        assert_eq!(
            result,
            Err(ConfigurationError::UnsortedBrackets {
                index: 1,
                upper_bound: dec!(250000),
                previous: dec!(500000),
            })
        );
    }

    #[test]
    fn new_rejects_duplicate_bound() {
        let result = SlabSchedule::new(vec![
            SlabBracket::bounded(dec!(250000), dec!(0)),
            SlabBracket::bounded(dec!(250000), dec!(0.05)),
            SlabBracket::unbounded(dec!(0.30)),
        ]);

        assert!(matches!(
            result,
            Err(ConfigurationError::UnsortedBrackets { index: 1, .. })
        ));
    }

    #[test]
    fn new_rejects_zero_first_bound() {
        let result = SlabSchedule::new(vec![
            SlabBracket::bounded(dec!(0), dec!(0)),
            SlabBracket::unbounded(dec!(0.30)),
        ]);

        assert!(matches!(
            result,
            Err(ConfigurationError::UnsortedBrackets { index: 0, .. })
        ));
    }

    #[test]
    fn new_rejects_unbounded_bracket_in_the_middle() {
        let result = SlabSchedule::new(vec![
            SlabBracket::bounded(dec!(250000), dec!(0)),
            SlabBracket::unbounded(dec!(0.05)),
            SlabBracket::unbounded(dec!(0.30)),
        ]);

        assert_eq!(
            result,
            Err(ConfigurationError::UnboundedBracketNotLast { index: 1 })
        );
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = SlabSchedule::new(vec![SlabBracket::unbounded(dec!(1.5))]);

        assert!(matches!(
            result,
            Err(ConfigurationError::RateOutOfRange { .. })
        ));
    }
}
