//! Error taxonomy shared by every engine component.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by the tax engine.
///
/// `InvalidInput` and `NotFound` are caller errors: the request should be
/// corrected, never retried. `Configuration` is raised while a rate table is
/// being built and means the table must not be served at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    /// A numeric input was negative or not finite.
    #[error("invalid input for `{field}`: {value}")]
    InvalidInput { field: &'static str, value: String },

    /// A rate table failed validation.
    #[error("invalid rate table: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A lookup key (section code, regime name) is not in the table.
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },
}

impl TaxError {
    pub(crate) fn invalid_input(
        field: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::InvalidInput {
            field,
            value: value.to_string(),
        }
    }

    pub(crate) fn not_found(
        kind: &'static str,
        key: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }
}

/// Ways a rate table can be malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("slab schedule has no brackets")]
    EmptySchedule,

    #[error("bracket {index} upper bound {upper_bound} must be greater than {previous}")]
    UnsortedBrackets {
        index: usize,
        upper_bound: Decimal,
        previous: Decimal,
    },

    #[error("bracket {index} is unbounded but is not the final bracket")]
    UnboundedBracketNotLast { index: usize },

    #[error("final bracket must be unbounded, got upper bound {0}")]
    FinalBracketBounded(Decimal),

    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: String, value: Decimal },

    #[error("surcharge band {index} starts at {income_above}, which is not above {previous}")]
    UnsortedSurchargeBands {
        index: usize,
        income_above: Decimal,
        previous: Decimal,
    },

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("section {code}: no-PAN rate {no_pan_rate} is below base rate {base_rate}")]
    NoPanRateBelowBase {
        code: String,
        base_rate: Decimal,
        no_pan_rate: Decimal,
    },

    #[error("section code '{0}' appears more than once")]
    DuplicateSection(String),

    #[error("regime slot {expected} holds a {found} configuration")]
    RegimeMismatch { expected: String, found: String },
}

/// Checks that `value` lies in `[0, 1]`.
pub(crate) fn ensure_fraction(
    field: impl Into<String>,
    value: Decimal,
) -> Result<(), ConfigurationError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigurationError::RateOutOfRange {
            field: field.into(),
            value,
        });
    }
    Ok(())
}

/// Checks that a configured amount is not negative.
pub(crate) fn ensure_non_negative_amount(
    field: impl Into<String>,
    value: Decimal,
) -> Result<(), ConfigurationError> {
    if value < Decimal::ZERO {
        return Err(ConfigurationError::NegativeAmount {
            field: field.into(),
            value,
        });
    }
    Ok(())
}
