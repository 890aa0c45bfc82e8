//! TDS / TCS resolution for a single payment.
//!
//! A payment strictly below a section's threshold is not subject to
//! withholding; a payment equal to the threshold is. When the payee has no
//! PAN the section's higher `no_pan_rate` applies (sections 206AA / 206CC).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itax_core::calculations::{TdsReason, resolve_tds};
//! use itax_core::{SectionCategory, TdsSection};
//!
//! let section = TdsSection {
//!     code: "194J".to_string(),
//!     label: "Fees for professional services".to_string(),
//!     category: SectionCategory::Tds,
//!     base_rate: dec!(0.10),
//!     no_pan_rate: dec!(0.20),
//!     threshold: Some(dec!(30000)),
//!     threshold_note: None,
//!     notes: None,
//! };
//!
//! let result = resolve_tds(dec!(30000), &section, false).unwrap();
//!
//! assert!(result.applicable);
//! assert_eq!(result.reason, TdsReason::PanNotAvailable);
//! assert_eq!(result.tds_amount, dec!(6000));
//! assert_eq!(result.net_amount, dec!(24000));
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::ensure_non_negative;
use crate::error::TaxError;
use crate::models::TdsSection;

/// Why a particular rate was (or was not) applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdsReason {
    BelowThreshold,
    PanAvailable,
    PanNotAvailable,
}

impl fmt::Display for TdsReason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::BelowThreshold => "below threshold",
            Self::PanAvailable => "base rate (PAN available)",
            Self::PanNotAvailable => "higher rate (PAN not available)",
        })
    }
}

/// Outcome of resolving one payment against one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TdsResult {
    pub section_code: String,
    pub payment_amount: Decimal,
    pub applicable: bool,
    pub rate: Decimal,
    pub tds_amount: Decimal,
    pub net_amount: Decimal,
    pub reason: TdsReason,
}

/// Resolves the withholding on `payment_amount` under `section`.
///
/// # Errors
///
/// Returns [`TaxError::InvalidInput`] if `payment_amount` is negative.
pub fn resolve_tds(
    payment_amount: Decimal,
    section: &TdsSection,
    pan_available: bool,
) -> Result<TdsResult, TaxError> {
    let payment_amount = ensure_non_negative("payment_amount", payment_amount)?;

    if let Some(threshold) = section.threshold.filter(|t| payment_amount < *t) {
        debug!(
            section = %section.code,
            payment = %payment_amount,
            threshold = %threshold,
            "payment below threshold; nothing withheld"
        );
        return Ok(TdsResult {
            section_code: section.code.clone(),
            payment_amount,
            applicable: false,
            rate: Decimal::ZERO,
            tds_amount: Decimal::ZERO,
            net_amount: payment_amount,
            reason: TdsReason::BelowThreshold,
        });
    }

    let (rate, reason) = if pan_available {
        (section.base_rate, TdsReason::PanAvailable)
    } else {
        (section.no_pan_rate, TdsReason::PanNotAvailable)
    };
    let tds_amount = payment_amount * rate;

    Ok(TdsResult {
        section_code: section.code.clone(),
        payment_amount,
        applicable: true,
        rate,
        tds_amount,
        net_amount: payment_amount - tds_amount,
        reason,
    })
}
