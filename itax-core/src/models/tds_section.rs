use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, ensure_fraction, ensure_non_negative_amount};

/// Whether a section withholds on payment (TDS) or collects on receipt (TCS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SectionCategory {
    Tds,
    Tcs,
}

impl SectionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tds => "TDS",
            Self::Tcs => "TCS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TDS" => Some(Self::Tds),
            "TCS" => Some(Self::Tcs),
            _ => None,
        }
    }
}

impl fmt::Display for SectionCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Withholding parameters for one TDS or TCS section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TdsSection {
    /// Section code as printed in the Act, e.g. `194C` or `206C(1G)`.
    pub code: String,
    pub label: String,
    pub category: SectionCategory,
    pub base_rate: Decimal,
    /// Rate under sections 206AA / 206CC when the payee has no PAN.
    pub no_pan_rate: Decimal,
    /// Payments strictly below this amount are not subject to withholding.
    pub threshold: Option<Decimal>,
    pub threshold_note: Option<String>,
    pub notes: Option<String>,
}

impl TdsSection {
    /// Validates the section's rates and threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if:
    /// - `base_rate` or `no_pan_rate` is not in [0, 1]
    /// - `no_pan_rate` is lower than `base_rate`
    /// - `threshold` is negative
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_fraction(format!("section {} base_rate", self.code), self.base_rate)?;
        ensure_fraction(
            format!("section {} no_pan_rate", self.code),
            self.no_pan_rate,
        )?;

        if self.no_pan_rate < self.base_rate {
            return Err(ConfigurationError::NoPanRateBelowBase {
                code: self.code.clone(),
                base_rate: self.base_rate,
                no_pan_rate: self.no_pan_rate,
            });
        }

        if let Some(threshold) = self.threshold {
            ensure_non_negative_amount(format!("section {} threshold", self.code), threshold)?;
        }

        Ok(())
    }
}
