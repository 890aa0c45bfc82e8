use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::slab::SlabSchedule;
use crate::error::{
    ConfigurationError, TaxError, ensure_fraction, ensure_non_negative_amount,
};

/// The two income-tax regimes a resident individual can choose between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegimeName {
    Old,
    New,
}

impl RegimeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "OLD",
            Self::New => "NEW",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OLD" => Some(Self::Old),
            "NEW" => Some(Self::New),
            _ => None,
        }
    }
}

impl fmt::Display for RegimeName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegimeName {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TaxError::not_found("regime", s))
    }
}

/// Surcharge rate that applies once income exceeds `income_above`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeBand {
    pub income_above: Decimal,
    pub rate: Decimal,
}

/// Surcharge bands sorted strictly ascending by `income_above`. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SurchargeBand>", into = "Vec<SurchargeBand>")]
pub struct SurchargeSchedule(Vec<SurchargeBand>);

impl SurchargeSchedule {
    /// Validates and wraps `bands`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if a threshold is negative, a rate lies
    /// outside `[0, 1]`, or thresholds are not strictly ascending.
    pub fn new(bands: Vec<SurchargeBand>) -> Result<Self, ConfigurationError> {
        let mut previous: Option<Decimal> = None;

        for (index, band) in bands.iter().enumerate() {
            ensure_non_negative_amount(
                format!("surcharge band {index} income_above"),
                band.income_above,
            )?;
            ensure_fraction(format!("surcharge band {index} rate"), band.rate)?;

            if let Some(previous) = previous.filter(|p| band.income_above <= *p) {
                return Err(ConfigurationError::UnsortedSurchargeBands {
                    index,
                    income_above: band.income_above,
                    previous,
                });
            }
            previous = Some(band.income_above);
        }

        Ok(Self(bands))
    }

    pub fn bands(&self) -> &[SurchargeBand] {
        &self.0
    }

    /// The highest band whose threshold is strictly below `income`.
    pub fn band_for(
        &self,
        income: Decimal,
    ) -> Option<&SurchargeBand> {
        self.0.iter().rev().find(|band| band.income_above < income)
    }
}

impl TryFrom<Vec<SurchargeBand>> for SurchargeSchedule {
    type Error = ConfigurationError;

    fn try_from(bands: Vec<SurchargeBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<SurchargeSchedule> for Vec<SurchargeBand> {
    fn from(schedule: SurchargeSchedule) -> Self {
        schedule.0
    }
}

/// Every parameter needed to compute income tax under one regime.
///
/// Surcharge is applied as a cliff: the whole tax is charged at the rate of
/// the band the income falls in, without marginal relief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeConfig {
    pub name: RegimeName,
    pub label: String,
    pub brackets: SlabSchedule,
    pub cess_rate: Decimal,
    /// Section 87A: income at or below this amount qualifies for the rebate.
    pub rebate_threshold: Decimal,
    pub rebate_cap_amount: Decimal,
    pub surcharge_bands: SurchargeSchedule,
}

impl RegimeConfig {
    /// Validates the scalar parameters. Brackets and surcharge bands are
    /// validated when their schedules are built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if:
    /// - `cess_rate` is not in [0, 1]
    /// - `rebate_threshold` is negative
    /// - `rebate_cap_amount` is negative
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let name = self.name;
        ensure_fraction(format!("{name} cess_rate"), self.cess_rate)?;
        ensure_non_negative_amount(format!("{name} rebate_threshold"), self.rebate_threshold)?;
        ensure_non_negative_amount(
            format!("{name} rebate_cap_amount"),
            self.rebate_cap_amount,
        )?;
        Ok(())
    }
}
