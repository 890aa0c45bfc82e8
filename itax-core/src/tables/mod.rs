//! Validated rate tables and the lookups the calculators run against.
//!
//! A [`RateTables`] value is built once per financial year, validated in
//! full, and never mutated afterwards. A table that fails validation is never
//! returned, so no calculation can run against it.

mod fy2025_26;

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::calculations::{
    IncomeTaxResult, RegimeComparison, TdsResult, compare_regimes, compute_income_tax,
    resolve_tds,
};
use crate::error::{ConfigurationError, TaxError};
use crate::models::{RegimeConfig, RegimeName, SectionCategory, TdsSection};

/// Income tax regimes and TDS/TCS sections for one financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTables {
    financial_year: String,
    old: RegimeConfig,
    new: RegimeConfig,
    sections: Vec<TdsSection>,
}

impl RateTables {
    /// Validates and assembles a rate table.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::Configuration`] if:
    /// - `old` or `new` is not named for the slot it is passed in
    /// - either regime has an invalid cess rate or rebate amount
    /// - any section fails [`TdsSection::validate`]
    /// - two sections share a code
    pub fn new(
        financial_year: impl Into<String>,
        old: RegimeConfig,
        new: RegimeConfig,
        sections: Vec<TdsSection>,
    ) -> Result<Self, TaxError> {
        for (expected, regime) in [(RegimeName::Old, &old), (RegimeName::New, &new)] {
            if regime.name != expected {
                return Err(ConfigurationError::RegimeMismatch {
                    expected: expected.to_string(),
                    found: regime.name.to_string(),
                }
                .into());
            }
            regime.validate()?;
        }

        let mut seen = HashSet::new();
        for section in &sections {
            section.validate()?;
            if !seen.insert(section.code.to_ascii_uppercase()) {
                return Err(ConfigurationError::DuplicateSection(section.code.clone()).into());
            }
        }

        let tables = Self {
            financial_year: financial_year.into(),
            old,
            new,
            sections,
        };
        info!(
            financial_year = %tables.financial_year,
            sections = tables.sections.len(),
            "rate tables validated"
        );
        Ok(tables)
    }

    /// Built-in tables for FY 2025-26 (assessment year 2026-27).
    pub fn fy2025_26() -> Result<Self, TaxError> {
        fy2025_26::build()
    }

    pub fn financial_year(&self) -> &str {
        &self.financial_year
    }

    pub fn regime(
        &self,
        name: RegimeName,
    ) -> &RegimeConfig {
        match name {
            RegimeName::Old => &self.old,
            RegimeName::New => &self.new,
        }
    }

    /// Every section, in table order.
    pub fn sections(&self) -> &[TdsSection] {
        &self.sections
    }

    /// Sections of one category, in table order.
    pub fn sections_in(
        &self,
        category: SectionCategory,
    ) -> impl Iterator<Item = &TdsSection> {
        self.sections.iter().filter(move |s| s.category == category)
    }

    /// Looks up a section by code, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::NotFound`] if no section has that code.
    pub fn section(
        &self,
        code: &str,
    ) -> Result<&TdsSection, TaxError> {
        let code = code.trim();
        self.sections
            .iter()
            .find(|s| s.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| TaxError::not_found("section", code))
    }

    /// Income tax on `income` under the named regime.
    pub fn compute_income_tax(
        &self,
        income: Decimal,
        regime: RegimeName,
    ) -> Result<IncomeTaxResult, TaxError> {
        compute_income_tax(income, self.regime(regime))
    }

    /// Income tax on `income` under both regimes.
    pub fn compare_regimes(
        &self,
        income: Decimal,
    ) -> Result<RegimeComparison, TaxError> {
        compare_regimes(income, &self.old, &self.new)
    }

    /// Withholding on `payment_amount` under the section with `section_code`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::NotFound`] for an unknown code and
    /// [`TaxError::InvalidInput`] for a negative payment.
    pub fn resolve_tds(
        &self,
        payment_amount: Decimal,
        section_code: &str,
        pan_available: bool,
    ) -> Result<TdsResult, TaxError> {
        resolve_tds(payment_amount, self.section(section_code)?, pan_available)
    }
}

/// A process-wide handle to the current rate tables.
///
/// Readers take a cheap [`Arc`] snapshot; a reload swaps the whole table in
/// one step, so a calculation never sees a half-updated table.
#[derive(Debug)]
pub struct SharedRateTables {
    current: RwLock<Arc<RateTables>>,
}

impl SharedRateTables {
    pub fn new(tables: RateTables) -> Self {
        Self {
            current: RwLock::new(Arc::new(tables)),
        }
    }

    /// Snapshot of the tables in force right now.
    pub fn current(&self) -> Arc<RateTables> {
        self.current.read().clone()
    }

    /// Publishes `tables`, returning the ones they replace.
    pub fn replace(
        &self,
        tables: RateTables,
    ) -> Arc<RateTables> {
        let next = Arc::new(tables);
        info!(
            financial_year = %next.financial_year,
            "swapping rate tables"
        );
        std::mem::replace(&mut *self.current.write(), next)
    }
}
