//! Plain-text rendering of engine results for the terminal.
//!
//! Each report borrows the values it prints and implements [`Display`], so
//! the binary only ever does `println!("{report}")`.

use std::fmt::{self, Display};

use itax_core::calculations::{IncomeTaxResult, RegimeComparison, TdsResult};
use itax_core::{HraAnnualSummary, HraMonthResult, RateTables, RegimeName, TdsSection};

use crate::utils::{format_inr, format_rate, opt_amount_display};

/// Breakdown of one regime's income-tax computation.
pub struct IncomeTaxReport<'a> {
    pub label: &'a str,
    pub result: &'a IncomeTaxResult,
}

impl Display for IncomeTaxReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        writeln!(f, "{}", self.label)?;
        writeln!(f, "  Taxable income     {:>16}", format_inr(r.taxable_income))?;
        writeln!(f, "  Slab tax           {:>16}", format_inr(r.base_tax))?;
        writeln!(f, "  Rebate (87A)       {:>16}", format_inr(r.rebate))?;
        writeln!(f, "  Tax after rebate   {:>16}", format_inr(r.tax_after_rebate))?;
        writeln!(
            f,
            "  Surcharge ({:>4})   {:>16}",
            format_rate(r.surcharge_rate),
            format_inr(r.surcharge)
        )?;
        writeln!(f, "  Cess               {:>16}", format_inr(r.cess))?;
        writeln!(f, "  Total              {:>16}", format_inr(r.total))?;
        write!(f, "  Payable (rounded)  {:>16}", format_inr(r.rounded_total))
    }
}

/// Both regimes side by side with a recommendation.
pub struct ComparisonReport<'a> {
    pub tables: &'a RateTables,
    pub comparison: &'a RegimeComparison,
}

impl Display for ComparisonReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let c = self.comparison;
        for result in [&c.old, &c.new] {
            let report = IncomeTaxReport {
                label: &self.tables.regime(result.regime).label,
                result,
            };
            writeln!(f, "{report}")?;
            writeln!(f)?;
        }

        let recommended = &self.tables.regime(c.recommended).label;
        if c.savings.is_zero() {
            write!(f, "Both regimes cost the same; {recommended} applies by default")
        } else {
            write!(
                f,
                "{recommended} saves {}",
                format_inr(c.savings)
            )
        }
    }
}

/// Withholding on a single payment.
pub struct TdsReport<'a> {
    pub section: &'a TdsSection,
    pub result: &'a TdsResult,
}

impl Display for TdsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let (s, r) = (self.section, self.result);
        writeln!(f, "{} {}: {}", s.category, s.code, s.label)?;
        writeln!(f, "  Payment            {:>16}", format_inr(r.payment_amount))?;
        writeln!(f, "  Threshold          {:>16}", opt_amount_display(s.threshold))?;
        if let Some(note) = &s.threshold_note {
            writeln!(f, "    ({note})")?;
        }
        writeln!(f, "  Applicable         {:>16}", if r.applicable { "yes" } else { "no" })?;
        writeln!(f, "  Rate               {:>16}", format_rate(r.rate))?;
        writeln!(f, "  {:<18} {:>16}", s.category.as_str(), format_inr(r.tds_amount))?;
        writeln!(f, "  Net payment        {:>16}", format_inr(r.net_amount))?;
        write!(f, "  Basis: {}", r.reason)?;
        if let Some(notes) = &s.notes {
            write!(f, "\n  Note: {notes}")?;
        }
        Ok(())
    }
}

/// One line per section.
pub struct SectionsReport<'a> {
    pub sections: Vec<&'a TdsSection>,
}

impl Display for SectionsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{:<10} {:<4} {:>6} {:>7} {:>16}  Label",
            "Code", "Type", "Rate", "No PAN", "Threshold"
        )?;
        for s in &self.sections {
            write!(
                f,
                "\n{:<10} {:<4} {:>6} {:>7} {:>16}  {}",
                s.code,
                s.category.as_str(),
                format_rate(s.base_rate),
                format_rate(s.no_pan_rate),
                opt_amount_display(s.threshold),
                s.label
            )?;
        }
        Ok(())
    }
}

/// Month-by-month HRA exemption followed by the annual totals.
pub struct HraReport<'a> {
    pub months: &'a [HraMonthResult],
    pub summary: &'a HraAnnualSummary,
}

impl Display for HraReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>14} {:>14} {:>14} {:<5} {:>14} {:>14}",
            "Month", "Salary", "HRA", "Rent", "Metro", "Exempt", "Taxable"
        )?;
        for m in self.months {
            writeln!(
                f,
                "{:<12} {:>14} {:>14} {:>14} {:<5} {:>14} {:>14}",
                m.month(),
                format_inr(m.salary()),
                format_inr(m.hra_received()),
                format_inr(m.rent_paid()),
                if m.is_metro() { "yes" } else { "no" },
                format_inr(m.exemption()),
                format_inr(m.taxable())
            )?;
        }

        let s = self.summary;
        writeln!(f)?;
        writeln!(f, "Months             {:>16}", s.months)?;
        writeln!(f, "Salary             {:>16}", format_inr(s.total_salary))?;
        writeln!(f, "HRA received       {:>16}", format_inr(s.total_hra_received))?;
        writeln!(f, "Rent paid          {:>16}", format_inr(s.total_rent_paid))?;
        writeln!(f, "Exempt             {:>16}", format_inr(s.total_exemption))?;
        write!(f, "Taxable            {:>16}", format_inr(s.total_taxable))
    }
}

/// Shape of a loaded rate table, printed after a successful check.
pub struct TablesReport<'a>(pub &'a RateTables);

impl Display for TablesReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let tables = self.0;
        writeln!(f, "FY {}", tables.financial_year())?;
        for name in [RegimeName::Old, RegimeName::New] {
            let regime = tables.regime(name);
            writeln!(
                f,
                "  {}: {} slabs, {} surcharge bands, rebate up to {} on income <= {}",
                regime.label,
                regime.brackets.brackets().len(),
                regime.surcharge_bands.bands().len(),
                format_inr(regime.rebate_cap_amount),
                format_inr(regime.rebate_threshold)
            )?;
        }
        write!(f, "  {} sections", tables.sections().len())
    }
}
