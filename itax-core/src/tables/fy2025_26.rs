//! FY 2025-26 (AY 2026-27) rates as amended by the Finance Act, 2025.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::RateTables;
use crate::error::TaxError;
use crate::models::{
    RegimeConfig, RegimeName, SectionCategory, SlabBracket, SlabSchedule, SurchargeBand,
    SurchargeSchedule, TdsSection,
};

const CESS_RATE: Decimal = dec!(0.04);

pub(super) fn build() -> Result<RateTables, TaxError> {
    RateTables::new("2025-26", old_regime()?, new_regime()?, sections())
}

fn old_regime() -> Result<RegimeConfig, TaxError> {
    Ok(RegimeConfig {
        name: RegimeName::Old,
        label: "Old Regime".to_string(),
        brackets: SlabSchedule::new(vec![
            SlabBracket::bounded(dec!(250000), dec!(0)),
            SlabBracket::bounded(dec!(500000), dec!(0.05)),
            SlabBracket::bounded(dec!(1000000), dec!(0.20)),
            SlabBracket::unbounded(dec!(0.30)),
        ])?,
        cess_rate: CESS_RATE,
        rebate_threshold: dec!(500000),
        rebate_cap_amount: dec!(12500),
        surcharge_bands: surcharge(&[
            (dec!(5000000), dec!(0.10)),
            (dec!(10000000), dec!(0.15)),
            (dec!(20000000), dec!(0.25)),
            (dec!(50000000), dec!(0.37)),
        ])?,
    })
}

fn new_regime() -> Result<RegimeConfig, TaxError> {
    Ok(RegimeConfig {
        name: RegimeName::New,
        label: "New Regime (Section 115BAC)".to_string(),
        brackets: SlabSchedule::new(vec![
            SlabBracket::bounded(dec!(400000), dec!(0)),
            SlabBracket::bounded(dec!(800000), dec!(0.05)),
            SlabBracket::bounded(dec!(1200000), dec!(0.10)),
            SlabBracket::bounded(dec!(1600000), dec!(0.15)),
            SlabBracket::bounded(dec!(2000000), dec!(0.20)),
            SlabBracket::bounded(dec!(2400000), dec!(0.25)),
            SlabBracket::unbounded(dec!(0.30)),
        ])?,
        cess_rate: CESS_RATE,
        rebate_threshold: dec!(1200000),
        rebate_cap_amount: dec!(60000),
        // 37% band does not exist under 115BAC
        surcharge_bands: surcharge(&[
            (dec!(5000000), dec!(0.10)),
            (dec!(10000000), dec!(0.15)),
            (dec!(20000000), dec!(0.25)),
        ])?,
    })
}

fn surcharge(bands: &[(Decimal, Decimal)]) -> Result<SurchargeSchedule, TaxError> {
    let bands = bands
        .iter()
        .map(|&(income_above, rate)| SurchargeBand { income_above, rate })
        .collect();
    Ok(SurchargeSchedule::new(bands)?)
}

fn section(
    code: &str,
    label: &str,
    category: SectionCategory,
    base_rate: Decimal,
    no_pan_rate: Decimal,
    threshold: Option<Decimal>,
    threshold_note: Option<&str>,
) -> TdsSection {
    TdsSection {
        code: code.to_string(),
        label: label.to_string(),
        category,
        base_rate,
        no_pan_rate,
        threshold,
        threshold_note: threshold_note.map(str::to_string),
        notes: None,
    }
}

fn with_notes(
    section: TdsSection,
    notes: &str,
) -> TdsSection {
    TdsSection {
        notes: Some(notes.to_string()),
        ..section
    }
}

#[rustfmt::skip]
fn sections() -> Vec<TdsSection> {
    use SectionCategory::{Tcs, Tds};

    vec![
        section("192A", "Premature EPF withdrawal", Tds, dec!(0.10), dec!(0.20), Some(dec!(50000)), None),
        section("193", "Interest on securities", Tds, dec!(0.10), dec!(0.20), Some(dec!(10000)), None),
        section("194", "Dividends", Tds, dec!(0.10), dec!(0.20), Some(dec!(10000)), Some("Aggregate in the financial year")),
        section("194A", "Interest other than on securities", Tds, dec!(0.10), dec!(0.20), Some(dec!(50000)), Some("Banks and post offices; 1,00,000 for senior citizens, 10,000 for other payers")),
        with_notes(section("194B", "Winnings from lottery or crossword puzzle", Tds, dec!(0.30), dec!(0.30), Some(dec!(10000)), Some("Per transaction")), "Online game winnings fall under 194BA"),
        section("194C", "Payments to contractors", Tds, dec!(0.01), dec!(0.20), Some(dec!(30000)), Some("Single payment; 1,00,000 aggregate. 2% for payees other than individuals/HUF")),
        section("194D", "Insurance commission", Tds, dec!(0.02), dec!(0.20), Some(dec!(20000)), None),
        section("194H", "Commission or brokerage", Tds, dec!(0.02), dec!(0.20), Some(dec!(20000)), None),
        section("194I(a)", "Rent on plant and machinery", Tds, dec!(0.02), dec!(0.20), Some(dec!(50000)), Some("Per month or part of a month")),
        section("194I(b)", "Rent on land, building or furniture", Tds, dec!(0.10), dec!(0.20), Some(dec!(50000)), Some("Per month or part of a month")),
        section("194IA", "Transfer of immovable property", Tds, dec!(0.01), dec!(0.20), Some(dec!(5000000)), None),
        section("194J(a)", "Fees for technical services", Tds, dec!(0.02), dec!(0.20), Some(dec!(50000)), None),
        section("194J(b)", "Fees for professional services", Tds, dec!(0.10), dec!(0.20), Some(dec!(50000)), None),
        section("194N", "Cash withdrawal", Tds, dec!(0.02), dec!(0.20), Some(dec!(10000000)), None),
        section("194O", "Payments by e-commerce operators", Tds, dec!(0.001), dec!(0.05), Some(dec!(500000)), Some("Individual/HUF sellers")),
        section("194Q", "Purchase of goods", Tds, dec!(0.001), dec!(0.05), Some(dec!(5000000)), Some("Amount in excess of 50,00,000")),
        section("194T", "Salary, commission or interest to partners", Tds, dec!(0.10), dec!(0.20), Some(dec!(20000)), None),
        with_notes(section("206C(1)", "Sale of scrap", Tcs, dec!(0.01), dec!(0.05), None, None), "Collected on every sale"),
        section("206C(1F)", "Sale of motor vehicle", Tcs, dec!(0.01), dec!(0.05), Some(dec!(1000000)), Some("Sale consideration above 10,00,000")),
        with_notes(section("206C(1G)", "Remittance under LRS", Tcs, dec!(0.20), dec!(0.40), Some(dec!(1000000)), Some("Amount in excess of 10,00,000")), "5% for education and medical treatment"),
    ]
}
