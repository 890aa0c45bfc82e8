use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use itax_core::{
    RateTables, RegimeConfig, RegimeName, SectionCategory, SlabBracket, SlabSchedule,
    SurchargeBand, SurchargeSchedule, TaxError, TdsSection,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

pub const REGIMES_FILE: &str = "regimes.csv";
pub const SLABS_FILE: &str = "slabs.csv";
pub const SURCHARGES_FILE: &str = "surcharges.csv";
pub const SECTIONS_FILE: &str = "sections.csv";

/// Errors that can occur when loading rate-table data.
#[derive(Debug, Error)]
pub enum RateTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown regime '{0}' (expected OLD or NEW)")]
    UnknownRegime(String),

    #[error("Regime {0} has no row in regimes.csv")]
    MissingRegime(RegimeName),

    #[error("Regime {0} appears more than once in regimes.csv")]
    DuplicateRegime(RegimeName),

    #[error("Financial year mismatch: expected {expected}, found {found}")]
    FinancialYearMismatch { expected: String, found: String },

    #[error("Section {code} has unknown category '{category}' (expected TDS or TCS)")]
    UnknownCategory { code: String, category: String },

    #[error("Invalid rate table: {0}")]
    Invalid(#[from] TaxError),
}

impl From<csv::Error> for RateTableLoaderError {
    fn from(err: csv::Error) -> Self {
        RateTableLoaderError::CsvParse(err.to_string())
    }
}

/// A row of `regimes.csv`: the scalar parameters of one regime.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegimeRecord {
    pub financial_year: String,
    pub regime: String,
    pub label: String,
    pub cess_rate: Decimal,
    pub rebate_threshold: Decimal,
    pub rebate_cap_amount: Decimal,
}

/// A row of `slabs.csv`. Rows for a regime are taken in file order.
///
/// An empty `upper_bound` marks the open-ended top slab.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub regime: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

/// A row of `surcharges.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SurchargeRecord {
    pub regime: String,
    pub income_above: Decimal,
    pub rate: Decimal,
}

/// A row of `sections.csv`. An empty `threshold` means every payment is
/// subject to withholding.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SectionRecord {
    pub code: String,
    pub label: String,
    pub category: String,
    pub base_rate: Decimal,
    pub no_pan_rate: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub threshold: Option<Decimal>,
    pub threshold_note: Option<String>,
    pub notes: Option<String>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn parse_records<T, R>(reader: R) -> Result<Vec<T>, RateTableLoaderError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

fn parse_regime(name: &str) -> Result<RegimeName, RateTableLoaderError> {
    RegimeName::parse(name).ok_or_else(|| RateTableLoaderError::UnknownRegime(name.to_string()))
}

/// Loader for one financial year's rate tables stored as CSV.
///
/// A table directory holds four files: [`REGIMES_FILE`], [`SLABS_FILE`],
/// [`SURCHARGES_FILE`] and [`SECTIONS_FILE`]. The parsed rows are assembled
/// into a [`RateTables`], which validates everything before it is returned.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse regime rows from a CSV reader.
    pub fn parse_regimes<R: Read>(reader: R) -> Result<Vec<RegimeRecord>, RateTableLoaderError> {
        parse_records(reader)
    }

    /// Parse slab rows from a CSV reader.
    pub fn parse_slabs<R: Read>(reader: R) -> Result<Vec<SlabRecord>, RateTableLoaderError> {
        parse_records(reader)
    }

    /// Parse surcharge band rows from a CSV reader.
    pub fn parse_surcharges<R: Read>(
        reader: R
    ) -> Result<Vec<SurchargeRecord>, RateTableLoaderError> {
        parse_records(reader)
    }

    /// Parse TDS/TCS section rows from a CSV reader.
    pub fn parse_sections<R: Read>(reader: R) -> Result<Vec<SectionRecord>, RateTableLoaderError> {
        parse_records(reader)
    }

    /// Build validated rate tables from parsed rows.
    ///
    /// Every regime row must carry the same financial year, and both the old
    /// and the new regime must be present exactly once. Slab and surcharge
    /// rows are grouped by regime in file order.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableLoaderError`] for unknown regime or category codes,
    /// missing or duplicate regimes, mixed financial years, and any
    /// configuration error raised while validating the assembled tables.
    pub fn assemble(
        regimes: &[RegimeRecord],
        slabs: &[SlabRecord],
        surcharges: &[SurchargeRecord],
        sections: &[SectionRecord],
    ) -> Result<RateTables, RateTableLoaderError> {
        let financial_year = Self::financial_year(regimes)?;

        let mut brackets: HashMap<RegimeName, Vec<SlabBracket>> = HashMap::new();
        for record in slabs {
            brackets
                .entry(parse_regime(&record.regime)?)
                .or_default()
                .push(SlabBracket {
                    upper_bound: record.upper_bound,
                    rate: record.rate,
                });
        }

        let mut bands: HashMap<RegimeName, Vec<SurchargeBand>> = HashMap::new();
        for record in surcharges {
            bands
                .entry(parse_regime(&record.regime)?)
                .or_default()
                .push(SurchargeBand {
                    income_above: record.income_above,
                    rate: record.rate,
                });
        }

        let mut configs: HashMap<RegimeName, RegimeConfig> = HashMap::new();
        for record in regimes {
            let name = parse_regime(&record.regime)?;
            if configs.contains_key(&name) {
                return Err(RateTableLoaderError::DuplicateRegime(name));
            }

            let schedule = SlabSchedule::new(brackets.remove(&name).unwrap_or_default())
                .map_err(TaxError::from)?;
            let surcharge_bands = SurchargeSchedule::new(bands.remove(&name).unwrap_or_default())
                .map_err(TaxError::from)?;

            configs.insert(
                name,
                RegimeConfig {
                    name,
                    label: record.label.clone(),
                    brackets: schedule,
                    cess_rate: record.cess_rate,
                    rebate_threshold: record.rebate_threshold,
                    rebate_cap_amount: record.rebate_cap_amount,
                    surcharge_bands,
                },
            );
        }

        for orphan in brackets.keys().chain(bands.keys()) {
            warn!(regime = %orphan, "slab or surcharge rows for a regime with no regime row");
        }

        let old = configs
            .remove(&RegimeName::Old)
            .ok_or(RateTableLoaderError::MissingRegime(RegimeName::Old))?;
        let new = configs
            .remove(&RegimeName::New)
            .ok_or(RateTableLoaderError::MissingRegime(RegimeName::New))?;

        let sections = sections
            .iter()
            .map(Self::section)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RateTables::new(financial_year, old, new, sections)?)
    }

    /// Read and assemble the rate tables stored in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableLoaderError::Io`] if a file cannot be opened, and
    /// any error from parsing or [`RateTableLoader::assemble`].
    pub fn load_dir(dir: &Path) -> Result<RateTables, RateTableLoaderError> {
        let regimes = Self::parse_regimes(Self::open(dir, REGIMES_FILE)?)?;
        let slabs = Self::parse_slabs(Self::open(dir, SLABS_FILE)?)?;
        let surcharges = Self::parse_surcharges(Self::open(dir, SURCHARGES_FILE)?)?;
        let sections = Self::parse_sections(Self::open(dir, SECTIONS_FILE)?)?;

        debug!(
            dir = %dir.display(),
            regimes = regimes.len(),
            slabs = slabs.len(),
            surcharges = surcharges.len(),
            sections = sections.len(),
            "parsed rate-table files"
        );

        Self::assemble(&regimes, &slabs, &surcharges, &sections).inspect_err(|err| {
            warn!(dir = %dir.display(), error = %err, "rejected rate tables");
        })
    }

    fn open(
        dir: &Path,
        file_name: &str,
    ) -> Result<File, RateTableLoaderError> {
        let path = dir.join(file_name);
        File::open(&path).map_err(|source| RateTableLoaderError::Io { path, source })
    }

    fn financial_year(regimes: &[RegimeRecord]) -> Result<String, RateTableLoaderError> {
        let Some(first) = regimes.first() else {
            return Err(RateTableLoaderError::MissingRegime(RegimeName::Old));
        };

        if let Some(other) = regimes
            .iter()
            .find(|r| r.financial_year != first.financial_year)
        {
            return Err(RateTableLoaderError::FinancialYearMismatch {
                expected: first.financial_year.clone(),
                found: other.financial_year.clone(),
            });
        }

        Ok(first.financial_year.clone())
    }

    fn section(record: &SectionRecord) -> Result<TdsSection, RateTableLoaderError> {
        let category = SectionCategory::parse(&record.category).ok_or_else(|| {
            RateTableLoaderError::UnknownCategory {
                code: record.code.clone(),
                category: record.category.clone(),
            }
        })?;

        Ok(TdsSection {
            code: record.code.clone(),
            label: record.label.clone(),
            category,
            base_rate: record.base_rate,
            no_pan_rate: record.no_pan_rate,
            threshold: record.threshold,
            threshold_note: record.threshold_note.clone(),
            notes: record.notes.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use itax_core::ConfigurationError;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const REGIMES_CSV: &str = "\
financial_year,regime,label,cess_rate,rebate_threshold,rebate_cap_amount
2025-26,OLD,Old Regime,0.04,500000,12500
2025-26,NEW,New Regime,0.04,1200000,60000
";

    const SLABS_CSV: &str = "\
regime,upper_bound,rate
OLD,250000,0
OLD,,0.30
NEW,400000,0
NEW,,0.05
";

    const SURCHARGES_CSV: &str = "\
regime,income_above,rate
OLD,5000000,0.10
";

    const SECTIONS_CSV: &str = "\
code,label,category,base_rate,no_pan_rate,threshold,threshold_note,notes
194J(b),Fees for professional services,TDS,0.10,0.20,50000,,
206C(1),Sale of scrap,tcs,0.01,0.05,,,Collected on every sale
";

    fn parse_all(
        regimes: &str,
        slabs: &str,
        surcharges: &str,
        sections: &str,
    ) -> Result<RateTables, RateTableLoaderError> {
        RateTableLoader::assemble(
            &RateTableLoader::parse_regimes(regimes.as_bytes())?,
            &RateTableLoader::parse_slabs(slabs.as_bytes())?,
            &RateTableLoader::parse_surcharges(surcharges.as_bytes())?,
            &RateTableLoader::parse_sections(sections.as_bytes())?,
        )
    }

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn test_parse_slabs_with_unbounded_row() {
        let records = RateTableLoader::parse_slabs(SLABS_CSV.as_bytes()).expect("parse slabs");

        assert_eq!(records.len(), 4);
        assert_eq!(
            records[0],
            SlabRecord {
                regime: "OLD".to_string(),
                upper_bound: Some(dec!(250000)),
                rate: dec!(0),
            }
        );
        assert_eq!(records[1].upper_bound, None);
    }

    #[test]
    fn test_parse_sections_optional_columns() {
        let records =
            RateTableLoader::parse_sections(SECTIONS_CSV.as_bytes()).expect("parse sections");

        assert_eq!(records[0].threshold, Some(dec!(50000)));
        assert_eq!(records[0].threshold_note, None);
        assert_eq!(records[0].notes, None);
        assert_eq!(records[1].threshold, None);
        assert_eq!(records[1].notes.as_deref(), Some("Collected on every sale"));
    }

    #[test]
    fn test_parse_whitespace_is_trimmed() {
        let csv = "regime , upper_bound , rate\nNEW ,  , 0.30\n";

        let records = RateTableLoader::parse_slabs(csv.as_bytes()).expect("parse slabs");

        assert_eq!(records[0].regime, "NEW");
        assert_eq!(records[0].upper_bound, None);
        assert_eq!(records[0].rate, dec!(0.30));
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = "regime,upper_bound,rate\nNEW,abc,0.30";

        let result = RateTableLoader::parse_slabs(csv.as_bytes());

        let err = result.expect_err("Should fail for invalid decimal");
        let RateTableLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.to_lowercase().contains("invalid"),
            "Expected 'invalid' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_missing_column() {
        let csv = "regime,rate\nNEW,0.30";

        let result = RateTableLoader::parse_surcharges(csv.as_bytes());

        let err = result.expect_err("Should fail for missing column");
        let RateTableLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "unexpected message: {msg}");
    }

    #[test]
    fn test_parse_empty_csv() {
        let records = RateTableLoader::parse_surcharges("regime,income_above,rate\n".as_bytes())
            .expect("header-only CSV is valid");

        assert!(records.is_empty());
    }

    // =========================================================================
    // assemble tests
    // =========================================================================

    #[test]
    fn test_assemble_builds_both_regimes() {
        let tables = parse_all(REGIMES_CSV, SLABS_CSV, SURCHARGES_CSV, SECTIONS_CSV)
            .expect("valid tables");

        assert_eq!(tables.financial_year(), "2025-26");
        assert_eq!(tables.regime(RegimeName::Old).brackets.brackets().len(), 2);
        assert_eq!(tables.regime(RegimeName::Old).surcharge_bands.bands().len(), 1);
        assert!(tables.regime(RegimeName::New).surcharge_bands.bands().is_empty());
        assert_eq!(tables.regime(RegimeName::New).rebate_cap_amount, dec!(60000));
    }

    #[test]
    fn test_assemble_parses_lowercase_category() {
        let tables = parse_all(REGIMES_CSV, SLABS_CSV, SURCHARGES_CSV, SECTIONS_CSV)
            .expect("valid tables");

        let scrap = tables.section("206C(1)").expect("section present");
        assert_eq!(scrap.category, SectionCategory::Tcs);
    }

    #[test]
    fn test_assemble_rejects_unknown_regime() {
        let slabs = "regime,upper_bound,rate\nFLAT,,0.10\n";

        let result = parse_all(REGIMES_CSV, slabs, SURCHARGES_CSV, SECTIONS_CSV);

        match result {
            Err(RateTableLoaderError::UnknownRegime(ref regime)) => assert_eq!(regime, "FLAT"),
            other => panic!("expected UnknownRegime, got {other:?}"),
        }
    }

    #[test]
    fn test_assemble_rejects_missing_regime() {
        let regimes = "\
financial_year,regime,label,cess_rate,rebate_threshold,rebate_cap_amount
2025-26,OLD,Old Regime,0.04,500000,12500
";
        let slabs = "regime,upper_bound,rate\nOLD,,0.30\n";

        let result = parse_all(regimes, slabs, SURCHARGES_CSV, SECTIONS_CSV);

        assert!(matches!(
            result,
            Err(RateTableLoaderError::MissingRegime(RegimeName::New))
        ));
    }

    #[test]
    fn test_assemble_rejects_duplicate_regime() {
        let regimes = format!("{REGIMES_CSV}2025-26,NEW,Again,0.04,0,0\n");

        let result = parse_all(&regimes, SLABS_CSV, SURCHARGES_CSV, SECTIONS_CSV);

        assert!(matches!(
            result,
            Err(RateTableLoaderError::DuplicateRegime(RegimeName::New))
        ));
    }

    #[test]
    fn test_assemble_rejects_mixed_financial_years() {
        let regimes = "\
financial_year,regime,label,cess_rate,rebate_threshold,rebate_cap_amount
2025-26,OLD,Old Regime,0.04,500000,12500
2024-25,NEW,New Regime,0.04,700000,25000
";

        let result = parse_all(regimes, SLABS_CSV, SURCHARGES_CSV, SECTIONS_CSV);

        match result {
            Err(RateTableLoaderError::FinancialYearMismatch { expected, found }) => {
                assert_eq!(expected, "2025-26");
                assert_eq!(found, "2024-25");
            }
            other => panic!("expected FinancialYearMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_assemble_rejects_schedule_with_gap_at_top() {
        let slabs = "regime,upper_bound,rate\nOLD,250000,0\nNEW,,0.05\n";

        let result = parse_all(REGIMES_CSV, slabs, SURCHARGES_CSV, SECTIONS_CSV);

        assert!(matches!(
            result,
            Err(RateTableLoaderError::Invalid(TaxError::Configuration(
                ConfigurationError::FinalBracketBounded(_)
            )))
        ));
    }

    #[test]
    fn test_assemble_rejects_regime_without_slabs() {
        let slabs = "regime,upper_bound,rate\nNEW,,0.05\n";

        let result = parse_all(REGIMES_CSV, slabs, SURCHARGES_CSV, SECTIONS_CSV);

        assert!(matches!(
            result,
            Err(RateTableLoaderError::Invalid(TaxError::Configuration(
                ConfigurationError::EmptySchedule
            )))
        ));
    }

    #[test]
    fn test_assemble_rejects_unknown_category() {
        let sections = "\
code,label,category,base_rate,no_pan_rate,threshold,threshold_note,notes
194X,Mystery,GST,0.10,0.20,,,
";

        let result = parse_all(REGIMES_CSV, SLABS_CSV, SURCHARGES_CSV, sections);

        match result {
            Err(RateTableLoaderError::UnknownCategory { code, category }) => {
                assert_eq!(code, "194X");
                assert_eq!(category, "GST");
            }
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_assemble_rejects_lower_no_pan_rate() {
        let sections = "\
code,label,category,base_rate,no_pan_rate,threshold,threshold_note,notes
194J(b),Fees for professional services,TDS,0.10,0.05,50000,,
";

        let result = parse_all(REGIMES_CSV, SLABS_CSV, SURCHARGES_CSV, sections);

        assert!(matches!(
            result,
            Err(RateTableLoaderError::Invalid(TaxError::Configuration(
                ConfigurationError::NoPanRateBelowBase { .. }
            )))
        ));
    }

    #[test]
    fn test_load_dir_reports_missing_directory() {
        let result = RateTableLoader::load_dir(Path::new("/this/path/does/not/exist"));

        match result {
            Err(RateTableLoaderError::Io { path, .. }) => {
                assert!(path.ends_with(REGIMES_FILE));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
