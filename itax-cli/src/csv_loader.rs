//! CSV loader for monthly HRA input data.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive and must match exactly. Whitespace around values
//! is ignored.
//!
//! | Column         | Required | Type    | Notes                                   |
//! |----------------|----------|---------|-----------------------------------------|
//! | `month`        | yes      | string  | Free-form label, e.g. `Apr-2025`        |
//! | `salary`       | yes      | decimal | Basic salary plus dearness allowance    |
//! | `hra_received` | yes      | decimal |                                         |
//! | `rent_paid`    | yes      | decimal |                                         |
//! | `is_metro`     | yes      | flag    | `true`/`false`, `yes`/`no`, `y`/`n`, `1`/`0` |
//!
//! Amounts are read as written; negative values are passed through and
//! clamped by the HRA calculator.
//!
//! ### Example
//!
//! ```csv
//! month,salary,hra_received,rent_paid,is_metro
//! Apr-2025,50000.00,20000.00,18000.00,yes
//! May-2025,50000.00,20000.00,18000.00,yes
//! ```
use itax_core::HraMonthInput;
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    month: String,
    salary: Decimal,
    hra_received: Decimal,
    rent_paid: Decimal,
    is_metro: String,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// An `is_metro` cell was not a recognised yes/no value. `row` is the
    /// 1-based data row number (header excluded).
    #[error("unrecognised metro flag '{value}' on row {row}")]
    InvalidMetroFlag { value: String, row: usize },

    #[error("month label is empty on row {row}")]
    EmptyMonth { row: usize },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_metro_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Convert a single CSV row into an [`HraMonthInput`].
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<HraMonthInput, CsvLoadError> {
    if row.month.is_empty() {
        return Err(CsvLoadError::EmptyMonth { row: row_number });
    }

    let is_metro =
        parse_metro_flag(&row.is_metro).ok_or_else(|| CsvLoadError::InvalidMetroFlag {
            value: row.is_metro.clone(),
            row: row_number,
        })?;

    Ok(HraMonthInput {
        month: row.month,
        salary: row.salary,
        hra_received: row.hra_received,
        rent_paid: row.rent_paid,
        is_metro,
    })
}

/// Parse CSV text and return the months in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [CsvLoadError::InvalidMetroFlag] – if any `is_metro` cell is not a
///   recognised flag.
/// * [CsvLoadError::EmptyMonth] – if any `month` cell is blank.
pub fn load_from_str(input: &str) -> Result<Vec<HraMonthInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<HraMonthInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let months = load_from_str(&contents)?;
    tracing::debug!(path = %path.display(), months = months.len(), "loaded HRA months");
    Ok(months)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
