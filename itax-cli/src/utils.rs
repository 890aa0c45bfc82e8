use rust_decimal::Decimal;
use thiserror::Error;

use itax_core::calculations::common::round_half_up;

/// Error returned when a command-line amount cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Normalizes input for decimal parsing: trims whitespace, a leading rupee
/// sign, and every comma, so both `12,00,000` and `1,200,000` are accepted.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('₹').unwrap_or(trimmed);
    trimmed.trim().replace(',', "")
}

/// Parses a rupee amount typed on the command line.
///
/// Used as a clap `value_parser`. Sign is not checked here; negative amounts
/// reach the calculators, which reject them with a typed error.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid amount: {}", e);
        ParseAmountError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats an amount with Indian digit grouping and two decimals, e.g.
/// `12,34,567.50`.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((&text, "00"));

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, last_three) = whole.split_at(whole.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), last_three)
    };

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Formats a fractional rate as a percentage, e.g. `0.001` as `0.1%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// Formats an optional [`Decimal`] amount, using "none" when absent.
pub fn opt_amount_display(d: Option<Decimal>) -> String {
    d.map(format_inr).unwrap_or_else(|| "none".to_string())
}
