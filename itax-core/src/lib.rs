//! Indian income tax, TDS/TCS and HRA calculations.
//!
//! Every calculator is a pure function over an explicit rate table: no global
//! state, no I/O, safe to call from any number of threads at once.
//!
//! All amounts are [`rust_decimal::Decimal`]. Callers holding `f64` values,
//! such as a JSON or form front end, convert them at their boundary with
//! [`calculations::common::amount_from_f64`], which rejects NaN, infinities
//! and out-of-range values. The `itax` binary parses decimal text directly and
//! never goes through `f64`.

pub mod calculations;
pub mod error;
pub mod models;
pub mod tables;

pub use error::{ConfigurationError, TaxError};
pub use models::*;
pub use tables::{RateTables, SharedRateTables};
