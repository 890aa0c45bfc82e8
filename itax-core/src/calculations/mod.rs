//! Tax calculation modules.
//!
//! Every calculator here is a pure function over an explicit configuration
//! value: nothing reads global state, nothing performs I/O.

pub mod common;
pub mod hra;
pub mod regime;
pub mod slab;
pub mod tds;

pub use hra::{calculate_annual_summary, calculate_monthly_exemption};
pub use regime::{IncomeTaxResult, RegimeComparison, compare_regimes, compute_income_tax};
pub use slab::compute_slab_tax;
pub use tds::{TdsReason, TdsResult, resolve_tds};
