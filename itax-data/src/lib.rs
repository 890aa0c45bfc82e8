//! Loading versioned rate tables from CSV.
//!
//! Each financial year is distributed as its own directory of CSV files so
//! that calculations against an older year stay reproducible. The FY 2025-26
//! set ships in `data/fy2025-26`.

mod loader;

pub use loader::{
    REGIMES_FILE, RateTableLoader, RateTableLoaderError, RegimeRecord, SECTIONS_FILE, SLABS_FILE,
    SURCHARGES_FILE, SectionRecord, SlabRecord, SurchargeRecord,
};
