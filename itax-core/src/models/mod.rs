mod hra;
mod regime;
mod slab;
mod tds_section;

pub use hra::{HraAnnualSummary, HraMonthInput, HraMonthResult};
pub use regime::{RegimeConfig, RegimeName, SurchargeBand, SurchargeSchedule};
pub use slab::{SlabBracket, SlabSchedule};
pub use tds_section::{SectionCategory, TdsSection};
