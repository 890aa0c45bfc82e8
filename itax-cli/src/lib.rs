pub mod csv_loader;
pub mod report;
pub mod utils;
