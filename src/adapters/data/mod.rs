//! Dataset Source Adapters.
//!
//! - `CsvDatasetSource` - Flat CSV files on disk
//! - `PowerBiDatasetSource` - Power BI REST API table rows

mod csv_source;
mod powerbi_source;

pub use csv_source::{parse_csv, CsvDatasetSource};
pub use powerbi_source::{PowerBiConfig, PowerBiDatasetSource};
