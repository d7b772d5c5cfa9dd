//! KPI Module - Quarterly case-management data and its analysis.
//!
//! # Components
//!
//! - `KpiDataset` - Column-oriented table for one period (CSV or Power BI rows)
//! - `profile` - Descriptive statistics, missing values, correlations
//! - `KpiComparison` - A KPI's distribution in two periods with a shared histogram
//!
//! Like the AHP engine, everything here is pure. Loading the data is the job
//! of a `DatasetSource` adapter.

mod comparison;
mod dataset;
mod errors;
mod profile;

pub use comparison::{HistogramBin, KpiComparison};
pub use dataset::{Column, ColumnValues, KpiDataset};
pub use errors::KpiError;
pub use profile::{
    profile, ColumnSummary, Correlation, DatasetProfile, MissingCount, NumericSummary,
    ProfileOptions,
};
