//! KPI handlers - dataset loading, per-KPI comparison and preprocessing suggestions.

mod compare_kpi;
mod load_datasets;
mod suggest_preprocessing;

pub use compare_kpi::{CompareKpiCommand, CompareKpiHandler, CompareKpiResult, DEFAULT_BINS};
pub use load_datasets::{
    LoadDatasetsCommand, LoadDatasetsHandler, LoadDatasetsResult, PeriodOverview,
};
pub use suggest_preprocessing::{SuggestPreprocessingCommand, SuggestPreprocessingHandler};
