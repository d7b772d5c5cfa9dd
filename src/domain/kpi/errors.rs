//! KPI data errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised while building, profiling, or comparing KPI datasets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KpiError {
    #[error("KPI '{kpi}' not found in {period} data.")]
    NotFound { kpi: String, period: String },

    #[error("KPI '{kpi}' is not numeric in {period} data.")]
    NotNumeric { kpi: String, period: String },

    #[error("KPI '{kpi}' has no values in {period} data.")]
    NoValues { kpi: String, period: String },

    #[error("histogram needs at least one bin, got {bins}")]
    InvalidBins { bins: usize },

    #[error("row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' appears more than once")]
    DuplicateColumn { column: String },
}

impl KpiError {
    /// Returns the error code used at the application boundary.
    pub fn code(&self) -> ErrorCode {
        match self {
            KpiError::NotFound { .. } => ErrorCode::KpiNotFound,
            KpiError::NotNumeric { .. } | KpiError::NoValues { .. } => ErrorCode::KpiNotNumeric,
            KpiError::InvalidBins { .. } => ErrorCode::ValidationFailed,
            KpiError::RaggedRow { .. } | KpiError::DuplicateColumn { .. } => {
                ErrorCode::DatasetUnavailable
            }
        }
    }
}

impl From<KpiError> for DomainError {
    fn from(err: KpiError) -> Self {
        let base = DomainError::new(err.code(), err.to_string());
        match &err {
            KpiError::NotFound { kpi, period }
            | KpiError::NotNumeric { kpi, period }
            | KpiError::NoValues { kpi, period } => {
                base.with_detail("kpi", kpi).with_detail("period", period)
            }
            KpiError::InvalidBins { bins } => base.with_detail("bins", bins.to_string()),
            KpiError::RaggedRow { row, .. } => base.with_detail("row", row.to_string()),
            KpiError::DuplicateColumn { column } => base.with_detail("column", column),
        }
    }
}
