//! DatasetSource port for loading one period of KPI data

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::kpi::{KpiDataset, KpiError};

/// Which period to load and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSpec {
    /// Period label, for example "Q1 2025".
    pub label: String,
    /// File path for flat files, table name for Power BI.
    pub location: String,
}

impl PeriodSpec {
    pub fn new(label: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            location: location.into(),
        }
    }
}

/// Errors that can occur while loading a dataset
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataSourceError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error in {location}: {message}")]
    Parse { location: String, message: String },

    #[error("HTTP {status} from data source: {message}")]
    Http { status: u16, message: String },

    #[error("Data source rejected the access token")]
    Authentication,

    #[error("Data source returned no rows for {0}")]
    Empty(String),
}

impl DataSourceError {
    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Wraps a dataset shape error raised while building the table.
    pub fn from_kpi(location: impl Into<String>, err: KpiError) -> Self {
        Self::parse(location, err.to_string())
    }
}

impl From<DataSourceError> for DomainError {
    fn from(err: DataSourceError) -> Self {
        let base = DomainError::new(ErrorCode::DatasetUnavailable, err.to_string());
        match &err {
            DataSourceError::NotFound(path) => base.with_detail("path", path),
            DataSourceError::Parse { location, .. } => base.with_detail("location", location),
            DataSourceError::Http { status, .. } => base.with_detail("status", status.to_string()),
            DataSourceError::Empty(location) => base.with_detail("location", location),
            DataSourceError::Io(_) | DataSourceError::Authentication => base,
        }
    }
}

/// Loads the KPI dataset of one period
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Load a period; the returned dataset carries `period.label`.
    async fn load(&self, period: &PeriodSpec) -> Result<KpiDataset, DataSourceError>;

    /// Short name for logs ("csv", "powerbi").
    fn name(&self) -> &'static str;
}
