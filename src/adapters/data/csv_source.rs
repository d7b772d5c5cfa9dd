//! CSV Dataset Source - Loads a period from a flat CSV file.
//!
//! The period's `location` is a file path, resolved against an optional base
//! directory. The first row is the header.

use async_trait::async_trait;
use csv::ReaderBuilder;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::kpi::KpiDataset;
use crate::ports::{DataSourceError, DatasetSource, PeriodSpec};

/// Reads KPI datasets from CSV files.
#[derive(Debug, Clone, Default)]
pub struct CsvDatasetSource {
    base_dir: Option<PathBuf>,
}

impl CsvDatasetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative locations against `dir`.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Parses CSV bytes into a dataset labelled `period`.
pub fn parse_csv(period: &str, location: &str, bytes: &[u8]) -> Result<KpiDataset, DataSourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataSourceError::parse(location, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(DataSourceError::Empty(location.to_string()));
    }

    let records = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(|e| DataSourceError::parse(location, e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    KpiDataset::from_records(period, headers, records).map_err(|e| DataSourceError::from_kpi(location, e))
}

#[async_trait]
impl DatasetSource for CsvDatasetSource {
    async fn load(&self, period: &PeriodSpec) -> Result<KpiDataset, DataSourceError> {
        let path = self.resolve(&period.location);
        let shown = path.display().to_string();

        let bytes = fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DataSourceError::NotFound(shown.clone()),
            _ => DataSourceError::Io(format!("{}: {}", shown, e)),
        })?;

        let dataset = parse_csv(&period.label, &shown, &bytes)?;
        tracing::debug!(
            period = %period.label,
            path = %shown,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Loaded CSV dataset"
        );
        Ok(dataset)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
