//! Power BI Dataset Source - Loads a period from a Power BI dataset table.
//!
//! Issues `GET {base_url}/datasets/{dataset_id}/tables/{table}/rows` with a
//! bearer token and reads the `value` array of row objects. The period's
//! `location` is the table name. Requests are not retried.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::domain::kpi::KpiDataset;
use crate::ports::{DataSourceError, DatasetSource, PeriodSpec};

/// Connection settings for the Power BI REST API.
#[derive(Debug, Clone)]
pub struct PowerBiConfig {
    /// API root (default: https://api.powerbi.com/v1.0/myorg).
    pub base_url: String,
    pub dataset_id: String,
    access_token: Secret<String>,
    pub timeout: Duration,
}

impl PowerBiConfig {
    pub fn new(dataset_id: impl Into<String>, access_token: Secret<String>) -> Self {
        Self {
            base_url: "https://api.powerbi.com/v1.0/myorg".to_string(),
            dataset_id: dataset_id.into(),
            access_token,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reads KPI datasets from Power BI tables.
pub struct PowerBiDatasetSource {
    config: PowerBiConfig,
    client: Client,
}

impl PowerBiDatasetSource {
    pub fn new(config: PowerBiConfig) -> Result<Self, DataSourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataSourceError::Io(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn rows_url(&self, table: &str) -> String {
        format!(
            "{}/datasets/{}/tables/{}/rows",
            self.config.base_url.trim_end_matches('/'),
            self.config.dataset_id.trim(),
            table.trim()
        )
    }
}

#[derive(Debug, Deserialize)]
struct RowsResponse {
    #[serde(default)]
    value: Vec<Map<String, Value>>,
}

#[async_trait]
impl DatasetSource for PowerBiDatasetSource {
    async fn load(&self, period: &PeriodSpec) -> Result<KpiDataset, DataSourceError> {
        let url = self.rows_url(&period.location);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.config.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| DataSourceError::Io(e.to_string()))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(DataSourceError::Authentication);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DataSourceError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: RowsResponse = response
            .json()
            .await
            .map_err(|e| DataSourceError::parse(&period.location, e.to_string()))?;

        if body.value.is_empty() {
            return Err(DataSourceError::Empty(period.location.clone()));
        }

        let dataset = KpiDataset::from_json_rows(&period.label, &body.value)
            .map_err(|e| DataSourceError::from_kpi(&period.location, e))?;

        tracing::debug!(
            period = %period.label,
            table = %period.location,
            rows = dataset.row_count(),
            "Loaded Power BI table"
        );
        Ok(dataset)
    }

    fn name(&self) -> &'static str {
        "powerbi"
    }
}
