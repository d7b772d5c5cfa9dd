//! Dataset source configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::ports::PeriodSpec;

/// Where period datasets come from
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Source backend
    #[serde(default)]
    pub source: DataSourceKind,

    /// Directory CSV paths are resolved against
    pub base_dir: Option<String>,

    /// Baseline period label
    #[serde(default = "default_baseline_label")]
    pub baseline_label: String,

    /// Baseline CSV path
    #[serde(default = "default_baseline_csv")]
    pub baseline_csv: String,

    /// Baseline Power BI table
    #[serde(default = "default_baseline_table")]
    pub baseline_table: String,

    /// Current period label
    #[serde(default = "default_current_label")]
    pub current_label: String,

    /// Current CSV path
    #[serde(default = "default_current_csv")]
    pub current_csv: String,

    /// Current Power BI table
    #[serde(default = "default_current_table")]
    pub current_table: String,

    /// Power BI API root
    #[serde(default = "default_powerbi_base_url")]
    pub powerbi_base_url: String,

    /// Power BI dataset id
    pub powerbi_dataset_id: Option<String>,

    /// Power BI bearer token
    pub powerbi_access_token: Option<Secret<String>>,

    /// Request timeout in seconds for remote sources
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Dataset backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Csv,
    PowerBi,
}

impl DataConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Baseline period for the configured source.
    pub fn baseline_period(&self) -> PeriodSpec {
        let location = match self.source {
            DataSourceKind::Csv => &self.baseline_csv,
            DataSourceKind::PowerBi => &self.baseline_table,
        };
        PeriodSpec::new(&self.baseline_label, location)
    }

    /// Current period for the configured source.
    pub fn current_period(&self) -> PeriodSpec {
        let location = match self.source {
            DataSourceKind::Csv => &self.current_csv,
            DataSourceKind::PowerBi => &self.current_table,
        };
        PeriodSpec::new(&self.current_label, location)
    }

    /// Validate data configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("data"));
        }
        if self.baseline_period().location.trim().is_empty() {
            return Err(ValidationError::EmptyPeriodLocation("baseline"));
        }
        if self.current_period().location.trim().is_empty() {
            return Err(ValidationError::EmptyPeriodLocation("current"));
        }

        if self.source == DataSourceKind::PowerBi {
            if self
                .powerbi_dataset_id
                .as_ref()
                .map_or(true, |id| id.trim().is_empty())
            {
                return Err(ValidationError::MissingRequired("POWERBI_DATASET_ID"));
            }
            if self
                .powerbi_access_token
                .as_ref()
                .map_or(true, |t| t.expose_secret().trim().is_empty())
            {
                return Err(ValidationError::MissingRequired("POWERBI_ACCESS_TOKEN"));
            }
        }

        Ok(())
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSourceKind::default(),
            base_dir: None,
            baseline_label: default_baseline_label(),
            baseline_csv: default_baseline_csv(),
            baseline_table: default_baseline_table(),
            current_label: default_current_label(),
            current_csv: default_current_csv(),
            current_table: default_current_table(),
            powerbi_base_url: default_powerbi_base_url(),
            powerbi_dataset_id: None,
            powerbi_access_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_baseline_label() -> String {
    "Q4 2024".to_string()
}

fn default_baseline_csv() -> String {
    "data/Q4 2024.csv".to_string()
}

fn default_baseline_table() -> String {
    "cases_Q4_2024".to_string()
}

fn default_current_label() -> String {
    "Q1 2025".to_string()
}

fn default_current_csv() -> String {
    "data/Q1 2025.csv".to_string()
}

fn default_current_table() -> String {
    "cases_Q1_current_year".to_string()
}

fn default_powerbi_base_url() -> String {
    "https://api.powerbi.com/v1.0/myorg".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_periods_by_default() {
        let config = DataConfig::default();
        assert_eq!(config.source, DataSourceKind::Csv);
        assert_eq!(config.baseline_period(), PeriodSpec::new("Q4 2024", "data/Q4 2024.csv"));
        assert_eq!(config.current_period(), PeriodSpec::new("Q1 2025", "data/Q1 2025.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_powerbi_periods_use_tables() {
        let config = DataConfig {
            source: DataSourceKind::PowerBi,
            ..Default::default()
        };
        assert_eq!(config.current_period().location, "cases_Q1_current_year");
        assert_eq!(config.baseline_period().location, "cases_Q4_2024");
    }

    #[test]
    fn test_powerbi_requires_dataset_and_token() {
        let mut config = DataConfig {
            source: DataSourceKind::PowerBi,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("POWERBI_DATASET_ID"))
        );

        config.powerbi_dataset_id = Some("ds-1".to_string());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("POWERBI_ACCESS_TOKEN"))
        );

        config.powerbi_access_token = Some(Secret::new("token".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = DataConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout("data")));
    }
}
