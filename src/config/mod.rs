//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `REMOTE_FIX_KPI` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working CSV setup
//! with narration disabled.
//!
//! # Example
//!
//! ```no_run
//! use remote_fix_kpi::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Loading {}", config.data.current_period().location);
//! ```

mod ai;
mod dashboard;
mod data;
mod error;
mod log;

pub use ai::AiConfig;
pub use dashboard::DashboardConfig;
pub use data::{DataConfig, DataSourceKind};
pub use error::{ConfigError, ValidationError};
pub use log::{LogConfig, LogFormat};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Log filter and format
    #[serde(default)]
    pub log: LogConfig,

    /// AI provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Dataset source and periods (CSV / Power BI)
    #[serde(default)]
    pub data: DataConfig,

    /// KPI view defaults
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `REMOTE_FIX_KPI` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `REMOTE_FIX_KPI__AI__OPENAI_API_KEY=sk-...` -> `ai.openai_api_key = ...`
    /// - `REMOTE_FIX_KPI__DATA__SOURCE=powerbi` -> `data.source = powerbi`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REMOTE_FIX_KPI")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.log.validate()?;
        self.ai.validate()?;
        self.data.validate()?;
        self.dashboard.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "REMOTE_FIX_KPI__AI__OPENAI_API_KEY",
        "REMOTE_FIX_KPI__AI__MODEL",
        "REMOTE_FIX_KPI__DATA__SOURCE",
        "REMOTE_FIX_KPI__DATA__POWERBI_DATASET_ID",
        "REMOTE_FIX_KPI__DATA__POWERBI_ACCESS_TOKEN",
        "REMOTE_FIX_KPI__DASHBOARD__HISTOGRAM_BINS",
        "REMOTE_FIX_KPI__LOG__FORMAT",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.data.source, DataSourceKind::Csv);
        assert_eq!(config.dashboard.histogram_bins, 30);
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REMOTE_FIX_KPI__AI__OPENAI_API_KEY", "sk-test");
        env::set_var("REMOTE_FIX_KPI__AI__MODEL", "gpt-4o");
        env::set_var("REMOTE_FIX_KPI__DASHBOARD__HISTOGRAM_BINS", "12");
        env::set_var("REMOTE_FIX_KPI__LOG__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.ai.has_openai());
        assert_eq!(
            config.ai.openai_api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("sk-test")
        );
        assert_eq!(config.ai.model, "gpt-4o");
        assert_eq!(config.dashboard.histogram_bins, 12);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_powerbi_without_credentials_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REMOTE_FIX_KPI__DATA__SOURCE", "powerbi");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.data.source, DataSourceKind::PowerBi);
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("POWERBI_DATASET_ID"))
        );
    }

    #[test]
    fn test_powerbi_with_credentials_is_valid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REMOTE_FIX_KPI__DATA__SOURCE", "powerbi");
        env::set_var("REMOTE_FIX_KPI__DATA__POWERBI_DATASET_ID", "ds-42");
        env::set_var("REMOTE_FIX_KPI__DATA__POWERBI_ACCESS_TOKEN", "token");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.current_period().location, "cases_Q1_current_year");
    }
}
