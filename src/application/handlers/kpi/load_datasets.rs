//! LoadDatasetsHandler - Loads and profiles the baseline and current periods.

use std::sync::Arc;

use crate::application::narration::{prompts, NarrationService, Narrative};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::kpi::{profile, DatasetProfile, KpiDataset, ProfileOptions};
use crate::ports::{DatasetSource, PeriodSpec};

/// Command to load both periods.
#[derive(Debug, Clone)]
pub struct LoadDatasetsCommand {
    pub baseline: PeriodSpec,
    pub current: PeriodSpec,
    pub profile: ProfileOptions,
    pub narrate: bool,
}

/// One loaded period with its profile and narration.
#[derive(Debug, Clone)]
pub struct PeriodOverview {
    pub dataset: KpiDataset,
    pub profile: DatasetProfile,
    /// Narrated dataset summary.
    pub summary: Option<Narrative>,
}

impl PeriodOverview {
    /// The narrated summary, or the statistics table when there is none.
    pub fn summary_text(&self) -> String {
        match &self.summary {
            Some(narrative) if !narrative.is_fallback => narrative.text.clone(),
            _ => self.profile.describe_table(),
        }
    }
}

/// Both periods, ready for comparison.
#[derive(Debug, Clone)]
pub struct LoadDatasetsResult {
    pub baseline: PeriodOverview,
    pub current: PeriodOverview,
    /// Explanation of the current period's profile.
    pub profile_explanation: Option<Narrative>,
    /// Numeric columns of the current period, the selectable KPIs.
    pub kpis: Vec<String>,
    pub loaded_at: Timestamp,
}

/// Handler for loading datasets.
pub struct LoadDatasetsHandler {
    source: Arc<dyn DatasetSource>,
    narration: NarrationService,
}

impl LoadDatasetsHandler {
    pub fn new(source: Arc<dyn DatasetSource>, narration: NarrationService) -> Self {
        Self { source, narration }
    }

    pub async fn handle(&self, cmd: LoadDatasetsCommand) -> Result<LoadDatasetsResult, DomainError> {
        let (baseline, current) = tokio::try_join!(
            self.source.load(&cmd.baseline),
            self.source.load(&cmd.current)
        )
        .map_err(|err| {
            tracing::warn!(source = self.source.name(), error = %err, "Dataset load failed");
            DomainError::from(err)
        })?;

        tracing::info!(
            source = self.source.name(),
            baseline = %cmd.baseline.label,
            baseline_rows = baseline.row_count(),
            current = %cmd.current.label,
            current_rows = current.row_count(),
            "Datasets loaded"
        );

        let baseline_profile = profile(&baseline, &cmd.profile);
        let current_profile = profile(&current, &cmd.profile);

        let (baseline_summary, current_summary, profile_explanation) = if cmd.narrate {
            let (b, c, e) = tokio::join!(
                self.narration.narrate(prompts::dataset_summary(&baseline_profile)),
                self.narration.narrate(prompts::dataset_summary(&current_profile)),
                self.narration.narrate(prompts::profile_explanation(&current_profile)),
            );
            (Some(b), Some(c), Some(e))
        } else {
            (None, None, None)
        };

        let kpis = current
            .numeric_column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(LoadDatasetsResult {
            baseline: PeriodOverview {
                dataset: baseline,
                profile: baseline_profile,
                summary: baseline_summary,
            },
            current: PeriodOverview {
                dataset: current,
                profile: current_profile,
                summary: current_summary,
            },
            profile_explanation,
            kpis,
            loaded_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::application::narration::NarrationSettings;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::kpi::Column;
    use crate::ports::DataSourceError;
    use async_trait::async_trait;

    struct StaticSource;

    #[async_trait]
    impl DatasetSource for StaticSource {
        async fn load(&self, period: &PeriodSpec) -> Result<KpiDataset, DataSourceError> {
            if period.location == "missing.csv" {
                return Err(DataSourceError::NotFound(period.location.clone()));
            }
            Ok(KpiDataset::from_columns(
                period.label.clone(),
                vec![
                    Column::numeric("Resolution Time", vec![Some(2.0), Some(4.0), None]),
                    Column::text("Region", vec![Some("N".into()), Some("S".into()), None]),
                ],
            )
            .unwrap())
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    fn command(narrate: bool) -> LoadDatasetsCommand {
        LoadDatasetsCommand {
            baseline: PeriodSpec::new("Q4 2024", "q4.csv"),
            current: PeriodSpec::new("Q1 2025", "q1.csv"),
            profile: ProfileOptions::default(),
            narrate,
        }
    }

    #[tokio::test]
    async fn loads_and_profiles_both_periods() {
        let handler = LoadDatasetsHandler::new(Arc::new(StaticSource), NarrationService::disabled());

        let result = handler.handle(command(false)).await.unwrap();

        assert_eq!(result.baseline.dataset.period(), "Q4 2024");
        assert_eq!(result.current.profile.rows, 3);
        assert_eq!(result.current.profile.missing_cells, 2);
        assert_eq!(result.kpis, vec!["Resolution Time".to_string()]);
        assert!(result.profile_explanation.is_none());
        assert!(result.baseline.summary_text().starts_with("Resolution Time: count=2"));
    }

    #[tokio::test]
    async fn narrates_summaries_and_profile() {
        let mock = MockAIProvider::new();
        let handler = LoadDatasetsHandler::new(
            Arc::new(StaticSource),
            NarrationService::new(Arc::new(mock.clone()), NarrationSettings::default()),
        );

        let result = handler.handle(command(true)).await.unwrap();

        assert_eq!(mock.call_count(), 3);
        assert_eq!(result.current.summary_text(), "Mock response");
        assert!(result.profile_explanation.is_some());
        assert!(mock
            .prompts()
            .iter()
            .any(|p| p.starts_with("Explain this dataset's profile in simple terms:")));
    }

    #[tokio::test]
    async fn missing_file_is_dataset_unavailable() {
        let handler = LoadDatasetsHandler::new(Arc::new(StaticSource), NarrationService::disabled());
        let mut cmd = command(false);
        cmd.current = PeriodSpec::new("Q1 2025", "missing.csv");

        let err = handler.handle(cmd).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatasetUnavailable);
        assert_eq!(err.message, "File not found: missing.csv");
    }
}
