//! CompareKpiHandler - Compares one KPI's distribution across two periods.

use crate::application::narration::{prompts, NarrationService, Narrative};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::kpi::{KpiComparison, KpiDataset};

/// Default histogram bin count.
pub const DEFAULT_BINS: usize = 30;

/// Command to compare a KPI.
#[derive(Debug, Clone)]
pub struct CompareKpiCommand {
    pub baseline: KpiDataset,
    pub current: KpiDataset,
    /// KPI column; the first numeric column of the current period when `None`.
    pub kpi: Option<String>,
    pub bins: usize,
    pub narrate: bool,
}

/// Result of a KPI comparison.
#[derive(Debug, Clone)]
pub struct CompareKpiResult {
    pub comparison: KpiComparison,
    pub narrative: Option<Narrative>,
}

/// Handler for KPI comparisons.
pub struct CompareKpiHandler {
    narration: NarrationService,
}

impl CompareKpiHandler {
    pub fn new(narration: NarrationService) -> Self {
        Self { narration }
    }

    pub async fn handle(&self, cmd: CompareKpiCommand) -> Result<CompareKpiResult, DomainError> {
        let kpi = match cmd.kpi {
            Some(kpi) => kpi,
            None => cmd
                .current
                .numeric_column_names()
                .first()
                .map(|name| name.to_string())
                .ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::ValidationFailed,
                        format!("{} data has no numeric columns", cmd.current.period()),
                    )
                    .with_detail("field", "kpi")
                })?,
        };

        let comparison = KpiComparison::compare(&cmd.baseline, &cmd.current, &kpi, cmd.bins)
            .map_err(|err| {
                tracing::warn!(kpi = %kpi, error = %err, "KPI comparison failed");
                DomainError::from(err)
            })?;

        tracing::info!(
            kpi = %kpi,
            mean_delta = comparison.mean_delta,
            bins = comparison.histogram.len(),
            "KPI compared"
        );

        let narrative = if cmd.narrate {
            Some(self.narration.narrate(prompts::kpi_explanation(&comparison)).await)
        } else {
            None
        };

        Ok(CompareKpiResult {
            comparison,
            narrative,
        })
    }
}
