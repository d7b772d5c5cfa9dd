//! SuggestPreprocessingHandler - Asks for cleaning steps given a period's leading rows.

use crate::application::narration::{prompts, NarrationService, Narrative};
use crate::domain::foundation::{DomainError, ValidationError};
use crate::domain::kpi::KpiDataset;

#[derive(Debug, Clone)]
pub struct SuggestPreprocessingCommand {
    pub dataset: KpiDataset,
}

/// Handler for preprocessing suggestions.
pub struct SuggestPreprocessingHandler {
    narration: NarrationService,
}

impl SuggestPreprocessingHandler {
    pub fn new(narration: NarrationService) -> Self {
        Self { narration }
    }

    /// # Errors
    /// `ValidationFailed` when the dataset has no columns.
    pub async fn handle(&self, cmd: SuggestPreprocessingCommand) -> Result<Narrative, DomainError> {
        if cmd.dataset.column_count() == 0 {
            return Err(ValidationError::empty_field("dataset").into());
        }

        tracing::debug!(
            period = %cmd.dataset.period(),
            rows = cmd.dataset.row_count(),
            "Preprocessing suggestions requested"
        );
        Ok(self
            .narration
            .narrate(prompts::preprocessing_suggestions(&cmd.dataset))
            .await)
    }
}
