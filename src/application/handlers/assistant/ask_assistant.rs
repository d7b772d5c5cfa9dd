//! AskAssistantHandler - Answers a free-form question about the loaded periods.

use crate::application::narration::{prompts, NarrationService, Narrative};
use crate::domain::ahp::AhpReport;
use crate::domain::foundation::{DomainError, ValidationError};

/// Question plus the context shown on the dashboard.
#[derive(Debug, Clone)]
pub struct AskAssistantCommand {
    pub question: String,
    pub baseline_summary: String,
    pub current_summary: String,
    pub report: Option<AhpReport>,
}

/// Handler for assistant questions.
pub struct AskAssistantHandler {
    narration: NarrationService,
}

impl AskAssistantHandler {
    pub fn new(narration: NarrationService) -> Self {
        Self { narration }
    }

    /// Answers the question. Provider failures come back as fallback text.
    ///
    /// # Errors
    /// `ValidationFailed` when the question is blank.
    pub async fn handle(&self, cmd: AskAssistantCommand) -> Result<Narrative, DomainError> {
        let question = cmd.question.trim();
        if question.is_empty() {
            return Err(ValidationError::empty_field("question").into());
        }

        tracing::debug!(with_ahp = cmd.report.is_some(), "Assistant question received");

        let prompt = prompts::assistant_question(
            question,
            &cmd.baseline_summary,
            &cmd.current_summary,
            cmd.report.as_ref(),
        );
        Ok(self.narration.narrate(prompt).await)
    }
}
