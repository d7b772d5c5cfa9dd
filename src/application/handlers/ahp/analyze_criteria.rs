//! AnalyzeCriteriaHandler - Derives root-cause weights from pairwise judgments.

use crate::application::narration::{prompts, NarrationService, Narrative};
use crate::domain::ahp::{AhpAnalysis, AhpError, AhpReport, ComparisonSet};
use crate::domain::foundation::{DomainError, Timestamp, ValidationError};

use super::what_if::parse_judgment;

/// Builds the baseline comparison set: the shipped root-cause judgments with
/// each `"A|B|value"` override applied in order.
///
/// An override replaces the pair in either direction, so `"B|A|3"` supersedes
/// a shipped `(A, B)` judgment.
pub fn baseline_judgments(overrides: &[String]) -> Result<ComparisonSet, ValidationError> {
    overrides
        .iter()
        .try_fold(ComparisonSet::default_root_causes(), |set, spec| {
            let (a, b, value) = parse_judgment("compare", spec)?;
            Ok(set.with_judgment(a, b, value))
        })
}

/// Command to analyze a comparison set.
#[derive(Debug, Clone)]
pub struct AnalyzeCriteriaCommand {
    pub comparisons: ComparisonSet,
    /// Ask the AI provider to explain the weights.
    pub narrate: bool,
}

/// Result of a successful analysis.
#[derive(Debug, Clone)]
pub struct AnalyzeCriteriaResult {
    pub analysis: AhpAnalysis,
    pub report: AhpReport,
    pub narrative: Option<Narrative>,
    pub analyzed_at: Timestamp,
}

/// Handler for AHP analysis.
pub struct AnalyzeCriteriaHandler {
    narration: NarrationService,
}

impl AnalyzeCriteriaHandler {
    pub fn new(narration: NarrationService) -> Self {
        Self { narration }
    }

    pub async fn handle(&self, cmd: AnalyzeCriteriaCommand) -> Result<AnalyzeCriteriaResult, DomainError> {
        let analysis = match AhpAnalysis::analyze(cmd.comparisons) {
            Ok(analysis) => analysis,
            Err(err) => {
                if let AhpError::ConsistencyError {
                    consistency_ratio, ..
                } = &err
                {
                    tracing::warn!(
                        consistency_ratio = *consistency_ratio,
                        "Pairwise comparisons rejected as inconsistent"
                    );
                } else {
                    tracing::warn!(error = %err, "Pairwise comparisons rejected");
                }
                return Err(err.into());
            }
        };

        let report = analysis.describe();
        tracing::info!(
            criteria = report.dimension,
            consistency_ratio = report.consistency_ratio,
            top = report.top_criterion().map(|cw| cw.criterion.as_str()).unwrap_or_default(),
            "Consistency Ratio (CR): {:.2}",
            report.consistency_ratio
        );

        let narrative = if cmd.narrate {
            Some(self.narration.narrate(prompts::ahp_explanation(&report)).await)
        } else {
            None
        };

        Ok(AnalyzeCriteriaResult {
            analysis,
            report,
            narrative,
            analyzed_at: Timestamp::now(),
        })
    }
}
