//! WhatIfHandler - Evaluates labelled replacement comparison sets against a baseline.
//!
//! Each scenario is an independent analysis, so scenarios run in parallel on
//! the blocking pool and are joined afterwards. A failing scenario does not
//! affect the others; its error is reported under its label.

use futures::future::join_all;
use std::sync::Arc;

use crate::application::narration::{prompts, NarrationService, Narrative};
use crate::domain::ahp::{AhpAnalysis, AhpError, ComparisonSet, WhatIfComparison};
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// A named replacement comparison set.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatIfScenario {
    pub label: String,
    pub comparisons: ComparisonSet,
}

impl WhatIfScenario {
    pub fn new(label: impl Into<String>, comparisons: ComparisonSet) -> Self {
        Self {
            label: label.into(),
            comparisons,
        }
    }

    /// Builds a scenario from a change string `"A|B|value"` applied to `baseline`.
    ///
    /// The label is the change string itself.
    pub fn from_change(spec: &str, baseline: &ComparisonSet) -> Result<Self, ValidationError> {
        let (a, b, value) = parse_judgment("what_if", spec)?;
        Ok(Self::new(spec.trim(), baseline.with_judgment(a, b, value)))
    }
}

/// Parses `"A|B|value"` into a judgment. Errors name `field`.
pub fn parse_judgment(
    field: &'static str,
    spec: &str,
) -> Result<(String, String, f64), ValidationError> {
    let parts: Vec<&str> = spec.split('|').map(str::trim).collect();
    let [a, b, value] = parts.as_slice() else {
        return Err(ValidationError::invalid_format(
            field,
            format!("expected A|B|value, got '{}'", spec),
        ));
    };

    if a.is_empty() || b.is_empty() {
        return Err(ValidationError::empty_field(field));
    }

    let value: f64 = value.parse().map_err(|_| {
        ValidationError::invalid_format(field, format!("'{}' is not a number", value))
    })?;

    Ok((a.to_string(), b.to_string(), value))
}

/// Command to evaluate scenarios against a baseline analysis.
#[derive(Debug, Clone)]
pub struct WhatIfCommand {
    pub baseline: Arc<AhpAnalysis>,
    pub scenarios: Vec<WhatIfScenario>,
    pub narrate: bool,
}

/// Outcome of one scenario.
#[derive(Debug, Clone)]
pub struct WhatIfOutcome {
    pub label: String,
    pub result: Result<WhatIfComparison, AhpError>,
    pub narrative: Option<Narrative>,
}

/// Outcomes in scenario order.
#[derive(Debug, Clone)]
pub struct WhatIfResult {
    pub outcomes: Vec<WhatIfOutcome>,
}

impl WhatIfResult {
    /// Number of scenarios that passed validation and the consistency gate.
    pub fn accepted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }
}

/// Handler for what-if sweeps.
pub struct WhatIfHandler {
    narration: NarrationService,
}

impl WhatIfHandler {
    pub fn new(narration: NarrationService) -> Self {
        Self { narration }
    }

    /// Runs every scenario.
    ///
    /// Scenario failures are reported in their outcome; the call itself fails
    /// only when a worker task panics or is cancelled.
    pub async fn handle(&self, cmd: WhatIfCommand) -> Result<WhatIfResult, DomainError> {
        let narrate = cmd.narrate;
        let tasks = cmd.scenarios.into_iter().map(|scenario| {
            let baseline = Arc::clone(&cmd.baseline);
            tokio::task::spawn_blocking(move || {
                let result = baseline.compare_what_if(scenario.comparisons);
                (scenario.label, result)
            })
        });

        let mut evaluated = Vec::new();
        for joined in join_all(tasks).await {
            let (label, result) = joined.map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("what-if task failed: {}", e))
            })?;

            match &result {
                Ok(comparison) => tracing::info!(
                    scenario = %label,
                    consistency_ratio = comparison.scenario_consistency_ratio,
                    "What-if scenario evaluated"
                ),
                Err(err) => tracing::warn!(
                    scenario = %label,
                    consistency_ratio = err.consistency_ratio(),
                    error = %err,
                    "What-if scenario rejected"
                ),
            }
            evaluated.push((label, result));
        }

        let narratives = join_all(evaluated.iter().map(|(label, result)| async move {
            match result {
                Ok(comparison) if narrate => Some(
                    self.narration
                        .narrate(prompts::what_if_explanation(label, comparison))
                        .await,
                ),
                _ => None,
            }
        }))
        .await;

        let outcomes = evaluated
            .into_iter()
            .zip(narratives)
            .map(|((label, result), narrative)| WhatIfOutcome {
                label,
                result,
                narrative,
            })
            .collect();

        Ok(WhatIfResult { outcomes })
    }
}
