//! Report - Structured summaries handed to display and narration.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AhpAnalysis, Criterion, CriterionWeight, PriorityVector};

/// Language-neutral summary of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhpReport {
    /// Criteria sorted by descending weight.
    pub criteria: Vec<CriterionWeight>,
    /// Number of criteria.
    pub dimension: usize,
    /// Whether every pair was compared explicitly.
    pub complete: bool,
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub consistency_ratio: f64,
    /// Acceptability threshold the ratio was checked against.
    pub threshold: f64,
}

impl AhpReport {
    /// The highest weighted criterion.
    pub fn top_criterion(&self) -> Option<&CriterionWeight> {
        self.criteria.first()
    }
}

impl fmt::Display for AhpReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .criteria
            .iter()
            .map(|cw| cw.criterion.as_str().len())
            .max()
            .unwrap_or(0);

        writeln!(f, "Criteria weights (n = {}):", self.dimension)?;
        for (rank, cw) in self.criteria.iter().enumerate() {
            writeln!(
                f,
                "  {}. {:<width$}  {:.3}",
                rank + 1,
                cw.criterion.as_str(),
                cw.weight,
                width = width
            )?;
        }
        if !self.complete {
            writeln!(f, "Missing comparisons completed with Harker's method.")?;
        }
        write!(
            f,
            "Consistency Ratio (CR): {:.3} (threshold {}, lambda_max {:.3}, CI {:.3})",
            self.consistency_ratio, self.threshold, self.lambda_max, self.consistency_index
        )
    }
}

/// Change in one criterion's weight between two analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightShift {
    pub criterion: Criterion,
    /// Weight in the baseline analysis; None if the criterion is new.
    pub baseline: Option<f64>,
    /// Weight in the scenario; None if the criterion was dropped.
    pub scenario: Option<f64>,
}

impl WeightShift {
    /// Scenario minus baseline, when the criterion is on both sides.
    pub fn delta(&self) -> Option<f64> {
        Some(self.scenario? - self.baseline?)
    }
}

/// Baseline and what-if weights side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfComparison {
    pub baseline: PriorityVector,
    pub scenario: PriorityVector,
    pub baseline_consistency_ratio: f64,
    pub scenario_consistency_ratio: f64,
    /// One entry per criterion: baseline order first, then criteria only in the scenario.
    pub shifts: Vec<WeightShift>,
}

impl WhatIfComparison {
    /// Builds the comparison from two independent analyses.
    pub fn between(baseline: &AhpAnalysis, scenario: &AhpAnalysis) -> Self {
        let base = baseline.priorities();
        let next = scenario.priorities();

        let mut shifts: Vec<WeightShift> = base
            .iter()
            .map(|cw| WeightShift {
                criterion: cw.criterion.clone(),
                baseline: Some(cw.weight),
                scenario: next.weight(cw.criterion.as_str()),
            })
            .collect();

        shifts.extend(
            next.iter()
                .filter(|cw| base.weight(cw.criterion.as_str()).is_none())
                .map(|cw| WeightShift {
                    criterion: cw.criterion.clone(),
                    baseline: None,
                    scenario: Some(cw.weight),
                }),
        );

        Self {
            baseline: base.clone(),
            scenario: next.clone(),
            baseline_consistency_ratio: baseline.consistency_ratio(),
            scenario_consistency_ratio: scenario.consistency_ratio(),
            shifts,
        }
    }

    /// The shift with the largest absolute delta.
    pub fn largest_shift(&self) -> Option<&WeightShift> {
        self.shifts
            .iter()
            .filter_map(|shift| shift.delta().map(|d| (shift, d.abs())))
            .max_by(|(_, x), (_, y)| x.total_cmp(y))
            .map(|(shift, _)| shift)
    }

    /// Returns true if the scenario changes which criterion ranks first.
    pub fn changes_top_criterion(&self) -> bool {
        let before = self.baseline.top().map(|cw| cw.criterion);
        let after = self.scenario.top().map(|cw| cw.criterion);
        before != after
    }
}

impl fmt::Display for WhatIfComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn cell(value: Option<f64>) -> String {
            value.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string())
        }

        writeln!(f, "Criterion weights (baseline -> scenario):")?;
        for shift in &self.shifts {
            let delta = shift
                .delta()
                .map(|d| format!("{:+.3}", d))
                .unwrap_or_else(|| "n/a".to_string());
            writeln!(
                f,
                "  {}: {} -> {} ({})",
                shift.criterion,
                cell(shift.baseline),
                cell(shift.scenario),
                delta
            )?;
        }
        write!(
            f,
            "CR: {:.3} -> {:.3}",
            self.baseline_consistency_ratio, self.scenario_consistency_ratio
        )
    }
}
