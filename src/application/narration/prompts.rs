//! Prompt builders, one per narrated artifact.

use crate::domain::ahp::{AhpReport, WhatIfComparison};
use crate::domain::kpi::{DatasetProfile, KpiComparison, KpiDataset};

/// Rows shown to the provider when asking for preprocessing suggestions.
pub const PREVIEW_ROWS: usize = 5;

/// Which artifact a narration explains. Used as request metadata and log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NarrationKind {
    DatasetSummary,
    ProfileExplanation,
    PreprocessingSuggestions,
    KpiExplanation,
    AhpExplanation,
    WhatIfExplanation,
    AssistantAnswer,
}

impl NarrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NarrationKind::DatasetSummary => "dataset_summary",
            NarrationKind::ProfileExplanation => "profile_explanation",
            NarrationKind::PreprocessingSuggestions => "preprocessing_suggestions",
            NarrationKind::KpiExplanation => "kpi_explanation",
            NarrationKind::AhpExplanation => "ahp_explanation",
            NarrationKind::WhatIfExplanation => "what_if_explanation",
            NarrationKind::AssistantAnswer => "assistant_answer",
        }
    }
}

/// A prompt ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: NarrationKind,
    pub text: String,
}

pub fn dataset_summary(profile: &DatasetProfile) -> Prompt {
    Prompt {
        kind: NarrationKind::DatasetSummary,
        text: format!(
            "Summarize this dataset ({}, {} rows):\n{}",
            profile.period,
            profile.rows,
            profile.describe_table()
        ),
    }
}

pub fn profile_explanation(profile: &DatasetProfile) -> Prompt {
    Prompt {
        kind: NarrationKind::ProfileExplanation,
        text: format!(
            "Explain this dataset's profile in simple terms:\n{}\n\
             Highlight any key insights, such as missing values, correlations, or unusual patterns.",
            profile
        ),
    }
}

pub fn preprocessing_suggestions(dataset: &KpiDataset) -> Prompt {
    Prompt {
        kind: NarrationKind::PreprocessingSuggestions,
        text: format!(
            "Suggest preprocessing steps for this dataset ({}):\n{}",
            dataset.period(),
            dataset.preview(PREVIEW_ROWS)
        ),
    }
}

pub fn kpi_explanation(comparison: &KpiComparison) -> Prompt {
    Prompt {
        kind: NarrationKind::KpiExplanation,
        text: format!(
            "Explain how the distribution of '{}' changed between {} and {}:\n{}\n\
             Point out shifts in the center and spread, and anything an operations manager should act on.",
            comparison.kpi, comparison.baseline_period, comparison.current_period, comparison
        ),
    }
}

pub fn ahp_explanation(report: &AhpReport) -> Prompt {
    Prompt {
        kind: NarrationKind::AhpExplanation,
        text: format!(
            "Explain the following Analytic Hierarchy Process (AHP) criteria weights:\n{}\n\
             Provide clear reasoning and highlight any key insights.",
            report
        ),
    }
}

pub fn what_if_explanation(label: &str, comparison: &WhatIfComparison) -> Prompt {
    Prompt {
        kind: NarrationKind::WhatIfExplanation,
        text: format!(
            "A what-if scenario ({}) changed the AHP pairwise comparisons:\n{}\n\
             Explain what the new priorities mean compared to the baseline.",
            label, comparison
        ),
    }
}

/// Free-text question answered with the dashboard's current context.
pub fn assistant_question(
    question: &str,
    baseline_summary: &str,
    current_summary: &str,
    report: Option<&AhpReport>,
) -> Prompt {
    let ahp = report
        .map(|r| r.to_string())
        .unwrap_or_else(|| "not available".to_string());

    Prompt {
        kind: NarrationKind::AssistantAnswer,
        text: format!(
            "Context:\nBaseline Summary: {}\nCurrent Summary: {}\nAHP Report: {}\n\nQuestion: {}",
            baseline_summary, current_summary, ahp, question
        ),
    }
}
