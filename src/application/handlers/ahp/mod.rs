//! AHP handlers.
//!
//! Handlers that run the AHP engine for the dashboard: the baseline analysis
//! and what-if sweeps against it.

mod analyze_criteria;
mod what_if;

pub use analyze_criteria::{
    baseline_judgments, AnalyzeCriteriaCommand, AnalyzeCriteriaHandler, AnalyzeCriteriaResult,
};
pub use what_if::{
    parse_judgment, WhatIfCommand, WhatIfHandler, WhatIfOutcome, WhatIfResult, WhatIfScenario,
};
