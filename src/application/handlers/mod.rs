//! Application handlers.
//!
//! One handler per dashboard operation. Handlers own their collaborators,
//! take a command, and return a result or a `DomainError`.

pub mod ahp;
pub mod assistant;
pub mod kpi;

pub use ahp::{
    baseline_judgments, parse_judgment, AnalyzeCriteriaCommand, AnalyzeCriteriaHandler, AnalyzeCriteriaResult,
    WhatIfCommand, WhatIfHandler, WhatIfOutcome, WhatIfResult, WhatIfScenario,
};
pub use assistant::{AskAssistantCommand, AskAssistantHandler};
pub use kpi::{
    CompareKpiCommand, CompareKpiHandler, CompareKpiResult, LoadDatasetsCommand,
    LoadDatasetsHandler, LoadDatasetsResult, PeriodOverview, SuggestPreprocessingCommand,
    SuggestPreprocessingHandler, DEFAULT_BINS,
};
