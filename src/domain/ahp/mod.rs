//! AHP Module - Analytic Hierarchy Process engine.
//!
//! Turns pairwise importance judgments between criteria into normalized
//! weights, and refuses to produce weights when the judgments are too
//! inconsistent to trust.
//!
//! # Components
//!
//! - `ComparisonSet` - The judgments for one run (who beats whom, by how much)
//! - `PairwiseMatrix` - Reciprocal matrix with connectivity and size checks
//! - `principal_eigenvector` - Power iteration, Harker completion for gaps
//! - `Consistency` - λ_max, CI, and CR against the Saaty random index
//! - `AhpAnalysis` - Validated result with `describe` and `what_if`
//!
//! # Design Philosophy
//!
//! Everything here is pure and synchronous. An analysis is immutable once
//! built; what-if scenarios are independent analyses and can run in parallel.

mod analysis;
mod comparison_set;
mod consistency;
mod errors;
mod matrix;
mod priority;
mod report;

pub use analysis::AhpAnalysis;
pub use comparison_set::{
    ComparisonSet, ComparisonSetBuilder, Criterion, Judgment, RECIPROCAL_TOLERANCE,
};
pub use consistency::{
    random_index, Consistency, CONSISTENCY_THRESHOLD, MAX_DIMENSION, RANDOM_INDEX,
};
pub use errors::{AhpError, ComparisonFault};
pub use matrix::PairwiseMatrix;
pub use priority::{
    principal_eigenvector, CriterionWeight, EigenSolution, PriorityVector, MAX_POWER_ITERATIONS,
    POWER_ITERATION_TOLERANCE,
};
pub use report::{AhpReport, WeightShift, WhatIfComparison};
