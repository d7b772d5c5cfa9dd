//! AHP engine errors.

use thiserror::Error;

use super::{ComparisonSet, Criterion};
use crate::domain::foundation::{DomainError, ErrorCode};

/// A structural fault in a comparison set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComparisonFault {
    #[error("comparison set is empty")]
    Empty,

    #[error("criterion names cannot be blank")]
    BlankCriterion,

    #[error("criterion '{criterion}' cannot be compared with itself")]
    SelfComparison { criterion: Criterion },

    #[error("intensity for ({a}, {b}) must be strictly positive, got {value}")]
    NonPositiveIntensity {
        a: Criterion,
        b: Criterion,
        value: f64,
    },

    #[error("intensity for ({a}, {b}) must be finite, got {value}")]
    NonFiniteIntensity {
        a: Criterion,
        b: Criterion,
        value: f64,
    },

    #[error("intensity for ({a}, {b}) has no finite reciprocal, got {value}")]
    UninvertibleIntensity {
        a: Criterion,
        b: Criterion,
        value: f64,
    },

    #[error("({a}, {b}) = {forward} contradicts ({b}, {a}) = {backward}; reverse judgments must be exact reciprocals")]
    ContradictoryReciprocal {
        a: Criterion,
        b: Criterion,
        forward: f64,
        backward: f64,
    },
}

impl ComparisonFault {
    /// The ordered pair responsible for the fault, when there is one.
    pub fn offending_pair(&self) -> Option<(&Criterion, &Criterion)> {
        match self {
            ComparisonFault::Empty | ComparisonFault::BlankCriterion => None,
            ComparisonFault::SelfComparison { criterion } => Some((criterion, criterion)),
            ComparisonFault::NonPositiveIntensity { a, b, .. }
            | ComparisonFault::NonFiniteIntensity { a, b, .. }
            | ComparisonFault::UninvertibleIntensity { a, b, .. }
            | ComparisonFault::ContradictoryReciprocal { a, b, .. } => Some((a, b)),
        }
    }
}

/// Errors returned by the AHP engine.
///
/// Every variant is a judgment-quality failure: nothing is retried and no
/// partial analysis is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AhpError {
    #[error("invalid comparisons: {0}")]
    InvalidComparisons(#[from] ComparisonFault),

    #[error("criteria are not all connected by comparisons: {}", join_components(.components))]
    DisconnectedCriteria { components: Vec<Vec<Criterion>> },

    #[error("{dimension} criteria exceeds the supported maximum of {max}")]
    UnsupportedDimension { dimension: usize, max: usize },

    #[error("weights could not be derived: power iteration produced non-finite values")]
    NumericalFailure,

    #[error("Consistency Ratio (CR): {consistency_ratio:.2} exceeds {threshold}. Please revise your pairwise comparisons to improve consistency.")]
    ConsistencyError {
        consistency_ratio: f64,
        threshold: f64,
        comparisons: ComparisonSet,
    },
}

impl AhpError {
    /// Returns the error code used at the application boundary.
    pub fn code(&self) -> ErrorCode {
        match self {
            AhpError::InvalidComparisons(_) => ErrorCode::InvalidComparisons,
            AhpError::DisconnectedCriteria { .. } => ErrorCode::DisconnectedCriteria,
            AhpError::UnsupportedDimension { .. } => ErrorCode::UnsupportedDimension,
            AhpError::NumericalFailure => ErrorCode::InvalidComparisons,
            AhpError::ConsistencyError { .. } => ErrorCode::InconsistentJudgments,
        }
    }

    /// Returns the consistency ratio carried by a `ConsistencyError`.
    pub fn consistency_ratio(&self) -> Option<f64> {
        match self {
            AhpError::ConsistencyError {
                consistency_ratio, ..
            } => Some(*consistency_ratio),
            _ => None,
        }
    }
}

fn join_components(components: &[Vec<Criterion>]) -> String {
    components
        .iter()
        .map(|group| {
            let names: Vec<&str> = group.iter().map(Criterion::as_str).collect();
            format!("{{{}}}", names.join(", "))
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

impl From<AhpError> for DomainError {
    fn from(err: AhpError) -> Self {
        let base = DomainError::new(err.code(), err.to_string());
        match &err {
            AhpError::InvalidComparisons(fault) => match fault.offending_pair() {
                Some((a, b)) => base
                    .with_detail("criterion_a", a.as_str())
                    .with_detail("criterion_b", b.as_str()),
                None => base,
            },
            AhpError::DisconnectedCriteria { components } => {
                base.with_detail("components", components.len().to_string())
            }
            AhpError::UnsupportedDimension { dimension, max } => base
                .with_detail("dimension", dimension.to_string())
                .with_detail("max", max.to_string()),
            AhpError::NumericalFailure => base,
            AhpError::ConsistencyError {
                consistency_ratio,
                threshold,
                ..
            } => base
                .with_detail("consistency_ratio", format!("{:.3}", consistency_ratio))
                .with_detail("threshold", threshold.to_string()),
        }
    }
}
