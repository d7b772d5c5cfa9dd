//! Priority Vector - Normalized criterion weights and the eigenvector solver.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::Criterion;

/// L1 change between iterations at which power iteration stops.
pub const POWER_ITERATION_TOLERANCE: f64 = 1e-12;

/// Upper bound on power iterations.
pub const MAX_POWER_ITERATIONS: usize = 10_000;

/// A criterion and its derived weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionWeight {
    pub criterion: Criterion,
    pub weight: f64,
}

/// Normalized weights for each criterion, in matrix order.
///
/// Weights are strictly positive and sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityVector(Vec<CriterionWeight>);

impl PriorityVector {
    pub(crate) fn new(criteria: &[Criterion], weights: &[f64]) -> Self {
        Self(
            criteria
                .iter()
                .zip(weights)
                .map(|(criterion, weight)| CriterionWeight {
                    criterion: criterion.clone(),
                    weight: *weight,
                })
                .collect(),
        )
    }

    /// Returns the weight for a criterion.
    pub fn weight(&self, criterion: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|cw| cw.criterion.as_str() == criterion)
            .map(|cw| cw.weight)
    }

    /// Iterates over the weights in matrix order.
    pub fn iter(&self) -> impl Iterator<Item = &CriterionWeight> {
        self.0.iter()
    }

    /// Returns the number of criteria.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no criteria.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.0.iter().map(|cw| cw.weight).sum()
    }

    /// Weights sorted by descending weight; ties are broken by name.
    pub fn ranked(&self) -> Vec<CriterionWeight> {
        let mut ranked = self.0.clone();
        ranked.sort_by(|x, y| {
            y.weight
                .partial_cmp(&x.weight)
                .unwrap_or(Ordering::Equal)
                .then_with(|| x.criterion.cmp(&y.criterion))
        });
        ranked
    }

    /// The highest weighted criterion.
    pub fn top(&self) -> Option<CriterionWeight> {
        self.ranked().into_iter().next()
    }
}

/// Result of power iteration on a positive reciprocal matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenSolution {
    /// Principal right eigenvector normalized to sum 1.
    pub weights: Vec<f64>,
    /// Mean of (M·w)[i] / w[i].
    pub lambda_max: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the tolerance was reached before the iteration cap.
    pub converged: bool,
}

impl EigenSolution {
    /// Returns true if λ_max and every weight are finite.
    pub fn is_finite(&self) -> bool {
        self.lambda_max.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }
}

/// Computes the principal right eigenvector of a comparison matrix.
///
/// # Algorithm
/// Power iteration from the uniform vector, renormalizing to sum 1 each step.
/// For a connected (Harker-completed) comparison matrix the Perron vector is
/// strictly positive and unique, so iteration converges. λ_max is estimated as
/// the mean of `(M·w)[i] / w[i]`.
///
/// # Edge Cases
/// - 0×0 matrix: empty weights, λ_max = 0
/// - 1×1 matrix: weight 1.0, λ_max = M[0][0]
pub fn principal_eigenvector(matrix: &DMatrix<f64>) -> EigenSolution {
    let n = matrix.nrows();
    if n == 0 {
        return EigenSolution {
            weights: Vec::new(),
            lambda_max: 0.0,
            iterations: 0,
            converged: true,
        };
    }

    let mut w = DVector::from_element(n, 1.0 / n as f64);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < MAX_POWER_ITERATIONS {
        iterations += 1;

        let mut next = matrix * &w;
        let sum = next.sum();
        if !sum.is_finite() || sum <= 0.0 {
            w = DVector::from_element(n, f64::NAN);
            break;
        }
        next /= sum;

        let delta: f64 = next
            .iter()
            .zip(w.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
        w = next;

        if delta <= POWER_ITERATION_TOLERANCE {
            converged = true;
            break;
        }
    }

    let mw = matrix * &w;
    let lambda_max = mw
        .iter()
        .zip(w.iter())
        .map(|(num, den)| num / den)
        .sum::<f64>()
        / n as f64;

    EigenSolution {
        weights: w.iter().copied().collect(),
        lambda_max,
        iterations,
        converged,
    }
}
