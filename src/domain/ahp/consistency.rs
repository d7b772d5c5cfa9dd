//! Consistency - Consistency index, Saaty random index, and consistency ratio.

use serde::{Deserialize, Serialize};

/// Standard AHP acceptability threshold for the consistency ratio.
pub const CONSISTENCY_THRESHOLD: f64 = 0.1;

/// Largest matrix dimension covered by the random index table.
///
/// Larger comparison sets are rejected rather than extrapolated.
pub const MAX_DIMENSION: usize = 15;

/// Saaty's random index for n = 1..=15 (index 0 holds n = 1).
pub const RANDOM_INDEX: [f64; MAX_DIMENSION] = [
    0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.48, 1.56, 1.57, 1.59,
];

/// Looks up the random index for a matrix dimension.
///
/// Returns None for n = 0 and for n above [`MAX_DIMENSION`].
pub fn random_index(n: usize) -> Option<f64> {
    if n == 0 {
        return None;
    }
    RANDOM_INDEX.get(n - 1).copied()
}

/// Consistency measures derived from a comparison matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consistency {
    /// Principal eigenvalue estimate.
    pub lambda_max: f64,
    /// CI = (λ_max − n) / (n − 1).
    pub index: f64,
    /// CR = CI / RI.
    pub ratio: f64,
}

impl Consistency {
    /// Computes CI and CR for an n×n matrix with the given λ_max.
    ///
    /// # Edge Cases
    /// - n <= 1: CI = 0, CR = 0
    /// - n = 2: CR = 0 (every 2×2 reciprocal matrix is consistent)
    /// - Rounding can push λ_max a hair below n; CI is clamped at 0
    /// - A non-finite λ_max gives a NaN index and ratio, which is never acceptable
    pub fn compute(lambda_max: f64, n: usize) -> Self {
        let index = if !lambda_max.is_finite() {
            f64::NAN
        } else if n > 1 {
            ((lambda_max - n as f64) / (n as f64 - 1.0)).max(0.0)
        } else {
            0.0
        };

        let ratio = if index.is_nan() {
            f64::NAN
        } else if n < 3 {
            0.0
        } else {
            match random_index(n) {
                Some(ri) if ri > 0.0 => index / ri,
                _ => 0.0,
            }
        };

        Self {
            lambda_max,
            index,
            ratio,
        }
    }

    /// Returns true if the ratio is finite and within the acceptability threshold.
    pub fn is_acceptable(&self) -> bool {
        self.ratio.is_finite() && self.ratio <= CONSISTENCY_THRESHOLD
    }
}
