//! AHP Analysis - The validated, immutable result of one comparison set.

use super::consistency::{Consistency, CONSISTENCY_THRESHOLD};
use super::priority::principal_eigenvector;
use super::{
    AhpError, AhpReport, ComparisonSet, Criterion, PairwiseMatrix, PriorityVector,
    WhatIfComparison,
};

/// A comparison set together with its derived weights and consistency.
///
/// Instances only exist once the set has passed validation and the
/// consistency gate; there are no mutating methods. What-if scenarios build
/// separate analyses.
#[derive(Debug, Clone, PartialEq)]
pub struct AhpAnalysis {
    comparisons: ComparisonSet,
    matrix: PairwiseMatrix,
    priorities: PriorityVector,
    consistency: Consistency,
}

impl AhpAnalysis {
    /// Runs the full analysis on a comparison set.
    ///
    /// # Algorithm
    /// 1. Validate the set and build the reciprocal matrix (see [`PairwiseMatrix`])
    /// 2. Complete missing pairs with Harker's method
    /// 3. Priority vector = principal eigenvector (power iteration)
    /// 4. λ_max, CI and CR from the Saaty random index
    /// 5. Reject when CR > 0.1
    ///
    /// # Errors
    /// `InvalidComparisons`, `DisconnectedCriteria`, `UnsupportedDimension`,
    /// `NumericalFailure` when the weights or λ_max are not finite, or
    /// `ConsistencyError` carrying the computed CR and the rejected set.
    pub fn analyze(comparisons: ComparisonSet) -> Result<Self, AhpError> {
        let matrix = PairwiseMatrix::from_comparisons(&comparisons)?;

        let solution = principal_eigenvector(&matrix.harker_completed());
        if !solution.is_finite() {
            return Err(AhpError::NumericalFailure);
        }
        let consistency = Consistency::compute(solution.lambda_max, matrix.dimension());

        if !consistency.is_acceptable() {
            return Err(AhpError::ConsistencyError {
                consistency_ratio: consistency.ratio,
                threshold: CONSISTENCY_THRESHOLD,
                comparisons,
            });
        }

        let priorities = PriorityVector::new(matrix.criteria(), &solution.weights);

        Ok(Self {
            comparisons,
            matrix,
            priorities,
            consistency,
        })
    }

    /// The comparison set this analysis was derived from.
    pub fn comparisons(&self) -> &ComparisonSet {
        &self.comparisons
    }

    /// Criteria in matrix order.
    pub fn criteria(&self) -> &[Criterion] {
        self.matrix.criteria()
    }

    /// The reciprocal comparison matrix.
    pub fn matrix(&self) -> &PairwiseMatrix {
        &self.matrix
    }

    /// Derived weights.
    pub fn priorities(&self) -> &PriorityVector {
        &self.priorities
    }

    /// Principal eigenvalue estimate.
    pub fn lambda_max(&self) -> f64 {
        self.consistency.lambda_max
    }

    /// Consistency index.
    pub fn consistency_index(&self) -> f64 {
        self.consistency.index
    }

    /// Consistency ratio (always within the threshold).
    pub fn consistency_ratio(&self) -> f64 {
        self.consistency.ratio
    }

    /// Structured summary for display and narration.
    pub fn describe(&self) -> AhpReport {
        AhpReport {
            criteria: self.priorities.ranked(),
            dimension: self.matrix.dimension(),
            complete: self.matrix.is_complete(),
            lambda_max: self.consistency.lambda_max,
            consistency_index: self.consistency.index,
            consistency_ratio: self.consistency.ratio,
            threshold: CONSISTENCY_THRESHOLD,
        }
    }

    /// Derives weights for a full replacement comparison set.
    ///
    /// The replacement is analyzed independently, with the same validation and
    /// consistency gate. `self` is not modified.
    pub fn what_if(&self, modified: ComparisonSet) -> Result<PriorityVector, AhpError> {
        AhpAnalysis::analyze(modified).map(|scenario| scenario.priorities)
    }

    /// Like [`what_if`](Self::what_if), but returns both weightings side by side.
    pub fn compare_what_if(&self, modified: ComparisonSet) -> Result<WhatIfComparison, AhpError> {
        let scenario = AhpAnalysis::analyze(modified)?;
        Ok(WhatIfComparison::between(self, &scenario))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ahp::ComparisonFault;

    #[test]
    fn root_cause_defaults_rank_complexity_first() {
        let analysis = AhpAnalysis::analyze(ComparisonSet::default_root_causes()).unwrap();
        let ranked = analysis.priorities().ranked();

        let names: Vec<_> = ranked.iter().map(|cw| cw.criterion.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Case Complexity",
                "Staffing Levels",
                "Process Changes",
                "Technology Adjustments"
            ]
        );
        assert!(analysis.consistency_ratio() <= 0.1);
        assert!(analysis.consistency_ratio() > 0.0);
    }

    #[test]
    fn root_cause_weights_match_reference_values() {
        let analysis = AhpAnalysis::analyze(ComparisonSet::default_root_causes()).unwrap();
        let p = analysis.priorities();

        // Principal eigenvector of the 3/5/7/3/5/3 matrix.
        assert!((p.weight("Case Complexity").unwrap() - 0.565).abs() < 0.002);
        assert!((p.weight("Staffing Levels").unwrap() - 0.262).abs() < 0.002);
        assert!((p.weight("Process Changes").unwrap() - 0.118).abs() < 0.002);
        assert!((p.weight("Technology Adjustments").unwrap() - 0.055).abs() < 0.002);
        assert!((analysis.consistency_ratio() - 0.0433).abs() < 0.001);
    }

    #[test]
    fn single_criterion_takes_all_weight() {
        let analysis = AhpAnalysis::analyze(ComparisonSet::single("Case Complexity")).unwrap();

        assert_eq!(analysis.priorities().len(), 1);
        assert_eq!(analysis.priorities().weight("Case Complexity"), Some(1.0));
        assert_eq!(analysis.consistency_index(), 0.0);
        assert_eq!(analysis.consistency_ratio(), 0.0);
        assert_eq!(analysis.describe().dimension, 1);
    }

    #[test]
    fn uninvertible_intensity_is_rejected_before_derivation() {
        let set = ComparisonSet::builder()
            .compare("A", "B", 1e-310)
            .compare("B", "C", 1.0)
            .compare("A", "C", 1.0)
            .build();

        match AhpAnalysis::analyze(set) {
            Err(AhpError::InvalidComparisons(ComparisonFault::UninvertibleIntensity {
                value,
                ..
            })) => assert_eq!(value, 1e-310),
            other => panic!("expected UninvertibleIntensity, got {:?}", other),
        }
    }

    #[test]
    fn equal_pair_is_half_and_half() {
        let set = ComparisonSet::builder().compare("A", "B", 1.0).build();
        let analysis = AhpAnalysis::analyze(set).unwrap();

        assert_eq!(analysis.priorities().weight("A"), Some(0.5));
        assert_eq!(analysis.priorities().weight("B"), Some(0.5));
        assert_eq!(analysis.consistency_ratio(), 0.0);
    }

    #[test]
    fn pair_weights_follow_intensity() {
        let set = ComparisonSet::builder().compare("A", "B", 3.0).build();
        let analysis = AhpAnalysis::analyze(set).unwrap();

        assert!((analysis.priorities().weight("A").unwrap() - 0.75).abs() < 1e-9);
        assert!((analysis.priorities().weight("B").unwrap() - 0.25).abs() < 1e-9);
        assert_eq!(analysis.consistency_ratio(), 0.0);
    }

    #[test]
    fn circular_judgments_fail_consistency_gate() {
        let set = ComparisonSet::builder()
            .compare("A", "B", 9.0)
            .compare("B", "C", 9.0)
            .compare("C", "A", 9.0)
            .build();

        match AhpAnalysis::analyze(set.clone()) {
            Err(AhpError::ConsistencyError {
                consistency_ratio,
                threshold,
                comparisons,
            }) => {
                assert!(consistency_ratio > 0.1);
                assert_eq!(threshold, 0.1);
                assert_eq!(comparisons, set);
            }
            other => panic!("expected ConsistencyError, got {:?}", other),
        }
    }

    #[test]
    fn incomplete_connected_set_is_analyzed() {
        // Consistent chain: A = 2B, B = 3C → A : B : C = 6 : 3 : 1
        let set = ComparisonSet::builder()
            .compare("A", "B", 2.0)
            .compare("B", "C", 3.0)
            .build();
        let analysis = AhpAnalysis::analyze(set).unwrap();

        let p = analysis.priorities();
        assert!((p.weight("A").unwrap() - 0.6).abs() < 1e-9);
        assert!((p.weight("B").unwrap() - 0.3).abs() < 1e-9);
        assert!((p.weight("C").unwrap() - 0.1).abs() < 1e-9);
        assert!(analysis.consistency_ratio() < 1e-9);
        assert!(!analysis.describe().complete);
    }

    #[test]
    fn empty_set_is_invalid() {
        assert_eq!(
            AhpAnalysis::analyze(ComparisonSet::new()),
            Err(AhpError::InvalidComparisons(ComparisonFault::Empty))
        );
    }

    #[test]
    fn describe_sorts_by_weight() {
        let analysis = AhpAnalysis::analyze(ComparisonSet::default_root_causes()).unwrap();
        let report = analysis.describe();

        assert_eq!(report.dimension, 4);
        assert!(report.complete);
        assert_eq!(report.consistency_ratio, analysis.consistency_ratio());
        assert!(report
            .criteria
            .windows(2)
            .all(|pair| pair[0].weight >= pair[1].weight));
    }

    #[test]
    fn what_if_leaves_original_untouched() {
        let analysis = AhpAnalysis::analyze(ComparisonSet::default_root_causes()).unwrap();
        let before = analysis.clone();

        let modified = analysis
            .comparisons()
            .with_judgment("Case Complexity", "Process Changes", 7.0);
        let scenario = analysis.what_if(modified).unwrap();

        assert_eq!(analysis, before);
        assert_ne!(&scenario, analysis.priorities());
    }

    #[test]
    fn what_if_applies_consistency_gate() {
        let analysis = AhpAnalysis::analyze(ComparisonSet::default_root_causes()).unwrap();
        let modified = analysis
            .comparisons()
            .with_judgment("Technology Adjustments", "Case Complexity", 9.0);

        assert!(matches!(
            analysis.what_if(modified),
            Err(AhpError::ConsistencyError { .. })
        ));
    }
}
