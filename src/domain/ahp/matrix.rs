//! Pairwise Matrix - Reciprocal comparison matrix built from a comparison set.

use nalgebra::DMatrix;

use super::consistency::MAX_DIMENSION;
use super::{AhpError, ComparisonSet, Criterion};

/// Square reciprocal matrix over the criteria of a comparison set.
///
/// `M[i][i] = 1`, `M[i][j]` is the supplied intensity and `M[j][i]` its
/// reciprocal. Pairs that were never compared (directly or in reverse) hold 0.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrix {
    criteria: Vec<Criterion>,
    values: DMatrix<f64>,
}

impl PairwiseMatrix {
    /// Builds the matrix after checking the comparison set.
    ///
    /// # Errors
    /// - `InvalidComparisons` for any structural fault of the set
    /// - `DisconnectedCriteria` when some criteria cannot be reached from others
    /// - `UnsupportedDimension` when there are more than 15 criteria
    pub fn from_comparisons(comparisons: &ComparisonSet) -> Result<Self, AhpError> {
        comparisons.validate()?;

        let criteria = comparisons.criteria();

        let components = connected_components(&criteria, comparisons);
        if components.len() > 1 {
            return Err(AhpError::DisconnectedCriteria { components });
        }

        if criteria.len() > MAX_DIMENSION {
            return Err(AhpError::UnsupportedDimension {
                dimension: criteria.len(),
                max: MAX_DIMENSION,
            });
        }

        let n = criteria.len();
        let mut values = DMatrix::<f64>::zeros(n, n);
        for i in 0..n {
            values[(i, i)] = 1.0;
        }

        for judgment in comparisons.iter() {
            let i = index_of(&criteria, &judgment.a);
            let j = index_of(&criteria, &judgment.b);
            values[(i, j)] = judgment.intensity;
            values[(j, i)] = 1.0 / judgment.intensity;
        }

        Ok(Self { criteria, values })
    }

    /// Criteria in row/column order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Matrix dimension (number of criteria).
    pub fn dimension(&self) -> usize {
        self.criteria.len()
    }

    /// Raw matrix values; uncompared pairs are 0.
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Returns the entry for (a, b), or None if either criterion is unknown
    /// or the pair was never compared.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.criteria.iter().position(|c| c.as_str() == a)?;
        let j = self.criteria.iter().position(|c| c.as_str() == b)?;
        let value = self.values[(i, j)];
        (value > 0.0).then_some(value)
    }

    /// Number of off-diagonal entries that were never compared.
    pub fn missing_entries(&self) -> usize {
        self.values.iter().filter(|v| **v == 0.0).count()
    }

    /// Returns true if every pair was compared.
    pub fn is_complete(&self) -> bool {
        self.missing_entries() == 0
    }

    /// Returns the matrix with missing entries completed by Harker's method.
    ///
    /// Each missing entry stays 0 and its row's diagonal grows by one, so the
    /// eigenvector of the result equals the one a consistent completion would
    /// give. A complete matrix is returned unchanged.
    pub fn harker_completed(&self) -> DMatrix<f64> {
        let mut completed = self.values.clone();
        let n = self.dimension();
        for i in 0..n {
            let missing = (0..n).filter(|&j| self.values[(i, j)] == 0.0).count();
            completed[(i, i)] += missing as f64;
        }
        completed
    }
}

fn index_of(criteria: &[Criterion], criterion: &Criterion) -> usize {
    // Criteria are derived from the same set, so every name is present.
    criteria
        .iter()
        .position(|c| c == criterion)
        .unwrap_or_default()
}

/// Groups criteria into the connected components of the comparison graph.
///
/// Components are ordered by their earliest criterion; members keep the
/// criteria order.
fn connected_components(criteria: &[Criterion], comparisons: &ComparisonSet) -> Vec<Vec<Criterion>> {
    let n = criteria.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    for judgment in comparisons.iter() {
        let a = find(&mut parent, index_of(criteria, &judgment.a));
        let b = find(&mut parent, index_of(criteria, &judgment.b));
        if a != b {
            parent[a.max(b)] = a.min(b);
        }
    }

    let mut roots: Vec<usize> = Vec::new();
    let mut components: Vec<Vec<Criterion>> = Vec::new();
    for (idx, criterion) in criteria.iter().enumerate() {
        let root = find(&mut parent, idx);
        match roots.iter().position(|r| *r == root) {
            Some(slot) => components[slot].push(criterion.clone()),
            None => {
                roots.push(root);
                components.push(vec![criterion.clone()]);
            }
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ahp::ComparisonFault;

    #[test]
    fn diagonal_is_one() {
        let matrix = PairwiseMatrix::from_comparisons(&ComparisonSet::default_root_causes()).unwrap();
        for c in matrix.criteria() {
            assert_eq!(matrix.get(c.as_str(), c.as_str()), Some(1.0));
        }
    }

    #[test]
    fn reverse_entry_is_reciprocal() {
        let set = ComparisonSet::builder().compare("A", "B", 4.0).build();
        let matrix = PairwiseMatrix::from_comparisons(&set).unwrap();

        assert_eq!(matrix.get("A", "B"), Some(4.0));
        assert_eq!(matrix.get("B", "A"), Some(0.25));
    }

    #[test]
    fn complete_set_has_no_missing_entries() {
        let matrix = PairwiseMatrix::from_comparisons(&ComparisonSet::default_root_causes()).unwrap();
        assert!(matrix.is_complete());
        assert_eq!(matrix.dimension(), 4);
    }

    #[test]
    fn chain_is_connected_but_incomplete() {
        let set = ComparisonSet::builder()
            .compare("A", "B", 2.0)
            .compare("B", "C", 3.0)
            .build();
        let matrix = PairwiseMatrix::from_comparisons(&set).unwrap();

        assert!(!matrix.is_complete());
        assert_eq!(matrix.missing_entries(), 2);
        assert_eq!(matrix.get("A", "C"), None);
    }

    #[test]
    fn harker_completion_bumps_diagonal() {
        let set = ComparisonSet::builder()
            .compare("A", "B", 2.0)
            .compare("B", "C", 3.0)
            .build();
        let matrix = PairwiseMatrix::from_comparisons(&set).unwrap();
        let completed = matrix.harker_completed();

        assert_eq!(completed[(0, 0)], 2.0); // A misses C
        assert_eq!(completed[(1, 1)], 1.0); // B compared with both
        assert_eq!(completed[(2, 2)], 2.0); // C misses A
        assert_eq!(completed[(0, 2)], 0.0);
    }

    #[test]
    fn disconnected_pairs_are_rejected() {
        let set = ComparisonSet::builder()
            .compare("A", "B", 2.0)
            .compare("C", "D", 3.0)
            .build();

        match PairwiseMatrix::from_comparisons(&set) {
            Err(AhpError::DisconnectedCriteria { components }) => {
                assert_eq!(components.len(), 2);
                assert_eq!(components[0], vec![Criterion::new("A"), Criterion::new("B")]);
                assert_eq!(components[1], vec![Criterion::new("C"), Criterion::new("D")]);
            }
            other => panic!("expected DisconnectedCriteria, got {:?}", other),
        }
    }

    #[test]
    fn sixteen_criteria_are_unsupported() {
        let mut set = ComparisonSet::new();
        for i in 1..16 {
            set.insert(format!("C{}", i), format!("C{}", i + 1), 1.0);
        }

        assert_eq!(
            PairwiseMatrix::from_comparisons(&set),
            Err(AhpError::UnsupportedDimension {
                dimension: 16,
                max: MAX_DIMENSION
            })
        );
    }

    #[test]
    fn invalid_set_fails_before_derivation() {
        let set = ComparisonSet::builder().compare("A", "B", 0.0).build();
        assert!(matches!(
            PairwiseMatrix::from_comparisons(&set),
            Err(AhpError::InvalidComparisons(ComparisonFault::NonPositiveIntensity { .. }))
        ));
    }
}
