//! Comparison Set - The pairwise judgments for one AHP run.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use super::ComparisonFault;

/// Relative tolerance when checking that two explicit reverse judgments are reciprocals.
pub const RECIPROCAL_TOLERANCE: f64 = 1e-9;

/// A named decision factor. Identity is its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criterion(String);

impl Criterion {
    /// Creates a criterion from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the criterion name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the name is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Criterion {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Criterion {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Criterion {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One pairwise judgment: `a` is `intensity` times more important than `b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub a: Criterion,
    pub b: Criterion,
    pub intensity: f64,
}

impl Judgment {
    /// Creates a new judgment.
    pub fn new(a: impl Into<Criterion>, b: impl Into<Criterion>, intensity: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            intensity,
        }
    }

    fn is_pair(&self, a: &str, b: &str) -> bool {
        self.a.as_str() == a && self.b.as_str() == b
    }
}

/// The mapping of ordered criterion pairs to intensities for one analysis run.
///
/// Keys are unique: inserting an ordered pair that is already present replaces
/// its intensity. Structural checks (blank names, self-comparisons,
/// non-positive intensities, contradictory reciprocals) are performed by the
/// engine, so a set can be assembled freely and rejected as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonSet {
    judgments: Vec<Judgment>,
}

impl ComparisonSet {
    /// Creates an empty comparison set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for constructing a comparison set.
    pub fn builder() -> ComparisonSetBuilder {
        ComparisonSetBuilder::new()
    }

    /// The root-cause judgments shipped with the dashboard.
    ///
    /// Case Complexity, Staffing Levels, Process Changes and Technology
    /// Adjustments compared on the 1-9 scale. The set is acceptably consistent.
    pub fn default_root_causes() -> Self {
        Self::builder()
            .compare("Case Complexity", "Staffing Levels", 3.0)
            .compare("Case Complexity", "Process Changes", 5.0)
            .compare("Case Complexity", "Technology Adjustments", 7.0)
            .compare("Staffing Levels", "Process Changes", 3.0)
            .compare("Staffing Levels", "Technology Adjustments", 5.0)
            .compare("Process Changes", "Technology Adjustments", 3.0)
            .build()
    }

    /// The degenerate set naming one criterion: a lone `(c, c) = 1` judgment.
    ///
    /// Its analysis gives the criterion weight 1.0 and CR 0.
    pub fn single(criterion: impl Into<Criterion>) -> Self {
        let criterion = criterion.into();
        Self {
            judgments: vec![Judgment::new(criterion.clone(), criterion, 1.0)],
        }
    }

    /// Returns true for the lone `(c, c) = 1` judgment built by [`single`](Self::single).
    pub fn is_single(&self) -> bool {
        matches!(self.judgments.as_slice(), [j] if j.a == j.b && j.intensity == 1.0)
    }

    /// Inserts a judgment, replacing any existing value for the same ordered pair.
    pub fn insert(&mut self, a: impl Into<Criterion>, b: impl Into<Criterion>, intensity: f64) {
        let judgment = Judgment::new(a, b, intensity);
        match self
            .judgments
            .iter_mut()
            .find(|j| j.is_pair(judgment.a.as_str(), judgment.b.as_str()))
        {
            Some(existing) => existing.intensity = intensity,
            None => self.judgments.push(judgment),
        }
    }

    /// Returns a new, complete set with one judgment replaced.
    ///
    /// Any explicit reverse entry `(b, a)` is dropped so the replacement cannot
    /// contradict it. `self` is left untouched.
    pub fn with_judgment(
        &self,
        a: impl Into<Criterion>,
        b: impl Into<Criterion>,
        intensity: f64,
    ) -> Self {
        let a = a.into();
        let b = b.into();
        let mut next = self.clone();
        next.judgments.retain(|j| !j.is_pair(b.as_str(), a.as_str()));
        next.insert(a, b, intensity);
        next
    }

    /// Returns the explicitly supplied intensity for the ordered pair, if any.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.judgments
            .iter()
            .find(|j| j.is_pair(a, b))
            .map(|j| j.intensity)
    }

    /// Returns the judgments in insertion order.
    pub fn judgments(&self) -> &[Judgment] {
        &self.judgments
    }

    /// Iterates over the judgments.
    pub fn iter(&self) -> impl Iterator<Item = &Judgment> {
        self.judgments.iter()
    }

    /// Returns the number of judgments.
    pub fn len(&self) -> usize {
        self.judgments.len()
    }

    /// Returns true if no judgments were supplied.
    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }

    /// Distinct criteria in order of first appearance.
    pub fn criteria(&self) -> Vec<Criterion> {
        let mut seen: Vec<Criterion> = Vec::new();
        for judgment in &self.judgments {
            for criterion in [&judgment.a, &judgment.b] {
                if !seen.contains(criterion) {
                    seen.push(criterion.clone());
                }
            }
        }
        seen
    }

    /// Checks the structural constraints of the set.
    ///
    /// # Errors
    /// The first fault found, in judgment order: blank names, self-comparisons
    /// and bad intensities are reported before contradictory reciprocals.
    /// A lone `(c, c) = 1` judgment is the single-criterion set and passes.
    pub fn validate(&self) -> Result<(), ComparisonFault> {
        if self.judgments.is_empty() {
            return Err(ComparisonFault::Empty);
        }
        if self.is_single() {
            return if self.judgments[0].a.is_blank() {
                Err(ComparisonFault::BlankCriterion)
            } else {
                Ok(())
            };
        }

        for j in &self.judgments {
            if j.a.is_blank() || j.b.is_blank() {
                return Err(ComparisonFault::BlankCriterion);
            }
            if j.a == j.b {
                return Err(ComparisonFault::SelfComparison {
                    criterion: j.a.clone(),
                });
            }
            if !j.intensity.is_finite() {
                return Err(ComparisonFault::NonFiniteIntensity {
                    a: j.a.clone(),
                    b: j.b.clone(),
                    value: j.intensity,
                });
            }
            if j.intensity <= 0.0 {
                return Err(ComparisonFault::NonPositiveIntensity {
                    a: j.a.clone(),
                    b: j.b.clone(),
                    value: j.intensity,
                });
            }
            if !(1.0 / j.intensity).is_finite() {
                return Err(ComparisonFault::UninvertibleIntensity {
                    a: j.a.clone(),
                    b: j.b.clone(),
                    value: j.intensity,
                });
            }
        }

        for (idx, forward) in self.judgments.iter().enumerate() {
            let reverse = self.judgments[idx + 1..]
                .iter()
                .find(|j| j.is_pair(forward.b.as_str(), forward.a.as_str()));

            if let Some(reverse) = reverse {
                let product = forward.intensity * reverse.intensity;
                if (product - 1.0).abs() > RECIPROCAL_TOLERANCE {
                    return Err(ComparisonFault::ContradictoryReciprocal {
                        a: forward.a.clone(),
                        b: forward.b.clone(),
                        forward: forward.intensity,
                        backward: reverse.intensity,
                    });
                }
            }
        }

        Ok(())
    }
}

impl<A, B> FromIterator<((A, B), f64)> for ComparisonSet
where
    A: Into<Criterion>,
    B: Into<Criterion>,
{
    fn from_iter<I: IntoIterator<Item = ((A, B), f64)>>(iter: I) -> Self {
        let mut set = ComparisonSet::new();
        for ((a, b), intensity) in iter {
            set.insert(a, b, intensity);
        }
        set
    }
}

/// Builder for constructing ComparisonSet instances.
#[derive(Debug, Default)]
pub struct ComparisonSetBuilder {
    set: ComparisonSet,
}

impl ComparisonSetBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a judgment: `a` is `intensity` times more important than `b`.
    pub fn compare(
        mut self,
        a: impl Into<Criterion>,
        b: impl Into<Criterion>,
        intensity: f64,
    ) -> Self {
        self.set.insert(a, b, intensity);
        self
    }

    /// Builds the comparison set.
    pub fn build(self) -> ComparisonSet {
        self.set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_same_ordered_pair() {
        let mut set = ComparisonSet::new();
        set.insert("A", "B", 3.0);
        set.insert("A", "B", 5.0);

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A", "B"), Some(5.0));
    }

    #[test]
    fn get_only_sees_explicit_direction() {
        let set = ComparisonSet::builder().compare("A", "B", 3.0).build();

        assert_eq!(set.get("A", "B"), Some(3.0));
        assert_eq!(set.get("B", "A"), None);
    }

    #[test]
    fn criteria_follow_first_appearance() {
        let set = ComparisonSet::builder()
            .compare("Staffing", "Process", 3.0)
            .compare("Complexity", "Staffing", 3.0)
            .build();

        let names: Vec<_> = set.criteria().iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["Staffing", "Process", "Complexity"]);
    }

    #[test]
    fn with_judgment_leaves_original_untouched() {
        let original = ComparisonSet::default_root_causes();
        let modified = original.with_judgment("Case Complexity", "Process Changes", 2.0);

        assert_eq!(original.get("Case Complexity", "Process Changes"), Some(5.0));
        assert_eq!(modified.get("Case Complexity", "Process Changes"), Some(2.0));
        assert_eq!(modified.len(), original.len());
    }

    #[test]
    fn with_judgment_drops_explicit_reverse_entry() {
        let original = ComparisonSet::builder()
            .compare("A", "B", 3.0)
            .compare("B", "A", 1.0 / 3.0)
            .build();

        let modified = original.with_judgment("A", "B", 7.0);
        assert_eq!(modified.get("B", "A"), None);
        assert!(modified.validate().is_ok());
    }

    #[test]
    fn from_iterator_of_pairs() {
        let set: ComparisonSet = vec![(("A", "B"), 3.0), (("B", "C"), 2.0)]
            .into_iter()
            .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("B", "C"), Some(2.0));
    }

    #[test]
    fn default_root_causes_has_six_judgments() {
        let set = ComparisonSet::default_root_causes();
        assert_eq!(set.len(), 6);
        assert_eq!(set.criteria().len(), 4);
    }

    // Validation Tests

    #[test]
    fn validate_empty_set() {
        assert_eq!(ComparisonSet::new().validate(), Err(ComparisonFault::Empty));
    }

    #[test]
    fn validate_blank_criterion() {
        let set = ComparisonSet::builder().compare("  ", "B", 3.0).build();
        assert_eq!(set.validate(), Err(ComparisonFault::BlankCriterion));
    }

    #[test]
    fn validate_self_comparison() {
        let set = ComparisonSet::builder()
            .compare("A", "B", 2.0)
            .compare("A", "A", 1.0)
            .build();
        assert!(matches!(
            set.validate(),
            Err(ComparisonFault::SelfComparison { .. })
        ));
    }

    #[test]
    fn lone_unit_self_comparison_is_single_criterion() {
        let set = ComparisonSet::builder().compare("A", "A", 1.0).build();

        assert_eq!(set, ComparisonSet::single("A"));
        assert!(set.is_single());
        assert_eq!(set.validate(), Ok(()));
        assert_eq!(set.criteria(), vec![Criterion::new("A")]);
    }

    #[test]
    fn lone_self_comparison_above_one_is_rejected() {
        let set = ComparisonSet::builder().compare("A", "A", 3.0).build();
        assert!(matches!(
            set.validate(),
            Err(ComparisonFault::SelfComparison { .. })
        ));
    }

    #[test]
    fn validate_subnormal_intensity() {
        let set = ComparisonSet::builder().compare("A", "B", 1e-310).build();
        assert!(matches!(
            set.validate(),
            Err(ComparisonFault::UninvertibleIntensity { value, .. }) if value == 1e-310
        ));
    }

    #[test]
    fn validate_zero_intensity() {
        let set = ComparisonSet::builder().compare("A", "B", 0.0).build();
        assert!(matches!(
            set.validate(),
            Err(ComparisonFault::NonPositiveIntensity { .. })
        ));
    }

    #[test]
    fn validate_negative_intensity() {
        let set = ComparisonSet::builder().compare("A", "B", -3.0).build();
        assert!(matches!(
            set.validate(),
            Err(ComparisonFault::NonPositiveIntensity { value, .. }) if value == -3.0
        ));
    }

    #[test]
    fn validate_nan_intensity() {
        let set = ComparisonSet::builder().compare("A", "B", f64::NAN).build();
        assert!(matches!(
            set.validate(),
            Err(ComparisonFault::NonFiniteIntensity { .. })
        ));
    }

    #[test]
    fn validate_accepts_exact_reciprocals() {
        let set = ComparisonSet::builder()
            .compare("A", "B", 3.0)
            .compare("B", "A", 1.0 / 3.0)
            .build();
        assert!(set.validate().is_ok());
    }

    #[test]
    fn validate_rejects_contradictory_reciprocals() {
        let set = ComparisonSet::builder()
            .compare("A", "B", 3.0)
            .compare("B", "A", 3.0)
            .build();

        let fault = set.validate().unwrap_err();
        assert!(matches!(
            fault,
            ComparisonFault::ContradictoryReciprocal { forward, backward, .. }
                if forward == 3.0 && backward == 3.0
        ));
    }

    #[test]
    fn validate_accepts_fractional_intensities() {
        let set = ComparisonSet::builder().compare("A", "B", 0.25).build();
        assert!(set.validate().is_ok());
    }

    #[test]
    fn serializes_as_judgment_list() {
        let set = ComparisonSet::builder().compare("A", "B", 3.0).build();
        let json = serde_json::to_value(&set).unwrap();

        assert_eq!(json[0]["a"], "A");
        assert_eq!(json[0]["b"], "B");
        assert_eq!(json[0]["intensity"], 3.0);
    }
}
