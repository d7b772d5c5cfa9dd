//! KPI Comparison - One KPI's distribution in two periods.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{KpiDataset, KpiError, NumericSummary};

/// One equal-width histogram bin shared by both periods.
///
/// Bins are half-open `[lower, upper)` except the last, which includes `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub baseline: usize,
    pub current: usize,
}

/// Distribution comparison of a KPI between a baseline and a current period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiComparison {
    pub kpi: String,
    pub baseline_period: String,
    pub current_period: String,
    pub baseline: NumericSummary,
    pub current: NumericSummary,
    /// Current mean minus baseline mean.
    pub mean_delta: f64,
    /// Relative change of the mean in percent; None when the baseline mean is 0.
    pub percent_change: Option<f64>,
    pub histogram: Vec<HistogramBin>,
}

impl KpiComparison {
    /// Compares a numeric KPI across two periods.
    ///
    /// # Errors
    /// - `InvalidBins` when `bins` is 0
    /// - `NotFound` / `NotNumeric` naming the period that lacks the KPI
    /// - `NoValues` when a period has no present values for it
    pub fn compare(
        baseline: &KpiDataset,
        current: &KpiDataset,
        kpi: &str,
        bins: usize,
    ) -> Result<Self, KpiError> {
        if bins == 0 {
            return Err(KpiError::InvalidBins { bins });
        }

        let before = baseline.kpi_values(kpi)?;
        let after = current.kpi_values(kpi)?;

        let summarize = |values: &[f64], period: &str| {
            NumericSummary::from_values(values).ok_or_else(|| KpiError::NoValues {
                kpi: kpi.to_string(),
                period: period.to_string(),
            })
        };
        let baseline_summary = summarize(&before, baseline.period())?;
        let current_summary = summarize(&after, current.period())?;

        let mean_delta = current_summary.mean - baseline_summary.mean;
        let percent_change =
            (baseline_summary.mean != 0.0).then(|| mean_delta / baseline_summary.mean.abs() * 100.0);

        let lower = baseline_summary.min.min(current_summary.min);
        let upper = baseline_summary.max.max(current_summary.max);

        Ok(Self {
            kpi: kpi.to_string(),
            baseline_period: baseline.period().to_string(),
            current_period: current.period().to_string(),
            baseline: baseline_summary,
            current: current_summary,
            mean_delta,
            percent_change,
            histogram: histogram(&before, &after, lower, upper, bins),
        })
    }
}

fn histogram(before: &[f64], after: &[f64], lower: f64, upper: f64, bins: usize) -> Vec<HistogramBin> {
    if upper <= lower {
        return vec![HistogramBin {
            lower,
            upper,
            baseline: before.len(),
            current: after.len(),
        }];
    }

    let width = (upper - lower) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lower + width * i as f64,
            upper: if i + 1 == bins {
                upper
            } else {
                lower + width * (i + 1) as f64
            },
            baseline: 0,
            current: 0,
        })
        .collect();

    let slot = |v: f64| (((v - lower) / width).floor() as usize).min(bins - 1);
    for v in before {
        out[slot(*v)].baseline += 1;
    }
    for v in after {
        out[slot(*v)].current += 1;
    }
    out
}

impl fmt::Display for KpiComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "KPI '{}': {} vs {}",
            self.kpi, self.baseline_period, self.current_period
        )?;
        for (period, s) in [
            (&self.baseline_period, &self.baseline),
            (&self.current_period, &self.current),
        ] {
            writeln!(
                f,
                "  {}: n={} mean={:.3} median={:.3} min={:.3} max={:.3}",
                period, s.count, s.mean, s.median, s.min, s.max
            )?;
        }
        match self.percent_change {
            Some(pct) => writeln!(f, "  mean change: {:+.3} ({:+.1}%)", self.mean_delta, pct)?,
            None => writeln!(f, "  mean change: {:+.3}", self.mean_delta)?,
        }
        write!(f, "  histogram (bin: {} / {}):", self.baseline_period, self.current_period)?;
        for bin in &self.histogram {
            write!(
                f,
                "\n    [{:.2}, {:.2}]: {} / {}",
                bin.lower, bin.upper, bin.baseline, bin.current
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kpi::Column;

    fn period(label: &str, values: &[f64]) -> KpiDataset {
        KpiDataset::from_columns(
            label,
            vec![
                Column::numeric("Resolution Time", values.iter().copied().map(Some).collect()),
                Column::text("Region", values.iter().map(|_| Some("N".to_string())).collect()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn mean_delta_and_percent_change() {
        let q4 = period("Q4 2024", &[2.0, 4.0]);
        let q1 = period("Q1 2025", &[3.0, 6.0]);

        let cmp = KpiComparison::compare(&q4, &q1, "Resolution Time", 4).unwrap();

        assert_eq!(cmp.baseline.mean, 3.0);
        assert_eq!(cmp.current.mean, 4.5);
        assert_eq!(cmp.mean_delta, 1.5);
        assert_eq!(cmp.percent_change, Some(50.0));
    }

    #[test]
    fn histogram_edges_are_shared() {
        let q4 = period("Q4 2024", &[0.0, 1.0, 2.0]);
        let q1 = period("Q1 2025", &[3.0, 4.0]);

        let cmp = KpiComparison::compare(&q4, &q1, "Resolution Time", 4).unwrap();

        assert_eq!(cmp.histogram.len(), 4);
        assert_eq!(cmp.histogram[0].lower, 0.0);
        assert_eq!(cmp.histogram[3].upper, 4.0);
        let baseline: usize = cmp.histogram.iter().map(|b| b.baseline).sum();
        let current: usize = cmp.histogram.iter().map(|b| b.current).sum();
        assert_eq!((baseline, current), (3, 2));
        // max value lands in the last bin
        assert_eq!(cmp.histogram[3].current, 2);
    }

    #[test]
    fn degenerate_range_is_one_bin() {
        let q4 = period("Q4 2024", &[5.0, 5.0]);
        let q1 = period("Q1 2025", &[5.0]);

        let cmp = KpiComparison::compare(&q4, &q1, "Resolution Time", 10).unwrap();

        assert_eq!(cmp.histogram.len(), 1);
        assert_eq!(cmp.histogram[0].baseline, 2);
        assert_eq!(cmp.histogram[0].current, 1);
    }

    #[test]
    fn zero_baseline_mean_has_no_percent_change() {
        let q4 = period("Q4 2024", &[0.0, 0.0]);
        let q1 = period("Q1 2025", &[1.0]);

        let cmp = KpiComparison::compare(&q4, &q1, "Resolution Time", 2).unwrap();
        assert_eq!(cmp.percent_change, None);
        assert!(cmp.to_string().contains("mean change: +1.000\n"));
    }

    #[test]
    fn missing_kpi_names_the_period() {
        let q4 = period("Q4 2024", &[1.0]);
        let q1 = KpiDataset::from_columns("Q1 2025", vec![Column::numeric("Cost", vec![Some(1.0)])]).unwrap();

        assert_eq!(
            KpiComparison::compare(&q4, &q1, "Resolution Time", 2),
            Err(KpiError::NotFound {
                kpi: "Resolution Time".to_string(),
                period: "Q1 2025".to_string()
            })
        );
    }

    #[test]
    fn text_kpi_and_zero_bins_are_rejected() {
        let q4 = period("Q4 2024", &[1.0]);

        assert!(matches!(
            KpiComparison::compare(&q4, &q4, "Region", 2),
            Err(KpiError::NotNumeric { .. })
        ));
        assert_eq!(
            KpiComparison::compare(&q4, &q4, "Resolution Time", 0),
            Err(KpiError::InvalidBins { bins: 0 })
        );
    }

    #[test]
    fn all_missing_kpi_has_no_values() {
        let q4 = KpiDataset::from_columns("Q4 2024", vec![Column::numeric("Cost", vec![None])]).unwrap();
        let q1 = KpiDataset::from_columns("Q1 2025", vec![Column::numeric("Cost", vec![Some(2.0)])]).unwrap();

        assert_eq!(
            KpiComparison::compare(&q4, &q1, "Cost", 2),
            Err(KpiError::NoValues {
                kpi: "Cost".to_string(),
                period: "Q4 2024".to_string()
            })
        );
    }
}
