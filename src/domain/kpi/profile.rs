//! Dataset Profile - Descriptive statistics, missing values, and correlations.
//!
//! The profile is what the dashboard shows under "Exploratory Data Analysis"
//! and what the narration prompts use as context.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::KpiDataset;

/// Controls how much of a dataset is profiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOptions {
    /// Profile only the first N rows when set.
    pub sample_size: Option<usize>,
}

/// Summary statistics of one numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; None with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Summarizes a series. Returns None when it is empty.
    ///
    /// Quartiles use linear interpolation between the closest ranks.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count as f64 - 1.0)).sqrt()
        });

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    /// None when every cell is missing.
    pub summary: Option<NumericSummary>,
}

/// Missing cell count of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Pearson correlation between two numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub a: String,
    pub b: String,
    /// None when fewer than two complete pairs exist or a side has no variance.
    pub coefficient: Option<f64>,
}

/// Profile of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub period: String,
    pub rows: usize,
    pub columns: usize,
    pub numeric_columns: usize,
    pub text_columns: usize,
    pub missing_cells: usize,
    pub missing: Vec<MissingCount>,
    pub summaries: Vec<ColumnSummary>,
    pub correlations: Vec<Correlation>,
}

impl DatasetProfile {
    /// Share of missing cells across the profiled table, in [0, 1].
    pub fn missing_ratio(&self) -> f64 {
        let cells = self.rows * self.columns;
        if cells == 0 {
            0.0
        } else {
            self.missing_cells as f64 / cells as f64
        }
    }

    /// Looks up the summary of a numeric column.
    pub fn summary(&self, column: &str) -> Option<&NumericSummary> {
        self.summaries
            .iter()
            .find(|s| s.column == column)
            .and_then(|s| s.summary.as_ref())
    }

    /// The `describe()`-style statistics table only.
    pub fn describe_table(&self) -> String {
        let mut out = String::new();
        for s in &self.summaries {
            match &s.summary {
                Some(n) => out.push_str(&format!(
                    "{}: count={} mean={:.3} std={} min={:.3} 25%={:.3} 50%={:.3} 75%={:.3} max={:.3}\n",
                    s.column,
                    n.count,
                    n.mean,
                    n.std.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "NaN".to_string()),
                    n.min,
                    n.p25,
                    n.median,
                    n.p75,
                    n.max
                )),
                None => out.push_str(&format!("{}: count=0\n", s.column)),
            }
        }
        out
    }
}

/// Profiles a dataset.
pub fn profile(dataset: &KpiDataset, options: &ProfileOptions) -> DatasetProfile {
    let sampled;
    let dataset = match options.sample_size {
        Some(n) if n < dataset.row_count() => {
            sampled = dataset.head(n);
            &sampled
        }
        _ => dataset,
    };

    let missing: Vec<MissingCount> = dataset
        .columns()
        .iter()
        .map(|c| MissingCount {
            column: c.name().to_string(),
            missing: c.missing(),
        })
        .collect();

    let numeric: Vec<_> = dataset.columns().iter().filter(|c| c.is_numeric()).collect();

    let summaries = numeric
        .iter()
        .map(|c| ColumnSummary {
            column: c.name().to_string(),
            summary: NumericSummary::from_values(&c.present_values()),
        })
        .collect();

    let mut correlations = Vec::new();
    for (i, a) in numeric.iter().enumerate() {
        for b in &numeric[i + 1..] {
            if let (Some(x), Some(y)) = (a.as_numeric(), b.as_numeric()) {
                correlations.push(Correlation {
                    a: a.name().to_string(),
                    b: b.name().to_string(),
                    coefficient: pearson(x, y),
                });
            }
        }
    }

    DatasetProfile {
        period: dataset.period().to_string(),
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        numeric_columns: numeric.len(),
        text_columns: dataset.column_count() - numeric.len(),
        missing_cells: missing.iter().map(|m| m.missing).sum(),
        missing,
        summaries,
        correlations,
    }
}

/// Pearson coefficient over rows where both cells are present.
fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        cov += (a - mean_x) * (b - mean_y);
        var_x += (a - mean_x).powi(2);
        var_y += (b - mean_y).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

impl fmt::Display for DatasetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset Overview ({}):", self.period)?;
        writeln!(
            f,
            "  rows={} columns={} numeric={} text={} missing_cells={} ({:.1}%)",
            self.rows,
            self.columns,
            self.numeric_columns,
            self.text_columns,
            self.missing_cells,
            self.missing_ratio() * 100.0
        )?;

        writeln!(f, "Statistics:")?;
        for line in self.describe_table().lines() {
            writeln!(f, "  {}", line)?;
        }

        writeln!(f, "Missing Values:")?;
        for m in self.missing.iter().filter(|m| m.missing > 0) {
            writeln!(f, "  {}: {}", m.column, m.missing)?;
        }

        write!(f, "Correlations:")?;
        for c in &self.correlations {
            match c.coefficient {
                Some(r) => write!(f, "\n  {} ~ {}: {:.3}", c.a, c.b, r)?,
                None => write!(f, "\n  {} ~ {}: n/a", c.a, c.b)?,
            }
        }
        Ok(())
    }
}
