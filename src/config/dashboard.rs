//! Dashboard presentation defaults

use serde::Deserialize;

use super::error::ValidationError;

const MAX_HISTOGRAM_BINS: usize = 500;

/// Defaults for the KPI views.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Histogram bins for KPI comparisons
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// KPI selected when none is given; first numeric column otherwise
    pub default_kpi: Option<String>,

    /// Rows profiled per period; all rows when unset
    pub profile_sample_size: Option<usize>,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.histogram_bins == 0 || self.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(ValidationError::InvalidHistogramBins);
        }
        if self.profile_sample_size == Some(0) {
            return Err(ValidationError::InvalidSampleSize);
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            histogram_bins: default_histogram_bins(),
            default_kpi: None,
            profile_sample_size: None,
        }
    }
}

fn default_histogram_bins() -> usize {
    30
}
