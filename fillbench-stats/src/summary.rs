//! Summary Statistics
//!
//! Describes the per-iteration timings of one strategy. The mean is the plain
//! arithmetic mean of every sample; no outliers are trimmed.

use crate::percentiles::compute_percentile;
use serde::{Deserialize, Serialize};

/// Summary of a set of timing samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Arithmetic mean of all samples
    pub mean: f64,
    /// Median (linear interpolation)
    pub median: f64,
    /// Sample standard deviation (n - 1)
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// 95th percentile
    pub p95: f64,
    /// Number of samples
    pub sample_count: usize,
}

/// Arithmetic mean; 0 for no samples.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Compute summary statistics over all samples
pub fn compute_summary(samples: &[f64]) -> SummaryStatistics {
    if samples.is_empty() {
        return SummaryStatistics {
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            p95: 0.0,
            sample_count: 0,
        };
    }

    let mean = mean(samples);

    let std_dev = if samples.len() < 2 {
        0.0
    } else {
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
        variance.sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SummaryStatistics {
        mean,
        median: compute_percentile(samples, 50.0),
        std_dev,
        min,
        max,
        p95: compute_percentile(samples, 95.0),
        sample_count: samples.len(),
    }
}

impl SummaryStatistics {
    /// Coefficient of variation (relative stddev, percent)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }
}
