//! Percentile Computation
//!
//! Linear-interpolated percentiles over raw per-iteration timings.

/// Compute a single percentile from samples
///
/// Uses linear interpolation between nearest ranks.
///
/// # Examples
///
/// ```
/// # use fillbench_stats::compute_percentile;
/// let samples = vec![0.004, 0.005, 0.006];
/// let median = compute_percentile(&samples, 50.0);
/// assert!((median - 0.005).abs() < 1e-12);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let p = percentile / 100.0;

    // Linear interpolation between nearest ranks
    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}
