//! Report Data Structures

use chrono::{DateTime, Utc};
use fillbench_core::VerifyMode;
use fillbench_stats::SummaryStatistics;
use serde::{Deserialize, Serialize};

/// Complete benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// One entry per strategy, in run order
    pub results: Vec<StrategyReport>,
    /// Status tally
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// FillBench version that produced the report
    pub version: String,
    /// When the run started
    pub timestamp: DateTime<Utc>,
    /// Machine the run happened on
    pub system: SystemInfo,
    /// Run configuration
    pub config: ReportConfig,
}

/// Run configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Elements per buffer
    pub array_size: usize,
    /// Timed iterations per strategy
    pub iterations: u32,
    /// Worker count for the rayon strategies
    pub workers: usize,
    /// OS thread count for the thread-per-core strategies
    pub threads: usize,
    /// Verification mode
    pub verify: VerifyMode,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// CPU model name
    pub cpu: String,
    /// Hardware concurrency
    pub processors: usize,
    /// Total memory in GiB
    pub memory_gb: f64,
}

/// Result of one strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Strategy label
    pub label: String,
    /// How the strategy ended
    pub status: StrategyStatus,
    /// Timing metrics, present when completed
    pub metrics: Option<StrategyMetrics>,
    /// Reason for an unavailable or failed strategy
    pub message: Option<String>,
}

/// Outcome of one strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyStatus {
    /// Every iteration filled and verified
    Completed,
    /// Cannot run on this machine; not timed
    Unavailable,
    /// Halted the run
    Failed,
}

/// Timing metrics for a completed strategy, all in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyMetrics {
    /// Timed iterations
    pub iterations: usize,
    /// Accumulated time over the iteration count
    pub mean_secs: f64,
    /// Median iteration time
    pub median_secs: f64,
    /// Sample standard deviation
    pub std_dev_secs: f64,
    /// Fastest iteration
    pub min_secs: f64,
    /// Slowest iteration
    pub max_secs: f64,
    /// 95th percentile
    pub p95_secs: f64,
    /// Mean reference cycles per iteration (0 without a cycle counter)
    pub mean_cycles: f64,
    /// Elements written per second at the mean time
    pub elements_per_sec: f64,
}

impl StrategyMetrics {
    /// Build metrics from timing statistics; `array_size` drives throughput.
    pub fn new(stats: &SummaryStatistics, mean_cycles: f64, array_size: usize) -> Self {
        let elements_per_sec = if stats.mean > 0.0 {
            array_size as f64 / stats.mean
        } else {
            0.0
        };
        Self {
            iterations: stats.sample_count,
            mean_secs: stats.mean,
            median_secs: stats.median,
            std_dev_secs: stats.std_dev,
            min_secs: stats.min,
            max_secs: stats.max,
            p95_secs: stats.p95,
            mean_cycles,
            elements_per_sec,
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Strategies in the report
    pub total_strategies: usize,
    /// Strategies that completed
    pub completed: usize,
    /// Strategies skipped as unavailable
    pub unavailable: usize,
    /// Strategies that failed
    pub failed: usize,
    /// Wall time of the whole run
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Tally statuses from strategy results
    pub fn from_results(results: &[StrategyReport], total_duration_ms: f64) -> Self {
        let count = |status: StrategyStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            total_strategies: results.len(),
            completed: count(StrategyStatus::Completed),
            unavailable: count(StrategyStatus::Unavailable),
            failed: count(StrategyStatus::Failed),
            total_duration_ms,
        }
    }
}

/// Format seconds with a unit suited to the magnitude
pub fn format_secs(secs: f64) -> String {
    if secs < 1e-6 {
        format!("{:.2} ns", secs * 1e9)
    } else if secs < 1e-3 {
        format!("{:.2} us", secs * 1e6)
    } else if secs < 1.0 {
        format!("{:.2} ms", secs * 1e3)
    } else {
        format!("{:.2} s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fillbench_stats::compute_summary;

    #[test]
    fn test_metrics_from_stats() {
        let stats = compute_summary(&[0.002, 0.004]);
        let metrics = StrategyMetrics::new(&stats, 1200.0, 1000);

        assert_eq!(metrics.iterations, 2);
        assert!((metrics.mean_secs - 0.003).abs() < 1e-12);
        assert!((metrics.elements_per_sec - 1000.0 / 0.003).abs() < 1e-6);
    }

    #[test]
    fn test_summary_tally() {
        let make = |label: &str, status| StrategyReport {
            label: label.to_string(),
            status,
            metrics: None,
            message: None,
        };
        let results = vec![
            make("a", StrategyStatus::Completed),
            make("b", StrategyStatus::Unavailable),
            make("c", StrategyStatus::Completed),
            make("d", StrategyStatus::Failed),
        ];
        let summary = ReportSummary::from_results(&results, 12.5);
        assert_eq!(summary.total_strategies, 4);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.unavailable, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_format_secs() {
        assert_eq!(format_secs(0.0000005), "500.00 ns");
        assert_eq!(format_secs(0.0005), "500.00 us");
        assert_eq!(format_secs(0.005), "5.00 ms");
        assert_eq!(format_secs(2.5), "2.50 s");
    }
}
