//! Report Building
//!
//! Converts strategy outcomes into report entries.
//!
//! ```text
//! StrategyOutcome / BenchError
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │   StrategyReport    │  Summary statistics + throughput + cycles
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │      Report         │  Ready for JSON output
//!   └─────────────────────┘
//! ```

use super::execution::StrategyOutcome;
use crate::error::BenchError;
use fillbench_report::{
    Report, ReportMeta, ReportSummary, StrategyMetrics, StrategyReport, StrategyStatus,
};

/// Report entry for a strategy that ran or was skipped
pub fn strategy_report(outcome: &StrategyOutcome, array_size: usize) -> StrategyReport {
    match outcome {
        StrategyOutcome::Completed(timing) => {
            let stats = timing.summary();
            let mut metrics = StrategyMetrics::new(&stats, timing.mean_cycles(), array_size);
            // Keep the headline mean identical to the one printed
            metrics.mean_secs = timing.mean_secs();
            StrategyReport {
                label: timing.label.clone(),
                status: StrategyStatus::Completed,
                metrics: Some(metrics),
                message: None,
            }
        }
        StrategyOutcome::Unavailable { label, reason } => StrategyReport {
            label: label.clone(),
            status: StrategyStatus::Unavailable,
            metrics: None,
            message: Some(reason.clone()),
        },
    }
}

/// Report entry for the failure that halted the run
pub fn failure_report(error: &BenchError) -> StrategyReport {
    StrategyReport {
        label: error.label().unwrap_or("<output>").to_string(),
        status: StrategyStatus::Failed,
        metrics: None,
        message: Some(error.to_string()),
    }
}

/// Assemble a complete Report
pub fn build_report(
    meta: ReportMeta,
    results: Vec<StrategyReport>,
    total_duration_ms: f64,
) -> Report {
    let summary = ReportSummary::from_results(&results, total_duration_ms);
    Report {
        meta,
        results,
        summary,
    }
}
