//! Strategy Execution
//!
//! The measurement loop. Each strategy is run for a fixed number of
//! iterations; every iteration gets a freshly allocated buffer, a timed fill
//! and an untimed verification.
//!
//! ## Data Flow
//!
//! ```text
//! StrategyDef (from the registry)
//!        │
//!        ▼
//!   ExecutionConfig
//!        │
//!        ▼
//! ┌──────────────────┐
//! │      Runner      │  allocate → time fill → verify → release, K times
//! └────────┬─────────┘
//!          │
//!          ▼
//!  StrategyOutcome (timing samples, or unavailable)
//! ```
//!
//! Only the fill call sits between the two clock reads. Allocation,
//! verification and release stay outside the timed region.

use super::formatting::Reporter;
use crate::error::BenchError;
use fillbench_core::{
    Availability, StrategyDef, StrategyError, Timer, VerifyMode, allocate_buffer, panic_message,
    verify,
};
use fillbench_report::ReportConfig;
use fillbench_stats::{SummaryStatistics, compute_summary};
use indicatif::{ProgressBar, ProgressStyle};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, error, info, warn};

/// Configuration for strategy execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    /// Elements per buffer
    pub array_size: usize,
    /// Timed iterations per strategy
    pub iterations: u32,
    /// Worker count handed to the rayon strategies
    pub workers: usize,
    /// OS thread count handed to the thread-per-core strategies
    pub threads: usize,
    /// How each filled buffer is checked
    pub verify: VerifyMode,
}

impl ExecutionConfig {
    /// Run configuration as recorded in reports
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            array_size: self.array_size,
            iterations: self.iterations,
            workers: self.workers,
            threads: self.threads,
            verify: self.verify,
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            array_size: fillbench_core::DEFAULT_ARRAY_SIZE,
            iterations: fillbench_core::DEFAULT_ITERATIONS,
            workers: fillbench_core::DEFAULT_WORKERS,
            threads: fillbench_core::available_parallelism(),
            verify: VerifyMode::default(),
        }
    }
}

/// What the report header describes
#[derive(Debug, Clone)]
pub struct RunEnvironment {
    /// Hardware concurrency of the machine
    pub processors: usize,
    /// Configuration of this run
    pub config: ExecutionConfig,
}

/// Timing collected for one strategy
#[derive(Debug, Clone)]
pub struct StrategyTiming {
    /// Strategy label
    pub label: String,
    /// Sum of all timed fills, in seconds
    pub total_secs: f64,
    /// Per-iteration fill time, in seconds
    pub samples: Vec<f64>,
    /// Per-iteration reference cycles (parallel with samples)
    pub cycles: Vec<u64>,
}

impl StrategyTiming {
    /// Number of timed iterations
    pub fn iterations(&self) -> usize {
        self.samples.len()
    }

    /// Accumulated time divided by the iteration count
    pub fn mean_secs(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.total_secs / self.samples.len() as f64
        }
    }

    /// Mean reference cycles per iteration
    pub fn mean_cycles(&self) -> f64 {
        if self.cycles.is_empty() {
            0.0
        } else {
            self.cycles.iter().map(|&c| c as f64).sum::<f64>() / self.cycles.len() as f64
        }
    }

    /// Distribution of the per-iteration samples
    pub fn summary(&self) -> SummaryStatistics {
        compute_summary(&self.samples)
    }
}

/// Result of running one strategy
#[derive(Debug, Clone)]
pub enum StrategyOutcome {
    /// Every iteration filled and verified
    Completed(StrategyTiming),
    /// The strategy cannot run on this machine and was not timed
    Unavailable {
        /// Strategy label
        label: String,
        /// Why it cannot run
        reason: String,
    },
}

impl StrategyOutcome {
    /// Label of the strategy this outcome belongs to
    pub fn label(&self) -> &str {
        match self {
            StrategyOutcome::Completed(timing) => &timing.label,
            StrategyOutcome::Unavailable { label, .. } => label,
        }
    }
}

/// Runs strategies through the measurement loop
pub struct Runner {
    config: ExecutionConfig,
    progress: bool,
}

impl Runner {
    /// Create a runner. An iteration count of zero is raised to one.
    pub fn new(mut config: ExecutionConfig) -> Self {
        config.iterations = config.iterations.max(1);
        Self {
            config,
            progress: false,
        }
    }

    /// Show a per-strategy progress bar on stderr
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Configuration this runner was built with
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Environment described by the report header
    pub fn environment(&self) -> RunEnvironment {
        RunEnvironment {
            processors: fillbench_core::available_parallelism(),
            config: self.config.clone(),
        }
    }

    /// Run strategies in order, streaming each outcome to `reporter`.
    ///
    /// The header is emitted before any strategy runs. The first failure is
    /// handed to the reporter and then returned; later strategies do not run.
    pub fn run<'a, R>(
        &self,
        strategies: impl IntoIterator<Item = &'a StrategyDef>,
        reporter: &mut R,
    ) -> Result<Vec<StrategyOutcome>, BenchError>
    where
        R: Reporter + ?Sized,
    {
        reporter.header(&self.environment())?;

        let mut outcomes = Vec::new();
        for def in strategies {
            match self.run_strategy(def) {
                Ok(outcome) => {
                    reporter.outcome(&outcome)?;
                    outcomes.push(outcome);
                }
                Err(e) => {
                    error!(strategy = def.label(), "{}", e);
                    // The halting error decides the exit code, not the sink
                    if let Err(write_err) = reporter.failure(&e) {
                        warn!(error = %write_err, "could not report failure");
                    }
                    return Err(e);
                }
            }
        }
        Ok(outcomes)
    }

    /// Run a single strategy through all iterations
    pub fn run_strategy(&self, def: &StrategyDef) -> Result<StrategyOutcome, BenchError> {
        let label = def.label();

        if let Availability::Unavailable { reason } = def.strategy().availability() {
            warn!(strategy = label, %reason, "strategy unavailable, skipping");
            return Ok(StrategyOutcome::Unavailable {
                label: label.to_string(),
                reason,
            });
        }

        let iterations = self.config.iterations;
        let pb = self.progress_bar(label);
        let mut timing = StrategyTiming {
            label: label.to_string(),
            total_secs: 0.0,
            samples: Vec::with_capacity(iterations as usize),
            cycles: Vec::with_capacity(iterations as usize),
        };

        for iteration in 1..=iterations {
            let mut buffer = allocate_buffer(self.config.array_size).map_err(|source| {
                BenchError::Allocation {
                    label: label.to_string(),
                    source,
                }
            })?;

            let timer = Timer::start();
            let filled = catch_unwind(AssertUnwindSafe(|| def.strategy().fill(&mut buffer)));
            let measurement = timer.stop();

            let filled = match filled {
                Ok(result) => result,
                Err(payload) => Err(StrategyError::Panicked(panic_message(payload.as_ref()))),
            };
            if let Err(source) = filled {
                pb.abandon();
                return Err(BenchError::Strategy {
                    label: label.to_string(),
                    source,
                });
            }

            timing.total_secs += measurement.secs();

            if let Err(failure) = verify(&buffer, self.config.verify) {
                pb.abandon();
                return Err(BenchError::Verification {
                    label: label.to_string(),
                    iteration,
                    failure,
                });
            }

            debug!(
                strategy = label,
                iteration,
                secs = measurement.secs(),
                cycles = measurement.cycles,
                "iteration verified"
            );
            timing.samples.push(measurement.secs());
            timing.cycles.push(measurement.cycles);
            pb.inc(1);
        }

        pb.finish_and_clear();
        info!(
            strategy = label,
            iterations,
            mean_secs = timing.mean_secs(),
            "strategy completed"
        );
        Ok(StrategyOutcome::Completed(timing))
    }

    fn progress_bar(&self, label: &str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(u64::from(self.config.iterations));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(label.to_string());
        pb
    }
}
