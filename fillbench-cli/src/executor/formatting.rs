//! Output Formatting
//!
//! Reporters receive the run header, each strategy outcome and the halting
//! failure, in that order.
//!
//! - [`HumanReporter`] streams one line per strategy as soon as it finishes:
//!   a header naming the processor and iteration counts, then
//!   `label: mean-seconds` in registration order.
//! - [`JsonReporter`] collects everything and writes a single JSON document
//!   when [`JsonReporter::finish`] is called.

use super::execution::{RunEnvironment, StrategyOutcome};
use super::metadata::build_report_meta;
use super::report::{build_report, failure_report, strategy_report};
use crate::error::BenchError;
use fillbench_report::{ReportMeta, StrategyReport, format_secs, generate_json_report};
use std::io::{self, Write};
use std::time::Instant;

/// Sink for run output
pub trait Reporter {
    /// Called once, before any strategy runs
    fn header(&mut self, env: &RunEnvironment) -> io::Result<()>;

    /// Called after each strategy that completed or was skipped
    fn outcome(&mut self, outcome: &StrategyOutcome) -> io::Result<()>;

    /// Called with the failure that halted the run
    fn failure(&mut self, error: &BenchError) -> io::Result<()>;
}

/// Plain text reporter
pub struct HumanReporter<W: Write> {
    out: W,
    label_width: usize,
    detailed: bool,
}

impl<W: Write> HumanReporter<W> {
    /// Create a reporter that pads labels to `label_width` columns
    pub fn new(out: W, label_width: usize) -> Self {
        Self {
            out,
            label_width,
            detailed: false,
        }
    }

    /// Print a distribution line under each completed strategy
    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for HumanReporter<W> {
    fn header(&mut self, env: &RunEnvironment) -> io::Result<()> {
        writeln!(
            self.out,
            "Number of processors: {}, number of iterations: {}",
            env.processors, env.config.iterations
        )?;
        self.out.flush()
    }

    fn outcome(&mut self, outcome: &StrategyOutcome) -> io::Result<()> {
        let width = self.label_width;
        match outcome {
            StrategyOutcome::Completed(timing) => {
                writeln!(
                    self.out,
                    "{:<width$}: {:.9}",
                    timing.label,
                    timing.mean_secs()
                )?;
                if self.detailed {
                    let stats = timing.summary();
                    write!(
                        self.out,
                        "    median: {}  min: {}  max: {}  stddev: {}  cv: {:.1}%",
                        format_secs(stats.median),
                        format_secs(stats.min),
                        format_secs(stats.max),
                        format_secs(stats.std_dev),
                        stats.coefficient_of_variation()
                    )?;
                    let cycles = timing.mean_cycles();
                    if cycles > 0.0 {
                        write!(self.out, "  cycles: {:.0}", cycles)?;
                    }
                    writeln!(self.out)?;
                }
            }
            StrategyOutcome::Unavailable { label, reason } => {
                writeln!(self.out, "{:<width$}: unavailable ({})", label, reason)?;
            }
        }
        self.out.flush()
    }

    fn failure(&mut self, error: &BenchError) -> io::Result<()> {
        writeln!(self.out, "{}", error)?;
        self.out.flush()
    }
}

/// JSON reporter, written once at the end of the run
pub struct JsonReporter<W: Write> {
    out: W,
    meta: Option<ReportMeta>,
    array_size: usize,
    results: Vec<StrategyReport>,
    start: Instant,
}

impl<W: Write> JsonReporter<W> {
    /// Create a reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            meta: None,
            array_size: 0,
            results: Vec::new(),
            start: Instant::now(),
        }
    }

    /// Write the collected report. Without a header there is nothing to write.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(meta) = self.meta.take() {
            let total_duration_ms = self.start.elapsed().as_secs_f64() * 1000.0;
            let report = build_report(meta, std::mem::take(&mut self.results), total_duration_ms);
            let json = generate_json_report(&report).map_err(io::Error::from)?;
            writeln!(self.out, "{}", json)?;
            self.out.flush()?;
        }
        Ok(self.out)
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn header(&mut self, env: &RunEnvironment) -> io::Result<()> {
        self.array_size = env.config.array_size;
        self.start = Instant::now();
        self.meta = Some(build_report_meta(env.config.report_config()));
        Ok(())
    }

    fn outcome(&mut self, outcome: &StrategyOutcome) -> io::Result<()> {
        self.results.push(strategy_report(outcome, self.array_size));
        Ok(())
    }

    fn failure(&mut self, error: &BenchError) -> io::Result<()> {
        self.results.push(failure_report(error));
        Ok(())
    }
}
