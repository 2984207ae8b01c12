#![warn(missing_docs)]
//! # FillBench
//!
//! Compares concurrency strategies for one embarrassingly parallel task:
//! writing `i` into index `i` of a large array.
//!
//! - **Uniform strategies**: every decomposition implements [`FillStrategy`]
//! - **Fresh buffers**: each iteration allocates a poisoned buffer, so a
//!   strategy that skips indices is always caught
//! - **Verification**: every filled buffer is checked outside the timed region
//! - **High-Precision Timing**: monotonic wall clock plus RDTSCP/CNTVCT cycles
//! - **Reports**: streamed text lines or a JSON document
//!
//! ## Quick Start
//!
//! ```no_run
//! use fillbench::prelude::*;
//!
//! let registry = Registry::new()
//!     .with("sequential", Sequential)?
//!     .with("rayon-static", RayonStatic::new(4))?;
//!
//! let runner = Runner::new(ExecutionConfig {
//!     array_size: 1_000_000,
//!     iterations: 10,
//!     ..ExecutionConfig::default()
//! });
//!
//! let mut reporter = HumanReporter::new(std::io::stdout(), 12);
//! runner.run(&registry, &mut reporter)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Strategies
//!
//! ```
//! use fillbench::prelude::*;
//!
//! let reversed = strategy_fn(|buffer: &mut [u32]| {
//!     for (i, slot) in buffer.iter_mut().enumerate().rev() {
//!         *slot = i as u32;
//!     }
//!     Ok(())
//! });
//!
//! let registry = Registry::new().with("reversed", reversed)?;
//! assert_eq!(registry.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export core types
pub use fillbench_core::{
    AllocError, Availability, Element, FillStrategy, Measurement, Registry, RegistryError,
    StrategyDef, StrategyError, Timer, VerifyFailure, VerifyMode, allocate_buffer, strategy_fn,
    verify,
};

/// Built-in strategies
pub use fillbench_core::strategies;

// Re-export the runner
pub use fillbench_cli::{
    BenchError, ExecutionConfig, ExecutionPlan, FillConfig, HumanReporter, JsonReporter,
    Reporter, Runner, StrategyOutcome, StrategyTiming, build_plan, execute_plan,
};

// Re-export reporting
pub use fillbench_report::{OutputFormat, Report, StrategyReport, StrategyStatus};

// Re-export stats
pub use fillbench_stats::{SummaryStatistics, compute_summary};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::strategies::*;
    pub use crate::{
        Element, ExecutionConfig, FillStrategy, HumanReporter, Registry, Runner, StrategyError,
        VerifyMode, strategy_fn,
    };
}

/// Run the FillBench CLI.
///
/// Call this from a binary's `main()`:
/// ```no_run
/// fn main() -> std::process::ExitCode {
///     fillbench::run()
/// }
/// ```
pub use fillbench_cli::run;
