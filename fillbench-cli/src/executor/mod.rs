//! Strategy Executor
//!
//! Runs strategies and reports results.
//!
//! ## Pipeline Overview
//!
//! ```text
//! StrategyDef (from the registry, filtered by the planner)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  allocate, time, verify, K iterations each
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human lines streamed, or JSON at the end
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Report entries with summary statistics
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - The measurement loop
//! - [`formatting`] - Human and JSON reporters
//! - [`report`] - Report building
//! - [`metadata`] - System metadata collection

mod execution;
mod formatting;
mod metadata;
mod report;

// Re-export public API
pub use execution::{ExecutionConfig, RunEnvironment, Runner, StrategyOutcome, StrategyTiming};
pub use formatting::{HumanReporter, JsonReporter, Reporter};
pub use metadata::{build_report_meta, system_info};
pub use report::{build_report, failure_report, strategy_report};
