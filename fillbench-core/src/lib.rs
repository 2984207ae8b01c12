#![warn(missing_docs)]
//! FillBench Core - Strategies, Timing and Verification
//!
//! This crate provides everything that touches a buffer:
//! - `FillStrategy` trait and the built-in strategies
//! - `Registry` of labelled strategies in registration order
//! - Fresh, poisoned buffer allocation
//! - High-precision timing (RDTSC with Instant fallback)
//! - The verifier applied after every fill

mod buffer;
mod measure;
pub mod partition;
mod registry;
pub mod strategies;
mod strategy;
mod verify;

pub use buffer::{AllocError, MAX_BUFFER_LEN, POISON, allocate_buffer};
/// Whether this platform provides hardware cycle counters (x86_64 RDTSCP or AArch64 CNTVCT_EL0).
/// When `false`, cycle counts are reported as 0 and only wall-clock time is available.
pub use measure::HAS_CYCLE_COUNTER;
pub use measure::{Measurement, Timer, allowed_cpus, pin_to_cpu};
pub use registry::{Registry, RegistryError, StrategyDef};
pub use strategy::{
    Availability, FillStrategy, FnStrategy, StrategyError, panic_message, strategy_fn,
};
pub use verify::{VerifyFailure, VerifyMode, verify};

/// Element type of every buffer
pub type Element = u32;

/// Default number of elements per buffer
pub const DEFAULT_ARRAY_SIZE: usize = 10_000_000;

/// Default number of iterations per strategy
pub const DEFAULT_ITERATIONS: u32 = 50;

/// Default decomposition degree for the rayon strategies
pub const DEFAULT_WORKERS: usize = 4;

/// Number of hardware execution units available to this process
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_ARRAY_SIZE, 10_000_000);
        assert_eq!(DEFAULT_ITERATIONS, 50);
        assert_eq!(DEFAULT_WORKERS, 4);
        assert!(DEFAULT_ARRAY_SIZE <= MAX_BUFFER_LEN);
        assert!(available_parallelism() >= 1);
    }
}
