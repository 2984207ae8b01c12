//! FillStrategy - The Strategy Contract
//!
//! A strategy writes `i` into index `i` of the buffer it is handed, using
//! whatever decomposition it likes, and returns only once every write is done.

use crate::Element;
use thiserror::Error;

/// Failure raised by a strategy's own execution substrate
#[derive(Debug, Error)]
pub enum StrategyError {
    /// A dedicated thread pool could not be built
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// A worker thread panicked before finishing its slice
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked {
        /// Index of the worker
        worker: usize,
        /// Panic payload, if it was a string
        message: String,
    },
    /// The strategy panicked on the calling thread
    #[error("strategy panicked: {0}")]
    Panicked(String),
    /// A worker could not be pinned to its CPU
    #[error("failed to pin worker {worker} to cpu {cpu}: {source}")]
    Affinity {
        /// Index of the worker
        worker: usize,
        /// Target CPU
        cpu: usize,
        /// OS error
        #[source]
        source: std::io::Error,
    },
}

/// Whether a strategy can run on this machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// The strategy can run
    Available,
    /// The strategy cannot run here; it is reported but never timed
    Unavailable {
        /// Human-readable reason
        reason: String,
    },
}

impl Availability {
    /// Whether the strategy can run
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// A fill algorithm with a uniform call contract.
pub trait FillStrategy: Send + Sync {
    /// Write `i` into `buffer[i]` for every index, blocking until done.
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError>;

    /// Report whether the strategy can run on this machine.
    fn availability(&self) -> Availability {
        Availability::Available
    }
}

/// Strategy backed by a closure, built with [`strategy_fn`].
#[derive(Clone)]
pub struct FnStrategy<F> {
    f: F,
}

/// Wrap a closure as a [`FillStrategy`].
///
/// ```
/// use fillbench_core::{FillStrategy, strategy_fn};
///
/// let strategy = strategy_fn(|buffer: &mut [u32]| {
///     for (i, slot) in buffer.iter_mut().enumerate() {
///         *slot = i as u32;
///     }
///     Ok(())
/// });
///
/// let mut buffer = vec![7; 4];
/// strategy.fill(&mut buffer).unwrap();
/// assert_eq!(buffer, [0, 1, 2, 3]);
/// ```
pub fn strategy_fn<F>(f: F) -> FnStrategy<F>
where
    F: Fn(&mut [Element]) -> Result<(), StrategyError> + Send + Sync,
{
    FnStrategy { f }
}

impl<F> FillStrategy for FnStrategy<F>
where
    F: Fn(&mut [Element]) -> Result<(), StrategyError> + Send + Sync,
{
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        (self.f)(buffer)
    }
}

impl<S: FillStrategy + ?Sized> FillStrategy for Box<S> {
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        (**self).fill(buffer)
    }

    fn availability(&self) -> Availability {
        (**self).availability()
    }
}

/// Extract a readable message from a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
