//! Fill Strategies
//!
//! One type per concurrency approach. All of them are stateless with respect
//! to the buffer: nothing carries over from one call to the next.

use crate::Element;
use crate::measure::{allowed_cpus, pin_to_cpu};
use crate::partition::{self, chunk_len, fill_from};
use crate::strategy::{Availability, FillStrategy, StrategyError, panic_message};
use rayon::prelude::*;
use std::thread::ScopedJoinHandle;

/// Number of lanes written per step by [`WideLanes`]
pub const LANES: usize = 8;

/// Plain indexed loop on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl FillStrategy for Sequential {
    #[allow(clippy::needless_range_loop)]
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        for i in 0..buffer.len() {
            buffer[i] = i as Element;
        }
        Ok(())
    }
}

/// Generator closure driven by `slice::fill_with`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillWith;

impl FillStrategy for FillWith {
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        let mut next: Element = 0;
        buffer.fill_with(|| {
            let value = next;
            next = next.wrapping_add(1);
            value
        });
        Ok(())
    }
}

/// One fixed chunk per worker on the global rayon pool.
#[derive(Debug, Clone, Copy)]
pub struct RayonStatic {
    workers: usize,
}

impl RayonStatic {
    /// Split into `workers` chunks
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl FillStrategy for RayonStatic {
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        let size = chunk_len(buffer.len(), self.workers);
        buffer
            .par_chunks_mut(size)
            .enumerate()
            .for_each(|(i, chunk)| fill_from(i * size, chunk));
        Ok(())
    }
}

/// Exactly `workers` tasks spawned into a `rayon::scope`, one per slice.
#[derive(Debug, Clone, Copy)]
pub struct RayonScope {
    workers: usize,
}

impl RayonScope {
    /// Spawn `workers` tasks
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl FillStrategy for RayonScope {
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        rayon::scope(|s| {
            for (offset, chunk) in partition::split(buffer, self.workers) {
                s.spawn(move |_| fill_from(offset, chunk));
            }
        });
        Ok(())
    }
}

/// Per-element parallel iterator; rayon decides the splits by work stealing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayonParIter;

impl FillStrategy for RayonParIter {
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        buffer
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, slot)| *slot = i as Element);
        Ok(())
    }
}

/// Dedicated rayon pool with a fixed thread count, built once. The buffer is
/// cut into one contiguous block per pool thread, like a static schedule.
pub struct RayonPool {
    pool: rayon::ThreadPool,
}

impl RayonPool {
    /// Build a pool of `workers` threads
    pub fn new(workers: usize) -> Result<Self, StrategyError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("fillbench-pool-{i}"))
            .build()?;
        tracing::debug!(workers = pool.current_num_threads(), "built rayon pool");
        Ok(Self { pool })
    }

    /// Number of threads in the pool
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl FillStrategy for RayonPool {
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        let size = chunk_len(buffer.len(), self.workers());
        self.pool.install(|| {
            buffer
                .par_chunks_mut(size)
                .enumerate()
                .for_each(|(i, chunk)| fill_from(i * size, chunk));
        });
        Ok(())
    }
}

/// One OS thread per slice via `std::thread::scope`.
#[derive(Debug, Clone, Copy)]
pub struct ScopedThreads {
    threads: usize,
}

impl ScopedThreads {
    /// Spawn `threads` threads per call
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }
}

impl FillStrategy for ScopedThreads {
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        std::thread::scope(|s| {
            let handles: Vec<_> = partition::split(buffer, self.threads)
                .map(|(offset, chunk)| {
                    s.spawn(move || {
                        fill_from(offset, chunk);
                        Ok(())
                    })
                })
                .collect();
            join_workers(handles)
        })
    }
}

/// Scoped threads, each pinned to one of the CPUs this process may use.
///
/// Reports itself unavailable where CPU affinity cannot be queried.
#[derive(Debug, Clone)]
pub struct PinnedThreads {
    threads: usize,
    cpus: Result<Vec<usize>, String>,
}

impl PinnedThreads {
    /// Spawn `threads` threads per call, pinned round-robin
    pub fn new(threads: usize) -> Self {
        let cpus = match allowed_cpus() {
            Ok(cpus) if cpus.is_empty() => Err("no cpus in the affinity mask".to_string()),
            Ok(cpus) => Ok(cpus),
            Err(e) => Err(e.to_string()),
        };
        match &cpus {
            Ok(cpus) => tracing::debug!(threads, cpus = cpus.len(), "pinned threads ready"),
            Err(reason) => tracing::debug!(%reason, "cpu affinity unavailable"),
        }
        Self {
            threads: threads.max(1),
            cpus,
        }
    }
}

impl FillStrategy for PinnedThreads {
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        let cpus = match &self.cpus {
            Ok(cpus) => cpus.as_slice(),
            // Unavailable strategies are never run; pinning to nothing is a no-op.
            Err(_) => &[],
        };

        std::thread::scope(|s| {
            let handles: Vec<_> = partition::split(buffer, self.threads)
                .enumerate()
                .map(|(worker, (offset, chunk))| {
                    let cpu = cpus.get(worker % cpus.len().max(1)).copied();
                    s.spawn(move || {
                        if let Some(cpu) = cpu {
                            pin_to_cpu(cpu).map_err(|source| StrategyError::Affinity {
                                worker,
                                cpu,
                                source,
                            })?;
                        }
                        fill_from(offset, chunk);
                        Ok(())
                    })
                })
                .collect();
            join_workers(handles)
        })
    }

    fn availability(&self) -> Availability {
        match &self.cpus {
            Ok(_) => Availability::Available,
            Err(reason) => Availability::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

/// SIMD-style writes of [`LANES`] values per step, scalar tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct WideLanes;

impl FillStrategy for WideLanes {
    fn fill(&self, buffer: &mut [Element]) -> Result<(), StrategyError> {
        let len = buffer.len();
        let mut lanes: [Element; LANES] = std::array::from_fn(|lane| lane as Element);

        let mut chunks = buffer.chunks_exact_mut(LANES);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&lanes);
            for lane in &mut lanes {
                *lane = lane.wrapping_add(LANES as Element);
            }
        }
        fill_from(len - len % LANES, chunks.into_remainder());
        Ok(())
    }
}

/// Join every worker, returning the first failure.
fn join_workers(
    handles: Vec<ScopedJoinHandle<'_, Result<(), StrategyError>>>,
) -> Result<(), StrategyError> {
    let mut first_error = None;
    for (worker, handle) in handles.into_iter().enumerate() {
        let outcome = handle.join().unwrap_or_else(|payload| {
            Err(StrategyError::WorkerPanicked {
                worker,
                message: panic_message(payload.as_ref()),
            })
        });
        if let Err(e) = outcome {
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate_buffer;

    fn all_strategies() -> Vec<(&'static str, Box<dyn FillStrategy>)> {
        vec![
            ("sequential", Box::new(Sequential)),
            ("fill-with", Box::new(FillWith)),
            ("rayon-static", Box::new(RayonStatic::new(4))),
            ("rayon-scope", Box::new(RayonScope::new(4))),
            ("rayon-par-iter", Box::new(RayonParIter)),
            ("rayon-pool", Box::new(RayonPool::new(3).unwrap())),
            ("scoped-threads", Box::new(ScopedThreads::new(3))),
            ("pinned-threads", Box::new(PinnedThreads::new(2))),
            ("wide-lanes", Box::new(WideLanes)),
        ]
    }

    #[test]
    fn test_every_strategy_writes_every_index() {
        // 1001 and 13 are not divisible by the worker counts
        for len in [0usize, 1, 2, 7, 8, 13, 1000, 1001, 65_537] {
            for (label, strategy) in all_strategies() {
                if !strategy.availability().is_available() {
                    continue;
                }
                let mut buffer = allocate_buffer(len).unwrap();
                strategy.fill(&mut buffer).unwrap();
                for (i, &v) in buffer.iter().enumerate() {
                    assert_eq!(v as usize, i, "{label} wrong at index {i} for len {len}");
                }
            }
        }
    }

    #[test]
    fn test_independent_buffers_match() {
        for (label, strategy) in all_strategies() {
            if !strategy.availability().is_available() {
                continue;
            }
            let mut first = allocate_buffer(4099).unwrap();
            let mut second = allocate_buffer(4099).unwrap();
            strategy.fill(&mut first).unwrap();
            strategy.fill(&mut second).unwrap();
            assert_eq!(first, second, "{label}");
        }
    }

    #[test]
    fn test_more_workers_than_elements() {
        let mut buffer = allocate_buffer(3).unwrap();
        ScopedThreads::new(16).fill(&mut buffer).unwrap();
        assert_eq!(buffer, [0, 1, 2]);

        let mut buffer = allocate_buffer(3).unwrap();
        RayonScope::new(16).fill(&mut buffer).unwrap();
        assert_eq!(buffer, [0, 1, 2]);

        let mut buffer = allocate_buffer(3).unwrap();
        RayonPool::new(16).unwrap().fill(&mut buffer).unwrap();
        assert_eq!(buffer, [0, 1, 2]);
    }

    #[test]
    fn test_pool_uneven_blocks() {
        // 10 elements over 4 pool threads: blocks of 3, 3, 3 and 1
        let mut buffer = allocate_buffer(10).unwrap();
        RayonPool::new(4).unwrap().fill(&mut buffer).unwrap();
        assert_eq!(buffer, (0..10).collect::<Vec<Element>>());
    }

    #[test]
    fn test_pool_size() {
        assert_eq!(RayonPool::new(2).unwrap().workers(), 2);
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let result = std::thread::scope(|s| {
            let handles = vec![
                s.spawn(|| Ok(())),
                s.spawn(|| -> Result<(), StrategyError> { panic!("slice failed") }),
            ];
            join_workers(handles)
        });
        match result {
            Err(StrategyError::WorkerPanicked { worker, message }) => {
                assert_eq!(worker, 1);
                assert_eq!(message, "slice failed");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(not(target_os = "linux"))]
    #[test]
    fn test_pinned_threads_unavailable_off_linux() {
        assert!(!PinnedThreads::new(2).availability().is_available());
    }
}
