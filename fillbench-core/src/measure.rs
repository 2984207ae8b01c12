//! High-Precision Timing
//!
//! Wall-clock timing on the monotonic `std::time::Instant`, paired with a
//! reference cycle counter (RDTSCP on x86_64, CNTVCT_EL0 on AArch64) when the
//! platform has one. Wall clock is the reported metric: strategies fan work
//! out to other threads, so time on the calling CPU would undercount.

use std::time::Duration;

/// Read the CPU cycle/tick counter (platform-specific).
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_cycles() -> u64 {
    // SAFETY: RDTSCP is available on all x86_64 CPUs since ~2006 and waits
    // for all prior instructions to complete before reading the counter.
    unsafe {
        let mut _aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut _aux)
    }
}

/// Read the virtual counter timer on AArch64 (comparable to x86 TSC).
#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_cycles() -> u64 {
    0
}

/// Whether this platform provides real cycle counters.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

/// One timed region: wall-clock duration plus reference cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Elapsed wall-clock time
    pub elapsed: Duration,
    /// Reference cycles on the timing thread (0 without a cycle counter)
    pub cycles: u64,
}

impl Measurement {
    /// Elapsed time in seconds
    pub fn secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Timer for a single strategy invocation
pub struct Timer {
    start: std::time::Instant,
    cycles_start: u64,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        let cycles_start = read_cycles();
        Self {
            start: std::time::Instant::now(),
            cycles_start,
        }
    }

    /// Stop the timer
    #[inline(always)]
    pub fn stop(&self) -> Measurement {
        let elapsed = self.start.elapsed();
        let cycles = read_cycles().saturating_sub(self.cycles_start);
        Measurement { elapsed, cycles }
    }
}

/// Pin the current thread to a single CPU.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu, set_ref);

        let result = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// Pin the current thread to a single CPU (unsupported on this platform).
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "cpu pinning is not supported on this platform",
    ))
}

/// CPUs the current process may run on, in ascending order.
#[cfg(target_os = "linux")]
pub fn allowed_cpus() -> Result<Vec<usize>, std::io::Error> {
    use std::mem::MaybeUninit;

    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        let result = libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);
        if result != 0 {
            return Err(std::io::Error::last_os_error());
        }

        let set_ref = &*set_ref;
        Ok((0..libc::CPU_SETSIZE as usize)
            .filter(|&cpu| libc::CPU_ISSET(cpu, set_ref))
            .collect())
    }
}

/// CPUs the current process may run on (unsupported on this platform).
#[cfg(not(target_os = "linux"))]
pub fn allowed_cpus() -> Result<Vec<usize>, std::io::Error> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "cpu affinity is not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let measurement = timer.stop();

        // Should be at least 5ms
        assert!(measurement.elapsed >= Duration::from_millis(5));
        assert!(measurement.secs() >= 0.005);
    }

    #[test]
    fn test_cycle_counter() {
        if HAS_CYCLE_COUNTER {
            let a = read_cycles();
            let b = read_cycles();
            assert!(b >= a, "cycle counter should be monotonic");
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_allowed_cpus_contains_current_set() {
        let cpus = allowed_cpus().unwrap();
        assert!(!cpus.is_empty());
        assert!(cpus.windows(2).all(|w| w[0] < w[1]));
    }
}
