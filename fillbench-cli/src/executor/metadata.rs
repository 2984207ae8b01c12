//! System Metadata Collection
//!
//! Collects system information for the report header and JSON metadata.
//!
//! ## Collected Data
//!
//! - **OS**: Operating system name and architecture
//! - **CPU**: Model name and hardware concurrency
//! - **Memory**: Total system RAM in GB
//! - **Timestamp**: UTC time of report generation
//!
//! Linux-specific data (CPU model, memory) gracefully degrades on other
//! platforms, returning "Unknown" or 0 values.

use chrono::Utc;
use fillbench_report::{ReportConfig, ReportMeta, SystemInfo};

/// Build report metadata for a run with the given configuration
pub fn build_report_meta(config: ReportConfig) -> ReportMeta {
    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system: system_info(),
        config,
    }
}

/// Describe the machine the run happens on
pub fn system_info() -> SystemInfo {
    SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        processors: fillbench_core::available_parallelism(),
        memory_gb: get_memory_gb().unwrap_or(0.0),
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Get total system memory in GB (Linux only)
fn get_memory_gb() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("MemTotal"))
                    .and_then(|l| {
                        l.split_whitespace()
                            .nth(1)
                            .and_then(|s| s.parse::<u64>().ok())
                    })
                    .map(|kb| kb as f64 / 1024.0 / 1024.0)
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}
