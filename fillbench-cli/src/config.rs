//! Configuration loading from fillbench.toml
//!
//! FillBench configuration can be specified in a `fillbench.toml` file in the
//! project root. The configuration is automatically discovered by walking up
//! from the current directory. Command-line flags override file values.

use fillbench_core::{DEFAULT_ARRAY_SIZE, DEFAULT_ITERATIONS, DEFAULT_WORKERS, VerifyMode};
use fillbench_report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up by [`FillConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "fillbench.toml";

/// FillBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FillConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for strategy execution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunnerConfig {
    /// Number of elements in each buffer
    #[serde(default = "default_array_size")]
    pub array_size: usize,
    /// Timed repetitions per strategy
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Worker count for the rayon decompositions
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// OS thread count for the thread-per-core strategies (defaults to the
    /// hardware concurrency)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    /// Verification mode: "exact" or "proxy"
    #[serde(default)]
    pub verify: VerifyMode,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            array_size: default_array_size(),
            iterations: default_iterations(),
            workers: default_workers(),
            threads: None,
            verify: VerifyMode::default(),
        }
    }
}

impl RunnerConfig {
    /// Resolved OS thread count
    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(fillbench_core::available_parallelism)
    }
}

fn default_array_size() -> usize {
    DEFAULT_ARRAY_SIZE
}
fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}
fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Output format: "human" or "json"
    #[serde(default)]
    pub format: OutputFormat,
    /// Show a progress bar on stderr while strategies run
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            progress: default_progress(),
        }
    }
}

fn default_progress() -> bool {
    true
}

impl FillConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Try to discover a configuration file by walking up from the current
    /// directory. A file that exists but does not parse is an error.
    pub fn discover() -> anyhow::Result<Option<(PathBuf, Self)>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                let config = Self::load(&config_path)?;
                return Ok(Some((config_path, config)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Reject values the runner cannot honour
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.runner.iterations == 0 {
            anyhow::bail!("iterations must be at least 1");
        }
        if self.runner.workers == 0 {
            anyhow::bail!("workers must be at least 1");
        }
        if self.runner.threads == Some(0) {
            anyhow::bail!("threads must be at least 1");
        }
        if self.runner.array_size > fillbench_core::MAX_BUFFER_LEN {
            anyhow::bail!(
                "array_size {} exceeds the largest index an element can hold ({})",
                self.runner.array_size,
                fillbench_core::MAX_BUFFER_LEN
            );
        }
        Ok(())
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# FillBench Configuration

[runner]
# Elements per buffer
array_size = 10000000
# Timed repetitions per strategy
iterations = 50
# Worker count for the rayon strategies
workers = 4
# OS threads for the thread-per-core strategies (defaults to hardware concurrency)
# threads = 8
# Verification mode: "exact" checks every index, "proxy" checks order and endpoints
verify = "exact"

[output]
# Output format: human or json
format = "human"
# Progress bar on stderr
progress = true
"#
        .to_string()
    }
}
