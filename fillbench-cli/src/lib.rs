#![warn(missing_docs)]
//! FillBench CLI Library
//!
//! This module provides the command-line runner for the built-in strategy
//! registry. Use `fillbench::run()` (or `fillbench_cli::run()`) in a main
//! function to get the full fillbench CLI.
//!
//! # Example
//!
//! ```no_run
//! fn main() -> std::process::ExitCode {
//!     fillbench_cli::run()
//! }
//! ```

mod config;
mod error;
mod executor;
mod planner;

pub use config::*;
pub use error::*;
pub use executor::{
    ExecutionConfig, HumanReporter, JsonReporter, Reporter, RunEnvironment, Runner,
    StrategyOutcome, StrategyTiming, build_report, build_report_meta, failure_report,
    strategy_report, system_info,
};
pub use planner::{ExecutionPlan, build_plan};

use clap::{Parser, Subcommand};
use fillbench_core::{Availability, Registry, VerifyMode};
use fillbench_report::OutputFormat;
use regex::Regex;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// FillBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fillbench")]
#[command(
    author,
    version,
    about = "FillBench - compare concurrency strategies for filling an array"
)]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run only strategies whose label matches this regex
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Skip strategies whose label matches this regex
    #[arg(long)]
    pub skip: Option<String>,

    /// Elements per buffer
    #[arg(long)]
    pub array_size: Option<usize>,

    /// Timed iterations per strategy
    #[arg(long, short = 'n')]
    pub iterations: Option<u32>,

    /// Worker count for the rayon strategies
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// OS thread count for the thread-per-core strategies
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Verification mode: exact, proxy
    #[arg(long)]
    pub verify: Option<VerifyMode>,

    /// Output format: human, json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to the nearest fillbench.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// List registered strategies and whether they can run here
    List,
    /// Run strategies (default)
    Run,
    /// Print a commented fillbench.toml template
    Init,
}

/// Run the FillBench CLI with the process arguments.
///
/// Failures are printed to stderr and mapped to a non-zero exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match run_with_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Exit code for an error returned by [`run_with_cli`]
pub fn exit_code_for(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<BenchError>()
        .map_or(EXIT_USAGE, BenchError::exit_code)
}

/// Run the FillBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    if cli.command == Some(Commands::Init) {
        print!("{}", FillConfig::default_toml());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    let registry = Registry::standard(config.runner.workers, config.runner.threads())?;

    match cli.command {
        Some(Commands::List) => list_strategies(&cli, &registry),
        _ => run_strategies(&cli, &config, &registry),
    }
}

/// Initialize logging on stderr. Later calls are no-ops.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "fillbench=debug"
    } else {
        "fillbench=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Layer configuration: defaults, then fillbench.toml, then CLI flags.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<FillConfig> {
    let mut config = match &cli.config {
        Some(path) => FillConfig::load(path)?,
        None => match FillConfig::discover()? {
            Some((path, config)) => {
                debug!(path = %path.display(), "loaded configuration");
                config
            }
            None => FillConfig::default(),
        },
    };

    if let Some(array_size) = cli.array_size {
        config.runner.array_size = array_size;
    }
    if let Some(iterations) = cli.iterations {
        config.runner.iterations = iterations;
    }
    if let Some(workers) = cli.workers {
        config.runner.workers = workers;
    }
    if cli.threads.is_some() {
        config.runner.threads = cli.threads;
    }
    if let Some(verify) = cli.verify {
        config.runner.verify = verify;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.no_progress {
        config.output.progress = false;
    }

    config.validate()?;
    Ok(config)
}

/// Build the execution configuration for a validated [`FillConfig`]
pub fn execution_config(config: &FillConfig) -> ExecutionConfig {
    ExecutionConfig {
        array_size: config.runner.array_size,
        iterations: config.runner.iterations,
        workers: config.runner.workers,
        threads: config.runner.threads(),
        verify: config.runner.verify,
    }
}

fn compile_patterns(cli: &Cli) -> anyhow::Result<(Regex, Option<Regex>)> {
    let filter = Regex::new(&cli.filter)
        .map_err(|e| anyhow::anyhow!("Invalid filter pattern '{}': {}", cli.filter, e))?;
    let skip = cli
        .skip
        .as_deref()
        .map(|pattern| {
            Regex::new(pattern)
                .map_err(|e| anyhow::anyhow!("Invalid skip pattern '{}': {}", pattern, e))
        })
        .transpose()?;
    Ok((filter, skip))
}

fn list_strategies(cli: &Cli, registry: &Registry) -> anyhow::Result<()> {
    let (filter, skip) = compile_patterns(cli)?;
    let plan = build_plan(registry, Some(&filter), skip.as_ref());
    let width = plan.label_width();

    println!("FillBench Plan:");
    for def in &plan.strategies {
        match def.strategy().availability() {
            Availability::Available => println!("├── {}", def.label()),
            Availability::Unavailable { reason } => {
                println!("├── {:<width$}  (unavailable: {})", def.label(), reason)
            }
        }
    }
    println!("{} strategies found.", plan.strategies.len());
    Ok(())
}

fn run_strategies(cli: &Cli, config: &FillConfig, registry: &Registry) -> anyhow::Result<()> {
    let (filter, skip) = compile_patterns(cli)?;
    let plan = build_plan(registry, Some(&filter), skip.as_ref());

    if plan.strategies.is_empty() {
        println!("No strategies matched.");
        return Ok(());
    }

    let exec_config = execution_config(config);
    info!(
        strategies = plan.strategies.len(),
        array_size = exec_config.array_size,
        iterations = exec_config.iterations,
        verify = %exec_config.verify,
        "starting run"
    );

    let runner = Runner::new(exec_config).with_progress(config.output.progress);
    let format = config.output.format;

    match &cli.output {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(BenchError::Output)?;
            execute_plan(&plan, &runner, format, BufWriter::new(file), cli.verbose)?;
            eprintln!("Report written to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            execute_plan(&plan, &runner, format, stdout.lock(), cli.verbose)?;
        }
    }
    Ok(())
}

/// Run every strategy in `plan` and write the report in `format` to `out`.
///
/// Human output is streamed line by line. JSON is written once at the end,
/// including when a strategy fails, in which case the failing strategy is
/// recorded as failed and the error is still returned.
pub fn execute_plan<W: Write>(
    plan: &ExecutionPlan<'_>,
    runner: &Runner,
    format: OutputFormat,
    out: W,
    verbose: bool,
) -> Result<Vec<StrategyOutcome>, BenchError> {
    match format {
        OutputFormat::Human => {
            let mut reporter = HumanReporter::new(out, plan.label_width()).detailed(verbose);
            runner.run(plan.strategies.iter().copied(), &mut reporter)
        }
        OutputFormat::Json => {
            let mut reporter = JsonReporter::new(out);
            let result = runner.run(plan.strategies.iter().copied(), &mut reporter);
            let written = reporter.finish();
            let outcomes = result?;
            written?;
            Ok(outcomes)
        }
    }
}
