//! Integration tests for FillBench
//!
//! These tests verify the end-to-end behavior of the harness: library runs
//! against an in-memory writer, and the `fillbench` binary itself.

use fillbench::strategies::{RayonStatic, ScopedThreads, Sequential};
use fillbench::{
    BenchError, Element, ExecutionConfig, HumanReporter, OutputFormat, Registry, Runner,
    StrategyOutcome, VerifyMode, build_plan, execute_plan, strategy_fn,
};
use std::process::Command;

fn config(array_size: usize, iterations: u32) -> ExecutionConfig {
    ExecutionConfig {
        array_size,
        iterations,
        workers: 4,
        threads: 4,
        verify: VerifyMode::Exact,
    }
}

fn report_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Parse the mean from a `label: seconds` line
fn mean_of(line: &str) -> f64 {
    let (_, value) = line.rsplit_once(':').unwrap();
    value.trim().parse().unwrap()
}

/// Sequential plus a four-worker strategy: a header and one line each, in order
#[test]
fn test_end_to_end_report_shape() {
    let registry = Registry::new()
        .with("seq", Sequential)
        .unwrap()
        .with("four-workers", RayonStatic::new(4))
        .unwrap();
    let runner = Runner::new(config(1000, 3));

    let mut out = Vec::new();
    let mut reporter = HumanReporter::new(&mut out, 12);
    let outcomes = runner.run(&registry, &mut reporter).unwrap();
    assert_eq!(outcomes.len(), 2);

    let lines = report_lines(&out);
    assert_eq!(lines.len(), 3, "unexpected report: {lines:?}");
    assert!(lines[0].starts_with("Number of processors: "));
    assert!(lines[0].ends_with(", number of iterations: 3"));
    assert!(lines[1].starts_with("seq"));
    assert!(lines[2].starts_with("four-workers"));
    assert!(mean_of(&lines[1]) >= 0.0);
    assert!(mean_of(&lines[2]) >= 0.0);
}

/// A strategy that zeroes index 500 halts the run on its first iteration
#[test]
fn test_broken_strategy_halts_run() {
    let registry = Registry::new()
        .with(
            "broken",
            strategy_fn(|buffer: &mut [Element]| {
                for (i, slot) in buffer.iter_mut().enumerate() {
                    *slot = i as Element;
                }
                buffer[500] = 0;
                Ok(())
            }),
        )
        .unwrap()
        .with("seq", Sequential)
        .unwrap();
    let plan = build_plan(&registry, None, None);
    let runner = Runner::new(config(1000, 3));

    let mut out = Vec::new();
    let err = execute_plan(&plan, &runner, OutputFormat::Human, &mut out, false).unwrap_err();

    match &err {
        BenchError::Verification {
            label, iteration, ..
        } => {
            assert_eq!(label, "broken");
            assert_eq!(*iteration, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_ne!(err.exit_code(), 0);

    let lines = report_lines(&out);
    assert_eq!(lines.len(), 2, "unexpected report: {lines:?}");
    assert!(lines[1].contains("broken"));
    assert!(!lines.iter().any(|l| l.starts_with("seq")));
}

/// The reported mean is the accumulated time divided by the iteration count
#[test]
fn test_mean_equals_total_over_iterations() {
    let registry = Registry::new()
        .with("threads", ScopedThreads::new(3))
        .unwrap();
    let runner = Runner::new(config(10_000, 5));

    let mut out = Vec::new();
    let mut reporter = HumanReporter::new(&mut out, 7);
    let outcomes = runner.run(&registry, &mut reporter).unwrap();

    let StrategyOutcome::Completed(timing) = &outcomes[0] else {
        panic!("expected a completed strategy");
    };
    assert_eq!(timing.iterations(), 5);
    let expected = timing.total_secs / 5.0;
    assert_eq!(timing.mean_secs(), expected);

    let lines = report_lines(&out);
    assert!((mean_of(&lines[1]) - expected).abs() < 1e-9);
}

/// Output lines follow registration order, not label order
#[test]
fn test_output_follows_registration_order() {
    let registry = Registry::new()
        .with("zz-last-alphabetically", Sequential)
        .unwrap()
        .with("aa-first-alphabetically", RayonStatic::new(2))
        .unwrap();
    let plan = build_plan(&registry, None, None);
    let runner = Runner::new(config(100, 1));

    let mut out = Vec::new();
    execute_plan(&plan, &runner, OutputFormat::Human, &mut out, false).unwrap();

    let lines = report_lines(&out);
    assert!(lines[1].starts_with("zz-last-alphabetically"));
    assert!(lines[2].starts_with("aa-first-alphabetically"));
}

/// Every built-in strategy passes at a size that does not divide evenly
#[test]
fn test_standard_registry_passes_exact_and_proxy() {
    let registry = Registry::standard(4, 3).unwrap();
    let plan = build_plan(&registry, None, None);

    for verify in [VerifyMode::Exact, VerifyMode::Proxy] {
        let runner = Runner::new(ExecutionConfig {
            verify,
            ..config(10_007, 2)
        });
        let mut out = Vec::new();
        let outcomes =
            execute_plan(&plan, &runner, OutputFormat::Human, &mut out, true).unwrap();
        assert_eq!(outcomes.len(), registry.len());
    }
}

#[test]
fn test_json_report() {
    let registry = Registry::new().with("seq", Sequential).unwrap();
    let plan = build_plan(&registry, None, None);
    let runner = Runner::new(config(1000, 3));

    let mut out = Vec::new();
    execute_plan(&plan, &runner, OutputFormat::Json, &mut out, false).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["meta"]["config"]["iterations"], 3);
    assert_eq!(value["results"][0]["label"], "seq");
    assert_eq!(value["results"][0]["metrics"]["iterations"], 3);
    assert_eq!(value["summary"]["total_strategies"], 1);
}

fn fillbench_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fillbench"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_runs_selected_strategies() {
    let output = fillbench_bin()
        .args([
            "^(sequential|rayon-static)$",
            "--array-size",
            "1000",
            "--iterations",
            "3",
            "--no-progress",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines = report_lines(&output.stdout);
    assert_eq!(lines.len(), 3, "unexpected stdout: {lines:?}");
    assert!(lines[0].starts_with("Number of processors: "));
    assert!(lines[1].starts_with("sequential"));
    assert!(lines[2].starts_with("rayon-static"));
}

#[test]
fn test_binary_full_registry() {
    let output = fillbench_bin()
        .args(["--array-size", "1000", "--iterations", "3", "--no-progress"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines = report_lines(&output.stdout);
    assert_eq!(lines.len(), 1 + Registry::standard(4, 1).unwrap().len());
}

#[test]
fn test_binary_rejects_zero_iterations() {
    let output = fillbench_bin()
        .args(["--iterations", "0", "--no-progress"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_binary_list() {
    let output = fillbench_bin().arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("sequential"));
    assert!(stdout.contains("9 strategies found."));
}
