//! Fatal Run Errors
//!
//! Every variant stops the whole run: results from a harness that has seen a
//! wrong buffer are not worth reporting.

use fillbench_core::{AllocError, StrategyError, VerifyFailure};
use thiserror::Error;

/// Exit code for a verification failure
pub const EXIT_VERIFICATION: u8 = 1;
/// Exit code for invalid configuration or usage
pub const EXIT_USAGE: u8 = 2;
/// Exit code for a buffer allocation failure
pub const EXIT_ALLOCATION: u8 = 3;
/// Exit code for a strategy execution failure
pub const EXIT_STRATEGY: u8 = 4;
/// Exit code for a failure writing the report
pub const EXIT_OUTPUT: u8 = 5;

/// A condition that halts the benchmark run
#[derive(Debug, Error)]
pub enum BenchError {
    /// A fresh buffer could not be allocated
    #[error("{label} failed: {source}")]
    Allocation {
        /// Strategy being measured
        label: String,
        /// Allocation error
        #[source]
        source: AllocError,
    },
    /// A strategy produced a wrong buffer
    #[error("{label} failed verification on iteration {iteration}: {failure}")]
    Verification {
        /// Strategy that produced the buffer
        label: String,
        /// 1-based iteration number
        iteration: u32,
        /// What was wrong
        failure: VerifyFailure,
    },
    /// A strategy's own execution substrate failed
    #[error("{label} failed: {source}")]
    Strategy {
        /// Strategy that failed
        label: String,
        /// Execution error
        #[source]
        source: StrategyError,
    },
    /// The report could not be written
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl BenchError {
    /// Label of the strategy that caused the failure, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            BenchError::Allocation { label, .. }
            | BenchError::Verification { label, .. }
            | BenchError::Strategy { label, .. } => Some(label),
            BenchError::Output(_) => None,
        }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            BenchError::Verification { .. } => EXIT_VERIFICATION,
            BenchError::Allocation { .. } => EXIT_ALLOCATION,
            BenchError::Strategy { .. } => EXIT_STRATEGY,
            BenchError::Output(_) => EXIT_OUTPUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_message_names_strategy() {
        let err = BenchError::Verification {
            label: "broken".to_string(),
            iteration: 1,
            failure: VerifyFailure::Mismatch {
                index: 500,
                found: 0,
            },
        };
        assert_eq!(
            err.to_string(),
            "broken failed verification on iteration 1: index 500 holds 0, expected 500"
        );
        assert_eq!(err.label(), Some("broken"));
        assert_eq!(err.exit_code(), EXIT_VERIFICATION);
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            EXIT_VERIFICATION,
            EXIT_USAGE,
            EXIT_ALLOCATION,
            EXIT_STRATEGY,
            EXIT_OUTPUT,
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_output_error_has_no_label() {
        let err = BenchError::from(std::io::Error::other("pipe closed"));
        assert_eq!(err.label(), None);
        assert_eq!(err.exit_code(), EXIT_OUTPUT);
    }
}
