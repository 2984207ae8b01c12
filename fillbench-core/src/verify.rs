//! Verification
//!
//! The correctness oracle applied to every filled buffer. No strategy is
//! trusted to be correct by construction.
//!
//! Two modes:
//! - **Exact**: every index holds its own value.
//! - **Proxy**: non-decreasing order plus correct first and last elements.
//!   Cheaper to reason about but weaker: a buffer with a repeated value in the
//!   middle and correct endpoints can still pass.

use crate::Element;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Verification mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VerifyMode {
    /// Compare every index against its expected value
    #[default]
    Exact,
    /// Sortedness plus endpoint check
    Proxy,
}

impl std::str::FromStr for VerifyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(VerifyMode::Exact),
            "proxy" | "sorted" => Ok(VerifyMode::Proxy),
            other => Err(format!("Unknown verify mode: {}", other)),
        }
    }
}

impl std::fmt::Display for VerifyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyMode::Exact => f.write_str("exact"),
            VerifyMode::Proxy => f.write_str("proxy"),
        }
    }
}

/// Why a buffer failed verification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyFailure {
    /// An index does not hold its own value
    #[error("index {index} holds {found}, expected {index}")]
    Mismatch {
        /// Offending index
        index: usize,
        /// Value found there
        found: Element,
    },
    /// The buffer decreases somewhere
    #[error("buffer is not sorted: index {index} holds {found} after {previous}")]
    NotSorted {
        /// Index of the smaller value
        index: usize,
        /// Value at `index - 1`
        previous: Element,
        /// Value at `index`
        found: Element,
    },
    /// First element is not 0
    #[error("first element is {found}, expected 0")]
    FirstElement {
        /// Value found at index 0
        found: Element,
    },
    /// Last element is not N-1
    #[error("last element is {found}, expected {expected}")]
    LastElement {
        /// Value found at index N-1
        found: Element,
        /// N-1
        expected: usize,
    },
}

/// Check a filled buffer. An empty buffer always passes.
pub fn verify(buffer: &[Element], mode: VerifyMode) -> Result<(), VerifyFailure> {
    match mode {
        VerifyMode::Exact => verify_exact(buffer),
        VerifyMode::Proxy => verify_proxy(buffer),
    }
}

fn verify_exact(buffer: &[Element]) -> Result<(), VerifyFailure> {
    match buffer
        .iter()
        .enumerate()
        .find(|&(i, &v)| v as usize != i)
    {
        Some((index, &found)) => Err(VerifyFailure::Mismatch { index, found }),
        None => Ok(()),
    }
}

fn verify_proxy(buffer: &[Element]) -> Result<(), VerifyFailure> {
    if let Some(i) = buffer.windows(2).position(|w| w[0] > w[1]) {
        return Err(VerifyFailure::NotSorted {
            index: i + 1,
            previous: buffer[i],
            found: buffer[i + 1],
        });
    }

    let (Some(&first), Some(&last)) = (buffer.first(), buffer.last()) else {
        return Ok(());
    };

    if first != 0 {
        return Err(VerifyFailure::FirstElement { found: first });
    }

    let expected = buffer.len() - 1;
    if last as usize != expected {
        return Err(VerifyFailure::LastElement {
            found: last,
            expected,
        });
    }

    Ok(())
}
