//! Buffer Allocation
//!
//! Every iteration gets a freshly allocated buffer. Allocation is fallible
//! (`try_reserve_exact`) so that an oversized request surfaces as an error
//! rather than aborting the process.

use crate::Element;
use std::collections::TryReserveError;
use thiserror::Error;

/// Value written into fresh buffers before a strategy runs.
///
/// No index of a valid buffer ever equals it, so a strategy that skips an
/// index cannot pass verification by accident.
pub const POISON: Element = Element::MAX;

/// Largest buffer length whose indices all fit below [`POISON`].
pub const MAX_BUFFER_LEN: usize = Element::MAX as usize;

/// Buffer allocation failure
#[derive(Debug, Error)]
pub enum AllocError {
    /// The allocator refused the request
    #[error("failed to allocate {len} elements: {source}")]
    OutOfMemory {
        /// Requested length in elements
        len: usize,
        /// Underlying allocator error
        #[source]
        source: TryReserveError,
    },
    /// The requested length cannot be represented by the element type
    #[error("buffer of {len} elements exceeds the maximum of {max}")]
    TooLarge {
        /// Requested length in elements
        len: usize,
        /// Maximum supported length
        max: usize,
    },
}

/// Allocate a poisoned buffer of `len` elements.
pub fn allocate_buffer(len: usize) -> Result<Vec<Element>, AllocError> {
    if len > MAX_BUFFER_LEN {
        return Err(AllocError::TooLarge {
            len,
            max: MAX_BUFFER_LEN,
        });
    }

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|source| AllocError::OutOfMemory { len, source })?;
    buffer.resize(len, POISON);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_buffer_is_poisoned() {
        let buffer = allocate_buffer(16).unwrap();
        assert_eq!(buffer.len(), 16);
        assert!(buffer.iter().all(|&v| v == POISON));
    }

    #[test]
    fn test_single_element_buffer_does_not_satisfy_invariant() {
        let buffer = allocate_buffer(1).unwrap();
        assert_ne!(buffer[0], 0);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = allocate_buffer(0).unwrap();
        assert!(buffer.is_empty());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_too_large() {
        let err = allocate_buffer(MAX_BUFFER_LEN + 1).unwrap_err();
        assert!(matches!(err, AllocError::TooLarge { .. }));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_out_of_memory_is_reported() {
        // allocate_buffer rejects this length as TooLarge first
        let mut buffer: Vec<Element> = Vec::new();
        let source = buffer.try_reserve_exact(usize::MAX / 2).unwrap_err();
        let err = AllocError::OutOfMemory {
            len: usize::MAX / 2,
            source,
        };
        assert!(err.to_string().starts_with("failed to allocate"));
    }
}
