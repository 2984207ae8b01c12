//! Static Partitioning
//!
//! Splits a buffer into contiguous, non-overlapping chunks, one per worker,
//! with the last chunk absorbing whatever the division leaves over.

use crate::Element;

/// Length of each chunk when `len` elements are split across `workers`.
///
/// Rounded up so that `workers` chunks always cover the whole range; never 0.
pub fn chunk_len(len: usize, workers: usize) -> usize {
    len.div_ceil(workers.max(1)).max(1)
}

/// Split `buffer` into at most `workers` chunks, each paired with the index of
/// its first element.
pub fn split(
    buffer: &mut [Element],
    workers: usize,
) -> impl Iterator<Item = (usize, &mut [Element])> {
    let size = chunk_len(buffer.len(), workers);
    buffer
        .chunks_mut(size)
        .enumerate()
        .map(move |(i, chunk)| (i * size, chunk))
}

/// Fill one chunk whose first element sits at `offset` in the full buffer.
#[inline]
pub fn fill_from(offset: usize, chunk: &mut [Element]) {
    for (i, slot) in chunk.iter_mut().enumerate() {
        *slot = (offset + i) as Element;
    }
}
