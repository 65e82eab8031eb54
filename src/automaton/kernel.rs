//! Per-cell generation stepper.
//!
//! Everything here reads from an immutable snapshot and returns owned
//! output, so any number of workers may call it concurrently on disjoint
//! chunks of the same snapshot.

use super::neighbors::neighbors;
use super::partition::Chunk;
use super::rules::{RuleTable, Symbol};
use crate::error::{Error, Result};

/// Output of one chunk task: the next-generation cells for `chunk`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkResult {
    pub chunk: Chunk,
    pub cells: Vec<u8>,
}

#[inline(always)]
fn weight_at(snapshot: &[u8], index: usize) -> Result<u32> {
    let value = snapshot[index];
    Symbol::from_cell(value)
        .map(Symbol::weight)
        .ok_or(Error::InvalidSymbol { index, value })
}

/// Sum of neighbor weights for cell `i`.
#[inline(always)]
pub fn neighbor_sum(snapshot: &[u8], dim: usize, i: usize) -> Result<u32> {
    let mut sum = 0;
    for &n in neighbors(i, dim, snapshot.len()).as_slice() {
        sum += weight_at(snapshot, n)?;
    }
    Ok(sum)
}

/// Next value of cell `i`.
#[inline(always)]
pub fn step_cell(snapshot: &[u8], dim: usize, i: usize, rules: &RuleTable) -> Result<u8> {
    let sum = neighbor_sum(snapshot, dim, i)?;
    rules.next(snapshot[i], sum, i)
}

/// Step every cell in `chunk` against `snapshot`.
pub fn step_chunk(
    snapshot: &[u8],
    dim: usize,
    chunk: Chunk,
    rules: &RuleTable,
) -> Result<ChunkResult> {
    debug_assert!(chunk.stop <= snapshot.len());
    let cells = chunk
        .range()
        .map(|i| step_cell(snapshot, dim, i, rules))
        .collect::<Result<Vec<u8>>>()?;
    Ok(ChunkResult { chunk, cells })
}
