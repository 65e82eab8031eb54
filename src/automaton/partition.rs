//! Contiguous work partitioning of the flattened grid.

use std::ops::Range;

use crate::error::{Error, Result};

/// Half-open index range `[start, stop)` handled by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub start: usize,
    pub stop: usize,
}

impl Chunk {
    #[inline]
    pub const fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.stop - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.stop == self.start
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.stop
    }
}

/// Split `total_cells` into `worker_count` contiguous chunks.
///
/// Every chunk gets `total_cells / worker_count` cells and the first
/// `total_cells % worker_count` chunks one more, so sizes differ by at most 1.
pub fn partition(total_cells: usize, worker_count: usize) -> Result<Vec<Chunk>> {
    if worker_count == 0 {
        return Err(Error::NoWorkers);
    }
    if worker_count > total_cells {
        return Err(Error::InsufficientWork {
            workers: worker_count,
            cells: total_cells,
        });
    }

    let base = total_cells / worker_count;
    let remainder = total_cells % worker_count;
    let mut chunks = Vec::with_capacity(worker_count);
    let mut start = 0;
    for worker in 0..worker_count {
        let stop = start + base + usize::from(worker < remainder);
        chunks.push(Chunk::new(start, stop));
        start = stop;
    }
    debug_assert_eq!(start, total_cells);
    Ok(chunks)
}
