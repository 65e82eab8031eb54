//! Worker coordinator: snapshot, dispatch, collect and merge per generation.

use rayon::prelude::*;
use std::time::Instant;

use super::grid::Grid;
use super::kernel::{ChunkResult, step_chunk};
use super::partition::{Chunk, partition};
use super::rules::RuleTable;
use crate::error::{Error, Result};

/// Number of generations a full run advances.
pub const GENERATIONS: usize = 100;

/// Environment override for the auto-detected worker count.
pub const WORKERS_ENV: &str = "CIPHER_LIFE_WORKERS";

/// Coordinator state, exposed for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    SnapshotReady,
    Dispatch,
    Collect,
    Merge,
    Done,
}

/// Configuration for a CipherLife engine instance.
///
/// Use `CipherLifeConfig::default()` for auto-detected defaults, or set
/// individual knobs via the builder methods.
#[derive(Clone, Debug, Default)]
pub struct CipherLifeConfig {
    /// Number of workers (chunks and pool threads).
    /// `None` means auto-detect: `CIPHER_LIFE_WORKERS` if set, otherwise
    /// physical cores, clamped to the cell count.
    pub worker_count: Option<usize>,
    /// Hard upper bound on pool threads regardless of `worker_count`.
    /// Chunk count is unaffected.
    pub max_threads: Option<usize>,
}

impl CipherLifeConfig {
    /// Set an explicit worker count. Zero is rejected when the engine is built.
    pub fn worker_count(mut self, n: usize) -> Self {
        self.worker_count = Some(n);
        self
    }

    /// Set a hard upper bound on pool threads.
    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }
}

fn env_worker_count() -> Option<usize> {
    std::env::var(WORKERS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}

#[inline]
fn auto_worker_count() -> usize {
    env_worker_count().unwrap_or_else(|| num_cpus::get_physical().max(1))
}

/// Resolve the worker count for a grid of `total_cells`.
///
/// An explicit count is returned as-is so that `partition` can reject it;
/// the auto-detected count is clamped so the default always fits.
fn resolve_worker_count(config: &CipherLifeConfig, total_cells: usize) -> usize {
    match config.worker_count {
        Some(n) => n,
        None => auto_worker_count().min(total_cells).max(1),
    }
}

fn resolve_thread_count(config: &CipherLifeConfig, workers: usize) -> usize {
    let mut threads = workers;
    if let Some(cap) = config.max_threads {
        threads = threads.min(cap);
    }
    threads.max(1)
}

/// Write every chunk result into a fresh grid, in whatever order they come.
///
/// Fails if a chunk lies outside the grid, carries the wrong number of
/// cells, or if a cell is written twice or never.
pub fn merge(dim: usize, results: impl IntoIterator<Item = ChunkResult>) -> Result<Grid> {
    let total = dim * dim;
    let mut cells = vec![0u8; total];
    let mut written = vec![false; total];
    merge_into(&mut cells, &mut written, results)?;
    Grid::from_cells(dim, cells)
}

fn merge_into(
    cells: &mut [u8],
    written: &mut [bool],
    results: impl IntoIterator<Item = ChunkResult>,
) -> Result<()> {
    written.fill(false);
    for result in results {
        let Chunk { start, stop } = result.chunk;
        if start > stop || stop > cells.len() {
            return Err(Error::ChunkOutOfRange {
                start,
                stop,
                cells: cells.len(),
            });
        }
        if result.cells.len() != stop - start {
            return Err(Error::ChunkLength {
                start,
                stop,
                len: result.cells.len(),
            });
        }
        if let Some(offset) = written[start..stop].iter().position(|&w| w) {
            return Err(Error::OverlappingChunk {
                index: start + offset,
            });
        }
        cells[start..stop].copy_from_slice(&result.cells);
        written[start..stop].fill(true);
    }
    if let Some(index) = written.iter().position(|&w| !w) {
        return Err(Error::UnwrittenCell { index });
    }
    Ok(())
}

/// Parallel generational stepper.
///
/// Owns a rayon pool that is built once and reused for every generation.
/// Each generation reads a frozen snapshot, steps one chunk per task, and
/// merges all chunk results before the next generation starts.
pub struct CipherLife {
    pool: rayon::ThreadPool,
    rules: RuleTable,
    chunks: Vec<Chunk>,
    dim: usize,
    generation: usize,
    phase: Phase,
    /// Reusable per-cell written flags for merge validation.
    written: Vec<bool>,
}

impl CipherLife {
    /// Build an engine for a `dim` x `dim` grid.
    pub fn with_config(dim: usize, config: CipherLifeConfig) -> Result<Self> {
        if dim == 0 {
            return Err(Error::EmptyGrid);
        }
        let total = dim * dim;
        let workers = resolve_worker_count(&config, total);
        let chunks = partition(total, workers)?;
        let threads = resolve_thread_count(&config, workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("cipher-life-{i}"))
            .build()?;

        tracing::debug!(dim, workers, threads, "built cipher-life engine");

        Ok(Self {
            pool,
            rules: RuleTable::new(),
            chunks,
            dim,
            generation: 0,
            phase: Phase::Idle,
            written: vec![false; total],
        })
    }

    /// Build an engine with auto-detected workers.
    pub fn new(dim: usize) -> Result<Self> {
        Self::with_config(dim, CipherLifeConfig::default())
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Generations completed since the last `run` began.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn check_grid(&self, grid: &Grid) -> Result<()> {
        if grid.dim() != self.dim {
            return Err(Error::GridSize {
                dim: self.dim,
                expected: self.dim * self.dim,
                len: grid.len(),
            });
        }
        Ok(())
    }

    /// Dispatch one task per chunk against `snapshot` and collect them all.
    ///
    /// The first failing task aborts collection.
    fn dispatch(&mut self, snapshot: &[u8]) -> Result<Vec<ChunkResult>> {
        self.phase = Phase::Dispatch;
        let dim = self.dim;
        let rules = &self.rules;
        let chunks = &self.chunks;
        let results = self.pool.install(|| {
            chunks
                .par_iter()
                .map(|&chunk| {
                    tracing::trace!(start = chunk.start, stop = chunk.stop, "step chunk");
                    step_chunk(snapshot, dim, chunk, rules)
                })
                .collect::<Result<Vec<ChunkResult>>>()
        });
        self.phase = Phase::Collect;
        results
    }

    /// Advance `current` by one generation into `next`.
    fn step_into(&mut self, current: &[u8], next: &mut [u8]) -> Result<()> {
        self.phase = Phase::SnapshotReady;
        let results = self.dispatch(current)?;
        self.phase = Phase::Merge;
        let mut written = std::mem::take(&mut self.written);
        let merged = merge_into(next, &mut written, results);
        self.written = written;
        merged?;
        self.generation += 1;
        Ok(())
    }

    /// Advance `grid` by a single generation.
    pub fn step(&mut self, grid: &Grid) -> Result<Grid> {
        self.check_grid(grid)?;
        let mut next = grid.clone();
        let outcome = self.step_into(grid.cells(), next.cells_mut());
        self.phase = Phase::Idle;
        outcome.map(|()| next)
    }

    /// Run exactly `GENERATIONS` generations starting from `initial`.
    ///
    /// A failing generation aborts the run; no partial grid is returned.
    pub fn run(&mut self, initial: Grid) -> Result<Grid> {
        self.run_generations(initial, GENERATIONS)
    }

    pub(crate) fn run_generations(&mut self, initial: Grid, generations: usize) -> Result<Grid> {
        self.check_grid(&initial)?;
        self.generation = 0;
        let start = Instant::now();
        tracing::info!(
            dim = self.dim,
            workers = self.worker_count(),
            threads = self.thread_count(),
            generations,
            "running automaton"
        );

        let mut current = initial;
        let mut next = current.clone();
        for _ in 0..generations {
            let gen_start = Instant::now();
            if let Err(err) = self.step_into(current.cells(), next.cells_mut()) {
                self.phase = Phase::Idle;
                tracing::error!(generation = self.generation + 1, %err, "generation failed");
                return Err(err);
            }
            std::mem::swap(&mut current, &mut next);
            tracing::debug!(
                generation = self.generation,
                elapsed_us = gen_start.elapsed().as_micros() as u64,
                "generation merged"
            );
        }

        self.phase = Phase::Done;
        tracing::info!(
            generations = self.generation,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "automaton finished"
        );
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CipherLife, CipherLifeConfig, GENERATIONS, Phase, merge, resolve_thread_count,
        resolve_worker_count,
    };
    use crate::automaton::grid::{Grid, Seed};
    use crate::automaton::kernel::ChunkResult;
    use crate::automaton::partition::Chunk;
    use crate::automaton::rules::Symbol;
    use crate::error::Error;

    fn engine(dim: usize, workers: usize) -> CipherLife {
        CipherLife::with_config(dim, CipherLifeConfig::default().worker_count(workers))
            .expect("build engine")
    }

    #[test]
    fn explicit_worker_count_is_not_clamped() {
        let config = CipherLifeConfig::default().worker_count(50);
        assert_eq!(resolve_worker_count(&config, 9), 50);
    }

    #[test]
    fn auto_worker_count_fits_grid() {
        let config = CipherLifeConfig::default();
        assert_eq!(resolve_worker_count(&config, 1), 1);
        assert!(resolve_worker_count(&config, 10_000) >= 1);
    }

    #[test]
    fn max_threads_caps_pool_not_chunks() {
        let config = CipherLifeConfig::default().worker_count(8).max_threads(2);
        assert_eq!(resolve_thread_count(&config, 8), 2);
        let engine = CipherLife::with_config(4, config).unwrap();
        assert_eq!(engine.worker_count(), 8);
        assert_eq!(engine.thread_count(), 2);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let config = CipherLifeConfig::default().worker_count(0);
        assert!(matches!(
            CipherLife::with_config(3, config),
            Err(Error::NoWorkers)
        ));
    }

    #[test]
    fn step_advances_generation_and_resets_phase() {
        let mut engine = engine(3, 2);
        let grid = Grid::generate(3, &Seed::parse("a").unwrap()).unwrap();
        assert_eq!(engine.phase(), Phase::Idle);
        let next = engine.step(&grid).unwrap();
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(next.count(Symbol::B), 9);
    }

    #[test]
    fn run_ends_in_done_after_fixed_generations() {
        let mut engine = engine(4, 3);
        let grid = Grid::generate(4, &Seed::parse("abc").unwrap()).unwrap();
        engine.run(grid).unwrap();
        assert_eq!(engine.generation(), GENERATIONS);
        assert_eq!(engine.phase(), Phase::Done);
    }

    #[test]
    fn run_rejects_mismatched_grid() {
        let mut engine = engine(4, 1);
        let grid = Grid::generate(3, &Seed::parse("a").unwrap()).unwrap();
        assert!(matches!(engine.run(grid), Err(Error::GridSize { .. })));
    }

    #[test]
    fn failing_chunk_aborts_run() {
        let mut engine = engine(3, 3);
        let grid = Grid::from_cells(3, b"aaaaaaaqa".to_vec()).unwrap();
        let err = engine.run(grid).unwrap_err();
        assert!(matches!(err, Error::InvalidSymbol { index: 7, value: b'q' }));
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn merge_rejects_overlap_and_gaps() {
        let overlap = vec![
            ChunkResult { chunk: Chunk::new(0, 3), cells: b"aaa".to_vec() },
            ChunkResult { chunk: Chunk::new(2, 4), cells: b"bb".to_vec() },
        ];
        assert!(matches!(
            merge(2, overlap),
            Err(Error::OverlappingChunk { index: 2 })
        ));

        let gap = vec![ChunkResult { chunk: Chunk::new(0, 3), cells: b"aaa".to_vec() }];
        assert!(matches!(merge(2, gap), Err(Error::UnwrittenCell { index: 3 })));
    }

    #[test]
    fn merge_rejects_malformed_chunks() {
        let past_end = vec![ChunkResult { chunk: Chunk::new(0, 5), cells: b"aaaaa".to_vec() }];
        assert!(matches!(
            merge(2, past_end),
            Err(Error::ChunkOutOfRange { start: 0, stop: 5, cells: 4 })
        ));

        let reversed = vec![ChunkResult { chunk: Chunk::new(3, 1), cells: Vec::new() }];
        assert!(matches!(
            merge(2, reversed),
            Err(Error::ChunkOutOfRange { start: 3, stop: 1, .. })
        ));

        let short = vec![ChunkResult { chunk: Chunk::new(0, 4), cells: b"aa".to_vec() }];
        assert!(matches!(
            merge(2, short),
            Err(Error::ChunkLength { start: 0, stop: 4, len: 2 })
        ));
    }

    #[test]
    fn merge_writes_each_range() {
        let results = vec![
            ChunkResult { chunk: Chunk::new(2, 4), cells: b"cc".to_vec() },
            ChunkResult { chunk: Chunk::new(0, 2), cells: b"ab".to_vec() },
        ];
        let grid = merge(2, results).unwrap();
        assert_eq!(grid.cells(), b"abcc");
    }
}
