use thiserror::Error;

/// Errors raised while building, stepping or decoding a cipher grid.
///
/// None of these are transient: every operation is a pure function of its
/// inputs, so retrying without changing the input reproduces the failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("seed can only contain [abc]+, got {0:?}")]
    InvalidSeed(String),

    #[error("more workers than work to do: {workers} workers for {cells} cells")]
    InsufficientWork { workers: usize, cells: usize },

    #[error("worker count must be greater than 0")]
    NoWorkers,

    #[error("grid dimension must be at least 1 (empty ciphertext?)")]
    EmptyGrid,

    #[error("invalid cell symbol {value:#04x} at index {index}")]
    InvalidSymbol { index: usize, value: u8 },

    #[error("grid of dimension {dim} needs {expected} cells, got {len}")]
    GridSize {
        dim: usize,
        expected: usize,
        len: usize,
    },

    #[error("cell {index} written by more than one chunk")]
    OverlappingChunk { index: usize },

    #[error("cell {index} not written by any chunk")]
    UnwrittenCell { index: usize },

    #[error("chunk [{start}, {stop}) does not fit a grid of {cells} cells")]
    ChunkOutOfRange {
        start: usize,
        stop: usize,
        cells: usize,
    },

    #[error("chunk [{start}, {stop}) carries {len} cells")]
    ChunkLength { start: usize, stop: usize, len: usize },

    #[error("neighbor sum {sum} at index {index} exceeds the maximum of 16")]
    SumOutOfRange { index: usize, sum: u32 },

    #[error("ciphertext character {ch:?} at position {index} is not in the rotation alphabet")]
    InvalidCiphertext { index: usize, ch: char },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(err.to_string())
    }
}
