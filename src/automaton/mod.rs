//! Three-symbol generational automaton and its parallel coordinator.

mod engine;
pub mod grid;
mod kernel;
pub mod neighbors;
pub mod partition;
pub mod rules;

pub use engine::{CipherLife, CipherLifeConfig, GENERATIONS, Phase, WORKERS_ENV, merge};
pub use grid::{Grid, Seed};
pub use kernel::{ChunkResult, neighbor_sum, step_cell, step_chunk};
pub use partition::{Chunk, partition};
pub use rules::{RuleTable, SumClass, Symbol};
