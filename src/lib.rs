//! Rotation-cipher decryption driven by a parallel three-symbol cellular
//! automaton.
//!
//! A square grid is seeded by repeating a pattern over `{a, b, c}`, advanced
//! for exactly [`GENERATIONS`] generations on a worker pool, and the column
//! weight sums of the final grid become the per-character rotations that
//! decode the ciphertext.

pub mod automaton;
pub mod cipher;
pub mod error;
pub mod input;

pub use automaton::{CipherLife, CipherLifeConfig, GENERATIONS, Grid, Seed, Symbol};
pub use error::{Error, Result};

/// Everything produced by a full decryption.
#[derive(Clone, Debug)]
pub struct Decryption {
    pub plaintext: String,
    pub grid: Grid,
    pub column_aggregates: Vec<u32>,
}

/// Run the automaton for `ciphertext` and decode it.
///
/// The grid dimension is the ciphertext length in characters. The returned
/// plaintext has surrounding whitespace removed.
pub fn decrypt(ciphertext: &str, seed: &Seed, config: CipherLifeConfig) -> Result<Decryption> {
    let dim = ciphertext.chars().count();
    let initial = Grid::generate(dim, seed)?;
    let mut engine = CipherLife::with_config(dim, config)?;
    let grid = engine.run(initial)?;
    let column_aggregates = grid.column_aggregates()?;
    let plaintext = cipher::decrypt(ciphertext, &column_aggregates)?
        .trim()
        .to_owned();
    Ok(Decryption {
        plaintext,
        grid,
        column_aggregates,
    })
}
