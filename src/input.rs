//! Ciphertext and seed loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::automaton::Seed;
use crate::error::Result;

/// Read a ciphertext file, dropping leading and trailing whitespace.
pub fn read_ciphertext(path: impl AsRef<Path>) -> Result<String> {
    let raw = fs::read_to_string(path)?;
    Ok(raw.trim().to_owned())
}

/// Resolve a seed argument: the contents of `arg` if it names a file,
/// otherwise `arg` itself.
pub fn resolve_seed(arg: &str) -> Result<Seed> {
    match fs::read_to_string(arg) {
        Ok(contents) => {
            tracing::debug!(path = arg, "seed read from file");
            Seed::parse(&contents)
        }
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::InvalidInput) => {
            Seed::parse(arg)
        }
        Err(err) => Err(err.into()),
    }
}
