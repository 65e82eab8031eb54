//! Square cell grid stored as a flattened row-major byte vector.

use std::fmt;

use super::rules::Symbol;
use crate::error::{Error, Result};

/// A validated, non-empty seed pattern over `{a, b, c}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seed(Vec<u8>);

impl Seed {
    /// Validate a seed string. Surrounding whitespace is ignored, case is significant.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| Symbol::from_cell(b).is_some()) {
            return Err(Error::InvalidSeed(trimmed.to_owned()));
        }
        Ok(Self(trimmed.as_bytes().to_vec()))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::str::FromStr for Seed {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bytes are ASCII by construction.
        f.write_str(std::str::from_utf8(&self.0).map_err(|_| fmt::Error)?)
    }
}

/// An N x N grid, `cells[row * dim + col]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    dim: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Build the initial grid by repeating `seed` across the whole flattened
    /// sequence. Row boundaries do not restart the pattern.
    pub fn generate(dim: usize, seed: &Seed) -> Result<Self> {
        if dim == 0 {
            return Err(Error::EmptyGrid);
        }
        let pattern = seed.as_bytes();
        let cells = pattern.iter().copied().cycle().take(dim * dim).collect();
        Ok(Self { dim, cells })
    }

    /// Wrap raw cell bytes. Only the length is checked; out-of-alphabet
    /// bytes are reported when the grid is stepped or aggregated.
    pub fn from_cells(dim: usize, cells: Vec<u8>) -> Result<Self> {
        if dim == 0 {
            return Err(Error::EmptyGrid);
        }
        let expected = dim * dim;
        if cells.len() != expected {
            return Err(Error::GridSize {
                dim,
                expected,
                len: cells.len(),
            });
        }
        Ok(Self { dim, cells })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Total cell count (`dim * dim`).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Symbol at `(row, col)`, or `None` when out of bounds or not a symbol.
    pub fn get(&self, row: usize, col: usize) -> Option<Symbol> {
        if row >= self.dim || col >= self.dim {
            return None;
        }
        Symbol::from_cell(self.cells[row * self.dim + col])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.dim)
    }

    /// Per-column sum of weights over all rows.
    pub fn column_aggregates(&self) -> Result<Vec<u32>> {
        let mut sums = vec![0u32; self.dim];
        for (i, &value) in self.cells.iter().enumerate() {
            let symbol = Symbol::from_cell(value).ok_or(Error::InvalidSymbol { index: i, value })?;
            sums[i % self.dim] += symbol.weight();
        }
        Ok(sums)
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        let cell = symbol.as_cell();
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for &cell in row {
                write!(f, "{}", cell.escape_ascii())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.dim, self.dim)?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, Seed};
    use crate::automaton::rules::Symbol;
    use crate::error::Error;

    #[test]
    fn seed_rejects_empty_and_foreign_characters() {
        assert!(matches!(Seed::parse(""), Err(Error::InvalidSeed(_))));
        assert!(matches!(Seed::parse("   "), Err(Error::InvalidSeed(_))));
        assert!(matches!(Seed::parse("abd"), Err(Error::InvalidSeed(_))));
        assert!(matches!(Seed::parse("ABC"), Err(Error::InvalidSeed(_))));
        assert!(matches!(Seed::parse("a b"), Err(Error::InvalidSeed(_))));
    }

    #[test]
    fn seed_is_trimmed() {
        let seed = Seed::parse("  abca\n").unwrap();
        assert_eq!(seed.as_bytes(), b"abca");
        assert_eq!(seed.to_string(), "abca");
    }

    #[test]
    fn generate_repeats_across_row_boundaries() {
        let seed = Seed::parse("ab").unwrap();
        let grid = Grid::generate(3, &seed).unwrap();
        assert_eq!(grid.cells(), b"ababababa");
        // Row 1 starts with `b` because the cycle continues from row 0.
        assert_eq!(grid.get(1, 0), Some(Symbol::B));
        assert_eq!(grid.get(2, 2), Some(Symbol::A));
    }

    #[test]
    fn generate_rejects_zero_dimension() {
        let seed = Seed::parse("a").unwrap();
        assert!(matches!(Grid::generate(0, &seed), Err(Error::EmptyGrid)));
    }

    #[test]
    fn from_cells_checks_length() {
        assert!(matches!(
            Grid::from_cells(2, b"abc".to_vec()),
            Err(Error::GridSize { dim: 2, expected: 4, len: 3 })
        ));
        assert!(Grid::from_cells(2, b"abca".to_vec()).is_ok());
    }

    #[test]
    fn column_aggregates_sum_weights_down_columns() {
        let grid = Grid::from_cells(3, b"abcbcaacc".to_vec()).unwrap();
        // col0: a b a = 0+1+0, col1: b c c = 1+2+2, col2: c a c = 2+0+2
        assert_eq!(grid.column_aggregates().unwrap(), vec![1, 5, 4]);
    }

    #[test]
    fn column_aggregates_report_bad_cells() {
        let grid = Grid::from_cells(2, b"abxa".to_vec()).unwrap();
        assert!(matches!(
            grid.column_aggregates(),
            Err(Error::InvalidSymbol { index: 2, value: b'x' })
        ));
    }

    #[test]
    fn display_renders_rows() {
        let grid = Grid::from_cells(2, b"abca".to_vec()).unwrap();
        assert_eq!(grid.to_string(), "ab\nca");
        assert_eq!(grid.rows().count(), 2);
        assert_eq!(grid.count(Symbol::A), 2);
    }
}
