//! Moore-neighborhood resolution on a bounded (non-wrapping) square grid.
//!
//! Cardinal neighbors exist when the cell is not on the matching border.
//! A diagonal neighbor exists only when both of its adjacent cardinals do,
//! which is what keeps offsets like `i + dim + 1` from wrapping into the
//! next row.

/// The 8 cardinal and intercardinal directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    North = 0, // i - dim
    South = 1, // i + dim
    West  = 2, // i - 1
    East  = 3, // i + 1
    NW    = 4, // i - dim - 1
    NE    = 5, // i - dim + 1
    SW    = 6, // i + dim - 1
    SE    = 7, // i + dim + 1
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North, Direction::South,
        Direction::West,  Direction::East,
        Direction::NW,    Direction::NE,
        Direction::SW,    Direction::SE,
    ];

    /// `(row, col)` offset for this direction.
    #[inline]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West  => (0, -1),
            Direction::East  => (0, 1),
            Direction::NW    => (-1, -1),
            Direction::NE    => (-1, 1),
            Direction::SW    => (1, -1),
            Direction::SE    => (1, 1),
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Resolved neighbor indices of one cell, at most 8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbors {
    slots: [usize; 8],
    dirs: [Direction; 8],
    len: u8,
}

impl Neighbors {
    const EMPTY: Self = Self {
        slots: [0; 8],
        dirs: [Direction::North; 8],
        len: 0,
    };

    #[inline(always)]
    fn push(&mut self, dir: Direction, index: usize) {
        let n = self.len as usize;
        self.slots[n] = index;
        self.dirs[n] = dir;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.slots[..self.len as usize]
    }

    /// Neighbor index in direction `dir`, if it exists.
    pub fn get(&self, dir: Direction) -> Option<usize> {
        self.dirs[..self.len as usize]
            .iter()
            .position(|&d| d == dir)
            .map(|p| self.slots[p])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, usize)> + '_ {
        self.dirs[..self.len as usize]
            .iter()
            .copied()
            .zip(self.slots[..self.len as usize].iter().copied())
    }
}

/// Valid neighbors of flattened index `i` on a `dim`-wide grid of
/// `total` cells.
#[inline(always)]
pub fn neighbors(i: usize, dim: usize, total: usize) -> Neighbors {
    debug_assert!(dim > 0 && i < total);

    let col = i % dim;
    let east = col != dim - 1;
    let west = col != 0;
    let south = i + dim < total;
    let north = i >= dim;

    let mut out = Neighbors::EMPTY;
    if east {
        out.push(Direction::East, i + 1);
    }
    if west {
        out.push(Direction::West, i - 1);
    }
    if south {
        out.push(Direction::South, i + dim);
    }
    if north {
        out.push(Direction::North, i - dim);
    }
    if east && south {
        out.push(Direction::SE, i + dim + 1);
    }
    if west && south {
        out.push(Direction::SW, i + dim - 1);
    }
    if west && north {
        out.push(Direction::NW, i - dim - 1);
    }
    if east && north {
        out.push(Direction::NE, i - dim + 1);
    }
    out
}
