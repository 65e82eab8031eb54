//! Three-symbol alphabet and its neighbor-sum transition rules.
//!
//! Every neighbor sum falls in `0..=16` (eight neighbors of weight at most
//! 2), so the prime/even classification is precomputed once into a 17-entry
//! table and shared read-only by all workers.

use crate::error::{Error, Result};

/// Largest possible neighbor sum: 8 neighbors, each `C` (weight 2).
pub const MAX_NEIGHBOR_SUM: u32 = 16;

/// A single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Symbol {
    A = b'a',
    B = b'b',
    C = b'c',
}

impl Symbol {
    pub const ALL: [Symbol; 3] = [Symbol::A, Symbol::B, Symbol::C];

    /// Weight contributed to a neighbor sum.
    #[inline(always)]
    pub const fn weight(self) -> u32 {
        match self {
            Symbol::A => 0,
            Symbol::B => 1,
            Symbol::C => 2,
        }
    }

    /// Decode a raw cell byte.
    #[inline(always)]
    pub const fn from_cell(value: u8) -> Option<Symbol> {
        match value {
            b'a' => Some(Symbol::A),
            b'b' => Some(Symbol::B),
            b'c' => Some(Symbol::C),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn as_cell(self) -> u8 {
        self as u8
    }

    /// Apply this symbol's transition rule.
    ///
    /// Each symbol keeps itself on a prime sum, advances one step on an even
    /// sum and one step back otherwise (A -> B -> C -> A).
    #[inline(always)]
    pub const fn next(self, is_prime: bool, is_even: bool) -> Symbol {
        match self {
            Symbol::A => {
                if is_prime {
                    Symbol::A
                } else if is_even {
                    Symbol::B
                } else {
                    Symbol::C
                }
            }
            Symbol::B => {
                if is_prime {
                    Symbol::B
                } else if is_even {
                    Symbol::C
                } else {
                    Symbol::A
                }
            }
            Symbol::C => {
                if is_prime {
                    Symbol::C
                } else if is_even {
                    Symbol::A
                } else {
                    Symbol::B
                }
            }
        }
    }
}

/// Classification of a neighbor sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SumClass {
    Prime,
    /// Even and not prime.
    Even,
    /// Odd and not prime.
    Odd,
}

impl SumClass {
    #[inline(always)]
    pub const fn is_prime(self) -> bool {
        matches!(self, SumClass::Prime)
    }

    #[inline(always)]
    pub const fn is_even(self) -> bool {
        matches!(self, SumClass::Even)
    }
}

const fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

const fn classify(sum: u32) -> SumClass {
    if is_prime(sum) {
        SumClass::Prime
    } else if sum % 2 == 0 {
        SumClass::Even
    } else {
        SumClass::Odd
    }
}

/// Precomputed sum classification for `0..=MAX_NEIGHBOR_SUM`.
#[derive(Clone, Debug)]
pub struct RuleTable {
    classes: [SumClass; MAX_NEIGHBOR_SUM as usize + 1],
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTable {
    pub const fn new() -> Self {
        let mut classes = [SumClass::Odd; MAX_NEIGHBOR_SUM as usize + 1];
        let mut sum = 0;
        while sum <= MAX_NEIGHBOR_SUM {
            classes[sum as usize] = classify(sum);
            sum += 1;
        }
        Self { classes }
    }

    #[inline(always)]
    pub fn class(&self, sum: u32) -> Option<SumClass> {
        self.classes.get(sum as usize).copied()
    }

    /// Sums in `0..=MAX_NEIGHBOR_SUM` with the given class, ascending.
    pub fn members(&self, class: SumClass) -> Vec<u32> {
        (0..=MAX_NEIGHBOR_SUM)
            .filter(|&sum| self.class(sum) == Some(class))
            .collect()
    }

    /// Next value of the raw cell at `index`, given its neighbor sum.
    #[inline(always)]
    pub fn next(&self, value: u8, sum: u32, index: usize) -> Result<u8> {
        let symbol = Symbol::from_cell(value).ok_or(Error::InvalidSymbol { index, value })?;
        let class = self.class(sum).ok_or(Error::SumOutOfRange { index, sum })?;
        Ok(symbol.next(class.is_prime(), class.is_even()).as_cell())
    }
}
