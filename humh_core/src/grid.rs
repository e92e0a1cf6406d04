//! Fixed-size square grid of binary cells.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A `(row, col)` pair. May lie outside the grid; every touch is bounds-checked
/// independently by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i64,
    pub col: i64,
}

impl Position {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

/// N×N matrix of cells, each inactive (`false`) or active (`true`).
///
/// Dimensions are fixed at construction. `Clone` produces an independent
/// snapshot with no aliasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    /// Row-major cell states
    cells: Vec<bool>,
}

impl Grid {
    /// Creates a fully inactive grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Creates a grid where each cell is independently active with
    /// `active_probability`, drawn from `rng`.
    ///
    /// Probabilities outside [0, 1] are clamped; NaN is treated as 0.
    pub fn random<R: Rng + ?Sized>(size: usize, active_probability: f64, rng: &mut R) -> Self {
        let p = if active_probability.is_nan() {
            0.0
        } else {
            active_probability.clamp(0.0, 1.0)
        };

        let cells = (0..size * size).map(|_| rng.gen_bool(p)).collect();
        Self { size, cells }
    }

    /// Populates a grid from a ChaCha8 RNG seeded with `seed`, or from OS
    /// entropy when no seed is given.
    pub fn initialize(size: usize, active_probability: f64, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::random(size, active_probability, &mut rng)
    }

    /// Builds a grid from explicit rows. Returns `None` unless the rows form a
    /// non-ragged square.
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Returns an independent copy of the current state.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (N²).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }

    /// Returns true if the cell is active. Out-of-range cells read as inactive.
    pub fn is_active(&self, row: usize, col: usize) -> bool {
        self.index(row, col).map(|i| self.cells[i]).unwrap_or(false)
    }

    /// Marks a cell active. Returns true if the cell was inactive before.
    ///
    /// Already-active and out-of-range cells are left untouched.
    pub fn set_active(&mut self, row: usize, col: usize) -> bool {
        match self.index(row, col) {
            Some(i) if !self.cells[i] => {
                self.cells[i] = true;
                true
            }
            _ => false,
        }
    }

    /// Number of active cells.
    pub fn count_active(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Returns true when every cell is active.
    pub fn is_fully_active(&self) -> bool {
        self.cells.iter().all(|&c| c)
    }

    /// Iterates over rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        // chunks(0) panics; an empty grid has no rows anyway
        self.cells.chunks(self.size.max(1))
    }
}
