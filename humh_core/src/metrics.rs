//! HUMH Metrics
//! ============
//!
//! Pure functions over grid snapshots:
//! - **Harmonic Entropy**: `EH = 1 - |2p - 1|`, zero at an empty or full grid
//!   and one at an even split
//! - **Manifestation Cost**: fraction of the whole grid newly activated by a
//!   single touch
//! - **Parsimonious Energy**: raw cost scaled by `1 - compression / 100`
//!
//! None of these are sensitive to spatial pattern, only to counts.

use crate::activation::count_newly_activated;
use crate::grid::{Grid, Position};

/// Fraction of all N² cells that are active.
pub fn active_proportion(grid: &Grid) -> f64 {
    if grid.cell_count() == 0 {
        return 0.0;
    }
    grid.count_active() as f64 / grid.cell_count() as f64
}

/// Active proportion expressed in percent.
pub fn active_ratio_percent(grid: &Grid) -> f64 {
    active_proportion(grid) * 100.0
}

/// Closed-form harmonic entropy of an active proportion.
pub fn harmonic_entropy_of(p: f64) -> f64 {
    1.0 - (2.0 * p - 1.0).abs()
}

/// Returns `(EH, p)` for the grid.
pub fn harmonic_entropy(grid: &Grid) -> (f64, f64) {
    let p = active_proportion(grid);
    (harmonic_entropy_of(p), p)
}

/// Fraction of the grid that activating `center` would newly turn on,
/// measured against the pre-step snapshot.
///
/// Independent of how many cells are already active elsewhere.
pub fn manifestation_cost(pre_grid: &Grid, center: Position, square_neighborhood_radius: usize) -> f64 {
    if pre_grid.cell_count() == 0 {
        return 0.0;
    }
    let newly = count_newly_activated(pre_grid, center, square_neighborhood_radius);
    newly as f64 / pre_grid.cell_count() as f64
}

/// Scales a raw cost by the compression factor `1 - compression_percent / 100`.
///
/// At 100% compression the result is zero regardless of the raw cost.
pub fn parsimonious_energy(raw_cost_percent: f64, compression_percent: f64) -> f64 {
    raw_cost_percent * (1.0 - compression_percent / 100.0)
}
