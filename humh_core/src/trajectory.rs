//! Deterministic observer trajectory.
//!
//! Two independent sinusoids of the step index, mapped onto `[0, N]`. The
//! upper value `N` sits just past the grid; the activation rule clips it.

use crate::grid::Position;

/// Step divisor of the row sinusoid.
pub const ROW_PERIOD_DIVISOR: f64 = 15.0;

/// Step divisor of the column cosinusoid.
pub const COL_PERIOD_DIVISOR: f64 = 20.0;

/// Maps a value in [-1, 1] onto `[0, grid_size]`, truncating toward zero.
fn to_axis(wave: f64, grid_size: usize) -> i64 {
    ((wave + 1.0) / 2.0 * grid_size as f64) as i64
}

/// Observer position at `step` on an N×N grid.
pub fn observer_position(step: usize, grid_size: usize) -> Position {
    let t = step as f64;
    Position::new(
        to_axis((t / ROW_PERIOD_DIVISOR).sin(), grid_size),
        to_axis((t / COL_PERIOD_DIVISOR).cos(), grid_size),
    )
}
