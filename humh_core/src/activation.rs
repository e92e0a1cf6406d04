//! Activation Rule - the observer's square neighborhood.
//!
//! The neighborhood is the clipped square `[row - r, row + r] × [col - r, col + r]`.
//! Presentation layers may draw it as a circle; that drawing is cosmetic and
//! no Euclidean distance is involved here.

use crate::grid::{Grid, Position};

/// Outcome of one activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Activation {
    /// In-bounds cells covered by the neighborhood
    pub touched: usize,
    /// Touched cells that were inactive immediately before the call
    pub newly_activated: usize,
}

/// Iterates over the in-bounds `(row, col)` cells of the square neighborhood
/// centered on `center`.
///
/// The square is clipped to `[0, grid_size)` on both axes before iteration, so
/// the work is bounded by the grid whatever the radius.
pub fn square_neighborhood(
    center: Position,
    square_neighborhood_radius: usize,
    grid_size: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let r = i64::try_from(square_neighborhood_radius).unwrap_or(i64::MAX);
    let n = i64::try_from(grid_size).unwrap_or(i64::MAX);
    let clip = |c: i64| (c.saturating_sub(r).max(0), c.saturating_add(r).min(n - 1));

    let (row_lo, row_hi) = clip(center.row);
    let (col_lo, col_hi) = clip(center.col);

    (row_lo..=row_hi)
        .flat_map(move |row| (col_lo..=col_hi).map(move |col| (row as usize, col as usize)))
}

/// Activates every cell of the square neighborhood in place.
pub fn apply(grid: &mut Grid, center: Position, square_neighborhood_radius: usize) -> Activation {
    let mut activation = Activation::default();

    for (row, col) in square_neighborhood(center, square_neighborhood_radius, grid.size()) {
        activation.touched += 1;
        if grid.set_active(row, col) {
            activation.newly_activated += 1;
        }
    }

    activation
}

/// Counts the cells `apply` would newly activate on `pre_grid`, without
/// mutating it.
pub fn count_newly_activated(
    pre_grid: &Grid,
    center: Position,
    square_neighborhood_radius: usize,
) -> usize {
    square_neighborhood(center, square_neighborhood_radius, pre_grid.size())
        .filter(|&(row, col)| !pre_grid.is_active(row, col))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_touch_covers_full_square() {
        let mut grid = Grid::new(9);
        let activation = apply(&mut grid, Position::new(4, 4), 2);

        assert_eq!(activation.touched, 25);
        assert_eq!(activation.newly_activated, 25);
        assert_eq!(grid.count_active(), 25);
        assert!(grid.is_active(2, 2));
        assert!(grid.is_active(6, 6));
        assert!(!grid.is_active(1, 4));
    }

    #[test]
    fn test_corner_touch_is_clipped() {
        let mut grid = Grid::new(5);
        let activation = apply(&mut grid, Position::new(0, 0), 2);

        // 3×3 in-bounds quadrant, not the full 5×5 square
        assert_eq!(activation.touched, 9);
        assert_eq!(activation.newly_activated, 9);
        assert_eq!(grid.count_active(), 9);
        assert!(grid.is_active(2, 2));
        assert!(!grid.is_active(3, 0));
    }

    #[test]
    fn test_square_not_disk() {
        let mut grid = Grid::new(7);
        apply(&mut grid, Position::new(3, 3), 2);

        // Corners of the square lie outside a radius-2 disk
        assert!(grid.is_active(1, 1));
        assert!(grid.is_active(5, 5));
        assert!(grid.is_active(1, 5));
    }

    #[test]
    fn test_second_apply_is_idempotent() {
        let mut grid = Grid::new(10);
        let center = Position::new(3, 7);

        let first = apply(&mut grid, center, 3);
        let after_first = grid.snapshot();
        let second = apply(&mut grid, center, 3);

        assert!(first.newly_activated > 0);
        assert_eq!(second.newly_activated, 0);
        assert_eq!(second.touched, first.touched);
        assert_eq!(grid, after_first);
    }

    #[test]
    fn test_counts_only_previously_inactive() {
        let mut grid = Grid::new(5);
        grid.set_active(2, 2);
        grid.set_active(1, 1);
        grid.set_active(4, 4); // outside the neighborhood

        let center = Position::new(2, 2);
        assert_eq!(count_newly_activated(&grid, center, 1), 7);

        let activation = apply(&mut grid, center, 1);
        assert_eq!(activation.touched, 9);
        assert_eq!(activation.newly_activated, 7);
    }

    #[test]
    fn test_count_does_not_mutate() {
        let grid = Grid::new(5);
        let before = grid.snapshot();
        count_newly_activated(&grid, Position::new(2, 2), 2);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_center_outside_grid() {
        let mut grid = Grid::new(5);

        // Center on the far edge row (row = N), only one row of overlap
        let activation = apply(&mut grid, Position::new(5, 2), 1);
        assert_eq!(activation.touched, 3);

        // Entirely off-grid
        let activation = apply(&mut grid, Position::new(-10, -10), 2);
        assert_eq!(activation, Activation::default());
    }

    #[test]
    fn test_huge_radius_is_clipped_to_grid() {
        let mut grid = Grid::new(5);
        let activation = apply(&mut grid, Position::new(2, 2), usize::MAX);

        assert_eq!(activation.touched, 25);
        assert_eq!(activation.newly_activated, 25);
        assert!(grid.is_fully_active());
    }

    #[test]
    fn test_huge_radius_from_extreme_center() {
        let mut grid = Grid::new(4);
        let activation = apply(&mut grid, Position::new(i64::MAX, -5), usize::MAX);
        assert_eq!(activation.touched, 16);

        // Small radius far off the grid touches nothing
        let mut grid = Grid::new(4);
        assert_eq!(apply(&mut grid, Position::new(i64::MAX, 0), 3), Activation::default());
        assert_eq!(apply(&mut grid, Position::new(0, i64::MIN), 3), Activation::default());
    }

    #[test]
    fn test_neighborhood_on_empty_grid() {
        assert_eq!(square_neighborhood(Position::new(0, 0), 3, 0).count(), 0);
    }

    #[test]
    fn test_radius_larger_than_grid_covers_everything() {
        let mut grid = Grid::new(5);
        let activation = apply(&mut grid, Position::new(2, 2), 10);

        assert_eq!(activation.touched, 25);
        assert!(grid.is_fully_active());
    }
}
