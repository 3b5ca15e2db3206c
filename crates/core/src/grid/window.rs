//! Index rectangles bounding the cells a source can influence
//!
//! Visiting only the cells within a fixed radius of a source turns the per-source
//! cost from `O(resolution²)` into `O((R / cell_size)²)`.

use super::geometry::GridGeometry;
use crate::error::KernelError;
use serde::{Deserialize, Serialize};

/// Half-open index rectangle `[row_min, row_max) × [col_min, col_max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Window {
    /// First row visited
    pub row_min: usize,
    /// One past the last row visited
    pub row_max: usize,
    /// First column visited
    pub col_min: usize,
    /// One past the last column visited
    pub col_max: usize,
}

impl Window {
    /// Create a window from explicit bounds
    pub const fn new(row_min: usize, row_max: usize, col_min: usize, col_max: usize) -> Self {
        Self {
            row_min,
            row_max,
            col_min,
            col_max,
        }
    }

    /// Window covering every cell of a `rows × cols` grid
    pub const fn full(rows: usize, cols: usize) -> Self {
        Self::new(0, rows, 0, cols)
    }

    /// Square window of half-side `radius` centred on `(x, y)`, clamped to the grid
    ///
    /// Each bound is `floor((p − min ± radius) / extent · resolution)` clamped to
    /// `[0, dim]`. A source far outside the domain produces an empty window rather
    /// than an error, and the result always satisfies [`Window::validate`].
    pub fn around(
        x: f64,
        y: f64,
        radius: f64,
        geometry: &GridGeometry,
        rows: usize,
        cols: usize,
    ) -> Self {
        let res = geometry.resolution as f64;
        let to_row = |v: f64| clamp_index((v - geometry.y_min) / geometry.height() * res, rows);
        let to_col = |v: f64| clamp_index((v - geometry.x_min) / geometry.width() * res, cols);

        let row_min = to_row(y - radius);
        let row_max = to_row(y + radius).max(row_min);
        let col_min = to_col(x - radius);
        let col_max = to_col(x + radius).max(col_min);

        Self::new(row_min, row_max, col_min, col_max)
    }

    /// Check the window lies inside a `rows × cols` grid
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::WindowOutOfRange`] if a range is inverted or
    /// extends past the grid.
    pub fn validate(&self, rows: usize, cols: usize) -> Result<(), KernelError> {
        if self.row_min > self.row_max
            || self.col_min > self.col_max
            || self.row_max > rows
            || self.col_max > cols
        {
            return Err(KernelError::WindowOutOfRange {
                rows: (self.row_min, self.row_max),
                cols: (self.col_min, self.col_max),
                grid: (rows, cols),
            });
        }
        Ok(())
    }

    /// True when the window contains no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_min >= self.row_max || self.col_min >= self.col_max
    }

    /// Number of cells inside the window
    #[inline]
    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.row_max - self.row_min) * (self.col_max - self.col_min)
        }
    }

    /// Whether `(row, col)` falls inside the window
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_min..self.row_max).contains(&row) && (self.col_min..self.col_max).contains(&col)
    }
}

/// Floor a fractional index and clamp it to `[0, dim]`; NaN maps to 0
#[inline]
fn clamp_index(value: f64, dim: usize) -> usize {
    if value.is_nan() {
        return 0;
    }
    value.floor().clamp(0.0, dim as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(resolution: usize) -> GridGeometry {
        GridGeometry::new(0.0, 1000.0, 0.0, 1000.0, resolution).unwrap()
    }

    #[test]
    fn test_window_centered_in_domain() {
        let g = geometry(100);
        let w = Window::around(500.0, 500.0, 100.0, &g, 100, 100);
        assert_eq!(w, Window::new(40, 60, 40, 60));
        assert_eq!(w.cell_count(), 400);
        assert!(w.validate(100, 100).is_ok());
    }

    #[test]
    fn test_window_axes_follow_rows_and_columns() {
        let g = geometry(100);
        // x drives columns, y drives rows
        let w = Window::around(150.0, 800.0, 100.0, &g, 100, 100);
        assert_eq!((w.row_min, w.row_max), (70, 90));
        assert_eq!((w.col_min, w.col_max), (5, 25));
    }

    #[test]
    fn test_window_clamped_at_edges() {
        let g = geometry(100);
        let w = Window::around(20.0, 990.0, 100.0, &g, 100, 100);
        assert_eq!(w.col_min, 0);
        assert_eq!(w.col_max, 12);
        assert_eq!(w.row_min, 89);
        assert_eq!(w.row_max, 100);
        assert!(w.validate(100, 100).is_ok());
    }

    #[test]
    fn test_radius_larger_than_grid() {
        let g = geometry(10);
        let w = Window::around(500.0, 500.0, 1e6, &g, 10, 10);
        assert_eq!(w, Window::full(10, 10));
    }

    #[test]
    fn test_source_outside_domain_gives_empty_window() {
        let g = geometry(100);
        for (x, y) in [(-5000.0, 500.0), (500.0, 9000.0), (-1e9, -1e9), (1e9, 1e9)] {
            let w = Window::around(x, y, 100.0, &g, 100, 100);
            assert!(w.is_empty(), "({x}, {y}) -> {w:?}");
            assert!(w.validate(100, 100).is_ok());
            assert_eq!(w.cell_count(), 0);
        }
    }

    #[test]
    fn test_non_finite_inputs_stay_in_range() {
        let g = geometry(100);
        let w = Window::around(f64::NAN, f64::INFINITY, 100.0, &g, 100, 100);
        assert!(w.validate(100, 100).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(Window::new(0, 11, 0, 10).validate(10, 10).is_err());
        assert!(Window::new(0, 10, 0, 11).validate(10, 10).is_err());
        assert!(Window::new(5, 4, 0, 10).validate(10, 10).is_err());
        assert!(Window::new(5, 5, 0, 0).validate(10, 10).is_ok());
    }

    #[test]
    fn test_contains() {
        let w = Window::new(2, 4, 3, 6);
        assert!(w.contains(2, 3));
        assert!(w.contains(3, 5));
        assert!(!w.contains(4, 3));
        assert!(!w.contains(2, 6));
    }
}
