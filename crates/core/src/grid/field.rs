//! Concentration grid storage
//!
//! The kernel never owns the grid it updates. Hosts hand it a [`GridView`],
//! an exclusive borrow of a row-major `f64` buffer, for the duration of a call.
//! [`ConcentrationField`] is an owned buffer for hosts written in Rust.

use super::geometry::GridGeometry;
use crate::error::KernelError;

/// Exclusive, shape-checked view over a host-owned concentration buffer
///
/// Stores values in row-major order (`row * cols + col`).
#[derive(Debug)]
pub struct GridView<'a> {
    data: &'a mut [f64],
    rows: usize,
    cols: usize,
}

impl<'a> GridView<'a> {
    /// Wrap a buffer of `rows × cols` values
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::GridShape`] if either dimension is zero or the
    /// buffer length differs from `rows * cols`.
    pub fn new(data: &'a mut [f64], rows: usize, cols: usize) -> Result<Self, KernelError> {
        if rows == 0 || cols == 0 || rows.checked_mul(cols) != Some(data.len()) {
            return Err(KernelError::GridShape {
                rows,
                cols,
                len: data.len(),
                resolution: rows.max(cols),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Number of rows (y axis)
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (x axis)
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Confirm the grid is `resolution × resolution` for `geometry`
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidGeometry`] for unusable bounds and
    /// [`KernelError::GridShape`] if the dimensions disagree with the resolution.
    pub fn check_geometry(&self, geometry: &GridGeometry) -> Result<(), KernelError> {
        geometry.validate()?;
        if self.rows != geometry.resolution || self.cols != geometry.resolution {
            return Err(KernelError::GridShape {
                rows: self.rows,
                cols: self.cols,
                len: self.data.len(),
                resolution: geometry.resolution,
            });
        }
        Ok(())
    }

    /// Value at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        self.data[row * self.cols + col]
    }

    /// One row of the grid
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Read-only access to the whole buffer
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &*self.data
    }

    /// Mutable access to the whole buffer
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut *self.data
    }
}

/// Owned concentration grid in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct ConcentrationField {
    /// Values in row-major order (row * cols + col)
    pub data: Vec<f64>,
    /// Number of rows (y axis)
    pub rows: usize,
    /// Number of columns (x axis)
    pub cols: usize,
}

impl ConcentrationField {
    /// Create a zeroed field sized for `geometry`
    #[must_use]
    pub fn for_geometry(geometry: &GridGeometry) -> Self {
        Self::new(geometry.resolution, geometry.resolution)
    }

    /// Create a field with given dimensions, initialized to zero
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_value(rows, cols, 0.0)
    }

    /// Create a field with given dimensions, initialized to a value
    #[must_use]
    pub fn with_value(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Borrow the field as a kernel view
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::GridShape`] for a zero-sized field.
    pub fn view_mut(&mut self) -> Result<GridView<'_>, KernelError> {
        GridView::new(&mut self.data, self.rows, self.cols)
    }

    /// Value at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        self.data[row * self.cols + col]
    }

    /// Set value at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        self.data[row * self.cols + col] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Read-only access to the buffer
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field = ConcentrationField::new(10, 20);
        assert_eq!(field.rows, 10);
        assert_eq!(field.cols, 20);
        assert_eq!(field.data.len(), 200);
        assert!(field.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_field_get_set() {
        let mut field = ConcentrationField::new(10, 10);
        field.set(3, 4, 123.45);
        assert_eq!(field.get(3, 4), 123.45);

        // Verify row-major indexing
        assert_eq!(field.data[3 * 10 + 4], 123.45);

        field.fill(0.0);
        assert_eq!(field.get(3, 4), 0.0);
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_field_bounds_check() {
        let field = ConcentrationField::new(10, 10);
        let _ = field.get(10, 5);
    }

    #[test]
    fn test_view_rejects_bad_shape() {
        let mut data = vec![0.0; 12];
        assert!(GridView::new(&mut data, 3, 4).is_ok());
        assert!(GridView::new(&mut data, 4, 4).is_err());
        assert!(GridView::new(&mut data, 0, 12).is_err());
        assert!(GridView::new(&mut [], 0, 0).is_err());
    }

    #[test]
    fn test_view_checks_geometry() {
        let geometry = GridGeometry::new(0.0, 100.0, 0.0, 100.0, 10).unwrap();
        let mut field = ConcentrationField::for_geometry(&geometry);
        assert!(field.view_mut().unwrap().check_geometry(&geometry).is_ok());

        let mut wrong = ConcentrationField::new(10, 12);
        let err = wrong
            .view_mut()
            .unwrap()
            .check_geometry(&geometry)
            .unwrap_err();
        assert!(matches!(err, KernelError::GridShape { resolution: 10, .. }));
    }

    #[test]
    fn test_view_row_access() {
        let mut field = ConcentrationField::new(3, 2);
        {
            let mut view = field.view_mut().unwrap();
            view.row_mut(1)[0] = 7.0;
            assert_eq!(view.get(1, 0), 7.0);
        }
        assert_eq!(field.data[2], 7.0);
    }
}
