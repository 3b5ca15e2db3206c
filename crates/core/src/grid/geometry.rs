//! Affine mapping between grid indices and world coordinates
//!
//! Row `i` runs along y and column `j` runs along x. The centre of cell
//! `(i, j)` sits at:
//!
//! ```text
//! x = x_min + (j + 0.5) · (x_max − x_min) / resolution
//! y = y_min + (i + 0.5) · (y_max − y_min) / resolution
//! ```

use crate::error::KernelError;
use serde::{Deserialize, Serialize};

/// World bounds and cell count of a square concentration grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Western edge
    pub x_min: f64,
    /// Eastern edge
    pub x_max: f64,
    /// Southern edge
    pub y_min: f64,
    /// Northern edge
    pub y_max: f64,
    /// Cells per axis
    pub resolution: usize,
}

impl GridGeometry {
    /// Create a validated geometry
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidGeometry`] if the bounds are not finite,
    /// an axis has zero or negative extent, or the resolution is zero.
    pub fn new(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        resolution: usize,
    ) -> Result<Self, KernelError> {
        let geometry = Self {
            x_min,
            x_max,
            y_min,
            y_max,
            resolution,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check bounds and resolution
    ///
    /// # Errors
    ///
    /// See [`GridGeometry::new`].
    pub fn validate(&self) -> Result<(), KernelError> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(KernelError::InvalidGeometry(format!(
                "bounds must be finite, got x [{}, {}] y [{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        if self.x_max <= self.x_min {
            return Err(KernelError::InvalidGeometry(format!(
                "x_max ({}) must exceed x_min ({})",
                self.x_max, self.x_min
            )));
        }
        if self.y_max <= self.y_min {
            return Err(KernelError::InvalidGeometry(format!(
                "y_max ({}) must exceed y_min ({})",
                self.y_max, self.y_min
            )));
        }
        if self.resolution == 0 {
            return Err(KernelError::InvalidGeometry(
                "resolution must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Extent of the domain along x
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent of the domain along y
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Cell size along x
    #[inline]
    pub fn cell_width(&self) -> f64 {
        self.width() / self.resolution as f64
    }

    /// Cell size along y
    #[inline]
    pub fn cell_height(&self) -> f64 {
        self.height() / self.resolution as f64
    }

    /// World position of the centre of cell `(row, col)`
    #[inline]
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.x_min + (col as f64 + 0.5) * self.cell_width(),
            self.y_min + (row as f64 + 0.5) * self.cell_height(),
        )
    }

    /// Cell `(row, col)` containing a world position, if it lies inside the domain
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !(self.x_min..self.x_max).contains(&x) || !(self.y_min..self.y_max).contains(&y) {
            return None;
        }
        let col = ((x - self.x_min) / self.cell_width()).floor() as usize;
        let row = ((y - self.y_min) / self.cell_height()).floor() as usize;
        Some((row.min(self.resolution - 1), col.min(self.resolution - 1)))
    }
}
