use serde::{Deserialize, Serialize};

/// Aggregate statistics of a concentration grid
///
/// Hosts use these to scale colour maps and to report overall load.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridSummary {
    /// Largest cell value, 0 for an empty grid
    pub max: f64,
    /// Mean over all cells
    pub mean: f64,
    /// Sum over all cells
    pub total: f64,
    /// Cells holding a non-zero value
    pub nonzero_cells: usize,
    /// Cells inspected
    pub cell_count: usize,
}

impl GridSummary {
    /// Summarize a row-major grid buffer
    ///
    /// NaN cells are ignored by `max` but propagate into `mean` and `total`.
    pub fn from_cells(cells: &[f64]) -> Self {
        if cells.is_empty() {
            return Self::default();
        }

        let (max, total, nonzero_cells) = cells.iter().fold(
            (f64::NEG_INFINITY, 0.0, 0usize),
            |(max, total, nonzero), &v| (max.max(v), total + v, nonzero + usize::from(v != 0.0)),
        );

        Self {
            max,
            mean: total / cells.len() as f64,
            total,
            nonzero_cells,
            cell_count: cells.len(),
        }
    }

    /// Fraction of cells with a non-zero value
    pub fn coverage(&self) -> f64 {
        if self.cell_count == 0 {
            0.0
        } else {
            self.nonzero_cells as f64 / self.cell_count as f64
        }
    }
}
