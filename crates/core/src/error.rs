//! Error type for kernel input validation
//!
//! Every variant is a caller-input error detected before the grid is touched,
//! so a failed call always leaves the concentration field unchanged.

use std::fmt;

/// Reasons a dispersion update can be rejected
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Grid data does not match the declared shape or the geometry's resolution
    GridShape {
        /// Number of rows the caller declared
        rows: usize,
        /// Number of columns the caller declared
        cols: usize,
        /// Length of the backing buffer
        len: usize,
        /// Cells per axis according to the geometry
        resolution: usize,
    },
    /// Geometry bounds or resolution are unusable
    InvalidGeometry(String),
    /// Window bounds fall outside the grid or are inverted
    WindowOutOfRange {
        /// Requested row range
        rows: (usize, usize),
        /// Requested column range
        cols: (usize, usize),
        /// Grid dimensions `(rows, cols)`
        grid: (usize, usize),
    },
    /// Wind speed is zero, negative or not finite
    InvalidWindSpeed(f64),
    /// Wind direction is not finite
    InvalidWindDirection(f64),
    /// A batch entry has a non-finite position or an invalid speed
    MalformedSource {
        /// Position of the entry in the batch
        index: usize,
        /// What was wrong with it
        reason: String,
    },
    /// A scalar parameter (emission rate, plume height, emission factor, ...) is invalid
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },
    /// Kernel configuration failed validation
    InvalidConfig(String),
    /// Observed and simulated series passed to model evaluation differ in length
    SeriesMismatch {
        /// Number of observations
        observed: usize,
        /// Number of simulated values
        simulated: usize,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::GridShape {
                rows,
                cols,
                len,
                resolution,
            } => write!(
                f,
                "Grid shape {rows}x{cols} (buffer length {len}) does not match resolution {resolution}"
            ),
            KernelError::InvalidGeometry(msg) => write!(f, "Invalid grid geometry: {msg}"),
            KernelError::WindowOutOfRange { rows, cols, grid } => write!(
                f,
                "Window rows {}..{} cols {}..{} out of range for {}x{} grid",
                rows.0, rows.1, cols.0, cols.1, grid.0, grid.1
            ),
            KernelError::InvalidWindSpeed(v) => {
                write!(f, "Wind speed must be finite and positive, got {v}")
            }
            KernelError::InvalidWindDirection(v) => {
                write!(f, "Wind direction must be finite, got {v}")
            }
            KernelError::MalformedSource { index, reason } => {
                write!(f, "Malformed source at index {index}: {reason}")
            }
            KernelError::InvalidParameter { name, value } => {
                write!(f, "Invalid value for {name}: {value}")
            }
            KernelError::InvalidConfig(msg) => write!(f, "Invalid kernel configuration: {msg}"),
            KernelError::SeriesMismatch {
                observed,
                simulated,
            } => write!(
                f,
                "Series length mismatch: {observed} observed vs {simulated} simulated"
            ),
        }
    }
}

impl std::error::Error for KernelError {}
