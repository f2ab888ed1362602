//! Error types for sim-core.

use thiserror::Error;

/// Errors raised while building or validating a simulation.
///
/// Stepping itself never fails; everything here is caught at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The solver needs at least one interior cell.
    #[error("grid must be at least 3x3, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize },

    /// The two grids of a buffer pair differ in shape.
    #[error("grid dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// A simulation parameter is out of its valid range.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Kernel weights do not sum to zero.
    #[error("laplacian kernel weights must sum to zero, got {sum}")]
    UnbalancedKernel { sum: f64 },

    /// Preset name not recognised.
    #[error("unknown preset: {0} (expected symmetric, mitosis or coral)")]
    UnknownPreset(String),
}
