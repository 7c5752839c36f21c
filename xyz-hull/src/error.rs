//! Error types for hull computation and point loading.
//!
//! Library errors use `thiserror`, with helper methods to tell input
//! problems (the file or the rows) apart from geometry problems (the points
//! do not span a hull).

use thiserror::Error;

/// Errors that can occur while loading points or computing a hull.
#[derive(Debug, Error)]
pub enum HullError {
    /// A line of an xyz file could not be read as coordinates.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the input file
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Points do not all have the same number of coordinates.
    #[error("dimension mismatch at point {index}: expected {expected} coordinates, got {got}")]
    DimensionMismatch {
        /// 0-based index of the offending point
        index: usize,
        /// Dimension of the first point
        expected: usize,
        /// Dimension of the offending point
        got: usize,
    },

    /// Too few points, or points that do not span the space.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Hulls are only computed in 2D and 3D.
    #[error("unsupported dimension {0}: only 2D and 3D hulls are supported")]
    UnsupportedDimension(usize),

    /// The Quickhull loop did not terminate.
    #[error("maximum iterations exceeded ({0})")]
    MaxIterationsExceeded(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for hull operations.
pub type Result<T> = std::result::Result<T, HullError>;

impl HullError {
    /// Returns `true` if the error comes from reading or shaping the input.
    ///
    /// This includes `Parse`, `DimensionMismatch` and `Io`.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            HullError::Parse { .. } | HullError::DimensionMismatch { .. } | HullError::Io(_)
        )
    }

    /// Returns `true` if the points were read fine but no hull exists for them.
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            HullError::DegenerateInput(_)
                | HullError::UnsupportedDimension(_)
                | HullError::MaxIterationsExceeded(_)
        )
    }
}
