// error.rs - Errors raised by grid construction and access

use thiserror::Error;

/// All kinds of errors in this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Width and height must both be positive and their product addressable.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("buffer holds {actual} cells, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("grid is {}x{}, expected {}x{}", actual.0, actual.1, expected.0, expected.1)]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("unknown pattern `{0}`")]
    UnknownPattern(String),
}

pub type Result<T> = std::result::Result<T, Error>;
