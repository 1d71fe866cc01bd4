// src/utils/error.rs

use thiserror::Error;

/// The primary error type for all operations in the colour flood library.
#[derive(Error, Debug)]
pub enum FillError {
    /// An error occurred during I/O operations (e.g. the output file could not be created).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The run configuration violates a documented precondition.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A textual argument (axis order, hex colour) could not be parsed.
    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    /// A seed pixel lies outside the canvas.
    #[error("Seed pixel ({x}, {y}) lies outside the {width}x{height} canvas")]
    SeedOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Occurs when a reference image does not match the canvas dimensions.
    #[error(
        "Dimension mismatch: expected ({}, {}), but got ({}, {})",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The seed source closed without a single pixel being painted.
    #[error("No seed pixel was painted; the fill has nowhere to grow from")]
    NoSeeds,

    /// The worker pool for neighbour fan-out could not be started.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Encoding or decoding an image failed.
    #[error("Image codec error: {0}")]
    Encode(String),
}

impl From<image::ImageError> for FillError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => FillError::Io(io),
            other => FillError::Encode(other.to_string()),
        }
    }
}

/// A specialized `Result` type for colour flood operations.
pub type Result<T> = std::result::Result<T, FillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_out_of_bounds_message() {
        let err = FillError::SeedOutOfBounds {
            x: 9,
            y: 2,
            width: 4,
            height: 4,
        };
        assert_eq!(
            err.to_string(),
            "Seed pixel (9, 2) lies outside the 4x4 canvas"
        );
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = FillError::DimensionMismatch {
            expected: (4, 4),
            actual: (3, 5),
        };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected (4, 4), but got (3, 5)"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FillError = io.into();
        assert!(matches!(err, FillError::Io(_)));
    }
}
