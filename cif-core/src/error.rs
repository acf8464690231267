//! Error types for CIF operations.
//!
//! The taxonomy separates four concerns: out-of-bounds pixel ids,
//! missing recolor targets, malformed text rows, and I/O failures.
//! Only I/O failures propagate out of a file decode; row- and
//! token-level problems are recovered by skipping the offending unit.

use std::io;
use thiserror::Error;

/// The main error type for CIF operations.
#[derive(Debug, Error)]
pub enum CifError {
    /// I/O error from the underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Pixel id outside the valid range `[0, checksum)`.
    #[error("Pixel id {id} out of bounds (checksum {checksum})")]
    OutOfBounds {
        /// The offending pixel id.
        id: u32,
        /// Exclusive upper bound (`width * height`).
        checksum: u32,
    },

    /// No bucket exists for the requested color.
    #[error("Color not found: #{hex}")]
    ColorNotFound {
        /// Hex representation of the missing color.
        hex: String,
    },

    /// No bucket owns the requested pixel.
    #[error("Pixel ({x}, {y}) not present in any color bucket")]
    PixelNotFound {
        /// X coordinate.
        x: u32,
        /// Y coordinate.
        y: u32,
    },

    /// Malformed color hex field.
    #[error("Invalid color hex: {token:?}")]
    InvalidHex {
        /// The token that failed to parse.
        token: String,
    },

    /// Malformed alpha field.
    #[error("Invalid alpha value: {token:?}")]
    InvalidAlpha {
        /// The token that failed to parse.
        token: String,
    },

    /// Row too short or otherwise structurally broken.
    #[error("Malformed row: {message}")]
    MalformedRow {
        /// Description of the problem.
        message: String,
    },
}

/// Result type alias for CIF operations.
pub type Result<T> = std::result::Result<T, CifError>;

impl CifError {
    /// Create an out-of-bounds error.
    pub fn out_of_bounds(id: u32, checksum: u32) -> Self {
        Self::OutOfBounds { id, checksum }
    }

    /// Create a color-not-found error.
    pub fn color_not_found(hex: impl Into<String>) -> Self {
        Self::ColorNotFound { hex: hex.into() }
    }

    /// Create a pixel-not-found error.
    pub fn pixel_not_found(x: u32, y: u32) -> Self {
        Self::PixelNotFound { x, y }
    }

    /// Create an invalid-hex error.
    pub fn invalid_hex(token: impl Into<String>) -> Self {
        Self::InvalidHex {
            token: token.into(),
        }
    }

    /// Create an invalid-alpha error.
    pub fn invalid_alpha(token: impl Into<String>) -> Self {
        Self::InvalidAlpha {
            token: token.into(),
        }
    }

    /// Create a malformed-row error.
    pub fn malformed_row(message: impl Into<String>) -> Self {
        Self::MalformedRow {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CifError::out_of_bounds(16, 16);
        assert!(err.to_string().contains("out of bounds"));

        let err = CifError::color_not_found("FF00AA");
        assert!(err.to_string().contains("FF00AA"));

        let err = CifError::invalid_alpha("abc");
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: CifError = io_err.into();
        assert!(matches!(err, CifError::Io(_)));
    }
}
