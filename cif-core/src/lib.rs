//! # CIF Core
//!
//! Core components for the CIF sparse image format.
//!
//! This crate provides the building blocks the codec layer is written
//! against:
//!
//! - [`color`]: ARGB color type and the hex+alpha text representation
//! - [`buffer`]: owned raster pixel buffer
//! - [`coord`]: linear pixel id <-> (x, y) coordinate mapping
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! The CIF stack is layered:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ L3: CLI                                     │
//! │     cif binary, raster import/export        │
//! ├─────────────────────────────────────────────┤
//! │ L2: Codec                                   │
//! │     row codec, CIF store, file pipeline     │
//! ├─────────────────────────────────────────────┤
//! │ L1: Core (this crate)                       │
//! │     Color, PixelBuffer, coord, errors       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cif_core::color::Color;
//! use cif_core::coord;
//!
//! let red = Color::from_hex("FF0000", 255).unwrap();
//! assert_eq!(red.to_hex(), "FF0000");
//!
//! // Row-major linear ids
//! assert_eq!(coord::to_id(1, 2, 4), 9);
//! assert_eq!(coord::to_xy(9, 4), (1, 2));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod color;
pub mod coord;
pub mod error;

// Re-exports for convenience
pub use buffer::PixelBuffer;
pub use color::Color;
pub use error::{CifError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::buffer::PixelBuffer;
    pub use crate::color::Color;
    pub use crate::coord;
    pub use crate::error::{CifError, Result};
}
