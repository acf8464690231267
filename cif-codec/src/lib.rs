//! # CIF Codec
//!
//! Encoder/decoder for the CIF sparse image format.
//!
//! A CIF file represents an image as a mapping from color to the set of
//! pixel positions holding that color. Each color becomes one text row:
//!
//! ```text
//! <colorHex>,<alpha>,<token>,<token>,...
//! ```
//!
//! where every `<token>` is either a literal pixel id or, in compressed
//! files, an inclusive range `start~end` covering a run of consecutive
//! ids. Pixel ids are row-major: `id = y * width + x`.
//!
//! The format does not persist image dimensions; they travel with the
//! file out of band and are passed to the decode entry points.
//!
//! ## Modules
//!
//! - [`row`]: one color's row to/from text tokens, including
//!   run-length range compression
//! - [`store`]: the in-memory [`Cif`] color index and its recolor
//!   operations
//! - [`rows`]: row-oriented text file reader/writer
//! - [`pipeline`]: full encode/decode between [`PixelBuffer`] and file
//!
//! ## Example
//!
//! ```rust
//! use cif_codec::pipeline;
//! use cif_core::{Color, PixelBuffer};
//!
//! let mut buffer = PixelBuffer::new(2, 2);
//! buffer.set(1, 1, Color::WHITE).unwrap();
//!
//! let cif = pipeline::cif_from_buffer(&buffer);
//! assert_eq!(cif.render(), buffer);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod pipeline;
pub mod row;
pub mod rows;
pub mod store;

// Re-exports for convenience
pub use pipeline::{
    cif_from_buffer, load_cif, load_image, save_buffer, save_buffer_compressed, save_cif,
};
pub use row::RowData;
pub use store::Cif;
