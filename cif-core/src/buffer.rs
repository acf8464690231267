//! Owned raster pixel buffer.
//!
//! `PixelBuffer` is the raster-side collaborator of the codec: a dense,
//! row-major grid of [`Color`] values. Pixels never written keep the
//! transparent background, which is what a partially-filled CIF renders
//! onto.

use crate::color::Color;
use crate::error::{CifError, Result};

/// A dense, row-major raster of ARGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Create a buffer filled with [`Color::TRANSPARENT`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; (width as usize) * (height as usize)],
        }
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels (`width * height`).
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the buffer holds zero pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Read the pixel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Result<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write the pixel at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        let i = self.index(x, y)?;
        self.pixels[i] = color;
        Ok(())
    }

    /// Iterate pixels in raster order together with their `(x, y)`
    /// position. This is the scan order the encoder uses, so bucket id
    /// sequences come out sorted ascending.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        let width = self.width;
        self.pixels.iter().enumerate().map(move |(i, &color)| {
            let i = i as u32;
            (i % width, i / width, color)
        })
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            // Saturating: the reported id is diagnostic only, and the
            // row-major multiply can wrap for absurd coordinates.
            return Err(CifError::out_of_bounds(
                y.saturating_mul(self.width).saturating_add(x),
                crate::coord::checksum(self.width, self.height),
            ));
        }
        Ok((y as usize) * (self.width as usize) + (x as usize))
    }
}
