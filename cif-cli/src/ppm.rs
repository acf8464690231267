//! Minimal binary PPM (P6) reader/writer.
//!
//! The CIF codec needs a raster format to talk to; P6 is the smallest
//! one that round-trips RGB losslessly. Alpha does not exist in PPM:
//! reads produce fully opaque pixels and writes drop the alpha channel.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use cif_core::{CifError, Color, PixelBuffer, Result};

fn bad_image(message: String) -> CifError {
    CifError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

const MAGIC: &[u8; 2] = b"P6";

/// Read a binary PPM file into a pixel buffer. Pixels come out with
/// alpha 255.
pub fn read_ppm(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let mut header = Header::new(&data);
    let magic = header.token()?;
    if magic != MAGIC {
        return Err(bad_image(format!(
            "not a P6 PPM file (magic {:?})",
            String::from_utf8_lossy(magic)
        )));
    }
    let width = header.number()?;
    let height = header.number()?;
    let maxval = header.number()?;
    if maxval != 255 {
        return Err(bad_image(format!(
            "unsupported PPM maxval {maxval}, expected 255"
        )));
    }
    let pixels = header.rest();

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() < expected {
        return Err(bad_image(format!(
            "PPM pixel data truncated: need {expected} bytes, have {}",
            pixels.len()
        )));
    }

    let mut buffer = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let i = ((y as usize) * (width as usize) + (x as usize)) * 3;
            buffer.set(x, y, Color::new(255, pixels[i], pixels[i + 1], pixels[i + 2]))?;
        }
    }
    Ok(buffer)
}

/// Write a pixel buffer as a binary PPM file. Alpha is dropped.
pub fn write_ppm(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write!(writer, "P6\n{} {}\n255\n", buffer.width(), buffer.height())?;
    for (_, _, color) in buffer.pixels() {
        writer.write_all(&[color.r, color.g, color.b])?;
    }
    writer.flush()?;
    Ok(())
}

/// Cursor over the PPM header: whitespace-separated tokens with
/// `#`-comments, followed by raw pixel bytes.
struct Header<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Header<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn token(&mut self) -> Result<&'a [u8]> {
        self.skip_filler();
        let start = self.pos;
        while self.pos < self.data.len() && !self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(bad_image("truncated PPM header".to_string()));
        }
        Ok(&self.data[start..self.pos])
    }

    fn number(&mut self) -> Result<u32> {
        let token = self.token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                bad_image(format!(
                    "bad number in PPM header: {:?}",
                    String::from_utf8_lossy(token)
                ))
            })
    }

    /// Pixel data begins after the single whitespace byte that
    /// terminates the maxval token.
    fn rest(&mut self) -> &'a [u8] {
        if self.pos < self.data.len() {
            self.pos += 1;
        }
        &self.data[self.pos..]
    }

    fn skip_filler(&mut self) {
        while self.pos < self.data.len() {
            let b = self.data[self.pos];
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }
}
