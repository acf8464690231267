//! File pipeline: full encode and decode between rasters and CIF files.
//!
//! Encode walks the raster once, bucketing each pixel id under its
//! color, then serializes one row per bucket. Decode parses each row
//! back into `(color, ids)` and replays the mapping onto a fresh
//! buffer. The row format does not persist image dimensions, so every
//! decode entry point takes `width` and `height` from the caller.
//!
//! Failure policy: I/O problems propagate; malformed rows inside a file
//! are skipped with a warning so a corrupted file yields a best-effort
//! partial image instead of nothing.

use std::collections::HashMap;
use std::path::Path;

use cif_core::color::Color;
use cif_core::coord;
use cif_core::error::Result;
use cif_core::PixelBuffer;
use tracing::{debug, warn};

use crate::row::{self, RANGE_SEPARATOR};
use crate::rows;
use crate::store::Cif;

/// Build a [`Cif`] from a raster buffer.
///
/// Pixels are visited in raster order, so every bucket's id sequence
/// comes out sorted ascending. The result is always marked
/// uncompressed; compression is chosen at save time.
pub fn cif_from_buffer(buffer: &PixelBuffer) -> Cif {
    let width = buffer.width();
    let mut image: Vec<(Color, Vec<u32>)> = Vec::new();
    let mut slots: HashMap<Color, usize> = HashMap::new();
    for (x, y, color) in buffer.pixels() {
        let id = coord::to_id(x, y, width);
        let slot = *slots.entry(color).or_insert_with(|| {
            image.push((color, Vec::new()));
            image.len() - 1
        });
        image[slot].1.push(id);
    }
    Cif::from_image(width, buffer.height(), false, image)
}

/// Serialize a [`Cif`] into wire rows, one per non-empty bucket.
///
/// Ghost buckets emptied by recoloring are not emitted.
pub fn encode_rows(cif: &Cif, compressed: bool) -> Vec<Vec<String>> {
    cif.buckets()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(color, ids)| row::serialize_row(color, ids, compressed))
        .collect()
}

/// Decode wire rows into a [`Cif`] with the given dimensions.
///
/// Rows that fail to parse are skipped with a warning. Rows repeating a
/// color are merged by appending their ids. The compression flag is
/// inferred from the presence of range tokens in the input.
pub fn decode_rows(raw_rows: &[Vec<String>], width: u32, height: u32) -> Cif {
    let compressed = raw_rows
        .iter()
        .flat_map(|tokens| tokens.iter().skip(2))
        .any(|token| token.contains(RANGE_SEPARATOR));

    let mut image = Vec::new();
    for (line, tokens) in raw_rows.iter().enumerate() {
        match row::parse_row(tokens) {
            Ok(data) => image.push((data.color, data.ids)),
            Err(err) => warn!(line, %err, "skipping malformed row"),
        }
    }
    debug!(
        rows = raw_rows.len(),
        decoded = image.len(),
        compressed,
        "decoded row set"
    );
    Cif::from_image(width, height, compressed, image)
}

/// Load a CIF file into its in-memory store.
///
/// The file does not carry dimensions; the caller supplies them from
/// image context.
pub fn load_cif(path: impl AsRef<Path>, width: u32, height: u32) -> Result<Cif> {
    let raw = rows::read_rows(path)?;
    Ok(decode_rows(&raw, width, height))
}

/// Load a CIF file and render it to a raster buffer.
pub fn load_image(path: impl AsRef<Path>, width: u32, height: u32) -> Result<PixelBuffer> {
    Ok(load_cif(path, width, height)?.render())
}

/// Persist a [`Cif`] store to a file.
///
/// `compressed` selects the row layout (range tokens vs. literal ids);
/// either layout round-trips to the same mapping.
pub fn save_cif(cif: &Cif, path: impl AsRef<Path>, compressed: bool) -> Result<()> {
    rows::write_rows(path, &encode_rows(cif, compressed))
}

/// Encode a raster buffer and persist it as an uncompressed CIF file.
pub fn save_buffer(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    save_cif(&cif_from_buffer(buffer), path, false)
}

/// Encode a raster buffer and persist it as a range-compressed CIF file.
pub fn save_buffer_compressed(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    save_cif(&cif_from_buffer(buffer), path, true)
}
