//! Linear pixel id <-> 2D coordinate mapping.
//!
//! CIF addresses pixels by a single linear id using the row-major
//! convention `id = y * width + x`. The same convention must be applied
//! on the encode side, the decode side, and every mutation; a mismatch
//! corrupts images silently, so this module is the only place the
//! formula appears.

/// Map a 2D position to its linear pixel id (`y * width + x`).
///
/// No bounds checking; the caller guarantees `x < width`.
#[inline]
pub fn to_id(x: u32, y: u32, width: u32) -> u32 {
    y * width + x
}

/// Map a linear pixel id back to its `(x, y)` position.
#[inline]
pub fn to_xy(id: u32, width: u32) -> (u32, u32) {
    (id % width, id / width)
}

/// The image checksum: `width * height`.
///
/// Not a data-integrity hash — it is the exclusive upper bound for
/// valid pixel ids. The multiply is widened so dimensions whose product
/// exceeds the id space saturate instead of wrapping to a small bound.
#[inline]
pub fn checksum(width: u32, height: u32) -> u32 {
    (u64::from(width) * u64::from(height)).min(u64::from(u32::MAX)) as u32
}
