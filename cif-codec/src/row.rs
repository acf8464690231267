//! Row codec: one color's data row to and from text tokens.
//!
//! A row is a list of string tokens: `[colorHex, alpha, id-token, ...]`.
//! Id tokens come in two shapes, a literal decimal pixel id or an
//! inclusive range `start~end` covering a run of consecutive ids.
//!
//! Decoding is deliberately tolerant: a malformed id token is skipped,
//! never fatal for the row. Only a broken color or alpha field rejects
//! the whole row, because without the color there is nothing to attach
//! the ids to. The pipeline skips rejected rows and keeps going, so a
//! corrupted file decodes best-effort rather than all-or-nothing.

use cif_core::color::Color;
use cif_core::error::{CifError, Result};
use tracing::warn;

/// Separator between the two halves of a range token.
pub const RANGE_SEPARATOR: char = '~';

/// One parsed row: a color and the pixel ids carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowData {
    /// The row's color.
    pub color: Color,
    /// Pixel ids holding that color, sorted ascending, deduplicated.
    pub ids: Vec<u32>,
}

/// Compress a sequence of pixel ids into wire tokens.
///
/// The input is sorted and deduplicated, then scanned left to right for
/// maximal runs of consecutive ids. A run of length >= 2 becomes a
/// range token `start~end` (inclusive on both ends); a lone id becomes
/// a literal token. Greedy maximal runs are optimal under this token
/// grammar.
///
/// # Example
///
/// ```rust
/// use cif_codec::row::compress_ids;
///
/// let tokens = compress_ids(&[0, 1, 2, 5, 7, 8, 9]);
/// assert_eq!(tokens, vec!["0~2", "5", "7~9"]);
/// ```
pub fn compress_ids(ids: &[u32]) -> Vec<String> {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let start = sorted[i];
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[j] + 1 {
            j += 1;
        }
        if j > i {
            tokens.push(format!("{start}{RANGE_SEPARATOR}{}", sorted[j]));
        } else {
            tokens.push(start.to_string());
        }
        i = j + 1;
    }
    tokens
}

/// Expand wire tokens back into a sorted, deduplicated id sequence.
///
/// Malformed tokens are dropped, not fatal: a range token with an
/// unparseable half is skipped, as is an unparseable literal. A range
/// with `start > end` expands to no ids and is reported as a parse
/// anomaly.
pub fn decompress_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<u32> {
    let mut ids = Vec::new();
    for token in tokens {
        let token = token.as_ref().trim();
        if let Some((left, right)) = token.split_once(RANGE_SEPARATOR) {
            let (Ok(start), Ok(end)) = (left.parse::<u32>(), right.parse::<u32>()) else {
                warn!(token, "skipping malformed range token");
                continue;
            };
            if start > end {
                warn!(start, end, "inverted range token expands to nothing");
                continue;
            }
            ids.extend(start..=end);
        } else {
            match token.parse::<u32>() {
                Ok(id) => ids.push(id),
                Err(_) => warn!(token, "skipping malformed id token"),
            }
        }
    }
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Parse a full row into a [`RowData`].
///
/// `tokens[0]` is the color hex, `tokens[1]` the decimal alpha; the
/// rest are id tokens. A missing or unparseable color/alpha field
/// rejects the whole row.
pub fn parse_row<S: AsRef<str>>(tokens: &[S]) -> Result<RowData> {
    let [hex, alpha, id_tokens @ ..] = tokens else {
        return Err(CifError::malformed_row(format!(
            "expected at least 2 fields, got {}",
            tokens.len()
        )));
    };
    let hex = hex.as_ref().trim();
    let alpha = alpha.as_ref().trim();
    let alpha: u8 = alpha
        .parse()
        .map_err(|_| CifError::invalid_alpha(alpha))?;
    let color = Color::from_hex(hex, alpha)?;
    Ok(RowData {
        color,
        ids: decompress_tokens(id_tokens),
    })
}

/// Serialize one color bucket into a row's tokens.
///
/// The first two tokens carry the color (`RRGGBB` hex, decimal alpha);
/// the rest carry the ids, either one literal token per id or
/// range-compressed via [`compress_ids`].
pub fn serialize_row(color: Color, ids: &[u32], compressed: bool) -> Vec<String> {
    let mut tokens = vec![color.to_hex(), color.a.to_string()];
    if compressed {
        tokens.extend(compress_ids(ids));
    } else {
        tokens.extend(ids.iter().map(u32::to_string));
    }
    tokens
}
