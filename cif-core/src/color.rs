//! ARGB color type and its text representation.
//!
//! On the wire a color travels as two fields: a six-digit `RRGGBB` hex
//! string and a separate decimal alpha. [`Color::from_hex`] and
//! [`Color::to_hex`] are the two halves of that contract; the codec
//! layer treats them as a black box.

use crate::error::{CifError, Result};

/// A 32-bit ARGB color. Equality is by the full 4-channel tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Alpha channel (0 = fully transparent).
    pub a: u8,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Fully transparent black. Used as the raster background.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(255, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::new(255, 0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(255, 0, 0, 255);

    /// Create a color from its four channels.
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Reconstruct a color from a six-digit `RRGGBB` hex string and a
    /// separate alpha value.
    ///
    /// Case-insensitive. Anything other than exactly six hex digits is
    /// rejected.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cif_core::color::Color;
    ///
    /// let c = Color::from_hex("1A2b3C", 128).unwrap();
    /// assert_eq!(c, Color::new(128, 0x1A, 0x2B, 0x3C));
    /// assert!(Color::from_hex("12345", 255).is_err());
    /// assert!(Color::from_hex("GG0000", 255).is_err());
    /// ```
    pub fn from_hex(hex: &str, alpha: u8) -> Result<Self> {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CifError::invalid_hex(hex));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| CifError::invalid_hex(hex))
        };
        Ok(Self {
            a: alpha,
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }

    /// The six-digit uppercase `RRGGBB` hex representation.
    ///
    /// Alpha is not part of the hex string; it travels as a separate
    /// decimal field (see [`Color::from_hex`]).
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}:{}", self.to_hex(), self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let colors = [
            Color::BLACK,
            Color::WHITE,
            Color::RED,
            Color::new(7, 0x12, 0xAB, 0xF0),
        ];
        for c in colors {
            let back = Color::from_hex(&c.to_hex(), c.a).unwrap();
            assert_eq!(back, c);
        }
    }

    #[test]
    fn test_from_hex_case_insensitive() {
        let lower = Color::from_hex("ab01cd", 255).unwrap();
        let upper = Color::from_hex("AB01CD", 255).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert!(Color::from_hex("", 0).is_err());
        assert!(Color::from_hex("FFF", 0).is_err());
        assert!(Color::from_hex("FFFFFFF", 0).is_err());
        assert!(Color::from_hex("ZZZZZZ", 0).is_err());
        // Unicode must not slip through the length check
        assert!(Color::from_hex("ééé", 0).is_err());
    }

    #[test]
    fn test_equality_includes_alpha() {
        let opaque = Color::new(255, 1, 2, 3);
        let faded = Color::new(128, 1, 2, 3);
        assert_ne!(opaque, faded);
        // Same RGB, so the hex halves match
        assert_eq!(opaque.to_hex(), faded.to_hex());
    }
}
