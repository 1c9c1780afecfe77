//! Colour type and parsing.
//!
//! Colours cross the crate boundary as six-digit hex strings. Parsing is
//! total: anything that is not exactly `RRGGBB` (with an optional `#`)
//! becomes black.

use std::fmt;

use palette::Srgb;
use serde::{Deserialize, Serialize};

/// An RGB colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a `#RRGGBB` hex string, falling back to black.
    pub fn from_hex(s: &str) -> Self {
        let hex = s.strip_prefix('#').unwrap_or(s);

        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::BLACK;
        }

        match (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            (Ok(r), Ok(g), Ok(b)) => Self::rgb(r, g, b),
            _ => Self::BLACK,
        }
    }

    /// Read the RGB part of an RGBA pixel.
    pub fn from_rgba(px: [u8; 4]) -> Self {
        Self::rgb(px[0], px[1], px[2])
    }

    /// Convert to an RGBA array with the given alpha.
    pub fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// Squared Euclidean distance in RGB space.
    pub fn distance_sq(self, other: Colour) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Check whether `other` lies strictly inside a squared tolerance.
    pub fn within(self, other: Colour, tolerance_sq: f32) -> bool {
        (self.distance_sq(other) as f32) < tolerance_sq
    }

    /// Relative luminance in `[0, 1]` using Rec. 601 weights.
    pub fn luminance(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }
}

impl From<String> for Colour {
    fn from(s: String) -> Self {
        Self::from_hex(&s)
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> Self {
        c.to_string()
    }
}

impl From<Colour> for Srgb<u8> {
    fn from(c: Colour) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl From<Srgb<u8>> for Colour {
    fn from(c: Srgb<u8>) -> Self {
        Self::rgb(c.red, c.green, c.blue)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
