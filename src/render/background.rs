//! Background keying.
//!
//! The top-left pixel is taken as the background colour. Pixels close to it,
//! or nearly transparent, are background and can be removed or repainted
//! before rule matching sees them.

use image::RgbaImage;

use crate::types::{BackgroundMode, Colour};

/// Squared RGB distance below which a pixel counts as background.
pub const BACKGROUND_THRESHOLD_SQ: u32 = 900;

/// Alpha below which a pixel counts as background.
pub const BACKGROUND_MIN_ALPHA: u8 = 10;

/// Classifies and rewrites background pixels for one frame.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundKeyer {
    mode: BackgroundMode,
    replacement: Colour,
    key: Colour,
}

impl BackgroundKeyer {
    /// Create a keyer that samples the key colour from the frame's corner.
    pub fn new(mode: BackgroundMode, replacement: Colour, source: &RgbaImage) -> Self {
        let key = source
            .get_pixel_checked(0, 0)
            .map(|px| Colour::from_rgba(px.0))
            .unwrap_or(Colour::BLACK);

        Self {
            mode,
            replacement,
            key,
        }
    }

    /// The sampled background colour.
    pub fn key(&self) -> Colour {
        self.key
    }

    /// Check whether a pixel is background, regardless of mode.
    pub fn is_background(&self, px: [u8; 4]) -> bool {
        Colour::from_rgba(px).distance_sq(self.key) < BACKGROUND_THRESHOLD_SQ
            || px[3] < BACKGROUND_MIN_ALPHA
    }

    /// Final value for a background pixel, or `None` if the pixel should go
    /// on to rule matching.
    pub fn apply(&self, px: [u8; 4]) -> Option<[u8; 4]> {
        if self.mode == BackgroundMode::Keep || !self.is_background(px) {
            return None;
        }

        match self.mode {
            BackgroundMode::Keep => None,
            BackgroundMode::Remove => Some([px[0], px[1], px[2], 0]),
            BackgroundMode::Replace => Some(self.replacement.to_rgba(255)),
        }
    }
}
