//! Frame session.
//!
//! Holds the loaded source frame and the gradient cache that belongs to it.
//! Loading a new frame drops every cached gradient.

use image::RgbaImage;

use crate::types::{RenderParams, RuleSet};

use super::compositor;
use super::gradient::GradientCache;

/// The currently loaded frame and its gradient cache.
#[derive(Debug, Default)]
pub struct Session {
    frame: Option<RgbaImage>,
    cache: GradientCache,
}

impl Session {
    /// Create a session with no frame loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a frame already loaded.
    pub fn with_frame(frame: RgbaImage) -> Self {
        let mut session = Self::new();
        session.load_frame(frame);
        session
    }

    /// Replace the source frame and invalidate the gradient cache.
    pub fn load_frame(&mut self, frame: RgbaImage) {
        tracing::debug!(
            width = frame.width(),
            height = frame.height(),
            dropped = self.cache.len(),
            "loaded frame"
        );
        self.cache.clear();
        self.frame = Some(frame);
    }

    /// The loaded source frame, if any.
    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    /// The gradient cache for the loaded frame.
    pub fn cache(&self) -> &GradientCache {
        &self.cache
    }

    /// Render the loaded frame. Returns `None` if no frame is loaded.
    pub fn render(&mut self, rules: &RuleSet, params: &RenderParams) -> Option<RgbaImage> {
        let frame = self.frame.as_ref()?;
        Some(compositor::render(frame, rules, params, &mut self.cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, GradientSpec, RuleTemplate};
    use image::Rgba;

    fn rules() -> RuleSet {
        let mut rules = RuleSet::new();
        rules.add_rule(
            RuleTemplate::new(Colour::WHITE)
                .with_gradient(GradientSpec::linear(Colour::BLACK, Colour::WHITE, 30.0)),
        );
        rules
    }

    #[test]
    fn test_render_without_frame() {
        let mut session = Session::new();
        assert!(session.render(&rules(), &RenderParams::default()).is_none());
    }

    #[test]
    fn test_rerender_reuses_gradients() {
        let mut session = Session::with_frame(RgbaImage::from_pixel(6, 4, Rgba([255, 255, 255, 255])));
        let rules = rules();

        let first = session.render(&rules, &RenderParams::default()).unwrap();
        let second = session.render(&rules, &RenderParams::default()).unwrap();

        assert!(first == second);
        assert_eq!(session.cache().len(), 1);
        assert_eq!(session.cache().misses(), 1);
        assert_eq!(session.cache().hits(), 1);
    }

    #[test]
    fn test_load_frame_invalidates_cache() {
        let mut session = Session::with_frame(RgbaImage::from_pixel(6, 4, Rgba([255, 255, 255, 255])));
        let rules = rules();
        session.render(&rules, &RenderParams::default());
        assert_eq!(session.cache().len(), 1);

        session.load_frame(RgbaImage::from_pixel(3, 9, Rgba([255, 255, 255, 255])));
        assert!(session.cache().is_empty());

        let out = session.render(&rules, &RenderParams::default()).unwrap();
        assert_eq!(out.dimensions(), (3, 9));
        assert_eq!(session.cache().len(), 1);
    }
}
