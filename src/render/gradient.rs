//! Gradient rasterization and the per-frame gradient cache.
//!
//! A gradient buffer is a full-frame RGBA raster, so the compositor can
//! sample it at the same index as the source pixel. Buffers are memoized by
//! a structural key of the gradient fields plus the frame size.

use std::collections::HashMap;
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::types::{Colour, GradientKind, GradientSpec};

/// Ordered colour stops over `t` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStops {
    stops: Vec<(f32, Colour)>,
}

impl ColorStops {
    /// Stops for a gradient spec: `from -> to`, or `from -> to -> from` when
    /// mirrored.
    pub fn for_spec(spec: &GradientSpec) -> Self {
        let stops = if spec.mirrored {
            vec![(0.0, spec.from), (0.5, spec.to), (1.0, spec.from)]
        } else {
            vec![(0.0, spec.from), (1.0, spec.to)]
        };
        Self { stops }
    }

    /// Colour at parametric position `t`, clamped to the ends.
    pub fn sample(&self, t: f32) -> Colour {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Colour::BLACK,
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                let local = if span > 0.0 { (t - t0) / span } else { 0.0 };
                return lerp_colour(c0, c1, local);
            }
        }
        last.1
    }
}

/// Channel-wise interpolation in sRGB space, rounded to 8 bits.
fn lerp_colour(a: Colour, b: Colour, t: f32) -> Colour {
    let mix = |x: u8, y: u8| -> u8 {
        let x = x as f32;
        let y = y as f32;
        (x + (y - x) * t).round().clamp(0.0, 255.0) as u8
    };
    Colour::rgb(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Maps pixel coordinates onto the gradient parameter.
#[derive(Debug, Clone, Copy)]
enum Axis {
    Linear { vx: f32, vy: f32, len_sq: f32 },
    Radial { cx: f32, cy: f32, radius: f32 },
}

impl Axis {
    fn new(spec: &GradientSpec, width: u32, height: u32) -> Self {
        match spec.kind {
            GradientKind::Linear => {
                let (sin, cos) = spec.normalized_angle().to_radians().sin_cos();
                let vx = cos * width as f32;
                let vy = sin * height as f32;
                Axis::Linear {
                    vx,
                    vy,
                    len_sq: vx * vx + vy * vy,
                }
            }
            GradientKind::Radial => Axis::Radial {
                cx: width as f32 / 2.0,
                cy: height as f32 / 2.0,
                radius: width as f32 / 2.0,
            },
        }
    }

    fn at(&self, x: u32, y: u32) -> f32 {
        let (x, y) = (x as f32, y as f32);
        match *self {
            Axis::Linear { vx, vy, len_sq } => {
                if len_sq <= f32::EPSILON {
                    0.0
                } else {
                    (x * vx + y * vy) / len_sq
                }
            }
            Axis::Radial { cx, cy, radius } => {
                if radius <= 0.0 {
                    0.0
                } else {
                    (x - cx).hypot(y - cy) / radius
                }
            }
        }
    }
}

/// Render a gradient spec into a `width` x `height` RGBA buffer.
///
/// Samples are taken at integer pixel coordinates, so the top-left pixel of
/// a linear ramp is exactly the start colour.
pub fn rasterize(spec: &GradientSpec, width: u32, height: u32) -> RgbaImage {
    let stops = ColorStops::for_spec(spec);
    let axis = Axis::new(spec, width, height);

    RgbaImage::from_fn(width, height, |x, y| {
        Rgba(stops.sample(axis.at(x, y)).to_rgba(255))
    })
}

/// Structural cache key for a rasterized gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GradientKey {
    from: Colour,
    to: Colour,
    kind: GradientKind,
    angle_bits: u32,
    mirrored: bool,
    width: u32,
    height: u32,
}

impl GradientKey {
    pub fn new(spec: &GradientSpec, width: u32, height: u32) -> Self {
        Self {
            from: spec.from,
            to: spec.to,
            kind: spec.kind,
            angle_bits: spec.normalized_angle().to_bits(),
            mirrored: spec.mirrored,
            width,
            height,
        }
    }
}

/// Memoized gradient buffers for the currently loaded frame.
#[derive(Debug, Default)]
pub struct GradientCache {
    entries: HashMap<GradientKey, Arc<RgbaImage>>,
    hits: u64,
    misses: u64,
}

impl GradientCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the gradient buffer for a spec, rasterizing it on first use.
    pub fn get(&mut self, spec: &GradientSpec, width: u32, height: u32) -> Arc<RgbaImage> {
        let key = GradientKey::new(spec, width, height);

        if let Some(buffer) = self.entries.get(&key) {
            self.hits += 1;
            tracing::trace!(?key, "gradient cache hit");
            return Arc::clone(buffer);
        }

        self.misses += 1;
        tracing::debug!(
            from = %spec.from,
            to = %spec.to,
            kind = ?spec.kind,
            angle = spec.angle,
            mirrored = spec.mirrored,
            width,
            height,
            "rasterizing gradient"
        );
        let buffer = Arc::new(rasterize(spec, width, height));
        self.entries.insert(key, Arc::clone(&buffer));
        buffer
    }

    /// Drop every cached buffer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached buffers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache holds no buffers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that rasterized a new buffer.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
