//! Pixel compositing engine.
//!
//! A render makes one full pass over the source frame:
//!
//! 1. background keying, which finalizes keyed pixels;
//! 2. first-match rule lookup in list order;
//! 3. gradient fill at the same pixel index, modulated by source luminance
//!    (detail lock), the edge effect, and the surface texture.
//!
//! Unmatched pixels are copied through untouched.

use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use rayon::prelude::*;

use crate::types::{
    Colour, EdgeEffect, EdgeKind, GradientSpec, RenderParams, RuleSet, SurfaceEffect,
};

use super::background::BackgroundKeyer;
use super::gradient::GradientCache;

/// A rule reduced to what the pixel pass needs.
#[derive(Debug, Clone)]
pub struct PreparedRule {
    pub target: Colour,
    pub tolerance_sq: f32,
    pub gradient: Arc<RgbaImage>,
}

impl PreparedRule {
    fn matches(&self, colour: Colour) -> bool {
        colour.within(self.target, self.tolerance_sq)
    }
}

/// Resolve every rule's gradient buffer for a `width` x `height` frame.
///
/// Grouped rules share the leader's buffer. Without a leader the shared
/// buffer is the black-to-white fallback ramp.
pub fn prepare_rules(
    rules: &RuleSet,
    cache: &mut GradientCache,
    width: u32,
    height: u32,
) -> Vec<PreparedRule> {
    let mut shared: Option<Arc<RgbaImage>> = None;

    rules
        .iter()
        .map(|rule| {
            let gradient = if rule.grouped {
                let leader = shared.get_or_insert_with(|| {
                    let spec = rules
                        .leader_rule()
                        .map(|leader| leader.gradient)
                        .unwrap_or_else(GradientSpec::fallback);
                    cache.get(&spec, width, height)
                });
                Arc::clone(leader)
            } else {
                cache.get(&rule.gradient, width, height)
            };

            PreparedRule {
                target: rule.target,
                tolerance_sq: rule.tolerance_sq(),
                gradient,
            }
        })
        .collect()
}

/// Render `source` through the rule set, producing a frame of the same size.
///
/// Gradients are resolved through `cache` before the pixel pass, which then
/// runs in parallel over rows. The result depends only on the inputs.
pub fn render(
    source: &RgbaImage,
    rules: &RuleSet,
    params: &RenderParams,
    cache: &mut GradientCache,
) -> RgbaImage {
    let start = Instant::now();
    let (width, height) = source.dimensions();
    let mut out = source.clone();

    if width == 0 || height == 0 {
        return out;
    }

    let prepared = prepare_rules(rules, cache, width, height);
    let keyer = BackgroundKeyer::new(params.background, params.background_replacement, source);

    let data: &mut [u8] = &mut out;

    // Keyed pixels are final and the rule pass never touches alpha. In scan
    // order a pixel sees keyed alpha behind it and source alpha ahead of it.
    let keyed: Vec<bool> = data
        .par_chunks_mut(4)
        .map(|px| match keyer.apply([px[0], px[1], px[2], px[3]]) {
            Some(value) => {
                px.copy_from_slice(&value);
                true
            }
            None => false,
        })
        .collect();
    let alpha: Vec<u8> = data.chunks_exact(4).map(|px| px[3]).collect();

    let shader = PixelShader {
        detail_lock: params.detail_lock.clamp(0.0, 1.0),
        edge: params.edge,
        surface: params.surface,
        keyed_alpha: &alpha,
        source: source.as_raw(),
    };
    let row_len = width as usize * 4;

    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let index = y * width as usize + x;
                if keyed[index] {
                    continue;
                }

                let colour = Colour::from_rgba([px[0], px[1], px[2], px[3]]);
                if let Some(rule) = prepared.iter().find(|rule| rule.matches(colour)) {
                    let rgb = shader.shade(rule, colour, index, x as u32, y as u32);
                    px[..3].copy_from_slice(&rgb);
                }
            }
        });

    tracing::debug!(
        width,
        height,
        rules = prepared.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "rendered frame"
    );
    out
}

/// Per-pixel fill for matched pixels.
struct PixelShader<'a> {
    detail_lock: f32,
    edge: EdgeEffect,
    surface: SurfaceEffect,
    /// Alpha of every pixel after keying.
    keyed_alpha: &'a [u8],
    /// Raw RGBA bytes of the source frame.
    source: &'a [u8],
}

impl PixelShader<'_> {
    fn shade(&self, rule: &PreparedRule, source: Colour, index: usize, x: u32, y: u32) -> [u8; 3] {
        let offset = index * 4;
        let fill = &rule.gradient.as_raw()[offset..offset + 3];

        let detail = 1.0 + (source.luminance() - 0.5) * self.detail_lock;
        let lift = self.edge_shade(index) + self.surface.highlight(x, y);

        let channel = |value: u8| -> u8 {
            (value as f32 * detail + lift).clamp(0.0, 255.0).round_ties_even() as u8
        };
        [channel(fill[0]), channel(fill[1]), channel(fill[2])]
    }

    /// Left-minus-right alpha difference `depth` pixels away, in buffer
    /// order, as seen by a scan-order pass: the left neighbour is already
    /// keyed, the right one is not. Reads outside the frame are 0.
    fn edge_shade(&self, index: usize) -> f32 {
        if self.edge.kind == EdgeKind::None {
            return 0.0;
        }

        let depth = self.edge.depth as usize;
        let left = index
            .checked_sub(depth)
            .and_then(|i| self.keyed_alpha.get(i))
            .copied()
            .unwrap_or(0);
        let right = index
            .checked_add(depth)
            .and_then(|i| i.checked_mul(4))
            .and_then(|offset| self.source.get(offset + 3))
            .copied()
            .unwrap_or(0);

        (left as f32 - right as f32) * self.edge.kind.strength()
    }
}
