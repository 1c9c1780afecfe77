//! Global render parameters shared by every rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Colour;

/// What to do with pixels keyed as background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Leave background pixels to rule matching.
    #[default]
    Keep,
    /// Make background pixels fully transparent.
    Remove,
    /// Paint background pixels with the replacement colour.
    #[serde(alias = "discard-replace")]
    Replace,
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundMode::Keep => write!(f, "keep"),
            BackgroundMode::Remove => write!(f, "remove"),
            BackgroundMode::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for BackgroundMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(BackgroundMode::Keep),
            "remove" => Ok(BackgroundMode::Remove),
            "replace" | "discard-replace" => Ok(BackgroundMode::Replace),
            other => Err(format!("unknown background mode: {}", other)),
        }
    }
}

/// Directional edge highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    None,
    /// Light from the left.
    Bevel,
    /// Light from the right.
    Inset,
}

impl EdgeKind {
    /// Multiplier applied to the left-minus-right alpha difference.
    pub fn strength(self) -> f32 {
        match self {
            EdgeKind::None => 0.0,
            EdgeKind::Bevel => 0.2,
            EdgeKind::Inset => -0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeEffect {
    pub kind: EdgeKind,
    /// Horizontal distance to the sampled neighbours, in pixels.
    pub depth: u32,
}

/// Procedural surface texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    #[default]
    Flat,
    /// Sharp specular streaks.
    Glossy,
    /// Banded sheen.
    Metallic,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceEffect {
    pub kind: SurfaceKind,
    /// Strength in `[0, 1]`.
    pub intensity: f32,
    /// Rotation of the texture in degrees.
    pub angle: f32,
}

impl SurfaceEffect {
    /// Additive brightness at pixel `(x, y)`.
    pub fn highlight(&self, x: u32, y: u32) -> f32 {
        if self.kind == SurfaceKind::Flat {
            return 0.0;
        }

        let (sin, cos) = self.angle.to_radians().sin_cos();
        let rot_x = x as f32 * cos - y as f32 * sin;

        match self.kind {
            SurfaceKind::Flat => 0.0,
            SurfaceKind::Glossy => (rot_x * 0.01).sin().abs().powi(40) * 200.0 * self.intensity,
            SurfaceKind::Metallic => (rot_x * 0.9).sin() * 20.0 * self.intensity,
        }
    }
}

/// Everything besides the rules that shapes a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub background: BackgroundMode,
    /// Colour painted over background pixels in `Replace` mode.
    pub background_replacement: Colour,
    /// How much source shading shows through the gradient, in `[0, 1]`.
    pub detail_lock: f32,
    pub edge: EdgeEffect,
    pub surface: SurfaceEffect,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            background: BackgroundMode::Keep,
            background_replacement: Colour::WHITE,
            detail_lock: 0.0,
            edge: EdgeEffect::default(),
            surface: SurfaceEffect::default(),
        }
    }
}
