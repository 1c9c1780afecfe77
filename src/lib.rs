//! surfacelab - Gradient recolouring for images
//!
//! Pixels are matched against an ordered list of colour rules and replaced
//! with samples from procedurally generated gradients, optionally modulated
//! by source luminance, an edge highlight, and a surface texture.

pub mod cli;
pub mod error;
pub mod output;
pub mod recipe;
pub mod render;
pub mod types;

pub use error::{LabError, Result};
pub use recipe::{Recipe, RECIPE_FILENAME};
pub use render::{load_png, rasterize, render, write_png, BackgroundKeyer, GradientCache, Session};
pub use types::{
    BackgroundMode, ColorRule, Colour, EdgeEffect, EdgeKind, GradientKind, GradientSpec,
    RenderParams, RuleId, RuleSet, RuleTemplate, SurfaceEffect, SurfaceKind,
};
