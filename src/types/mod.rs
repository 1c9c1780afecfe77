//! Core domain types for surfacelab.
//!
//! - `Colour` - RGB colour values with total hex parsing
//! - `RuleSet` - The ordered colour rules and their leader
//! - `RenderParams` - Background, detail, edge, and surface settings

mod colour;
mod params;
mod rule;

pub use colour::Colour;
pub use params::{
    BackgroundMode, EdgeEffect, EdgeKind, RenderParams, SurfaceEffect, SurfaceKind,
};
pub use rule::{ColorRule, GradientKind, GradientSpec, RuleId, RuleSet, RuleTemplate};
