//! Recipe files (surfacelab.yaml).
//!
//! A recipe stores the rule list, the leader, and the global render
//! parameters, so a render can be repeated or tweaked outside the process.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};
use crate::types::{
    BackgroundMode, ColorRule, Colour, EdgeEffect, GradientSpec, RenderParams, RuleSet,
    RuleTemplate, SurfaceEffect,
};

/// Default recipe filename.
pub const RECIPE_FILENAME: &str = "surfacelab.yaml";

/// Background keying settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    pub mode: BackgroundMode,
    /// Colour used by `replace` mode.
    pub replacement: Colour,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            mode: BackgroundMode::Keep,
            replacement: Colour::WHITE,
        }
    }
}

/// A rule as written in a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleEntry {
    pub target: Colour,
    pub tolerance: f32,
    pub grouped: bool,
    pub gradient: GradientSpec,
}

impl Default for RuleEntry {
    fn default() -> Self {
        Self::from(RuleTemplate::default())
    }
}

impl From<RuleTemplate> for RuleEntry {
    fn from(t: RuleTemplate) -> Self {
        Self {
            target: t.target,
            tolerance: t.tolerance,
            grouped: t.grouped,
            gradient: t.gradient,
        }
    }
}

impl From<&ColorRule> for RuleEntry {
    fn from(rule: &ColorRule) -> Self {
        Self {
            target: rule.target,
            tolerance: rule.tolerance,
            grouped: rule.grouped,
            gradient: rule.gradient,
        }
    }
}

impl RuleEntry {
    fn template(&self) -> RuleTemplate {
        RuleTemplate::new(self.target)
            .with_tolerance(self.tolerance)
            .with_gradient(self.gradient)
            .grouped(self.grouped)
    }
}

/// A complete render recipe.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub background: BackgroundSettings,

    /// Fraction of source shading kept in the fill, `0.0` to `1.0`.
    pub detail_lock: f32,

    pub edge: EdgeEffect,

    pub surface: SurfaceEffect,

    /// Index of the leader rule. Defaults to the first rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader: Option<usize>,

    /// Rules in match priority order.
    pub rules: Vec<RuleEntry>,
}

impl Recipe {
    /// Load a recipe from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LabError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read recipe: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse a recipe from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| LabError::Parse {
            message: format!("Invalid recipe: {}", e),
            help: Some(format!("Check {} syntax", RECIPE_FILENAME)),
        })
    }

    /// Serialize the recipe as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LabError::Parse {
            message: format!("Failed to serialize recipe: {}", e),
            help: None,
        })
    }

    /// The recipe written by `surfacelab init`: one default rule on white.
    pub fn starter() -> Self {
        Self {
            rules: vec![RuleEntry::default()],
            ..Self::default()
        }
    }

    /// Capture a rule set and parameters as a recipe.
    pub fn from_parts(rules: &RuleSet, params: &RenderParams) -> Self {
        let leader = rules
            .leader()
            .and_then(|id| rules.iter().position(|r| r.id == id))
            .filter(|&index| index > 0);

        Self {
            background: BackgroundSettings {
                mode: params.background,
                replacement: params.background_replacement,
            },
            detail_lock: params.detail_lock,
            edge: params.edge,
            surface: params.surface,
            leader,
            rules: rules.iter().map(RuleEntry::from).collect(),
        }
    }

    /// Build the rule set. An out-of-range leader index falls back to the
    /// first rule.
    pub fn rule_set(&self) -> RuleSet {
        let mut rules = RuleSet::new();
        let ids: Vec<_> = self
            .rules
            .iter()
            .map(|entry| rules.add_rule(entry.template()))
            .collect();

        match self.leader.and_then(|index| ids.get(index)) {
            Some(&id) => {
                rules.set_leader(id);
            }
            None if self.leader.is_some() => {
                tracing::warn!(
                    leader = ?self.leader,
                    rules = ids.len(),
                    "leader index out of range, using the first rule"
                );
            }
            None => {}
        }
        rules
    }

    /// Build the render parameters, clamping fractions into range.
    pub fn params(&self) -> RenderParams {
        RenderParams {
            background: self.background.mode,
            background_replacement: self.background.replacement,
            detail_lock: clamp_unit(self.detail_lock),
            edge: self.edge,
            surface: SurfaceEffect {
                intensity: clamp_unit(self.surface.intensity),
                ..self.surface
            },
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
