//! Colour rules and the ordered rule set.
//!
//! A rule pairs a target colour and tolerance with the gradient that
//! replaces matching pixels. Rules are matched in list order. One rule, the
//! leader, supplies the gradient for every rule marked `grouped`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Colour;

/// Opaque rule identifier, stable for the lifetime of the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule-{}", self.0)
    }
}

/// Shape of a gradient ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

/// A two-colour gradient definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientSpec {
    /// Colour at the start of the ramp.
    pub from: Colour,
    /// Colour at the end of the ramp (the middle, when mirrored).
    pub to: Colour,
    pub kind: GradientKind,
    /// Direction of a linear ramp in degrees. Ignored for radial ramps.
    pub angle: f32,
    /// Produce an A-B-A ramp instead of A-B.
    pub mirrored: bool,
}

impl GradientSpec {
    /// A plain linear ramp between two colours.
    pub fn linear(from: Colour, to: Colour, angle: f32) -> Self {
        Self {
            from,
            to,
            kind: GradientKind::Linear,
            angle,
            mirrored: false,
        }
    }

    /// The black-to-white ramp used when no leader can be resolved.
    pub fn fallback() -> Self {
        Self::linear(Colour::BLACK, Colour::WHITE, 45.0)
    }

    /// Angle normalized to `[0, 360)`.
    pub fn normalized_angle(&self) -> f32 {
        let angle = self.angle.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if angle >= 360.0 {
            0.0
        } else {
            angle
        }
    }
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self::linear(Colour::rgb(0x63, 0x66, 0xf1), Colour::rgb(0xec, 0x48, 0x99), 45.0)
    }
}

/// A colour rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRule {
    pub id: RuleId,
    /// Colour this rule matches against.
    pub target: Colour,
    /// Match radius in RGB space.
    pub tolerance: f32,
    pub gradient: GradientSpec,
    /// Paint with the leader's gradient instead of `gradient`.
    pub grouped: bool,
}

impl ColorRule {
    /// Default tolerance for new rules.
    pub const DEFAULT_TOLERANCE: f32 = 30.0;

    /// Check whether a colour falls strictly inside this rule's tolerance.
    pub fn matches(&self, colour: Colour) -> bool {
        colour.within(self.target, self.tolerance_sq())
    }

    /// Squared tolerance, as compared against squared distances.
    pub fn tolerance_sq(&self) -> f32 {
        let tol = self.tolerance.max(0.0);
        tol * tol
    }
}

/// Fields of a rule before it is given an id.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTemplate {
    pub target: Colour,
    pub tolerance: f32,
    pub gradient: GradientSpec,
    pub grouped: bool,
}

impl RuleTemplate {
    /// A default rule targeting the given colour.
    pub fn new(target: Colour) -> Self {
        Self {
            target,
            tolerance: ColorRule::DEFAULT_TOLERANCE,
            gradient: GradientSpec::default(),
            grouped: false,
        }
    }

    /// Set the tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Set the gradient.
    pub fn with_gradient(mut self, gradient: GradientSpec) -> Self {
        self.gradient = gradient;
        self
    }

    /// Mark the rule as following the leader's gradient.
    pub fn grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }
}

impl Default for RuleTemplate {
    fn default() -> Self {
        Self::new(Colour::WHITE)
    }
}

/// Ordered list of rules plus the leader reference.
///
/// Every mutation keeps the leader pointing at a rule in the list whenever
/// the list is non-empty.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ColorRule>,
    leader: Option<RuleId>,
    next_id: u64,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a default rule targeting `target`.
    pub fn add(&mut self, target: Colour) -> RuleId {
        self.add_rule(RuleTemplate::new(target))
    }

    /// Append a rule. The first rule added becomes the leader.
    pub fn add_rule(&mut self, template: RuleTemplate) -> RuleId {
        let id = RuleId(self.next_id);
        self.next_id += 1;

        self.rules.push(ColorRule {
            id,
            target: template.target,
            tolerance: template.tolerance.max(0.0),
            gradient: template.gradient,
            grouped: template.grouped,
        });

        if self.leader.is_none() {
            self.leader = Some(id);
        }
        id
    }

    /// Append a default rule unless one already targets this exact colour.
    pub fn add_target_if_absent(&mut self, target: Colour) -> Option<RuleId> {
        if self.rules.iter().any(|r| r.target == target) {
            return None;
        }
        Some(self.add(target))
    }

    /// Remove a rule, handing leadership to the first remaining rule if the
    /// leader was removed.
    pub fn remove(&mut self, id: RuleId) -> Option<ColorRule> {
        let index = self.rules.iter().position(|r| r.id == id)?;
        let removed = self.rules.remove(index);

        if self.leader == Some(id) {
            self.leader = self.rules.first().map(|r| r.id);
        }
        Some(removed)
    }

    /// Make `id` the leader. Returns false if no such rule exists.
    pub fn set_leader(&mut self, id: RuleId) -> bool {
        if self.get(id).is_some() {
            self.leader = Some(id);
            true
        } else {
            false
        }
    }

    /// The current leader id.
    pub fn leader(&self) -> Option<RuleId> {
        self.leader
    }

    /// The rule whose gradient grouped rules share.
    ///
    /// Falls back to the first rule if the leader id does not resolve.
    pub fn leader_rule(&self) -> Option<&ColorRule> {
        self.leader
            .and_then(|id| self.get(id))
            .or_else(|| self.rules.first())
    }

    /// Look up a rule by id.
    pub fn get(&self, id: RuleId) -> Option<&ColorRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Look up a rule by id for editing.
    pub fn get_mut(&mut self, id: RuleId) -> Option<&mut ColorRule> {
        self.rules.iter_mut().find(|r| r.id == id)
    }

    /// Iterate rules in match priority order.
    pub fn iter(&self) -> impl Iterator<Item = &ColorRule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_rule_becomes_leader() {
        let mut rules = RuleSet::new();
        assert_eq!(rules.leader(), None);

        let a = rules.add(Colour::WHITE);
        let _b = rules.add(Colour::BLACK);
        assert_eq!(rules.leader(), Some(a));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut rules = RuleSet::new();
        let a = rules.add(Colour::WHITE);
        rules.remove(a);
        let b = rules.add(Colour::WHITE);
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_leader_reassigns() {
        let mut rules = RuleSet::new();
        let a = rules.add(Colour::rgb(1, 0, 0));
        let b = rules.add(Colour::rgb(2, 0, 0));
        let c = rules.add(Colour::rgb(3, 0, 0));
        assert!(rules.set_leader(b));

        rules.remove(b);
        assert_eq!(rules.leader(), Some(a));

        rules.remove(a);
        assert_eq!(rules.leader(), Some(c));

        rules.remove(c);
        assert_eq!(rules.leader(), None);
        assert!(rules.is_empty());
    }

    #[test]
    fn test_remove_non_leader_keeps_leader() {
        let mut rules = RuleSet::new();
        let a = rules.add(Colour::rgb(1, 0, 0));
        let b = rules.add(Colour::rgb(2, 0, 0));

        assert!(rules.remove(b).is_some());
        assert_eq!(rules.leader(), Some(a));
        assert!(rules.remove(b).is_none());
    }

    #[test]
    fn test_set_leader_rejects_unknown() {
        let mut rules = RuleSet::new();
        let a = rules.add(Colour::WHITE);
        rules.remove(a);
        assert!(!rules.set_leader(a));
        assert_eq!(rules.leader(), None);
    }

    #[test]
    fn test_leader_rule_fallback() {
        let mut rules = RuleSet::new();
        assert!(rules.leader_rule().is_none());

        let a = rules.add(Colour::WHITE);
        let b = rules.add(Colour::BLACK);
        rules.set_leader(b);
        assert_eq!(rules.leader_rule().map(|r| r.id), Some(b));

        // Dangling leader resolves to the first rule
        rules.leader = Some(RuleId(99));
        assert_eq!(rules.leader_rule().map(|r| r.id), Some(a));
    }

    #[test]
    fn test_add_target_if_absent() {
        let mut rules = RuleSet::new();
        assert!(rules.add_target_if_absent(Colour::WHITE).is_some());
        assert!(rules.add_target_if_absent(Colour::WHITE).is_none());
        assert!(rules.add_target_if_absent(Colour::BLACK).is_some());
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_default_rule() {
        let mut rules = RuleSet::new();
        let id = rules.add(Colour::WHITE);
        let rule = rules.get(id).unwrap();

        assert_eq!(rule.tolerance, 30.0);
        assert_eq!(rule.gradient.from, Colour::from_hex("#6366f1"));
        assert_eq!(rule.gradient.to, Colour::from_hex("#ec4899"));
        assert_eq!(rule.gradient.kind, GradientKind::Linear);
        assert_eq!(rule.gradient.angle, 45.0);
        assert!(!rule.gradient.mirrored);
        assert!(!rule.grouped);
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut rules = RuleSet::new();
        let id = rules.add(Colour::WHITE);
        rules.get_mut(id).unwrap().tolerance = 5.0;
        assert_eq!(rules.get(id).unwrap().tolerance, 5.0);
    }

    #[test]
    fn test_matches_is_strict() {
        let mut rules = RuleSet::new();
        let id = rules.add_rule(RuleTemplate::new(Colour::BLACK).with_tolerance(10.0));
        let rule = rules.get(id).unwrap();

        assert!(rule.matches(Colour::rgb(9, 0, 0)));
        assert!(!rule.matches(Colour::rgb(10, 0, 0)));
        assert!(rule.matches(Colour::rgb(6, 7, 0))); // 36 + 49 = 85
    }

    #[test]
    fn test_zero_tolerance_matches_nothing() {
        let mut rules = RuleSet::new();
        let id = rules.add_rule(RuleTemplate::new(Colour::BLACK).with_tolerance(0.0));
        assert!(!rules.get(id).unwrap().matches(Colour::BLACK));
    }

    #[test]
    fn test_normalized_angle() {
        let mut spec = GradientSpec::default();
        spec.angle = 405.0;
        assert_eq!(spec.normalized_angle(), 45.0);
        spec.angle = -90.0;
        assert_eq!(spec.normalized_angle(), 270.0);
        spec.angle = 360.0;
        assert_eq!(spec.normalized_angle(), 0.0);
    }
}
