//! Decision accumulators.
//!
//! Three folds over candidate key-sets, each with its own precedence:
//!
//! - [`AdvantageTracker`]: OR-folds advantage/disadvantage flags; on
//!   conflict the two cancel, neither survives.
//! - [`CriticalTracker`]: OR-folds critical/normal flags for damage rolls;
//!   on conflict normal wins. Deliberately NOT the cancellation rule.
//! - [`SourceTracker`]: collects effect labels per axis instead of
//!   booleans; informational, both lists may be non-empty.

use crate::engine::RollOptions;
use crate::flags::{is_truthy, FlagMap};
use crate::world::Actor;

/// Fold every candidate key's value through `f`, skipping missing keys.
pub fn fold_keys(flags: &FlagMap, keys: &[String], mut f: impl FnMut(&str, &serde_json::Value)) {
    for key in keys {
        if let Some(value) = flags.get(key) {
            f(key, value);
        }
    }
}

fn any_truthy(flags: &FlagMap, keys: &[String]) -> bool {
    let mut hit = false;
    fold_keys(flags, keys, |_, value| hit |= is_truthy(value));
    hit
}

// ============================================================================
// Advantage / Disadvantage
// ============================================================================

/// Boolean accumulator for the advantage/disadvantage decision.
///
/// `add` may be called once per flag source (actor, then target-granted);
/// the OR-fold is idempotent, so re-adding a source changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvantageTracker {
    advantage: bool,
    disadvantage: bool,
}

impl AdvantageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from already-decided state: the host's pre-set concentration
    /// options, or the synthetic armor-stealth disadvantage.
    pub fn seeded(advantage: bool, disadvantage: bool) -> Self {
        Self {
            advantage,
            disadvantage,
        }
    }

    /// OR-fold one flag source over the two key-sets.
    pub fn add(&mut self, flags: &FlagMap, advantage_keys: &[String], disadvantage_keys: &[String]) {
        if flags.is_empty() {
            return;
        }
        self.advantage |= any_truthy(flags, advantage_keys);
        self.disadvantage |= any_truthy(flags, disadvantage_keys);
    }

    /// Write the final decision into the roll options.
    ///
    /// Advantage and disadvantage cannot coexist: both accumulated means
    /// net cancellation and neither is set; exactly one sets that axis and
    /// clears the other; neither leaves the options untouched.
    pub fn update(&self, options: &mut RollOptions) {
        match (self.advantage, self.disadvantage) {
            (true, true) => {
                options.advantage = None;
                options.disadvantage = None;
            }
            (true, false) => {
                options.advantage = Some(true);
                options.disadvantage = None;
            }
            (false, true) => {
                options.disadvantage = Some(true);
                options.advantage = None;
            }
            (false, false) => {}
        }
    }
}

// ============================================================================
// Critical / Normal (damage only)
// ============================================================================

/// Accumulator for the damage-roll critical decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalTracker {
    critical: bool,
    normal: bool,
}

impl CriticalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_critical(&mut self, flags: &FlagMap, keys: &[String]) {
        self.critical |= any_truthy(flags, keys);
    }

    pub fn add_normal(&mut self, flags: &FlagMap, keys: &[String]) {
        self.normal |= any_truthy(flags, keys);
    }

    /// Write the final decision. Normal overrides critical when both fold
    /// true; with neither flagged the options stay untouched.
    pub fn update(&self, options: &mut RollOptions) {
        if self.normal {
            options.critical = Some(false);
        } else if self.critical {
            options.critical = Some(true);
        }
    }
}

// ============================================================================
// Provenance
// ============================================================================

/// Label accumulator mirroring [`AdvantageTracker`], used for the
/// "Advantage from X, Y" display hints.
///
/// No cancellation here: the decision itself still goes through the boolean
/// tracker, these lists just explain where each side came from.
#[derive(Debug, Clone, Default)]
pub struct SourceTracker {
    advantage: Vec<String>,
    disadvantage: Vec<String>,
}

impl SourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect labels of the actor's active effects whose changes match a
    /// candidate key with a truthy value, in effect order.
    pub fn add(&mut self, actor: &Actor, advantage_keys: &[String], disadvantage_keys: &[String]) {
        for effect in actor.active_effects() {
            if effect_matches(effect, advantage_keys) {
                self.advantage.push(effect.label.clone());
            }
            if effect_matches(effect, disadvantage_keys) {
                self.disadvantage.push(effect.label.clone());
            }
        }
    }

    /// Record a non-effect source, e.g. armor imposing Stealth disadvantage.
    pub fn add_disadvantage_label(&mut self, label: impl Into<String>) {
        self.disadvantage.push(label.into());
    }

    pub fn update(&self, options: &mut RollOptions) {
        options
            .advantage_sources
            .extend(self.advantage.iter().cloned());
        options
            .disadvantage_sources
            .extend(self.disadvantage.iter().cloned());
    }
}

fn effect_matches(effect: &crate::world::Effect, keys: &[String]) -> bool {
    effect
        .changes
        .iter()
        .any(|c| keys.iter().any(|k| *k == c.key) && is_truthy(&c.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::extract_flags;
    use crate::keys::check_keys;
    use crate::world::{Ability, Effect};

    fn flags_for(key: &str) -> FlagMap {
        let actor = Actor::new("Tester").with_effect(Effect::new("Test").with_change(key, true));
        extract_flags(Some(&actor))
    }

    #[test]
    fn test_advantage_only() {
        let keys = check_keys(Ability::Strength);
        let mut tracker = AdvantageTracker::new();
        tracker.add(&flags_for("advantage.ability.check.str"), &keys.advantage, &keys.disadvantage);

        let mut options = RollOptions::default();
        tracker.update(&mut options);
        assert_eq!(options.advantage, Some(true));
        assert_eq!(options.disadvantage, None);
    }

    #[test]
    fn test_cancellation() {
        let keys = check_keys(Ability::Strength);
        let actor = Actor::new("Tester")
            .with_effect(Effect::new("Boon").with_change("advantage.ability.check.str", true))
            .with_effect(Effect::new("Bane").with_change("disadvantage.ability.check.str", true));
        let flags = extract_flags(Some(&actor));

        let mut tracker = AdvantageTracker::new();
        tracker.add(&flags, &keys.advantage, &keys.disadvantage);

        let mut options = RollOptions::default();
        options.advantage = Some(true); // host pre-set state must be cleared
        tracker.update(&mut options);
        assert_eq!(options.advantage, None);
        assert_eq!(options.disadvantage, None);
    }

    #[test]
    fn test_add_is_idempotent() {
        let keys = check_keys(Ability::Strength);
        let flags = flags_for("advantage.all");

        let mut once = AdvantageTracker::new();
        once.add(&flags, &keys.advantage, &keys.disadvantage);
        let mut twice = AdvantageTracker::new();
        twice.add(&flags, &keys.advantage, &keys.disadvantage);
        twice.add(&flags, &keys.advantage, &keys.disadvantage);

        let (mut a, mut b) = (RollOptions::default(), RollOptions::default());
        once.update(&mut a);
        twice.update(&mut b);
        assert_eq!(a.advantage, b.advantage);
        assert_eq!(a.disadvantage, b.disadvantage);
    }

    #[test]
    fn test_no_match_leaves_options_untouched() {
        let keys = check_keys(Ability::Constitution);
        let mut tracker = AdvantageTracker::new();
        tracker.add(&flags_for("advantage.ability.check.str"), &keys.advantage, &keys.disadvantage);

        let mut options = RollOptions::default();
        tracker.update(&mut options);
        assert_eq!(options.advantage, None);
        assert_eq!(options.disadvantage, None);
    }

    #[test]
    fn test_seeded_concentration_state() {
        let keys = check_keys(Ability::Constitution);
        let mut tracker = AdvantageTracker::seeded(true, false);
        tracker.add(&FlagMap::new(), &keys.advantage, &keys.disadvantage);

        let mut options = RollOptions::default();
        tracker.update(&mut options);
        assert_eq!(options.advantage, Some(true));
    }

    #[test]
    fn test_critical_normal_overrides() {
        let mut tracker = CriticalTracker::new();
        tracker.add_critical(&flags_for("critical.all"), &["critical.all".into()]);
        tracker.add_normal(&flags_for("noCritical.all"), &["noCritical.all".into()]);

        let mut options = RollOptions::default();
        tracker.update(&mut options);
        assert_eq!(options.critical, Some(false));
    }

    #[test]
    fn test_critical_alone_sets_true() {
        let mut tracker = CriticalTracker::new();
        tracker.add_critical(&flags_for("critical.all"), &["critical.all".into()]);

        let mut options = RollOptions::default();
        tracker.update(&mut options);
        assert_eq!(options.critical, Some(true));
    }

    #[test]
    fn test_source_tracker_collects_both_axes() {
        let keys = check_keys(Ability::Strength);
        let actor = Actor::new("Tester")
            .with_effect(Effect::new("Enhance Ability").with_change("advantage.ability.check.str", true))
            .with_effect(Effect::new("Frightened").with_change("disadvantage.all", true))
            .with_effect(Effect::new("Off").disabled().with_change("advantage.all", true));

        let mut tracker = SourceTracker::new();
        tracker.add(&actor, &keys.advantage, &keys.disadvantage);

        let mut options = RollOptions::default();
        tracker.update(&mut options);
        assert_eq!(options.advantage_sources, vec!["Enhance Ability"]);
        assert_eq!(options.disadvantage_sources, vec!["Frightened"]);
    }
}
