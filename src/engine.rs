//! Roller-profile dispatch.
//!
//! One decision pipeline, three event wirings. The profile is selected
//! once at startup from the active companion modules and captures only the
//! differences between wirings: how fast-forward is detected and whether
//! this engine writes the advantage decision at all. Switching profiles
//! never changes the decision logic itself.
//!
//! Handling order for every roll: forced-failure check (saves, preempts
//! everything) -> fast-forward short-circuit -> messages -> sources ->
//! advantage/critical decision, written into the host's mutable options.

use crate::accumulate::{AdvantageTracker, CriticalTracker, SourceTracker};
use crate::chat::{ChatSink, RollMode};
use crate::config::{EngineConfig, DELEGATED_MODULE, QUICK_ROLL_MODULE};
use crate::fail;
use crate::flags::extract_flags;
use crate::keys::{
    attack_grants_keys, attack_keys, check_keys, critical_keys, damage_grants_message_keys,
    damage_message_keys, death_save_keys, save_keys, skill_keys, RollKeys,
};
use crate::messages::collect_messages;
use crate::world::{Ability, Activity, Actor, Skill};
use serde::{Deserialize, Serialize};

// ============================================================================
// Roll options
// ============================================================================

/// Modifier keys held when the roll was triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub alt: bool,
    pub ctrl: bool,
}

/// The host's mutable per-roll options object.
///
/// Inbound fields carry the host's pre-roll state (fast-forward flags,
/// modifier chord, roll mode, any advantage the host already decided);
/// the handler writes the decision, messages, and source hints back in
/// place. `None` means "unset", which the host treats as a normal roll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollOptions {
    pub advantage: Option<bool>,
    pub disadvantage: Option<bool>,
    pub critical: Option<bool>,
    /// Host- or user-requested dialog skip.
    pub fast_forward: bool,
    /// Quick-roll payloads state dialog intent explicitly.
    pub configure_dialog: Option<bool>,
    pub held_keys: HeldKeys,
    pub roll_mode: RollMode,
    /// Chat annotations for the display layer.
    pub messages: Vec<String>,
    /// "Advantage from ..." hints.
    pub advantage_sources: Vec<String>,
    /// "Disadvantage from ..." hints.
    pub disadvantage_sources: Vec<String>,
}

impl RollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fast_forwarded(mut self) -> Self {
        self.fast_forward = true;
        self
    }

    pub fn with_held_keys(mut self, alt: bool, ctrl: bool) -> Self {
        self.held_keys = HeldKeys { alt, ctrl };
        self
    }

    pub fn with_configure_dialog(mut self, configure: bool) -> Self {
        self.configure_dialog = Some(configure);
        self
    }

    pub fn with_roll_mode(mut self, roll_mode: RollMode) -> Self {
        self.roll_mode = roll_mode;
        self
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// How a profile decides a roll is fast-forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastForwardRule {
    /// Host flag or a held Alt/Ctrl chord.
    ModifierChord,
    /// The payload's explicit configure flag, skipped only when it says
    /// `false`.
    ConfigureFlag,
    /// The companion already computed the flag; trust it as-is.
    Precomputed,
}

impl FastForwardRule {
    pub fn applies(&self, options: &RollOptions) -> bool {
        match self {
            FastForwardRule::ModifierChord => {
                options.fast_forward || options.held_keys.alt || options.held_keys.ctrl
            }
            FastForwardRule::ConfigureFlag => options.configure_dialog == Some(false),
            FastForwardRule::Precomputed => options.fast_forward,
        }
    }
}

/// The three mutually exclusive event wirings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileKind {
    /// The host's own roll events.
    Core,
    /// Companion quick-roll flow: no dialog unless explicitly requested.
    QuickRoll,
    /// Companion owns advantage resolution; contribute only messages and
    /// sources.
    Delegated,
}

impl ProfileKind {
    /// Select the profile from the active-module list, once at startup.
    pub fn detect(active_modules: &[&str]) -> Self {
        if active_modules.contains(&DELEGATED_MODULE) {
            ProfileKind::Delegated
        } else if active_modules.contains(&QUICK_ROLL_MODULE) {
            ProfileKind::QuickRoll
        } else {
            ProfileKind::Core
        }
    }

    pub fn strategy(&self) -> ProfileStrategy {
        match self {
            ProfileKind::Core => ProfileStrategy {
                fast_forward: FastForwardRule::ModifierChord,
                writes_decision: true,
            },
            ProfileKind::QuickRoll => ProfileStrategy {
                fast_forward: FastForwardRule::ConfigureFlag,
                writes_decision: true,
            },
            ProfileKind::Delegated => ProfileStrategy {
                fast_forward: FastForwardRule::Precomputed,
                writes_decision: false,
            },
        }
    }
}

/// What actually differs between profiles.
#[derive(Debug, Clone, Copy)]
pub struct ProfileStrategy {
    pub fast_forward: FastForwardRule,
    pub writes_decision: bool,
}

// ============================================================================
// Events
// ============================================================================

/// A roll-preparation event fired by the host.
#[derive(Debug, Clone)]
pub enum RollEvent<'a> {
    Attack {
        actor: &'a Actor,
        target: Option<&'a Actor>,
        activity: Activity,
    },
    AbilityCheck {
        actor: &'a Actor,
        ability: Ability,
    },
    /// Tool checks ride the ability-check tiers.
    ToolCheck {
        actor: &'a Actor,
        ability: Ability,
    },
    AbilitySave {
        actor: &'a Actor,
        ability: Ability,
    },
    /// Concentration save; the host may have pre-set advantage state.
    Concentration {
        actor: &'a Actor,
        ability: Ability,
    },
    Skill {
        actor: &'a Actor,
        skill: Skill,
    },
    DeathSave {
        actor: &'a Actor,
    },
    Damage {
        actor: &'a Actor,
        target: Option<&'a Actor>,
        activity: Activity,
    },
}

impl RollEvent<'_> {
    /// The save context subject to the forced-failure check, if any.
    fn save_context(&self) -> Option<(&Actor, Ability, String)> {
        match self {
            RollEvent::AbilitySave { actor, ability } => {
                Some((*actor, *ability, format!("{} Saving Throw", ability.name())))
            }
            RollEvent::Concentration { actor, ability } => {
                Some((*actor, *ability, "Concentration Saving Throw".to_string()))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// The per-table decision engine: one profile, one configuration, one chat
/// sink, shared by every roll at that table. All per-roll state lives on
/// the stack of `handle`.
pub struct ReminderEngine<C: ChatSink> {
    profile: ProfileKind,
    config: EngineConfig,
    chat: C,
}

impl<C: ChatSink> ReminderEngine<C> {
    pub fn new(profile: ProfileKind, config: EngineConfig, chat: C) -> Self {
        Self {
            profile,
            config,
            chat,
        }
    }

    pub fn profile(&self) -> ProfileKind {
        self.profile
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }

    /// Handle one roll-preparation event.
    ///
    /// Returns `false` to abort the roll (forced failure); otherwise the
    /// options have been updated in place and the roll proceeds.
    pub fn handle(&self, event: &RollEvent<'_>, options: &mut RollOptions) -> bool {
        // A forced failure preempts everything, fast-forward included.
        if let Some((actor, ability, roll_label)) = event.save_context() {
            if fail::check_and_announce(actor, ability, &roll_label, options.roll_mode, &self.chat)
            {
                return false;
            }
        }

        let strategy = self.profile.strategy();
        if strategy.fast_forward.applies(options) {
            tracing::debug!(profile = ?self.profile, "roll fast-forwarded, skipping reminders");
            return true;
        }

        match event {
            RollEvent::AbilityCheck { actor, ability }
            | RollEvent::ToolCheck { actor, ability } => {
                self.run_d20(actor, None, check_keys(*ability), None, AdvantageTracker::new(), None, options, &strategy);
            }
            RollEvent::AbilitySave { actor, ability } => {
                self.run_d20(actor, None, save_keys(*ability, false), None, AdvantageTracker::new(), None, options, &strategy);
            }
            RollEvent::Concentration { actor, ability } => {
                let seed = AdvantageTracker::seeded(
                    options.advantage == Some(true),
                    options.disadvantage == Some(true),
                );
                self.run_d20(actor, None, save_keys(*ability, true), None, seed, None, options, &strategy);
            }
            RollEvent::DeathSave { actor } => {
                self.run_d20(actor, None, death_save_keys(), None, AdvantageTracker::new(), None, options, &strategy);
            }
            RollEvent::Skill { actor, skill } => {
                let mut seed = AdvantageTracker::new();
                let mut armor_label = None;
                if self.config.check_armor_stealth && *skill == Skill::Stealth {
                    if let Some(item) = actor.stealth_penalty_item() {
                        seed = AdvantageTracker::seeded(false, true);
                        armor_label = Some(item.name.clone());
                    }
                }
                self.run_d20(actor, None, skill_keys(*skill), None, seed, armor_label, options, &strategy);
            }
            RollEvent::Attack {
                actor,
                target,
                activity,
            } => {
                self.run_d20(
                    actor,
                    *target,
                    attack_keys(activity),
                    Some(attack_grants_keys(activity)),
                    AdvantageTracker::new(),
                    None,
                    options,
                    &strategy,
                );
            }
            RollEvent::Damage {
                actor,
                target,
                activity,
            } => {
                self.run_damage(actor, *target, activity, options, &strategy);
            }
        }
        true
    }

    /// The shared d20 pipeline: messages, then sources, then the
    /// advantage/disadvantage decision (profile permitting).
    #[allow(clippy::too_many_arguments)]
    fn run_d20(
        &self,
        actor: &Actor,
        target: Option<&Actor>,
        keys: RollKeys,
        grants: Option<RollKeys>,
        seed: AdvantageTracker,
        synthetic_disadvantage: Option<String>,
        options: &mut RollOptions,
        strategy: &ProfileStrategy,
    ) {
        let actor_flags = extract_flags(Some(actor));
        let target_flags = target.map(|t| extract_flags(Some(t)));

        options.messages.extend(collect_messages(
            &actor_flags,
            target_flags.as_ref(),
            &keys.message,
            grants.as_ref().map(|g| g.message.as_slice()),
        ));

        if self.config.show_sources {
            let mut sources = SourceTracker::new();
            if let Some(label) = &synthetic_disadvantage {
                sources.add_disadvantage_label(label.clone());
            }
            sources.add(actor, &keys.advantage, &keys.disadvantage);
            if let (Some(target), Some(grants)) = (target, &grants) {
                sources.add(target, &grants.advantage, &grants.disadvantage);
            }
            sources.update(options);
        }

        if strategy.writes_decision {
            let mut tracker = seed;
            tracker.add(&actor_flags, &keys.advantage, &keys.disadvantage);
            if let (Some(flags), Some(grants)) = (&target_flags, &grants) {
                tracker.add(flags, &grants.advantage, &grants.disadvantage);
            }
            tracker.update(options);
            tracing::debug!(
                actor = %actor.name,
                advantage = ?options.advantage,
                disadvantage = ?options.disadvantage,
                "roll decision"
            );
        }
    }

    /// The damage pipeline: messages, then the critical/normal decision.
    fn run_damage(
        &self,
        actor: &Actor,
        target: Option<&Actor>,
        activity: &Activity,
        options: &mut RollOptions,
        strategy: &ProfileStrategy,
    ) {
        let actor_flags = extract_flags(Some(actor));
        let target_flags = target.map(|t| extract_flags(Some(t)));

        let target_message_keys = damage_grants_message_keys(activity);
        options.messages.extend(collect_messages(
            &actor_flags,
            target_flags.as_ref(),
            &damage_message_keys(activity),
            Some(&target_message_keys),
        ));

        if strategy.writes_decision {
            let crit_keys = critical_keys(activity);
            let mut tracker = CriticalTracker::new();
            tracker.add_critical(&actor_flags, &crit_keys.critical);
            tracker.add_normal(&actor_flags, &crit_keys.no_critical);
            if let Some(flags) = &target_flags {
                tracker.add_critical(flags, &crit_keys.grants_critical);
                tracker.add_normal(flags, &crit_keys.fail_critical);
            }
            tracker.update(options);
            tracing::debug!(
                actor = %actor.name,
                critical = ?options.critical,
                "damage decision"
            );
        }
    }
}
