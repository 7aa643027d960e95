//! Domain vocabulary for roll preparation.
//!
//! Contains the types the host hands us when a roll is being prepared:
//! abilities, skills, attack action types, and the actor-like entity with
//! its attached effects and equipped items. The engine never mutates an
//! actor; everything here is read-only input to a single roll decision.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectId(pub Uuid);

impl EffectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Abilities and Skills
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// Short id used in flag keys (`advantage.ability.check.str`).
    pub fn id(&self) -> &'static str {
        match self {
            Ability::Strength => "str",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "wis",
            Ability::Charisma => "cha",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The eighteen skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Athletics,
    Acrobatics,
    SleightOfHand,
    Stealth,
    Arcana,
    History,
    Investigation,
    Nature,
    Religion,
    AnimalHandling,
    Insight,
    Medicine,
    Perception,
    Survival,
    Deception,
    Intimidation,
    Performance,
    Persuasion,
}

impl Skill {
    /// Short id used in flag keys (`advantage.skill.ste`).
    pub fn id(&self) -> &'static str {
        match self {
            Skill::Athletics => "ath",
            Skill::Acrobatics => "acr",
            Skill::SleightOfHand => "slt",
            Skill::Stealth => "ste",
            Skill::Arcana => "arc",
            Skill::History => "his",
            Skill::Investigation => "inv",
            Skill::Nature => "nat",
            Skill::Religion => "rel",
            Skill::AnimalHandling => "ani",
            Skill::Insight => "ins",
            Skill::Medicine => "med",
            Skill::Perception => "prc",
            Skill::Survival => "sur",
            Skill::Deception => "dec",
            Skill::Intimidation => "itm",
            Skill::Performance => "prf",
            Skill::Persuasion => "per",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletics",
            Skill::Acrobatics => "Acrobatics",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Arcana => "Arcana",
            Skill::History => "History",
            Skill::Investigation => "Investigation",
            Skill::Nature => "Nature",
            Skill::Religion => "Religion",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Insight => "Insight",
            Skill::Medicine => "Medicine",
            Skill::Perception => "Perception",
            Skill::Survival => "Survival",
            Skill::Deception => "Deception",
            Skill::Intimidation => "Intimidation",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
        }
    }

    /// The ability that governs this skill's check.
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Attack Activities
// ============================================================================

/// Attack action types, as they appear in flag-key qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    MeleeWeapon,
    RangedWeapon,
    MeleeSpell,
    RangedSpell,
}

impl ActionType {
    /// Short id used in flag keys (`advantage.attack.mwak`).
    pub fn id(&self) -> &'static str {
        match self {
            ActionType::MeleeWeapon => "mwak",
            ActionType::RangedWeapon => "rwak",
            ActionType::MeleeSpell => "msak",
            ActionType::RangedSpell => "rsak",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionType::MeleeWeapon => "Melee Weapon Attack",
            ActionType::RangedWeapon => "Ranged Weapon Attack",
            ActionType::MeleeSpell => "Melee Spell Attack",
            ActionType::RangedSpell => "Ranged Spell Attack",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The attack or damage activity being rolled: action type, the ability the
/// roll is made with, and the distance to the target when the host knows it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub action_type: ActionType,
    pub ability: Option<Ability>,
    pub target_distance_ft: Option<u32>,
}

impl Activity {
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            ability: None,
            target_distance_ft: None,
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_target_distance(mut self, feet: u32) -> Self {
        self.target_distance_ft = Some(feet);
        self
    }
}

// ============================================================================
// Effects
// ============================================================================

/// A single dotted-key change carried by an effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    pub key: String,
    pub value: Value,
}

impl Change {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A tagged bundle of changes attached to an actor.
///
/// An effect contributes to roll decisions only while it is active, i.e.
/// neither suppressed (by the host, e.g. an unequipped item) nor disabled
/// (by the user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,
    /// User-facing label, shown in chat cards and source hints.
    pub label: String,
    pub suppressed: bool,
    pub disabled: bool,
    pub changes: Vec<Change>,
}

impl Effect {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: EffectId::new(),
            label: label.into(),
            suppressed: false,
            disabled: false,
            changes: Vec::new(),
        }
    }

    pub fn with_change(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changes.push(Change::new(key, value));
        self
    }

    pub fn suppressed(mut self) -> Self {
        self.suppressed = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.suppressed && !self.disabled
    }
}

// ============================================================================
// Equipment
// ============================================================================

/// The slice of an equipped item the engine cares about: heavier armors
/// impose disadvantage on Stealth checks regardless of any flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquippedItem {
    pub name: String,
    pub equipped: bool,
    pub stealth_disadvantage: bool,
}

impl EquippedItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            equipped: true,
            stealth_disadvantage: false,
        }
    }

    pub fn with_stealth_disadvantage(mut self) -> Self {
        self.stealth_disadvantage = true;
        self
    }

    pub fn unequipped(mut self) -> Self {
        self.equipped = false;
        self
    }
}

// ============================================================================
// Actors
// ============================================================================

/// The actor-like entity a roll-preparation event names.
///
/// A thin, read-only view of the host's document: an ordered effect list
/// (ordering is meaningful, the host sorts by priority upstream) and the
/// items currently worn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub effects: Vec<Effect>,
    pub items: Vec<EquippedItem>,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            effects: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_item(mut self, item: EquippedItem) -> Self {
        self.items.push(item);
        self
    }

    /// Effects that currently contribute to rolls.
    pub fn active_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(|e| e.is_active())
    }

    /// The first worn item that penalizes Stealth, if any.
    pub fn stealth_penalty_item(&self) -> Option<&EquippedItem> {
        self.items
            .iter()
            .find(|i| i.equipped && i.stealth_disadvantage)
    }
}
