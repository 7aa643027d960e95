//! Rules automation for roll preparation on a virtual tabletop.
//!
//! This crate decides, per roll, whether an attack, check, save, skill,
//! death save, or damage roll should carry advantage, disadvantage, a
//! forced failure, a forced critical/normal outcome, or a chat annotation,
//! by folding declarative effect flags attached to the acting actor (and,
//! for attacks, the target).
//!
//! The pipeline is pure per roll: flag maps, key-sets, and accumulators
//! are built fresh for each roll-preparation event and discarded; the only
//! side effect is the fire-and-forget forced-failure chat card.
//!
//! # Quick Start
//!
//! ```
//! use roll_reminders::config::EngineConfig;
//! use roll_reminders::engine::{ProfileKind, ReminderEngine, RollEvent, RollOptions};
//! use roll_reminders::testing::RecordingChat;
//! use roll_reminders::world::{Ability, Actor, Effect};
//!
//! let engine = ReminderEngine::new(
//!     ProfileKind::Core,
//!     EngineConfig::default(),
//!     RecordingChat::new(),
//! );
//!
//! let actor = Actor::new("Ranger").with_effect(
//!     Effect::new("Enhance Ability").with_change("advantage.ability.check.str", true),
//! );
//!
//! let mut options = RollOptions::new();
//! let proceed = engine.handle(
//!     &RollEvent::AbilityCheck { actor: &actor, ability: Ability::Strength },
//!     &mut options,
//! );
//! assert!(proceed);
//! assert_eq!(options.advantage, Some(true));
//! ```

pub mod accumulate;
pub mod chat;
pub mod config;
pub mod engine;
pub mod fail;
pub mod flags;
pub mod keys;
pub mod messages;
pub mod testing;
pub mod world;

// Primary public API
pub use chat::{ChatSink, FailureNotice, RollMode};
pub use config::EngineConfig;
pub use engine::{ProfileKind, ReminderEngine, RollEvent, RollOptions};
pub use world::{Ability, ActionType, Activity, Actor, Effect, Skill};
