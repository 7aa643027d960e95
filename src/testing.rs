//! Testing utilities.
//!
//! Provides a recording chat sink, quick actor/effect builders, and
//! assertion helpers for exercising the decision pipeline without a host.

use crate::chat::{ChatSink, FailureNotice};
use crate::config::EngineConfig;
use crate::engine::{ProfileKind, ReminderEngine, RollOptions};
use crate::world::{Actor, Effect};
use serde_json::Value;
use std::sync::Mutex;

/// A [`ChatSink`] that records every notice instead of posting it.
#[derive(Debug, Default)]
pub struct RecordingChat {
    notices: Mutex<Vec<FailureNotice>>,
}

impl RecordingChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<FailureNotice> {
        self.notices.lock().expect("chat mutex poisoned").clone()
    }
}

impl ChatSink for RecordingChat {
    fn post_failure(&self, notice: FailureNotice) {
        self.notices
            .lock()
            .expect("chat mutex poisoned")
            .push(notice);
    }
}

/// An engine wired to the core profile, default config, and a recording
/// chat sink.
pub fn core_engine() -> ReminderEngine<RecordingChat> {
    ReminderEngine::new(ProfileKind::Core, EngineConfig::default(), RecordingChat::new())
}

/// An engine on the given profile with a recording chat sink.
pub fn engine_for(profile: ProfileKind, config: EngineConfig) -> ReminderEngine<RecordingChat> {
    ReminderEngine::new(profile, config, RecordingChat::new())
}

/// An actor carrying one active effect with the given boolean flags.
pub fn actor_with_flags(name: &str, keys: &[&str]) -> Actor {
    let mut effect = Effect::new(format!("{name}'s effect"));
    for key in keys {
        effect = effect.with_change(*key, true);
    }
    Actor::new(name).with_effect(effect)
}

/// An actor carrying one active effect with arbitrary flag values.
pub fn actor_with_values(name: &str, changes: &[(&str, Value)]) -> Actor {
    let mut effect = Effect::new(format!("{name}'s effect"));
    for (key, value) in changes {
        effect = effect.with_change(*key, value.clone());
    }
    Actor::new(name).with_effect(effect)
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the options ended with advantage and only advantage.
#[track_caller]
pub fn assert_advantage(options: &RollOptions) {
    assert_eq!(
        (options.advantage, options.disadvantage),
        (Some(true), None),
        "expected advantage, got advantage={:?} disadvantage={:?}",
        options.advantage,
        options.disadvantage
    );
}

/// Assert the options ended with disadvantage and only disadvantage.
#[track_caller]
pub fn assert_disadvantage(options: &RollOptions) {
    assert_eq!(
        (options.advantage, options.disadvantage),
        (None, Some(true)),
        "expected disadvantage, got advantage={:?} disadvantage={:?}",
        options.advantage,
        options.disadvantage
    );
}

/// Assert neither axis was set.
#[track_caller]
pub fn assert_unset(options: &RollOptions) {
    assert_eq!(
        (options.advantage, options.disadvantage),
        (None, None),
        "expected neither axis set, got advantage={:?} disadvantage={:?}",
        options.advantage,
        options.disadvantage
    );
}
