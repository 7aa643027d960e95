//! Engine configuration.
//!
//! Read-only during roll handling: settings are resolved once at startup
//! (including companion-module auto-detection) and passed into the engine,
//! never consulted as ambient globals.

use serde::{Deserialize, Serialize};

/// Module id of the companion that takes over armor-based Stealth handling.
pub const ARMOR_MODULE: &str = "armor-automation";

/// Module id of the companion whose quick-roll flow replaces the host's
/// roll dialog.
pub const QUICK_ROLL_MODULE: &str = "quick-roller";

/// Module id of the companion that owns advantage/disadvantage resolution
/// itself.
pub const DELEGATED_MODULE: &str = "roll-delegator";

/// Settings consumed (not owned) by the decision pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Gate for the provenance tracker: when false, no source hints are
    /// computed or written.
    pub show_sources: bool,
    /// Gate for the armor-Stealth special case. Auto-disabled when a known
    /// companion module handles it instead.
    pub check_armor_stealth: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            show_sources: true,
            check_armor_stealth: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_show_sources(mut self, show: bool) -> Self {
        self.show_sources = show;
        self
    }

    pub fn with_check_armor_stealth(mut self, check: bool) -> Self {
        self.check_armor_stealth = check;
        self
    }

    /// Resolve the configuration against the active-module list, disabling
    /// the armor-Stealth check when [`ARMOR_MODULE`] owns it.
    pub fn detect(active_modules: &[&str]) -> Self {
        let config = Self::default();
        if active_modules.contains(&ARMOR_MODULE) {
            tracing::debug!(module = ARMOR_MODULE, "armor stealth handling delegated");
            config.with_check_armor_stealth(false)
        } else {
            config
        }
    }
}
