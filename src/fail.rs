//! Forced-failure checking for saving throws.
//!
//! Unlike every other accumulator this is not a fold: the FIRST active
//! effect carrying a matching `fail.*` key wins outright and supplies the
//! display data for the chat card. A forced failure preempts everything,
//! including fast-forward, and cancels the save before it is rolled.

use crate::chat::{ChatSink, FailureNotice, RollMode};
use crate::keys::fail_save_keys;
use crate::world::{Ability, Actor};

/// The effect that forces this save to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedFailure {
    pub effect_label: String,
}

/// Find the first active effect that forces a save on `ability` to fail.
///
/// Walks effects in host order (priority-sorted upstream); key presence
/// alone matches, the change's value is not consulted.
pub fn forced_failure(actor: &Actor, ability: Ability) -> Option<ForcedFailure> {
    let keys = fail_save_keys(ability);
    actor
        .active_effects()
        .find(|effect| {
            effect
                .changes
                .iter()
                .any(|change| keys.iter().any(|k| *k == change.key))
        })
        .map(|effect| ForcedFailure {
            effect_label: effect.label.clone(),
        })
}

/// Whether a save on `ability` is forced to fail. No side effects.
pub fn fails(actor: &Actor, ability: Ability) -> bool {
    forced_failure(actor, ability).is_some()
}

/// Run the forced-failure check and, on a hit, post the failure chat card.
///
/// Returns `true` when the roll must be aborted. The chat post is
/// fire-and-forget; the abort signal itself is synchronous.
pub fn check_and_announce(
    actor: &Actor,
    ability: Ability,
    roll_label: &str,
    roll_mode: RollMode,
    chat: &dyn ChatSink,
) -> bool {
    let Some(failure) = forced_failure(actor, ability) else {
        return false;
    };
    tracing::debug!(
        actor = %actor.name,
        effect = %failure.effect_label,
        roll = roll_label,
        "save forced to fail"
    );
    chat.post_failure(FailureNotice {
        speaker: actor.name.clone(),
        effect_label: failure.effect_label,
        roll_label: roll_label.to_string(),
        roll_mode,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingChat;
    use crate::world::Effect;

    #[test]
    fn test_no_fail_key_means_no_failure() {
        let actor = Actor::new("Monk")
            .with_effect(Effect::new("Bless").with_change("advantage.ability.save.all", true));
        assert!(!fails(&actor, Ability::Dexterity));
    }

    #[test]
    fn test_fail_all_saves_matches_every_ability() {
        let actor = Actor::new("Monk")
            .with_effect(Effect::new("Doom").with_change("fail.ability.save.all", true));
        for ability in [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ] {
            assert!(fails(&actor, ability), "{ability} save should fail");
        }
    }

    #[test]
    fn test_ability_specific_fail() {
        let actor = Actor::new("Monk")
            .with_effect(Effect::new("Leaden Legs").with_change("fail.ability.save.dex", true));
        assert!(fails(&actor, Ability::Dexterity));
        assert!(!fails(&actor, Ability::Constitution));
    }

    #[test]
    fn test_suppressed_effect_cannot_force_failure() {
        let actor = Actor::new("Monk")
            .with_effect(Effect::new("Doom").suppressed().with_change("fail.ability.save.all", true));
        assert!(!fails(&actor, Ability::Wisdom));
    }

    #[test]
    fn test_first_match_wins_and_names_the_card() {
        let actor = Actor::new("Monk")
            .with_effect(Effect::new("Off").disabled().with_change("fail.all", true))
            .with_effect(Effect::new("Hold Person").with_change("fail.ability.save.wis", true))
            .with_effect(Effect::new("Doom").with_change("fail.all", true));
        let failure = forced_failure(&actor, Ability::Wisdom).unwrap();
        assert_eq!(failure.effect_label, "Hold Person");
    }

    #[test]
    fn test_announce_posts_card_and_aborts() {
        let chat = RecordingChat::new();
        let actor = Actor::new("Monk")
            .with_effect(Effect::new("Hold Person").with_change("fail.ability.save.wis", true));

        let aborted = check_and_announce(
            &actor,
            Ability::Wisdom,
            "Wisdom Saving Throw",
            RollMode::Public,
            &chat,
        );
        assert!(aborted);

        let notices = chat.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].speaker, "Monk");
        assert_eq!(notices[0].effect_label, "Hold Person");
        assert_eq!(notices[0].roll_label, "Wisdom Saving Throw");
    }

    #[test]
    fn test_announce_without_match_is_silent() {
        let chat = RecordingChat::new();
        let actor = Actor::new("Monk");
        assert!(!check_and_announce(
            &actor,
            Ability::Wisdom,
            "Wisdom Saving Throw",
            RollMode::Public,
            &chat,
        ));
        assert!(chat.notices().is_empty());
    }
}
