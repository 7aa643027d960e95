//! Candidate-key construction.
//!
//! One builder per roll kind, each assembling its key-sets by concatenating
//! additive tiers from the shared base (`all`) outward to the most specific
//! qualifier. Tiers only ever add candidates, so a more specific roll
//! context always matches a superset of what a general one matches.

use crate::world::{Ability, Activity, Skill};

/// Ordered list of candidate flag keys for one decision axis.
pub type KeySet = Vec<String>;

/// The advantage, disadvantage, and message key-sets for one roll context.
#[derive(Debug, Clone)]
pub struct RollKeys {
    pub advantage: KeySet,
    pub disadvantage: KeySet,
    pub message: KeySet,
}

impl RollKeys {
    fn from_suffixes(suffixes: &[String]) -> Self {
        Self {
            advantage: keyed("advantage", suffixes),
            disadvantage: keyed("disadvantage", suffixes),
            message: keyed("message", suffixes),
        }
    }

    fn from_suffixes_granted(suffixes: &[String]) -> Self {
        Self {
            advantage: keyed("grants.advantage", suffixes),
            disadvantage: keyed("grants.disadvantage", suffixes),
            message: keyed("grants.message", suffixes),
        }
    }
}

/// The four key-sets of the damage-roll critical decision.
#[derive(Debug, Clone)]
pub struct CriticalKeys {
    /// Actor-scoped: the attack crits.
    pub critical: KeySet,
    /// Actor-scoped: the attack is forced normal.
    pub no_critical: KeySet,
    /// Target-scoped: the target is vulnerable to criticals.
    pub grants_critical: KeySet,
    /// Target-scoped: the target is immune to criticals.
    pub fail_critical: KeySet,
}

fn keyed(prefix: &str, suffixes: &[String]) -> KeySet {
    suffixes.iter().map(|s| format!("{prefix}.{s}")).collect()
}

// ============================================================================
// Tier tables per roll kind
// ============================================================================

fn check_suffixes(ability: Ability) -> Vec<String> {
    vec![
        "all".into(),
        "ability.all".into(),
        "ability.check.all".into(),
        format!("ability.check.{}", ability.id()),
    ]
}

fn save_suffixes(ability: Ability, is_concentration: bool) -> Vec<String> {
    let mut suffixes = vec![
        "all".into(),
        "ability.all".into(),
        "ability.save.all".into(),
        format!("ability.save.{}", ability.id()),
    ];
    if is_concentration {
        suffixes.push("ability.save.concentration".into());
    }
    suffixes
}

fn death_save_suffixes() -> Vec<String> {
    vec![
        "all".into(),
        "ability.all".into(),
        "ability.save.all".into(),
        "deathSave".into(),
    ]
}

fn skill_suffixes(skill: Skill) -> Vec<String> {
    let mut suffixes = check_suffixes(skill.ability());
    suffixes.push("skill.all".into());
    suffixes.push(format!("skill.{}", skill.id()));
    suffixes
}

fn attack_suffixes(activity: &Activity) -> Vec<String> {
    let mut suffixes = vec![
        "all".into(),
        "attack.all".into(),
        format!("attack.{}", activity.action_type.id()),
    ];
    if let Some(ability) = activity.ability {
        suffixes.push(format!("attack.{}", ability.id()));
    }
    if let Some(feet) = activity.target_distance_ft {
        let reach = if feet <= 5 { "near" } else { "far" };
        suffixes.push(format!("attack.{reach}"));
    }
    suffixes
}

fn damage_suffixes(activity: &Activity) -> Vec<String> {
    vec![
        "all".into(),
        "damage.all".into(),
        format!("damage.{}", activity.action_type.id()),
    ]
}

fn critical_suffixes(activity: &Activity) -> Vec<String> {
    vec!["all".into(), activity.action_type.id().into()]
}

// ============================================================================
// Public builders
// ============================================================================

/// Key-sets for an ability check. Tool checks use the same tiers.
pub fn check_keys(ability: Ability) -> RollKeys {
    RollKeys::from_suffixes(&check_suffixes(ability))
}

/// Key-sets for a saving throw.
pub fn save_keys(ability: Ability, is_concentration: bool) -> RollKeys {
    RollKeys::from_suffixes(&save_suffixes(ability, is_concentration))
}

/// Key-sets for a death saving throw.
pub fn death_save_keys() -> RollKeys {
    RollKeys::from_suffixes(&death_save_suffixes())
}

/// Key-sets for a skill check, layered over the governing ability's check
/// tiers.
pub fn skill_keys(skill: Skill) -> RollKeys {
    RollKeys::from_suffixes(&skill_suffixes(skill))
}

/// Actor-side key-sets for an attack roll.
pub fn attack_keys(activity: &Activity) -> RollKeys {
    RollKeys::from_suffixes(&attack_suffixes(activity))
}

/// Target-side (`grants.`) key-sets for an attack roll, evaluated against
/// the target's flags rather than the attacker's.
pub fn attack_grants_keys(activity: &Activity) -> RollKeys {
    RollKeys::from_suffixes_granted(&attack_suffixes(activity))
}

/// Actor-side message key-set for a damage roll.
pub fn damage_message_keys(activity: &Activity) -> KeySet {
    keyed("message", &damage_suffixes(activity))
}

/// Target-side (`grants.`) message key-set for a damage roll.
pub fn damage_grants_message_keys(activity: &Activity) -> KeySet {
    keyed("grants.message", &damage_suffixes(activity))
}

/// The four key-sets of the damage critical/normal decision.
pub fn critical_keys(activity: &Activity) -> CriticalKeys {
    let suffixes = critical_suffixes(activity);
    CriticalKeys {
        critical: keyed("critical", &suffixes),
        no_critical: keyed("noCritical", &suffixes),
        grants_critical: keyed("grants.critical", &suffixes),
        fail_critical: keyed("fail.critical", &suffixes),
    }
}

/// Forced-failure key tiers for a saving throw.
pub fn fail_save_keys(ability: Ability) -> KeySet {
    vec![
        "fail.all".into(),
        "fail.ability.all".into(),
        "fail.ability.save.all".into(),
        format!("fail.ability.save.{}", ability.id()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ActionType;

    fn is_superset(bigger: &[String], smaller: &[String]) -> bool {
        smaller.iter().all(|k| bigger.contains(k))
    }

    #[test]
    fn test_base_key_in_every_kind() {
        let activity = Activity::new(ActionType::MeleeWeapon);
        for keys in [
            check_keys(Ability::Strength),
            save_keys(Ability::Dexterity, false),
            death_save_keys(),
            skill_keys(Skill::Stealth),
            attack_keys(&activity),
        ] {
            assert!(keys.advantage.contains(&"advantage.all".to_string()));
            assert!(keys.disadvantage.contains(&"disadvantage.all".to_string()));
            assert!(keys.message.contains(&"message.all".to_string()));
        }
    }

    #[test]
    fn test_check_tiers() {
        let keys = check_keys(Ability::Strength);
        assert_eq!(
            keys.advantage,
            vec![
                "advantage.all",
                "advantage.ability.all",
                "advantage.ability.check.all",
                "advantage.ability.check.str",
            ]
        );
    }

    #[test]
    fn test_skill_supersets_its_ability_check() {
        // Stealth is a Dexterity check, so its key-set must contain every
        // dex-check candidate plus the skill tiers.
        let skill = skill_keys(Skill::Stealth);
        let check = check_keys(Ability::Dexterity);
        assert!(is_superset(&skill.advantage, &check.advantage));
        assert!(skill.advantage.contains(&"advantage.skill.ste".to_string()));
        assert!(skill.advantage.contains(&"advantage.skill.all".to_string()));
    }

    #[test]
    fn test_concentration_extends_save() {
        let plain = save_keys(Ability::Constitution, false);
        let conc = save_keys(Ability::Constitution, true);
        assert!(is_superset(&conc.advantage, &plain.advantage));
        assert!(conc
            .advantage
            .contains(&"advantage.ability.save.concentration".to_string()));
    }

    #[test]
    fn test_attack_tiers_grow_with_context() {
        let bare = attack_keys(&Activity::new(ActionType::MeleeWeapon));
        let full = attack_keys(
            &Activity::new(ActionType::MeleeWeapon)
                .with_ability(Ability::Strength)
                .with_target_distance(5),
        );
        assert!(is_superset(&full.advantage, &bare.advantage));
        assert!(full.advantage.contains(&"advantage.attack.mwak".to_string()));
        assert!(full.advantage.contains(&"advantage.attack.str".to_string()));
        assert!(full.advantage.contains(&"advantage.attack.near".to_string()));

        let far = attack_keys(
            &Activity::new(ActionType::RangedWeapon).with_target_distance(30),
        );
        assert!(far.advantage.contains(&"advantage.attack.far".to_string()));
    }

    #[test]
    fn test_grants_keys_mirror_attack_keys() {
        let activity = Activity::new(ActionType::RangedSpell);
        let own = attack_keys(&activity);
        let granted = attack_grants_keys(&activity);
        let expected: Vec<String> = own
            .advantage
            .iter()
            .map(|k| format!("grants.{k}"))
            .collect();
        assert_eq!(granted.advantage, expected);
    }

    #[test]
    fn test_critical_keys() {
        let keys = critical_keys(&Activity::new(ActionType::MeleeWeapon));
        assert_eq!(keys.critical, vec!["critical.all", "critical.mwak"]);
        assert_eq!(keys.no_critical, vec!["noCritical.all", "noCritical.mwak"]);
        assert_eq!(
            keys.grants_critical,
            vec!["grants.critical.all", "grants.critical.mwak"]
        );
        assert_eq!(
            keys.fail_critical,
            vec!["fail.critical.all", "fail.critical.mwak"]
        );
    }

    #[test]
    fn test_fail_save_tiers() {
        assert_eq!(
            fail_save_keys(Ability::Dexterity),
            vec![
                "fail.all",
                "fail.ability.all",
                "fail.ability.save.all",
                "fail.ability.save.dex",
            ]
        );
    }

    #[test]
    fn test_death_save_tiers() {
        let keys = death_save_keys();
        assert!(keys.advantage.contains(&"advantage.deathSave".to_string()));
        assert!(keys
            .advantage
            .contains(&"advantage.ability.save.all".to_string()));
    }
}
