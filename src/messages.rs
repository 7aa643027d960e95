//! Chat-annotation merging.
//!
//! Unions actor and target message flags matching a key-set into one
//! ordered list for the display layer. Purely additive: no truthiness
//! fold, no deduplication, and entirely independent of the advantage
//! decision.

use crate::flags::{message_strings, FlagMap};

/// Collect message strings for one roll.
///
/// Actor messages come first, in flag-map iteration order, then the
/// target's (against the `grants.` key-set) when a target is supplied.
/// Array values are flattened one level.
pub fn collect_messages(
    actor_flags: &FlagMap,
    target_flags: Option<&FlagMap>,
    keys: &[String],
    target_keys: Option<&[String]>,
) -> Vec<String> {
    let mut out = Vec::new();
    append_matching(&mut out, actor_flags, keys);
    if let (Some(flags), Some(keys)) = (target_flags, target_keys) {
        append_matching(&mut out, flags, keys);
    }
    out
}

fn append_matching(out: &mut Vec<String>, flags: &FlagMap, keys: &[String]) {
    for (key, value) in flags.iter() {
        if keys.iter().any(|k| k == key) {
            out.extend(message_strings(value));
        }
    }
}
