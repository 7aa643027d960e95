//! Flag extraction.
//!
//! Materializes an actor's active effects into a flattened map from dotted
//! key to value. Later changes for the same key overwrite earlier ones;
//! effect ordering is priority-sorted by the host, so last-wins is policy,
//! not accident.

use crate::world::Actor;
use serde_json::Value;

/// Leading namespace tokens a flag key may carry, optionally behind `grants.`.
const NAMESPACES: [&str; 6] = [
    "advantage",
    "disadvantage",
    "critical",
    "noCritical",
    "fail",
    "message",
];

/// A flattened dotted-key flag map.
///
/// Preserves first-insertion order (message output follows map iteration
/// order) while overwriting values on duplicate keys.
#[derive(Debug, Clone, Default)]
pub struct FlagMap {
    entries: Vec<(String, Value)>,
}

impl FlagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, overwriting the value of an existing entry in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if !namespace_known(&key) {
            tracing::debug!(key = %key, "flag key has unrecognized namespace, it will never match");
        }
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// True when the key's leading segment (after an optional `grants.`) is one
/// of the known namespace tokens. Unknown keys are inert, never an error.
fn namespace_known(key: &str) -> bool {
    let key = key.strip_prefix("grants.").unwrap_or(key);
    let head = key.split('.').next().unwrap_or(key);
    NAMESPACES.contains(&head)
}

/// Build the flattened flag map for an actor.
///
/// A missing actor (no target on an attack, say) is an empty map; every
/// downstream fold degrades to a no-op on it.
pub fn extract_flags(actor: Option<&Actor>) -> FlagMap {
    let mut map = FlagMap::new();
    let Some(actor) = actor else {
        return map;
    };
    for effect in actor.active_effects() {
        for change in &effect.changes {
            flatten_into(&mut map, &change.key, &change.value);
        }
    }
    map
}

/// Flatten a value under a dotted key prefix. Recurses through plain JSON
/// objects only; arrays and primitive values are leaves.
fn flatten_into(map: &mut FlagMap, key: &str, value: &Value) {
    match value {
        Value::Object(fields) => {
            for (segment, nested) in fields {
                flatten_into(map, &format!("{key}.{segment}"), nested);
            }
        }
        _ => map.insert(key, value.clone()),
    }
}

/// Truthiness of a flag value, matching the host's scripting semantics:
/// `null`, `false`, `0`, and `""` are falsy; everything else is truthy
/// (including empty arrays).
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a message flag value as display strings, flattening one level of
/// array. Null entries are dropped; anything else is shown.
pub fn message_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(message_string).collect(),
        other => message_string(other).into_iter().collect(),
    }
}

fn message_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
