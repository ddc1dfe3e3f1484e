//! Deep-merge rules: recursive merge for associative maps, concatenation
//! for sequential collections, replacement otherwise.

use crate::value::{Map, Value};

/// Whether a map is associative rather than list-like.
///
/// A map is sequential (not associative) iff its keys are exactly
/// `"0", "1", ..., "n-1"` in that order. Any other key set or order,
/// including integers out of order or not starting at zero, makes it
/// associative. An empty map counts as sequential.
pub fn is_associative(map: &Map) -> bool {
    !map.keys()
        .enumerate()
        .all(|(index, key)| key_index(key) == Some(index))
}

/// Parse a key as a canonical zero-based index ("0", "1", ...).
fn key_index(key: &str) -> Option<usize> {
    // reject non-canonical spellings such as "01" or "+1"
    if key.starts_with('+') || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse().ok()
}

/// Merge `incoming` into `existing`, key by key.
///
/// Keys new to `existing` are appended; keys present on both sides combine
/// per the rules on `merged`. Existing keys keep their position.
pub fn merge_maps(existing: &mut Map, incoming: Map) {
    for (key, value) in incoming {
        match existing.get_mut(&key) {
            Some(slot) => {
                let current = std::mem::take(slot);
                *slot = merged(current, value);
            }
            None => {
                existing.insert(key, value);
            }
        }
    }
}

/// Combine two values occupying the same key.
///
/// Both associative maps: merge recursively. Both sequential (a list, or a
/// map keyed `"0".."n-1"` in order): concatenate with the existing elements
/// first, reindexed contiguously from zero. Everything else: the incoming
/// value replaces the existing one.
fn merged(existing: Value, incoming: Value) -> Value {
    match (existing, incoming) {
        (Value::Map(mut current), Value::Map(incoming)) => {
            if is_associative(&current) && is_associative(&incoming) {
                merge_maps(&mut current, incoming);
                Value::Map(current)
            } else if !is_associative(&current) && !is_associative(&incoming) {
                let items = current.into_values().chain(incoming.into_values());
                Value::Map(reindex(items))
            } else {
                Value::Map(incoming)
            }
        }
        (Value::List(mut current), Value::List(incoming)) => {
            current.extend(incoming);
            Value::List(current)
        }
        (Value::List(mut current), Value::Map(incoming)) if !is_associative(&incoming) => {
            current.extend(incoming.into_values());
            Value::List(current)
        }
        (Value::Map(current), Value::List(incoming)) if !is_associative(&current) => {
            Value::List(current.into_values().chain(incoming).collect())
        }
        (_, incoming) => incoming,
    }
}

/// Rebuild a sequential map keyed `"0".."n-1"` from elements in order.
fn reindex<I: IntoIterator<Item = Value>>(items: I) -> Map {
    items
        .into_iter()
        .enumerate()
        .map(|(index, value)| (index.to_string(), value))
        .collect()
}
