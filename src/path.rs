//! Dotted-path traversal over nested maps.
//!
//! A key such as `"a.b.c"` addresses `map["a"]["b"]["c"]`. Every segment
//! before the last must resolve to a map for reads to succeed; writes create
//! intermediate maps on demand. A key with no dot is a single-segment path,
//! equivalent to direct top-level access.

use crate::value::{Map, Value};

/// Resolve a dotted path to a reference into the map.
///
/// Returns `None` when an intermediate segment is missing or is not a map,
/// or when the final segment is absent. A stored `Null` resolves to
/// `Some(&Value::Null)`; presence is what's tested, not truthiness.
pub fn resolve<'a>(map: &'a Map, key: &str) -> Option<&'a Value> {
    match key.split_once('.') {
        None => map.get(key),
        Some((head, rest)) => match map.get(head)? {
            Value::Map(inner) => resolve(inner, rest),
            _ => None,
        },
    }
}

/// Whether a dotted path resolves to a present value.
pub fn contains(map: &Map, key: &str) -> bool {
    resolve(map, key).is_some()
}

/// Insert a value at a dotted path, creating intermediate maps as needed.
///
/// An existing intermediate value that is not a map is overwritten with a
/// fresh empty map so the path can continue; the old value is lost. This is
/// a known sharp edge of the container contract.
pub fn insert(map: &mut Map, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Map(Map::new()));
            if !slot.is_map() {
                *slot = Value::Map(Map::new());
            }
            if let Value::Map(inner) = slot {
                insert(inner, rest, value);
            }
        }
    }
}

/// Remove the value at a dotted path.
///
/// Returns true when the final segment existed and was removed. A missing or
/// non-map intermediate segment, or an absent final segment, leaves the map
/// unchanged and returns false. Parents emptied by the removal are kept.
pub fn remove(map: &mut Map, key: &str) -> bool {
    match key.split_once('.') {
        None => map.shift_remove(key).is_some(),
        Some((head, rest)) => match map.get_mut(head) {
            Some(Value::Map(inner)) => remove(inner, rest),
            _ => false,
        },
    }
}
