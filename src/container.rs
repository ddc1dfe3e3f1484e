//! The data container: dotted-path CRUD, read-only locking, merging, and
//! bracket-style indexed access.

use crate::error::ContainerError;
use crate::merge;
use crate::path;
use crate::value::{Map, Value};
use tracing::trace;

/// A mutable key-value store over a nested, insertion-ordered mapping.
///
/// Keys are dotted paths: `"a.b.c"` addresses the value three maps deep.
/// All mutating operations are gated by a runtime read-only flag; a locked
/// container rejects them with [`ContainerError::ReadOnly`] and stays
/// unchanged. The flag is a runtime guard, not a type-level distinction,
/// because it is togglable at any time via [`set_read_only`](Self::set_read_only).
///
/// ```
/// use databag::{DataContainer, Value};
///
/// let mut config = DataContainer::new();
/// config.set("storage.path", ".databag/store")?;
/// assert_eq!(config.get("storage.path"), Some(&Value::from(".databag/store")));
/// # Ok::<(), databag::ContainerError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataContainer {
    data: Map,
    read_only: bool,
}

/// A source accepted by [`DataContainer::merge`]: a map-shaped [`Value`] or
/// another container. Validated when it is processed; a non-map `Value`
/// fails with [`ContainerError::InvalidMergeSource`].
#[derive(Debug, Clone)]
pub enum MergeSource {
    Value(Value),
    Container(DataContainer),
}

impl MergeSource {
    fn into_map(self) -> Result<Map, ContainerError> {
        match self {
            MergeSource::Value(Value::Map(map)) => Ok(map),
            MergeSource::Value(other) => {
                Err(ContainerError::InvalidMergeSource(other.type_name()))
            }
            MergeSource::Container(container) => Ok(container.data),
        }
    }
}

impl From<Value> for MergeSource {
    fn from(value: Value) -> Self {
        MergeSource::Value(value)
    }
}

impl From<Map> for MergeSource {
    fn from(map: Map) -> Self {
        MergeSource::Value(Value::Map(map))
    }
}

impl From<DataContainer> for MergeSource {
    fn from(container: DataContainer) -> Self {
        MergeSource::Container(container)
    }
}

impl From<&DataContainer> for MergeSource {
    fn from(container: &DataContainer) -> Self {
        MergeSource::Container(container.clone())
    }
}

impl DataContainer {
    /// Create an empty, writable container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writable container over initial data.
    pub fn with_data(data: Map) -> Self {
        Self {
            data,
            read_only: false,
        }
    }

    /// Create a container over initial data with the read-only flag set as
    /// given. No validation of the data's shape is performed.
    pub fn with_data_read_only(data: Map, read_only: bool) -> Self {
        Self { data, read_only }
    }

    fn guard_mutation(&self) -> Result<(), ContainerError> {
        if self.read_only {
            return Err(ContainerError::ReadOnly);
        }
        Ok(())
    }

    /// Replace the container's data wholesale. Obeys the read-only flag
    /// exactly like [`set`](Self::set).
    pub fn set_contents(&mut self, data: Map) -> Result<&mut Self, ContainerError> {
        self.guard_mutation()?;
        trace!(entries = data.len(), "replacing container contents");
        self.data = data;
        Ok(self)
    }

    /// The container's current data.
    pub fn contents(&self) -> &Map {
        &self.data
    }

    /// Alias of [`contents`](Self::contents).
    pub fn all(&self) -> &Map {
        &self.data
    }

    /// Set the read-only flag. Always permitted, including on a container
    /// that is already locked.
    pub fn set_read_only(&mut self, read_only: bool) -> &mut Self {
        self.read_only = read_only;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether a dotted path resolves to a present value. Presence is what's
    /// tested: a stored `Null` counts.
    pub fn has(&self, key: &str) -> bool {
        path::contains(&self.data, key)
    }

    /// Look up a dotted path. Returns `None` on a miss without mutating the
    /// container (no auto-vivification).
    pub fn get(&self, key: &str) -> Option<&Value> {
        path::resolve(&self.data, key)
    }

    /// Look up a dotted path, falling back to `default` on a miss.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Look up a dotted path, computing the fallback lazily on a miss.
    pub fn get_or_else<F>(&self, key: &str, default: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        self.get(key).cloned().unwrap_or_else(default)
    }

    /// Set the value at a dotted path, creating intermediate maps as needed.
    ///
    /// An existing intermediate that is not a map is overwritten with a
    /// fresh empty map so the path can continue; its old value is lost. This
    /// is a known sharp edge, kept for compatibility with the container
    /// contract.
    pub fn set(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, ContainerError> {
        self.guard_mutation()?;
        trace!(key, "setting value");
        path::insert(&mut self.data, key, value.into());
        Ok(self)
    }

    /// Remove the value at a dotted path.
    ///
    /// Returns true when the final segment existed and was removed; false
    /// when the path did not resolve, leaving the data unchanged. Parents
    /// emptied by the removal are kept.
    pub fn delete(&mut self, key: &str) -> Result<bool, ContainerError> {
        self.guard_mutation()?;
        let removed = path::remove(&mut self.data, key);
        trace!(key, removed, "deleting value");
        Ok(removed)
    }

    /// Merge sources into the container, left to right.
    ///
    /// Associative sub-maps merge recursively, sequential collections
    /// concatenate, anything else is replaced by the incoming value (see
    /// the [`merge`](crate::merge) module). Each source is validated when it
    /// is processed; sources merged before an invalid one remain applied,
    /// matching left-to-right application order.
    pub fn merge<I, S>(&mut self, sources: I) -> Result<&mut Self, ContainerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<MergeSource>,
    {
        self.guard_mutation()?;
        for source in sources {
            let map = source.into().into_map()?;
            trace!(entries = map.len(), "merging source");
            merge::merge_maps(&mut self.data, map);
        }
        Ok(self)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over top-level entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }
}

impl<'a> IntoIterator for &'a DataContainer {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Bracket-style access, as sugar over `has`/`get`/`set`/`delete`.
///
/// Reads are stricter than [`DataContainer::get`]: a missing key is a
/// [`ContainerError::KeyNotFound`], with no default. Deletes discard the
/// removed/not-removed distinction.
pub trait IndexedAccess {
    fn index_has(&self, key: &str) -> bool;
    fn index_get(&self, key: &str) -> Result<&Value, ContainerError>;
    fn index_set(&mut self, key: &str, value: Value) -> Result<(), ContainerError>;
    fn index_delete(&mut self, key: &str) -> Result<(), ContainerError>;
}

impl IndexedAccess for DataContainer {
    fn index_has(&self, key: &str) -> bool {
        self.has(key)
    }

    fn index_get(&self, key: &str) -> Result<&Value, ContainerError> {
        self.get(key)
            .ok_or_else(|| ContainerError::KeyNotFound(key.to_string()))
    }

    fn index_set(&mut self, key: &str, value: Value) -> Result<(), ContainerError> {
        self.set(key, value).map(|_| ())
    }

    fn index_delete(&mut self, key: &str) -> Result<(), ContainerError> {
        self.delete(key).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map_of(json: serde_json::Value) -> Map {
        match Value::from(json) {
            Value::Map(map) => map,
            other => panic!("expected a map, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_get_set_contents() {
        let mut c = DataContainer::new();
        assert!(c.contents().is_empty());

        let data = map_of(json!({ "this": "here" }));
        c.set_contents(data.clone()).unwrap();
        assert_eq!(c.contents(), &data);
        assert_eq!(c.all(), &data);

        c.set("this", "new").unwrap();
        assert_eq!(c.get("this"), Some(&Value::from("new")));
        assert_eq!(c.get_or("nothing", Value::from("default")), Value::from("default"));
    }

    #[test]
    fn test_fresh_container_misses() {
        let c = DataContainer::new();
        assert!(!c.has("anything"));
        assert_eq!(c.get("anything"), None);
        assert_eq!(c.get_or("anything", Value::Null), Value::Null);
    }

    #[test]
    fn test_deep_set_shapes_parents() {
        let mut c = DataContainer::new();
        c.set("a.b", 7).unwrap();
        assert_eq!(c.get("a.b"), Some(&Value::Int(7)));
        assert!(c.has("a.b"));
        assert_eq!(c.get("a"), Some(&Value::Map(map_of(json!({ "b": 7 })))));
    }

    #[test]
    fn test_lazy_default_only_runs_on_miss() {
        let mut c = DataContainer::new();
        c.set("present", 1).unwrap();

        let mut called = false;
        let hit = c.get_or_else("present", || {
            called = true;
            Value::Null
        });
        assert_eq!(hit, Value::Int(1));
        assert!(!called);

        let miss = c.get_or_else("absent", || Value::from("made"));
        assert_eq!(miss, Value::from("made"));
    }

    #[test]
    fn test_delete() {
        let mut c = DataContainer::new();
        assert!(!c.delete("nope").unwrap());
        c.set("deep.key", true).unwrap();
        assert!(c.delete("deep.key").unwrap());
        assert!(!c.delete("deep.key").unwrap());
        assert!(!c.delete("deep.other").unwrap());
        assert!(!c.delete("other.key").unwrap());
        assert!(!c.has("deep.key"));
    }

    #[test]
    fn test_read_only_guards_every_mutation() {
        let mut c = DataContainer::with_data_read_only(map_of(json!({ "keep": 1 })), true);
        let before = c.all().clone();

        assert_eq!(c.set("keep", 2).unwrap_err(), ContainerError::ReadOnly);
        assert_eq!(c.delete("keep").unwrap_err(), ContainerError::ReadOnly);
        assert_eq!(
            c.set_contents(Map::new()).unwrap_err(),
            ContainerError::ReadOnly
        );
        assert_eq!(
            c.merge([map_of(json!({ "new": "stuff" }))]).unwrap_err(),
            ContainerError::ReadOnly
        );
        assert_eq!(c.all(), &before);
    }

    #[test]
    fn test_read_only_toggles_at_runtime() {
        let mut c = DataContainer::with_data(map_of(json!({ "some": { "data": true } })));
        assert_eq!(c.get("some.data"), Some(&Value::Bool(true)));
        assert!(!c.is_read_only());

        c.set("some.thing", true).unwrap();
        c.set_read_only(true);
        assert!(c.is_read_only());
        assert!(c.set("some.other.thing", true).is_err());

        c.set_read_only(false);
        c.set("some.other.thing", true).unwrap();
        assert!(c.has("some.other.thing"));
    }

    #[test]
    fn test_merge_containers_and_maps() {
        let mut c = DataContainer::with_data(map_of(json!({
            "this": "is",
            "nested": { "values": "awesome" },
            "set": [1, 2, 3],
        })));

        let other = DataContainer::with_data(map_of(json!({
            "nested": { "thing": "added" },
        })));

        c.merge([
            MergeSource::from(other),
            MergeSource::from(map_of(json!({ "set": ["yeah"] }))),
        ])
        .unwrap();

        let expected = map_of(json!({
            "this": "is",
            "nested": { "values": "awesome", "thing": "added" },
            "set": [1, 2, 3, "yeah"],
        }));
        assert_eq!(c.all(), &expected);
    }

    #[test]
    fn test_merge_rejects_scalar_source() {
        let mut c = DataContainer::new();
        assert_eq!(
            c.merge([Value::Int(1)]).unwrap_err(),
            ContainerError::InvalidMergeSource("int")
        );
    }

    #[test]
    fn test_merge_applies_sources_before_invalid_one() {
        let mut c = DataContainer::new();
        let err = c
            .merge([Value::Map(map_of(json!({ "early": true }))), Value::Int(1)])
            .unwrap_err();
        assert_eq!(err, ContainerError::InvalidMergeSource("int"));
        // left-to-right application: the valid leading source stays applied
        assert_eq!(c.get("early"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_indexed_access() {
        let mut c = DataContainer::new();
        c.index_set("what", Value::from("this")).unwrap();
        assert!(c.index_has("what"));
        assert_eq!(c.index_get("what").unwrap(), &Value::from("this"));
        assert_eq!(
            c.index_get("exception").unwrap_err(),
            ContainerError::KeyNotFound("exception".to_string())
        );
        c.index_delete("what").unwrap();
        assert!(!c.index_has("what"));
        // plain get on the same miss stays quiet
        assert_eq!(c.get("exception"), None);
    }

    #[test]
    fn test_indexed_access_respects_read_only() {
        let mut c =
            DataContainer::with_data_read_only(map_of(json!({ "some": { "data": true } })), true);
        assert_eq!(
            c.index_delete("some").unwrap_err(),
            ContainerError::ReadOnly
        );
        assert_eq!(
            c.index_set("some", Value::Null).unwrap_err(),
            ContainerError::ReadOnly
        );
    }

    #[test]
    fn test_len_and_iteration_order() {
        let mut c = DataContainer::new();
        assert!(c.is_empty());
        c.set("b", 1).unwrap();
        c.set("a", 2).unwrap();
        assert_eq!(c.len(), 2);

        let keys: Vec<_> = c.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
