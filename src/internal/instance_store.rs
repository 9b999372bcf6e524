//! Container-local store of constructed instances.

use std::collections::HashMap;

use crate::key::InstanceKey;
use crate::registration::{AnyArc, Teardown};

/// One constructed instance plus the teardown captured when it was built.
pub(crate) struct StoredInstance {
    pub(crate) key: InstanceKey,
    pub(crate) value: AnyArc,
    pub(crate) teardown: Option<Teardown>,
    seq: u64,
}

/// Instances owned by a single container.
///
/// Entries are drained in LIFO construction order so that a service is torn
/// down before the dependencies it resolved while being built.
#[derive(Default)]
pub(crate) struct InstanceStore {
    entries: HashMap<InstanceKey, StoredInstance>,
    next_seq: u64,
}

impl InstanceStore {
    /// Cached instance for `name`, if one was built.
    pub(crate) fn cached(&self, name: &str) -> Option<AnyArc> {
        self.entries
            .get(&InstanceKey::Named(name.to_string()))
            .map(|entry| entry.value.clone())
    }

    /// Records an instance. Returns the entry it displaced, if any.
    pub(crate) fn insert(
        &mut self,
        key: InstanceKey,
        value: AnyArc,
        teardown: Option<Teardown>,
    ) -> Option<StoredInstance> {
        let seq = self.next_seq;
        self.next_seq += 1;
        let entry = StoredInstance {
            key: key.clone(),
            value,
            teardown,
            seq,
        };
        self.entries.insert(key, entry)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any stored instance still has a teardown pending.
    pub(crate) fn has_teardowns(&self) -> bool {
        self.entries.values().any(|entry| entry.teardown.is_some())
    }

    /// Empties the store, newest instance first.
    pub(crate) fn drain_lifo(&mut self) -> Vec<StoredInstance> {
        let mut drained: Vec<_> = self.entries.drain().map(|(_, entry)| entry).collect();
        drained.sort_by(|a, b| b.seq.cmp(&a.seq));
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn value(n: u32) -> AnyArc {
        Arc::new(n)
    }

    #[test]
    fn cached_only_sees_named_entries() {
        let mut store = InstanceStore::default();
        store.insert(InstanceKey::transient("job", "1"), value(1), None);
        assert!(store.cached("job").is_none());

        store.insert(InstanceKey::named("job"), value(2), None);
        let hit = store.cached("job").unwrap();
        assert_eq!(*hit.downcast::<u32>().unwrap(), 2);
    }

    #[test]
    fn drain_is_newest_first() {
        let mut store = InstanceStore::default();
        store.insert(InstanceKey::named("a"), value(1), None);
        store.insert(InstanceKey::transient("b", "x"), value(2), None);
        store.insert(InstanceKey::named("c"), value(3), None);

        let names: Vec<_> = store
            .drain_lifo()
            .into_iter()
            .map(|entry| entry.key.service_name().to_string())
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn replacing_a_named_entry_returns_the_old_one() {
        let mut store = InstanceStore::default();
        assert!(store.insert(InstanceKey::named("a"), value(1), None).is_none());
        let old = store.insert(InstanceKey::named("a"), value(2), None).unwrap();
        assert_eq!(*old.value.downcast::<u32>().unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert!(!store.has_teardowns());
    }
}
