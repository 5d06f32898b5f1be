//! Specialized collection types

use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use std::hash::Hash;

new_key_type! {
    /// Stable slot key inside an [`IndexedSlotMap`]
    pub struct SlotKey;
}

/// Slot map storage addressed by an external identifier
///
/// Values live densely in a `SlotMap`; a side index resolves the externally
/// visible identifier to its slot. Removing a value frees the slot, and the
/// generation check in the slot key keeps stale keys from aliasing new values.
pub struct IndexedSlotMap<K, V> {
    slots: SlotMap<SlotKey, (K, V)>,
    index: HashMap<K, SlotKey>,
}

impl<K: Copy + Eq + Hash, V> IndexedSlotMap<K, V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            index: HashMap::new(),
        }
    }

    /// Insert a value, returning the previous value stored under `id`
    pub fn insert(&mut self, id: K, value: V) -> Option<V> {
        if let Some(&key) = self.index.get(&id) {
            return self
                .slots
                .get_mut(key)
                .map(|slot| std::mem::replace(&mut slot.1, value));
        }
        let key = self.slots.insert((id, value));
        self.index.insert(id, key);
        None
    }

    /// Remove a value by identifier
    pub fn remove(&mut self, id: &K) -> Option<V> {
        let key = self.index.remove(id)?;
        self.slots.remove(key).map(|(_, value)| value)
    }

    /// Get a value by identifier
    pub fn get(&self, id: &K) -> Option<&V> {
        let key = self.index.get(id)?;
        self.slots.get(*key).map(|(_, value)| value)
    }

    /// Get a mutable value by identifier
    pub fn get_mut(&mut self, id: &K) -> Option<&mut V> {
        let key = self.index.get(id)?;
        self.slots.get_mut(*key).map(|(_, value)| value)
    }

    /// Whether `id` is present
    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over `(id, value)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots.values().map(|(id, value)| (id, value))
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}

impl<K: Copy + Eq + Hash, V> Default for IndexedSlotMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut map = IndexedSlotMap::new();
        assert!(map.insert(5_u64, "a").is_none());
        assert!(map.insert(9_u64, "b").is_none());
        assert_eq!(map.get(&5), Some(&"a"));
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(&5), Some("a"));
        assert!(!map.contains(&5));
        assert_eq!(map.remove(&5), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut map = IndexedSlotMap::new();
        map.insert(1_u64, 10);
        assert_eq!(map.insert(1_u64, 20), Some(10));
        assert_eq!(map.len(), 1);
        if let Some(value) = map.get_mut(&1) {
            *value += 1;
        }
        assert_eq!(map.get(&1), Some(&21));
    }
}
