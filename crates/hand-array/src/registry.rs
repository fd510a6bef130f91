//! Ordered slots of one hand's array
//!
//! Registry order is the only source of array index. Binding is an explicit
//! `slot -> Option<ItemId>` map; where the slot sits in space is a separate
//! concern carried by its [`SpatialNode`].

use tracing::debug;

use crate::item::ItemId;
use crate::spatial::SpatialNode;

/// Identity of a slot, unique within one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u64);

/// One array position, optionally bound to an item
#[derive(Debug, Clone)]
pub struct Slot {
    id: SlotId,
    /// Position in array space; rotation relative to the array pivot
    pub node: SpatialNode,
    item: Option<ItemId>,
    /// Snap to the first computed target instead of interpolating
    pub(crate) needs_seed: bool,
}

impl Slot {
    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn item(&self) -> Option<ItemId> {
        self.item
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
    next_id: u64,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.slots.iter_mut()
    }

    pub fn get(&self, slot: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == slot)
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == slot)
    }

    pub fn at(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Bound items in array order
    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.slots.iter().filter_map(|s| s.item)
    }

    pub fn held_count(&self) -> usize {
        self.items().count()
    }

    pub fn contains_item(&self, item: ItemId) -> bool {
        self.slots.iter().any(|s| s.item == Some(item))
    }

    /// Slot bound to `item`, or `None` when the item is not in this array
    pub fn slot_of(&self, item: ItemId) -> Option<SlotId> {
        let found = self.slots.iter().find(|s| s.item == Some(item)).map(|s| s.id);
        if found.is_none() {
            debug!(%item, "item not bound to any slot");
        }
        found
    }

    /// Item bound to `slot`, or `None` for empty or unknown slots
    pub fn item_of(&self, slot: SlotId) -> Option<ItemId> {
        match self.get(slot) {
            Some(s) => s.item,
            None => {
                debug!(slot = slot.0, "slot not in registry");
                None
            }
        }
    }

    pub fn index_of(&self, slot: SlotId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == slot)
    }

    pub fn index_of_item(&self, item: ItemId) -> Option<usize> {
        self.slots.iter().position(|s| s.item == Some(item))
    }

    /// Create a slot. It goes immediately before the slot holding `before`
    /// when that item is present, otherwise at the end. An item that is
    /// already bound keeps its existing slot.
    pub fn insert(&mut self, item: Option<ItemId>, node: SpatialNode, before: Option<ItemId>) -> SlotId {
        if let Some(existing) = item.and_then(|id| self.slots.iter().find(|s| s.item == Some(id))) {
            debug!(item = ?item, slot = existing.id.0, "item already bound, reusing slot");
            return existing.id;
        }

        let id = SlotId(self.next_id);
        self.next_id += 1;
        let slot = Slot {
            id,
            node,
            item,
            needs_seed: item.is_none(),
        };

        match before.and_then(|sel| self.index_of_item(sel)) {
            Some(index) => self.slots.insert(index, slot),
            None => self.slots.push(slot),
        }
        id
    }

    /// Unbind and remove `slot`; `None` if it is not in the registry
    pub fn remove(&mut self, slot: SlotId) -> Option<Slot> {
        let Some(index) = self.index_of(slot) else {
            debug!(slot = slot.0, "remove of unknown slot ignored");
            return None;
        };
        Some(self.slots.remove(index))
    }

    /// Cyclically move every slot, together with its item, `places`
    /// positions forward (negative moves backward).
    pub fn jog(&mut self, places: i32) {
        let len = self.slots.len();
        if len == 0 || places == 0 {
            return;
        }
        let shift = (places as i64).rem_euclid(len as i64) as usize;
        self.slots.rotate_right(shift);
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(n: u64) -> SlotRegistry {
        let mut registry = SlotRegistry::new();
        for i in 1..=n {
            registry.insert(Some(ItemId(i)), SpatialNode::default(), None);
        }
        registry
    }

    fn order(registry: &SlotRegistry) -> Vec<u64> {
        registry.items().map(|i| i.0).collect()
    }

    #[test]
    fn test_insert_before_selection() {
        let mut registry = registry_with(3);
        registry.insert(Some(ItemId(9)), SpatialNode::default(), Some(ItemId(2)));
        assert_eq!(order(&registry), vec![1, 9, 2, 3]);
    }

    #[test]
    fn test_insert_with_missing_selection_appends() {
        let mut registry = registry_with(2);
        registry.insert(Some(ItemId(9)), SpatialNode::default(), Some(ItemId(42)));
        assert_eq!(order(&registry), vec![1, 2, 9]);
    }

    #[test]
    fn test_item_bound_once() {
        let mut registry = registry_with(2);
        let first = registry.slot_of(ItemId(1)).unwrap();
        let again = registry.insert(Some(ItemId(1)), SpatialNode::default(), None);
        assert_eq!(first, again);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_jog_forward_and_back() {
        let mut registry = registry_with(4);
        registry.jog(1);
        assert_eq!(order(&registry), vec![4, 1, 2, 3]);
        registry.jog(-1);
        assert_eq!(order(&registry), vec![1, 2, 3, 4]);
        registry.jog(-5);
        assert_eq!(order(&registry), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_jog_keeps_slot_item_pairing() {
        let mut registry = registry_with(3);
        let slot = registry.slot_of(ItemId(2)).unwrap();
        registry.jog(2);
        assert_eq!(registry.item_of(slot), Some(ItemId(2)));
    }

    #[test]
    fn test_lookup_misses_are_none() {
        let mut registry = registry_with(1);
        assert!(registry.slot_of(ItemId(7)).is_none());
        assert!(registry.item_of(SlotId(99)).is_none());
        assert!(registry.remove(SlotId(99)).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_slot_needs_seed() {
        let mut registry = SlotRegistry::new();
        let id = registry.insert(None, SpatialNode::default(), None);
        assert!(registry.get(id).unwrap().needs_seed);
        assert!(registry.get(id).unwrap().is_empty());
    }
}
