//! Scene-owned items and their lifecycle callbacks
//!
//! Slots refer to items by [`ItemId`] only. The [`ItemCatalog`] is the single
//! owner of item records and the only place lifecycle state changes, so every
//! transition is reported to the [`ItemListener`] exactly once.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::spatial::{Transform, Vector3D};

/// Stable identity of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Identity of the ghost visual an item uses. Items sharing a template are
/// considered the same kind during secondary manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GhostTemplateId(pub u32);

/// Highlight color handed to items on selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemLifecycle {
    /// Resting in the scene, not owned by any hand
    #[default]
    Free,
    /// Bound to a slot in some hand's array
    Held,
    /// Animating from its slot toward a committed placement
    Placing,
    /// Settled on a surface after placement
    Placed,
}

/// A user-manipulable object
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    /// Radius used for auto-spacing
    pub bounding_radius: f32,
    /// Distance kept between the surface and the item's pivot when placed
    pub placement_offset: f32,
    pub ghost_template: GhostTemplateId,
    pub lifecycle: ItemLifecycle,
    pub selected: bool,
    /// Last known world pose
    pub transform: Transform,
}

impl Item {
    pub fn new(id: ItemId, bounding_radius: f32, ghost_template: GhostTemplateId) -> Self {
        Self {
            id,
            bounding_radius,
            placement_offset: 0.0,
            ghost_template,
            lifecycle: ItemLifecycle::Free,
            selected: false,
            transform: Transform::IDENTITY,
        }
    }

    pub fn with_placement_offset(mut self, offset: f32) -> Self {
        self.placement_offset = offset;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn is_held(&self) -> bool {
        self.lifecycle == ItemLifecycle::Held
    }
}

/// Lifecycle notifications delivered to the scene side.
pub trait ItemListener {
    fn on_grabbed(&mut self, _item: ItemId) {}
    fn on_released(&mut self, _item: ItemId, _velocity: Vector3D) {}
    fn on_placed(&mut self, _item: ItemId, _transform: &Transform) {}
    fn on_selected(&mut self, _item: ItemId, _highlight: Rgba) {}
    fn on_deselected(&mut self, _item: ItemId) {}
}

/// Owner of all item records
#[derive(Default)]
pub struct ItemCatalog {
    items: HashMap<ItemId, Item>,
    listener: Option<Box<dyn ItemListener>>,
}

impl fmt::Debug for ItemCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemCatalog")
            .field("items", &self.items.len())
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(mut self, listener: Box<dyn ItemListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn set_listener(&mut self, listener: Box<dyn ItemListener>) {
        self.listener = Some(listener);
    }

    /// Add or replace an item record
    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Bounding radius, or zero for unknown ids
    pub fn bounding_radius(&self, id: ItemId) -> f32 {
        self.items.get(&id).map_or(0.0, |item| item.bounding_radius)
    }

    pub fn ghost_template(&self, id: ItemId) -> Option<GhostTemplateId> {
        self.items.get(&id).map(|item| item.ghost_template)
    }

    pub fn transform(&self, id: ItemId) -> Option<Transform> {
        self.items.get(&id).map(|item| item.transform)
    }

    pub fn set_transform(&mut self, id: ItemId, transform: Transform) {
        if let Some(item) = self.items.get_mut(&id) {
            item.transform = transform;
        }
    }

    /// Mark as held. Returns false if unknown, already held, or still
    /// travelling to its placement.
    pub fn mark_grabbed(&mut self, id: ItemId) -> bool {
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        if matches!(item.lifecycle, ItemLifecycle::Held | ItemLifecycle::Placing) {
            return false;
        }
        item.lifecycle = ItemLifecycle::Held;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_grabbed(id);
        }
        true
    }

    pub fn mark_released(&mut self, id: ItemId, velocity: Vector3D) {
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        item.lifecycle = ItemLifecycle::Free;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_released(id, velocity);
        }
    }

    pub fn mark_placing(&mut self, id: ItemId) {
        if let Some(item) = self.items.get_mut(&id) {
            item.lifecycle = ItemLifecycle::Placing;
        }
    }

    /// Finish a placement. Only an item that is still placing lands.
    pub fn mark_placed(&mut self, id: ItemId, transform: Transform) {
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        if item.lifecycle != ItemLifecycle::Placing {
            return;
        }
        item.lifecycle = ItemLifecycle::Placed;
        item.transform = transform;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_placed(id, &transform);
        }
    }

    pub fn mark_selected(&mut self, id: ItemId, highlight: Rgba) {
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        item.selected = true;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_selected(id, highlight);
        }
    }

    /// Clear selection; silent if the item was not selected
    pub fn mark_deselected(&mut self, id: ItemId) {
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        if !item.selected {
            return;
        }
        item.selected = false;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_deselected(id);
        }
    }
}
