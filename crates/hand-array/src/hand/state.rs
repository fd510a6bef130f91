//! Per-hand session state and the operations that mutate it

use std::time::Duration;

use tracing::{debug, trace};

use super::input::{Button, Hand, HandInput};
use super::manipulation::ManipulationGhost;
use super::placement::PlacingItem;
use crate::config::HandArrayConfig;
use crate::error::PlacementError;
use crate::item::{ItemCatalog, ItemId};
use crate::layout::{advance_slots, ArrayLayout, LayoutKind, StowState};
use crate::mode::InteractionMode;
use crate::projector::PlacementGhost;
use crate::registry::{SlotId, SlotRegistry};
use crate::spatial::{SpatialNode, Transform, Vector3D};

/// Continuous adjustment requested this tick, each in `[-1, 1]`.
/// Cleared on every mode change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdjustmentInput {
    pub rotation: f32,
    pub size: f32,
    pub offset: f32,
}

impl AdjustmentInput {
    pub const ZERO: Self = Self {
        rotation: 0.0,
        size: 0.0,
        offset: 0.0,
    };

    pub fn is_idle(&self) -> bool {
        *self == Self::ZERO
    }

    /// Whether the array's position is being steered by hand
    pub fn is_steering(&self) -> bool {
        self.rotation != 0.0 || self.offset != 0.0
    }
}

/// Something a hand did in response to input
#[derive(Debug, Clone, PartialEq)]
pub enum HandAction {
    Grabbed(ItemId),
    Dropped(ItemId),
    Selected(Option<ItemId>),
    Jogged(i32),
    LayoutToggled(LayoutKind),
    Stowed(bool),
    Committed(Vec<ItemId>),
    CommitFailed(PlacementError),
    Cancelled,
}

/// Everything one hand owns: its array, selection and transient flags
#[derive(Debug, Clone)]
pub struct HandState {
    pub(super) side: Hand,
    pub(super) pose: Transform,
    pub(super) registry: SlotRegistry,
    pub(super) layout: ArrayLayout,
    pub(super) selected: Option<ItemId>,
    pub(super) stowed: bool,
    pub(super) secondary: bool,
    pub(super) doing_secondary: bool,
    pub(super) adjustment: AdjustmentInput,
    pub(super) height_offset: f32,
    pub(super) grab_zone_visible: bool,
    pub(super) ghosts: Vec<PlacementGhost>,
    pub(super) placing: Vec<PlacingItem>,
    pub(super) manipulation_ghost: Option<ManipulationGhost>,
    pub(super) config: HandArrayConfig,
}

impl HandState {
    pub fn new(side: Hand, config: &HandArrayConfig) -> Self {
        Self {
            side,
            pose: Transform::IDENTITY,
            registry: SlotRegistry::new(),
            layout: ArrayLayout::new(&config.layout),
            selected: None,
            stowed: false,
            secondary: false,
            doing_secondary: false,
            adjustment: AdjustmentInput::ZERO,
            height_offset: config.placement.height_offset,
            grab_zone_visible: InteractionMode::default().shows_grab_zone(),
            ghosts: Vec::new(),
            placing: Vec::new(),
            manipulation_ghost: None,
            config: config.clone(),
        }
    }

    pub fn side(&self) -> Hand {
        self.side
    }

    pub fn pose(&self) -> &Transform {
        &self.pose
    }

    pub fn set_pose(&mut self, pose: Transform) {
        self.pose = pose;
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn layout(&self) -> &ArrayLayout {
        &self.layout
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn is_stowed(&self) -> bool {
        self.stowed
    }

    /// This hand is manipulating the other hand's array
    pub fn is_secondary(&self) -> bool {
        self.secondary
    }

    pub fn is_doing_secondary_manipulation(&self) -> bool {
        self.doing_secondary
    }

    pub fn adjustment(&self) -> AdjustmentInput {
        self.adjustment
    }

    pub fn set_adjustment(&mut self, adjustment: AdjustmentInput) {
        self.adjustment = adjustment;
    }

    pub fn clear_adjustment(&mut self) {
        self.adjustment = AdjustmentInput::ZERO;
    }

    pub fn height_offset(&self) -> f32 {
        self.height_offset
    }

    pub fn grab_zone_visible(&self) -> bool {
        self.grab_zone_visible
    }

    /// Palm-up measure: the hand's up axis against world up, mirrored for
    /// the right hand.
    pub fn upwardness(&self) -> f32 {
        self.pose.up().dot(&Vector3D::UP) * self.side.upward_sign()
    }

    pub(crate) fn set_secondary(&mut self, secondary: bool) {
        self.secondary = secondary;
        if !secondary {
            self.doing_secondary = false;
        }
    }

    pub(crate) fn set_doing_secondary(&mut self, active: bool) {
        self.doing_secondary = active && self.secondary;
    }

    /// World transform of a slot node anchored to `pose`. Slot positions
    /// already include the pivot; slot rotations are pivot-relative.
    pub(super) fn compose_slot(pose: &Transform, layout: &ArrayLayout, node: &SpatialNode) -> Transform {
        pose.compose(&Transform {
            position: node.position(),
            rotation: layout.pivot_rotation() * node.rotation(),
            scale: node.scale(),
        })
    }

    /// World transform of `slot`, or `None` if it is not in this array
    pub fn slot_world(&self, slot: SlotId) -> Option<Transform> {
        self.registry
            .get(slot)
            .map(|s| Self::compose_slot(&self.pose, &self.layout, &s.node))
    }

    /// Create a slot, bound to `item` when given. A bound slot starts where
    /// the item currently is. New slots go in front of the selection.
    pub fn add_slot(&mut self, item: Option<ItemId>, catalog: &ItemCatalog) -> SlotId {
        let node = match item.and_then(|id| catalog.transform(id)) {
            Some(world) => {
                let frame = Transform {
                    rotation: self.pose.rotation * self.layout.pivot_rotation(),
                    ..self.pose
                };
                let mut local = frame.relative(&world);
                local.position = self.pose.inverse_transform_point(world.position);
                SpatialNode::new(local)
            }
            None => SpatialNode::default(),
        };

        let slot = self.registry.insert(item, node, self.selected);
        self.after_composition_change(catalog);
        trace!(hand = self.side.name(), slot = slot.0, count = self.registry.len(), "slot added");
        slot
    }

    /// Remove `slot` and report the item it held. Unknown slots are ignored.
    pub fn remove_slot(&mut self, slot: SlotId, catalog: &mut ItemCatalog) -> Option<ItemId> {
        let removed = self.registry.remove(slot)?;
        if self.registry.len() < 2 {
            let unwind = -self.layout.rotation();
            self.layout.rotate_array(unwind, self.registry.iter_mut().map(|s| &mut s.node));
        }

        let item = removed.item();
        if let Some(id) = item {
            if self.selected == Some(id) {
                self.selected = None;
                catalog.mark_deselected(id);
            }
            if self.manipulation_ghost.as_ref().is_some_and(|g| g.item == id) {
                self.manipulation_ghost = None;
            }
        }
        self.after_composition_change(catalog);
        trace!(hand = self.side.name(), slot = slot.0, count = self.registry.len(), "slot removed");
        item
    }

    /// Remove every slot front to back
    pub fn remove_all(&mut self, catalog: &mut ItemCatalog) -> Vec<ItemId> {
        let mut items = Vec::new();
        while let Some(slot) = self.registry.at(0).map(|s| s.id()) {
            if let Some(item) = self.remove_slot(slot, catalog) {
                items.push(item);
            }
        }
        items
    }

    /// Cycle items around the array
    pub fn jog(&mut self, places: i32) {
        if self.registry.is_empty() || places == 0 {
            return;
        }
        self.registry.jog(places);
        self.invalidate_ghosts();
        debug!(hand = self.side.name(), places, "array jogged");
    }

    /// Pick `item` up into this hand's array
    pub fn grab(&mut self, item: ItemId, catalog: &mut ItemCatalog) -> Option<SlotId> {
        if !catalog.mark_grabbed(item) {
            debug!(hand = self.side.name(), %item, "grab rejected");
            return None;
        }
        Some(self.add_slot(Some(item), catalog))
    }

    /// Let go of `item`, handing it `velocity`. False if it is not held here.
    pub fn drop_item(&mut self, item: ItemId, velocity: Vector3D, catalog: &mut ItemCatalog) -> bool {
        let Some(slot) = self.registry.slot_of(item) else {
            return false;
        };
        if let Some(world) = self.slot_world(slot) {
            catalog.set_transform(item, world);
        }
        self.remove_slot(slot, catalog);
        catalog.mark_released(item, velocity);
        true
    }

    /// Select a held item; false when the item is not in this array
    pub fn select(&mut self, item: ItemId, catalog: &mut ItemCatalog) -> bool {
        if !self.registry.contains_item(item) {
            debug!(hand = self.side.name(), %item, "cannot select item outside the array");
            return false;
        }
        if self.selected == Some(item) {
            return true;
        }
        self.deselect(catalog);
        self.selected = Some(item);
        catalog.mark_selected(item, self.config.hands.highlight_color);
        true
    }

    pub fn deselect(&mut self, catalog: &mut ItemCatalog) {
        if let Some(previous) = self.selected.take() {
            catalog.mark_deselected(previous);
        }
    }

    /// Move the selection `step` items along the array, wrapping. With no
    /// selection, a forward step selects the first item and a backward step
    /// the last.
    pub fn select_next(&mut self, step: i32, catalog: &mut ItemCatalog) -> Option<ItemId> {
        let items: Vec<ItemId> = self.registry.items().collect();
        if items.is_empty() {
            return None;
        }
        let len = items.len() as i64;
        let next = match self.selected.and_then(|sel| items.iter().position(|&i| i == sel)) {
            Some(current) => (current as i64 + step as i64).rem_euclid(len),
            None if step < 0 => len - 1,
            None => 0,
        };
        let item = items[next as usize];
        self.select(item, catalog);
        Some(item)
    }

    pub fn toggle_layout(&mut self, catalog: &ItemCatalog) -> LayoutKind {
        self.layout.set_kind(self.layout.kind().toggled());
        self.respace(catalog);
        self.invalidate_ghosts();
        self.layout.kind()
    }

    pub fn set_stowed(&mut self, stowed: bool) {
        self.stowed = stowed;
        if stowed {
            self.grab_zone_visible = false;
        }
    }

    pub fn stow_state(&self) -> StowState {
        StowState {
            stowed: self.stowed,
            point: self.config.layout.stow_point,
            scale: self.config.layout.stow_scale,
        }
    }

    /// Auto-space from the bounds of whatever the slots hold
    pub fn respace(&mut self, catalog: &ItemCatalog) {
        let radii: Vec<f32> = self
            .registry
            .iter()
            .map(|s| s.item().map_or(0.0, |id| catalog.bounding_radius(id)))
            .collect();
        self.layout.apply_item_bounds(&radii);
        self.layout.clamp_offset(self.registry.len());
    }

    pub fn recall_array_state(&mut self) {
        self.layout.recall_state();
    }

    pub(super) fn invalidate_ghosts(&mut self) {
        if !self.ghosts.is_empty() {
            trace!(hand = self.side.name(), count = self.ghosts.len(), "placement ghosts invalidated");
            self.ghosts.clear();
        }
    }

    fn after_composition_change(&mut self, catalog: &ItemCatalog) {
        self.respace(catalog);
        self.invalidate_ghosts();
    }

    pub(crate) fn on_mode_exited(&mut self, mode: InteractionMode) {
        if mode == InteractionMode::Placement {
            self.cancel_placement();
        }
    }

    pub(crate) fn on_mode_entered(&mut self, mode: InteractionMode, catalog: &ItemCatalog) {
        match mode {
            InteractionMode::Collection => self.respace(catalog),
            InteractionMode::Manipulation => self.recall_array_state(),
            InteractionMode::Placement | InteractionMode::Palette => {}
        }
        self.grab_zone_visible = mode.shows_grab_zone() && !self.stowed;
    }

    /// Sample one tick of input: continuous values first, then edges in
    /// the order they arrived.
    pub fn apply_input(
        &mut self,
        mode: InteractionMode,
        input: &HandInput,
        catalog: &mut ItemCatalog,
    ) -> Vec<HandAction> {
        self.pose = input.pose;
        self.sample_continuous(mode, input);

        let mut actions = Vec::new();
        for button in input.pressed() {
            if let Some(action) = self.press(mode, button, input, catalog) {
                actions.push(action);
            }
        }
        actions
    }

    fn sample_continuous(&mut self, mode: InteractionMode, input: &HandInput) {
        let deadzone = self.config.hands.input_deadzone;
        let threshold = self.config.hands.secondary_grab_threshold;
        self.set_doing_secondary(mode.allows_negotiation() && input.grab_amount >= threshold);

        self.adjustment = AdjustmentInput::ZERO;
        match mode {
            InteractionMode::Manipulation if !self.secondary => {
                let v = input.manipulate.filtered(deadzone);
                match self.layout.kind() {
                    LayoutKind::Circular => self.adjustment.rotation = v.x,
                    LayoutKind::Linear => self.adjustment.offset = v.x,
                }
                self.adjustment.size = v.y;
            }
            InteractionMode::Placement => {
                let p = &self.config.placement;
                let hold = if input.move_hold.abs() < deadzone {
                    0.0
                } else {
                    input.move_hold.clamp(-1.0, 1.0)
                };
                self.height_offset = (self.height_offset + hold * p.height_speed).clamp(p.min_height, p.max_height);
            }
            _ => {}
        }
    }

    fn press(
        &mut self,
        mode: InteractionMode,
        button: Button,
        input: &HandInput,
        catalog: &mut ItemCatalog,
    ) -> Option<HandAction> {
        use InteractionMode::*;

        match (mode, button) {
            (_, Button::SwitchMode(_)) => None,
            (_, Button::Stow) => {
                self.set_stowed(!self.stowed);
                if !self.stowed {
                    self.grab_zone_visible = mode.shows_grab_zone();
                }
                Some(HandAction::Stowed(self.stowed))
            }
            (Collection, Button::Grab) => {
                let item = input.hovered?;
                self.grab(item, catalog).map(|_| HandAction::Grabbed(item))
            }
            (Collection, Button::Drop) => {
                let item = self.selected.or_else(|| self.registry.items().last())?;
                self.drop_item(item, input.velocity, catalog)
                    .then_some(HandAction::Dropped(item))
            }
            (Collection | Manipulation | Placement, Button::SelectNext) => {
                Some(HandAction::Selected(self.select_next(1, catalog)))
            }
            (Collection | Manipulation | Placement, Button::SelectPrevious) => {
                Some(HandAction::Selected(self.select_next(-1, catalog)))
            }
            (Collection | Manipulation | Placement, Button::Deselect) => {
                self.deselect(catalog);
                Some(HandAction::Selected(None))
            }
            (Manipulation, Button::JogForward) => {
                self.jog(1);
                Some(HandAction::Jogged(1))
            }
            (Manipulation, Button::JogBackward) => {
                self.jog(-1);
                Some(HandAction::Jogged(-1))
            }
            (Manipulation, Button::ToggleLayout) => Some(HandAction::LayoutToggled(self.toggle_layout(catalog))),
            (Placement, Button::Place) => Some(match self.commit_placement(mode, catalog) {
                Ok(items) => HandAction::Committed(items),
                Err(err) => HandAction::CommitFailed(err),
            }),
            (Placement, Button::Cancel) => {
                self.cancel_placement();
                Some(HandAction::Cancelled)
            }
            _ => {
                trace!(hand = self.side.name(), mode = mode.name(), ?button, "button ignored in this mode");
                None
            }
        }
    }

    /// Advance everything continuous by one fixed step.
    ///
    /// Order: stow state, hand-driven adjustments, selection-centering, slot
    /// interpolation, dual-hand rotation, item poses, placing timers.
    pub fn fixed_tick(&mut self, dt: Duration, mode: InteractionMode, other: &HandState, catalog: &mut ItemCatalog) {
        let stow = self.stow_state();
        let count = self.registry.len();
        let layout_config = &self.config.layout;
        let smoothing = layout_config.smoothing;

        if self.adjustment.rotation != 0.0 {
            let delta = self.adjustment.rotation * layout_config.rotation_speed;
            self.layout.rotate_array(delta, self.registry.iter_mut().map(|s| &mut s.node));
        }
        if self.adjustment.offset != 0.0 {
            self.layout.shift_array(self.adjustment.offset * layout_config.offset_speed, count);
        }
        if self.adjustment.size != 0.0 {
            self.layout.resize_array(self.adjustment.size * layout_config.size_speed);
        }

        if !stow.stowed && !self.adjustment.is_steering() {
            if let Some(index) = self.selected.and_then(|id| self.registry.index_of_item(id)) {
                self.layout
                    .center_on(index, count, smoothing, self.registry.iter_mut().map(|s| &mut s.node));
            }
        }

        advance_slots(&self.layout, &mut self.registry, &stow, smoothing);

        let dual = mode == InteractionMode::Manipulation
            && !self.secondary
            && other.is_secondary()
            && other.is_doing_secondary_manipulation();
        if dual {
            self.drive_sympathetic(other.pose(), catalog);
        } else {
            self.end_manipulation_session();
        }

        for slot in self.registry.iter() {
            if let Some(item) = slot.item() {
                catalog.set_transform(item, Self::compose_slot(&self.pose, &self.layout, &slot.node));
            }
        }

        self.advance_placing(dt, catalog);
    }
}
