//! Per-tick slot motion

use super::ArrayLayout;
use crate::registry::SlotRegistry;
use crate::spatial::Vector3D;

/// Collapse target used while the array is stowed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StowState {
    pub stowed: bool,
    /// Anchor point in hand space
    pub point: Vector3D,
    /// Uniform slot scale while stowed
    pub scale: f32,
}

impl StowState {
    pub fn open() -> Self {
        Self {
            stowed: false,
            point: Vector3D::ZERO,
            scale: 1.0,
        }
    }
}

/// Move every slot one smoothing step toward its layout target (or toward
/// the stow anchor). Freshly created empty slots are placed on their target
/// directly so they do not fly in from the hand's origin.
///
/// Stow state must be resolved by the caller before this runs.
pub fn advance_slots(layout: &ArrayLayout, registry: &mut SlotRegistry, stow: &StowState, smoothing: f32) {
    let count = registry.len();
    for (index, slot) in registry.slots_mut().iter_mut().enumerate() {
        let (target, scale) = if stow.stowed {
            (stow.point, Vector3D::splat(stow.scale))
        } else {
            (layout.slot_target(index, count), Vector3D::ONE)
        };

        if slot.needs_seed {
            slot.node.local.position = target;
            slot.node.local.scale = scale;
            slot.needs_seed = false;
            continue;
        }
        slot.node.seek_position(target, smoothing);
        slot.node.seek_scale(scale, smoothing);
    }
}
