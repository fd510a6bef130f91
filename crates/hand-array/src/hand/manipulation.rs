//! Two-handed manipulation of one array
//!
//! The secondary hand steers the orientation of the selected item. Every slot
//! holding an item of the same ghost template follows along: on a ring each
//! one keeps its angular offset from the selection, in a row they all match.

use tracing::debug;

use super::state::HandState;
use crate::item::{GhostTemplateId, ItemCatalog, ItemId};
use crate::layout::{ArrayLayout, LayoutKind};
use crate::spatial::{Quaternion, Transform};

/// Orientation reference for one manipulation session
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulationGhost {
    pub template: GhostTemplateId,
    pub item: ItemId,
    /// Rotation relative to the array pivot
    pub rotation: Quaternion,
}

/// Rotation a sympathetic slot at `index` should take, given the selected
/// slot's index and the ghost's pivot-relative rotation.
pub fn sympathetic_rotation(
    kind: LayoutKind,
    index: usize,
    selected_index: usize,
    count: usize,
    ghost: Quaternion,
) -> Quaternion {
    match kind {
        LayoutKind::Linear => ghost,
        LayoutKind::Circular => {
            let relative = (index as i64 - selected_index as i64).rem_euclid(count.max(1) as i64);
            let angle = relative as f32 * ArrayLayout::step_degrees(count);
            Quaternion::angle_axis(angle, ArrayLayout::UP) * ghost
        }
    }
}

impl HandState {
    pub fn manipulation_ghost(&self) -> Option<&ManipulationGhost> {
        self.manipulation_ghost.as_ref()
    }

    /// Slots whose item shares the selected item's ghost template
    pub fn sympathetic_slots(&self, catalog: &ItemCatalog) -> Vec<usize> {
        let Some(template) = self.selected.and_then(|id| catalog.ghost_template(id)) else {
            return Vec::new();
        };
        self.registry
            .iter()
            .enumerate()
            .filter(|(_, slot)| {
                slot.item()
                    .and_then(|id| catalog.ghost_template(id))
                    .is_some_and(|t| t == template)
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// One fixed step of secondary manipulation driven by `secondary_pose`
    pub(super) fn drive_sympathetic(&mut self, secondary_pose: &Transform, catalog: &ItemCatalog) {
        let Some(selected) = self.selected else {
            return;
        };
        let Some(template) = catalog.ghost_template(selected) else {
            return;
        };
        let Some(selected_index) = self.registry.index_of_item(selected) else {
            return;
        };

        let frame = self.pose.rotation * self.layout.pivot_rotation();
        let rotation = (frame.inverse() * secondary_pose.rotation).normalize();
        match self.manipulation_ghost.as_mut() {
            Some(ghost) if ghost.template == template && ghost.item == selected => ghost.rotation = rotation,
            _ => {
                debug!(hand = self.side.name(), item = %selected, template = template.0, "manipulation ghost created");
                self.manipulation_ghost = Some(ManipulationGhost {
                    template,
                    item: selected,
                    rotation,
                });
            }
        }

        let kind = self.layout.kind();
        let count = self.registry.len();
        let smoothing = self.config.layout.smoothing;
        for (index, slot) in self.registry.iter_mut().enumerate() {
            let shares_template = slot
                .item()
                .and_then(|id| catalog.ghost_template(id))
                .is_some_and(|t| t == template);
            if shares_template {
                let target = sympathetic_rotation(kind, index, selected_index, count, rotation);
                slot.node.seek_rotation(target, smoothing);
            }
        }
    }

    pub(super) fn end_manipulation_session(&mut self) {
        if let Some(ghost) = self.manipulation_ghost.take() {
            debug!(hand = self.side.name(), item = %ghost.item, "manipulation ghost released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandArrayConfig;
    use crate::hand::Hand;
    use crate::item::testing::catalog_with;
    use crate::item::Item;
    use crate::spatial::Vector3D;

    #[test]
    fn test_ring_offsets_follow_index() {
        let ghost = Quaternion::IDENTITY;
        let r = sympathetic_rotation(LayoutKind::Circular, 3, 1, 4, ghost);
        assert!(r.angle_to(&Quaternion::angle_axis(180.0, Vector3D::UP)) < 0.1);
        // wraps to a non-negative offset
        let r = sympathetic_rotation(LayoutKind::Circular, 0, 1, 4, ghost);
        assert!(r.angle_to(&Quaternion::angle_axis(270.0, Vector3D::UP)) < 0.1);
    }

    #[test]
    fn test_row_slaves_to_ghost() {
        let ghost = Quaternion::angle_axis(33.0, Vector3D::RIGHT);
        let r = sympathetic_rotation(LayoutKind::Linear, 4, 0, 5, ghost);
        assert!(r.angle_to(&ghost) < 0.1);
    }

    fn manipulating_hand() -> (HandState, ItemCatalog) {
        let mut catalog = catalog_with(&[0.1, 0.1, 0.1]);
        catalog.insert(Item::new(ItemId(4), 0.1, GhostTemplateId(7)));
        let mut hand = HandState::new(Hand::Left, &HandArrayConfig::default());
        for i in 1..=4 {
            hand.grab(ItemId(i), &mut catalog);
        }
        hand.select(ItemId(2), &mut catalog);
        (hand, catalog)
    }

    #[test]
    fn test_only_like_items_are_sympathetic() {
        let (hand, catalog) = manipulating_hand();
        assert_eq!(hand.sympathetic_slots(&catalog), vec![0, 1, 2]);
    }

    #[test]
    fn test_ghost_reused_while_template_matches() {
        let (mut hand, catalog) = manipulating_hand();
        let steer = Transform::from_position_rotation(Vector3D::ZERO, Quaternion::angle_axis(20.0, Vector3D::UP));
        hand.drive_sympathetic(&steer, &catalog);
        let first = hand.manipulation_ghost().cloned().unwrap();
        hand.drive_sympathetic(&steer, &catalog);
        assert_eq!(hand.manipulation_ghost(), Some(&first));
        hand.end_manipulation_session();
        assert!(hand.manipulation_ghost().is_none());
    }

    #[test]
    fn test_unlike_slot_keeps_rotation() {
        let (mut hand, catalog) = manipulating_hand();
        let before = hand.registry().at(3).unwrap().node.rotation();
        let steer = Transform::from_position_rotation(Vector3D::ZERO, Quaternion::angle_axis(60.0, Vector3D::RIGHT));
        for _ in 0..50 {
            hand.drive_sympathetic(&steer, &catalog);
        }
        assert_eq!(hand.registry().at(3).unwrap().node.rotation(), before);

        // the selected slot converges on the steering rotation
        let selected = hand.registry().at(1).unwrap().node.rotation();
        let ghost = hand.manipulation_ghost().unwrap().rotation;
        assert!(selected.angle_to(&ghost) < 0.5);
    }
}
