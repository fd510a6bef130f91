//! Placement preview, commit and the drop-into-place timers

use std::time::Duration;

use tracing::{debug, info, warn};

use super::state::HandState;
use crate::animation::PoseTween;
use crate::error::{PlacementError, Result};
use crate::item::{ItemCatalog, ItemId};
use crate::mode::InteractionMode;
use crate::projector::{GhostSource, PlacementGhost, ProjectionRequest, SurfaceProjector};
use crate::spatial::{Ray, Raycaster, Transform};

/// An item travelling from its slot to its committed placement
#[derive(Debug, Clone)]
pub struct PlacingItem {
    pub item: ItemId,
    pub tween: PoseTween,
}

impl HandState {
    pub fn ghosts(&self) -> &[PlacementGhost] {
        &self.ghosts
    }

    pub fn placing(&self) -> &[PlacingItem] {
        &self.placing
    }

    /// Keep exactly one ghost per held item, in array order. Ghosts that
    /// survive keep their pose so they can keep smoothing.
    fn sync_ghosts(&mut self) {
        let held: Vec<ItemId> = self.registry.items().collect();
        let in_sync = held.len() == self.ghosts.len() && held.iter().zip(&self.ghosts).all(|(i, g)| *i == g.item);
        if !in_sync {
            self.ghosts = held.into_iter().map(PlacementGhost::hidden).collect();
        }
    }

    /// Refresh the placement preview from the hand's pointing ray
    pub fn update_placement(&mut self, projector: &SurfaceProjector, raycaster: &dyn Raycaster, catalog: &ItemCatalog) {
        if self.registry.held_count() == 0 {
            self.invalidate_ghosts();
            return;
        }
        self.sync_ghosts();

        let sources: Vec<GhostSource> = self
            .registry
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let item = slot.item()?;
                Some(GhostSource {
                    index,
                    rotation: slot.node.rotation(),
                    placement_offset: catalog.get(item).map_or(0.0, |i| i.placement_offset),
                })
            })
            .collect();

        let request = ProjectionRequest {
            ray: Ray::new(self.pose.position, self.pose.forward()),
            height_offset: self.height_offset,
            hand_right: self.pose.right(),
            hand_up: self.pose.up(),
            scale_correction: self.pose.scale.x * self.config.placement.scale_correction,
            layout: &self.layout,
            slot_count: self.registry.len(),
        };
        let targets = projector.project(&request, &sources, raycaster);
        projector.apply(&mut self.ghosts, &targets);
    }

    /// Send every item whose ghost is on a surface to that ghost. Items
    /// with hidden ghosts stay held. Nothing changes when this fails.
    pub fn commit_placement(&mut self, mode: InteractionMode, catalog: &mut ItemCatalog) -> Result<Vec<ItemId>> {
        if mode != InteractionMode::Placement {
            return Err(PlacementError::NotPlacing);
        }
        let held: Vec<ItemId> = self.registry.items().collect();
        if held.is_empty() {
            return Err(PlacementError::NothingHeld);
        }
        let matches = held.len() == self.ghosts.len() && held.iter().zip(&self.ghosts).all(|(i, g)| *i == g.item);
        if !matches {
            let err = PlacementError::GhostCountMismatch {
                ghosts: self.ghosts.len(),
                items: held.len(),
            };
            warn!(hand = self.side.name(), error = %err, "placement commit aborted");
            return Err(err);
        }

        let plan: Vec<(ItemId, Transform)> = self
            .ghosts
            .iter()
            .filter(|g| g.visible)
            .map(|g| (g.item, g.transform))
            .collect();
        if plan.is_empty() {
            debug!(hand = self.side.name(), "no ghost on a surface");
            return Err(PlacementError::NoValidTarget);
        }

        let duration = self.config.placement.place_duration();
        let easing = self.config.placement.easing;
        let mut placed = Vec::with_capacity(plan.len());
        for (item, target) in plan {
            let Some(slot) = self.registry.slot_of(item) else {
                continue;
            };
            let start = self.slot_world(slot).unwrap_or(target);
            self.remove_slot(slot, catalog);
            catalog.mark_placing(item);
            catalog.set_transform(item, start);
            self.placing.push(PlacingItem {
                item,
                tween: PoseTween::new(start, target, duration).with_easing(easing),
            });
            placed.push(item);
        }
        self.ghosts.clear();

        info!(
            hand = self.side.name(),
            placed = placed.len(),
            kept = self.registry.held_count(),
            "placement committed"
        );
        Ok(placed)
    }

    /// Drop the preview without placing anything
    pub fn cancel_placement(&mut self) {
        if !self.ghosts.is_empty() {
            debug!(hand = self.side.name(), "placement cancelled");
        }
        self.ghosts.clear();
    }

    pub(super) fn advance_placing(&mut self, dt: Duration, catalog: &mut ItemCatalog) {
        self.placing.retain_mut(|placing| {
            let done = placing.tween.advance(dt);
            if done {
                catalog.mark_placed(placing.item, placing.tween.target);
            } else {
                catalog.set_transform(placing.item, placing.tween.pose());
            }
            !done
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandArrayConfig;
    use crate::hand::Hand;
    use crate::item::testing::*;
    use crate::item::ItemLifecycle;
    use crate::spatial::{LayerMask, Quaternion, RayHit, Vector3D};

    /// Floor at y = 0 that only exists for x <= `edge`
    struct Ledge {
        edge: f32,
    }

    impl Raycaster for Ledge {
        fn raycast(&self, origin: Vector3D, direction: Vector3D, max: f32, _mask: LayerMask) -> Option<RayHit> {
            if direction.y >= 0.0 {
                return None;
            }
            let t = -origin.y / direction.y;
            let point = origin + direction * t;
            ((0.0..=max).contains(&t) && point.x <= self.edge).then_some(RayHit {
                point,
                normal: Vector3D::UP,
            })
        }
    }

    /// Hand one metre up, pointing straight down, right axis along +X
    fn pointing_down() -> Transform {
        Transform::from_position_rotation(
            Vector3D::new(0.0, 1.0, 0.0),
            Quaternion::angle_axis(90.0, Vector3D::RIGHT),
        )
    }

    fn placing_hand(n: usize) -> (HandState, ItemCatalog) {
        let radii = vec![0.1; n];
        let mut catalog = catalog_with(&radii);
        let mut config = HandArrayConfig::default();
        config.layout.kind = crate::layout::LayoutKind::Linear;
        let mut hand = HandState::new(Hand::Left, &config);
        for i in 1..=n as u64 {
            hand.grab(ItemId(i), &mut catalog);
        }
        hand.set_pose(pointing_down());
        (hand, catalog)
    }

    fn projector() -> SurfaceProjector {
        SurfaceProjector::new(&HandArrayConfig::default().placement, 0.2)
    }

    #[test]
    fn test_hand_points_down() {
        assert!(pointing_down().forward().approx_eq(&Vector3D::DOWN, 1e-5));
    }

    #[test]
    fn test_partial_commit_keeps_unplaceable_items() {
        let (mut hand, mut catalog) = placing_hand(3);
        // row of three at x = -0.2, 0, 0.2; the floor ends at 0.1
        hand.update_placement(&projector(), &Ledge { edge: 0.1 }, &catalog);
        let visible: Vec<bool> = hand.ghosts().iter().map(|g| g.visible).collect();
        assert_eq!(visible, vec![true, true, false]);

        let placed = hand.commit_placement(InteractionMode::Placement, &mut catalog).unwrap();
        assert_eq!(placed, vec![ItemId(1), ItemId(2)]);
        assert_eq!(hand.registry().items().collect::<Vec<_>>(), vec![ItemId(3)]);
        assert!(hand.ghosts().is_empty());
        assert_eq!(catalog.get(ItemId(1)).unwrap().lifecycle, ItemLifecycle::Placing);
        assert_eq!(catalog.get(ItemId(3)).unwrap().lifecycle, ItemLifecycle::Held);
    }

    #[test]
    fn test_placing_timer_completes() {
        let listener = RecordingListener::default();
        let events = listener.events.clone();
        let (mut hand, mut catalog) = placing_hand(1);
        catalog.set_listener(Box::new(listener));
        hand.update_placement(&projector(), &Ledge { edge: 10.0 }, &catalog);
        let target = hand.ghosts()[0].transform;
        hand.commit_placement(InteractionMode::Placement, &mut catalog).unwrap();

        for _ in 0..100 {
            hand.advance_placing(Duration::from_millis(10), &mut catalog);
        }
        assert!(hand.placing().is_empty());
        let item = catalog.get(ItemId(1)).unwrap();
        assert_eq!(item.lifecycle, ItemLifecycle::Placed);
        assert_eq!(item.transform, target);
        assert_eq!(events.borrow().last(), Some(&ItemEvent::Placed(ItemId(1))));
    }

    #[test]
    fn test_other_hand_cannot_take_an_item_mid_flight() {
        let (mut hand, mut catalog) = placing_hand(1);
        let mut other = HandState::new(Hand::Right, &HandArrayConfig::default());
        hand.update_placement(&projector(), &Ledge { edge: 10.0 }, &catalog);
        hand.commit_placement(InteractionMode::Placement, &mut catalog).unwrap();

        hand.advance_placing(Duration::from_millis(10), &mut catalog);
        assert_eq!(other.grab(ItemId(1), &mut catalog), None);
        assert_eq!(other.registry().held_count(), 0);

        for _ in 0..100 {
            hand.advance_placing(Duration::from_millis(10), &mut catalog);
        }
        assert_eq!(catalog.get(ItemId(1)).unwrap().lifecycle, ItemLifecycle::Placed);
        assert!(other.grab(ItemId(1), &mut catalog).is_some());
        assert!(hand.grab(ItemId(1), &mut catalog).is_none());
        assert_eq!(hand.registry().slot_of(ItemId(1)), None);
    }

    #[test]
    fn test_commit_outside_placement_mode() {
        let (mut hand, mut catalog) = placing_hand(2);
        let err = hand.commit_placement(InteractionMode::Manipulation, &mut catalog).unwrap_err();
        assert_eq!(err, PlacementError::NotPlacing);
    }

    #[test]
    fn test_mismatch_aborts_without_side_effects() {
        let (mut hand, mut catalog) = placing_hand(2);
        hand.update_placement(&projector(), &Ledge { edge: 10.0 }, &catalog);
        hand.ghosts.pop();
        let err = hand.commit_placement(InteractionMode::Placement, &mut catalog).unwrap_err();
        assert_eq!(err, PlacementError::GhostCountMismatch { ghosts: 1, items: 2 });
        assert_eq!(hand.registry().held_count(), 2);
        assert!(hand.placing().is_empty());
    }

    #[test]
    fn test_all_hidden_is_no_valid_target() {
        let (mut hand, mut catalog) = placing_hand(2);
        hand.update_placement(&projector(), &Ledge { edge: -10.0 }, &catalog);
        let err = hand.commit_placement(InteractionMode::Placement, &mut catalog).unwrap_err();
        assert_eq!(err, PlacementError::NoValidTarget);
        assert_eq!(hand.registry().held_count(), 2);
    }

    #[test]
    fn test_composition_change_invalidates_ghosts() {
        let (mut hand, mut catalog) = placing_hand(2);
        hand.update_placement(&projector(), &Ledge { edge: 10.0 }, &catalog);
        assert_eq!(hand.ghosts().len(), 2);
        hand.add_slot(None, &catalog);
        assert!(hand.ghosts().is_empty());
        hand.update_placement(&projector(), &Ledge { edge: 10.0 }, &catalog);
        assert_eq!(hand.ghosts().len(), 2);
        hand.drop_item(ItemId(1), Vector3D::ZERO, &mut catalog);
        assert!(hand.ghosts().is_empty());
    }
}
