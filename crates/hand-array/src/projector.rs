//! Speculative placement of an array onto world surfaces
//!
//! The array is laid out flat on the tangent plane of whatever the hand is
//! pointing at, floating `height_offset` above it. Each item is then dropped
//! straight down onto the geometry below its speculative spot. Items whose
//! drop ray finds nothing are hidden individually; the rest stay valid.

use tracing::{debug, trace};

use crate::config::PlacementConfig;
use crate::item::ItemId;
use crate::layout::ArrayLayout;
use crate::spatial::{LayerMask, Quaternion, Ray, Raycaster, Transform, Vector3D};

/// Where one ghost should go this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GhostTarget {
    Visible(Transform),
    Hidden,
}

impl GhostTarget {
    pub fn is_visible(&self) -> bool {
        matches!(self, GhostTarget::Visible(_))
    }
}

/// Marker showing where a held item will land
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementGhost {
    pub item: ItemId,
    pub transform: Transform,
    pub visible: bool,
}

impl PlacementGhost {
    pub fn hidden(item: ItemId) -> Self {
        Self {
            item,
            transform: Transform::IDENTITY,
            visible: false,
        }
    }
}

/// One held slot as seen by the projector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostSource {
    /// Index of the slot in its registry (empty slots count)
    pub index: usize,
    /// Slot rotation relative to the array pivot
    pub rotation: Quaternion,
    /// The bound item's own surface clearance
    pub placement_offset: f32,
}

/// Everything about the hand the projection depends on
#[derive(Debug, Clone, Copy)]
pub struct ProjectionRequest<'a> {
    pub ray: Ray,
    pub height_offset: f32,
    /// Hand axes used to seed the tangent frame
    pub hand_right: Vector3D,
    pub hand_up: Vector3D,
    /// Scale of the array's parent hierarchy
    pub scale_correction: f32,
    pub layout: &'a ArrayLayout,
    pub slot_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceProjector {
    max_distance: f32,
    layer_mask: LayerMask,
    smoothing: f32,
}

impl SurfaceProjector {
    pub fn new(config: &PlacementConfig, smoothing: f32) -> Self {
        Self {
            max_distance: config.max_distance,
            layer_mask: config.layer_mask,
            smoothing,
        }
    }

    /// Orientation whose up axis is `normal` and whose right axis follows the
    /// hand's right as closely as the plane allows.
    pub fn tangent_frame(normal: Vector3D, hand_right: Vector3D, hand_up: Vector3D) -> Quaternion {
        let normal = normal.normalize();
        let mut right = hand_right.project_on_plane(&normal).normalize();
        if right == Vector3D::ZERO {
            // Hand right is parallel to the normal; use hand up as forward
            let mut forward = hand_up.project_on_plane(&normal).normalize();
            if forward == Vector3D::ZERO {
                forward = Vector3D::FORWARD.project_on_plane(&normal).normalize();
                if forward == Vector3D::ZERO {
                    forward = Vector3D::RIGHT.project_on_plane(&normal).normalize();
                }
            }
            right = normal.cross(&forward);
        }
        let forward = right.cross(&normal);
        Quaternion::from_basis(right, normal, forward)
    }

    /// Project the array described by `request` onto the scene. Returns one
    /// target per source, in order. A miss of the pointing ray hides all.
    pub fn project(
        &self,
        request: &ProjectionRequest<'_>,
        sources: &[GhostSource],
        raycaster: &dyn Raycaster,
    ) -> Vec<GhostTarget> {
        let Some(hit) = raycaster.cast(&request.ray, self.max_distance, self.layer_mask) else {
            trace!("placement ray missed");
            return vec![GhostTarget::Hidden; sources.len()];
        };

        let normal = hit.normal.normalize();
        let frame = Self::tangent_frame(normal, request.hand_right, request.hand_up);
        let center = hit.point + normal * request.height_offset;
        let drop_distance = 2.0 * request.height_offset;
        let pivot = frame * request.layout.pivot_rotation();

        sources
            .iter()
            .map(|source| {
                let local = request.layout.slot_target(source.index, request.slot_count);
                let probe = center + frame * (local * request.scale_correction);
                match raycaster.raycast(probe, -normal, drop_distance, self.layer_mask) {
                    Some(ground) => {
                        let position = ground.point + normal * source.placement_offset;
                        let rotation = (pivot * source.rotation).normalize();
                        GhostTarget::Visible(Transform::from_position_rotation(position, rotation))
                    }
                    None => {
                        debug!(index = source.index, "no surface under speculative slot");
                        GhostTarget::Hidden
                    }
                }
            })
            .collect()
    }

    /// Move ghosts toward fresh targets. A ghost that was hidden jumps
    /// straight to its target instead of sliding from a stale pose.
    pub fn apply(&self, ghosts: &mut [PlacementGhost], targets: &[GhostTarget]) {
        for (ghost, target) in ghosts.iter_mut().zip(targets) {
            match target {
                GhostTarget::Visible(pose) if ghost.visible => {
                    ghost.transform = ghost.transform.lerp(pose, self.smoothing);
                }
                GhostTarget::Visible(pose) => {
                    ghost.transform = *pose;
                    ghost.visible = true;
                }
                GhostTarget::Hidden => ghost.visible = false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::LayoutKind;
    use crate::spatial::RayHit;

    /// Horizontal floor at y = 0, except for a hole in `x > hole_x`
    struct Floor {
        hole_x: f32,
    }

    impl Raycaster for Floor {
        fn raycast(&self, origin: Vector3D, direction: Vector3D, max: f32, _mask: LayerMask) -> Option<RayHit> {
            if direction.y >= 0.0 {
                return None;
            }
            let t = -origin.y / direction.y;
            if !(0.0..=max).contains(&t) {
                return None;
            }
            let point = origin + direction * t;
            (point.x <= self.hole_x).then_some(RayHit {
                point,
                normal: Vector3D::UP,
            })
        }
    }

    fn linear_layout() -> ArrayLayout {
        let mut layout = ArrayLayout::new(&LayoutConfig::default());
        layout.set_kind(LayoutKind::Linear);
        layout.apply_item_bounds(&[0.25, 0.25, 0.25]);
        layout
    }

    fn sources(n: usize) -> Vec<GhostSource> {
        (0..n)
            .map(|index| GhostSource {
                index,
                rotation: Quaternion::IDENTITY,
                placement_offset: 0.0,
            })
            .collect()
    }

    fn request(layout: &ArrayLayout) -> ProjectionRequest<'_> {
        ProjectionRequest {
            ray: Ray::new(Vector3D::new(0.0, 1.0, 0.0), Vector3D::DOWN),
            height_offset: 0.2,
            hand_right: Vector3D::RIGHT,
            hand_up: Vector3D::FORWARD,
            scale_correction: 1.0,
            layout,
            slot_count: 3,
        }
    }

    #[test]
    fn test_tangent_frame_follows_hand_right() {
        let frame = SurfaceProjector::tangent_frame(Vector3D::UP, Vector3D::RIGHT, Vector3D::FORWARD);
        assert!(frame.up().approx_eq(&Vector3D::UP, 1e-5));
        assert!(frame.right().approx_eq(&Vector3D::RIGHT, 1e-5));
    }

    #[test]
    fn test_tangent_frame_degenerate_right() {
        let frame = SurfaceProjector::tangent_frame(Vector3D::RIGHT, Vector3D::RIGHT, Vector3D::UP);
        assert!(frame.up().approx_eq(&Vector3D::RIGHT, 1e-5));
        assert!(frame.right().dot(&Vector3D::RIGHT).abs() < 1e-5);
    }

    #[test]
    fn test_one_missing_drop_hides_only_that_ghost() {
        let layout = linear_layout();
        let projector = SurfaceProjector::new(&PlacementConfig::default(), 0.2);
        // slots at x = -0.5, 0, 0.5; the hole starts at 0.25
        let targets = projector.project(&request(&layout), &sources(3), &Floor { hole_x: 0.25 });

        assert!(targets[0].is_visible());
        assert!(targets[1].is_visible());
        assert_eq!(targets[2], GhostTarget::Hidden);
        if let GhostTarget::Visible(pose) = targets[0] {
            assert!(pose.position.approx_eq(&Vector3D::new(-0.5, 0.0, 0.0), 1e-4));
        }
    }

    #[test]
    fn test_primary_miss_hides_everything() {
        let layout = linear_layout();
        let projector = SurfaceProjector::new(&PlacementConfig::default(), 0.2);
        let mut req = request(&layout);
        req.ray = Ray::new(Vector3D::new(0.0, 1.0, 0.0), Vector3D::UP);
        let targets = projector.project(&req, &sources(3), &Floor { hole_x: 10.0 });
        assert!(targets.iter().all(|t| *t == GhostTarget::Hidden));
    }

    #[test]
    fn test_placement_offset_lifts_ghost() {
        let layout = linear_layout();
        let projector = SurfaceProjector::new(&PlacementConfig::default(), 0.2);
        let mut src = sources(3);
        src[1].placement_offset = 0.05;
        let targets = projector.project(&request(&layout), &src, &Floor { hole_x: 10.0 });
        match targets[1] {
            GhostTarget::Visible(pose) => assert!((pose.position.y - 0.05).abs() < 1e-5),
            GhostTarget::Hidden => panic!("middle ghost should be visible"),
        }
    }

    #[test]
    fn test_apply_snaps_from_hidden_then_smooths() {
        let projector = SurfaceProjector::new(&PlacementConfig::default(), 0.5);
        let mut ghosts = vec![PlacementGhost::hidden(ItemId(1))];

        let first = Transform::from_position(Vector3D::new(1.0, 0.0, 0.0));
        projector.apply(&mut ghosts, &[GhostTarget::Visible(first)]);
        assert!(ghosts[0].visible);
        assert_eq!(ghosts[0].transform.position, first.position);

        let second = Transform::from_position(Vector3D::new(2.0, 0.0, 0.0));
        projector.apply(&mut ghosts, &[GhostTarget::Visible(second)]);
        assert!((ghosts[0].transform.position.x - 1.5).abs() < 1e-5);

        projector.apply(&mut ghosts, &[GhostTarget::Hidden]);
        assert!(!ghosts[0].visible);
        let third = Transform::from_position(Vector3D::new(-3.0, 0.0, 0.0));
        projector.apply(&mut ghosts, &[GhostTarget::Visible(third)]);
        assert_eq!(ghosts[0].transform.position, third.position);
    }
}
