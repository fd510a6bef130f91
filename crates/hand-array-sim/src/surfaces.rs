//! Synthetic scene geometry for the simulator

use hand_array::{LayerMask, RayHit, Raycaster, Vector3D};

/// Axis-aligned rectangle in the XZ plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Rect {
    pub fn contains(&self, point: Vector3D) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_z..=self.max_z).contains(&point.z)
    }
}

/// Infinite horizontal floor with an optional rectangular hole
#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub height: f32,
    pub hole: Option<Rect>,
    /// Layer the floor lives on
    pub layer: u8,
}

impl Floor {
    pub fn flat(height: f32) -> Self {
        Self {
            height,
            hole: None,
            layer: 0,
        }
    }

    pub fn with_hole(mut self, hole: Rect) -> Self {
        self.hole = Some(hole);
        self
    }
}

impl Raycaster for Floor {
    fn raycast(&self, origin: Vector3D, direction: Vector3D, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        if !mask.contains(self.layer) {
            return None;
        }
        // only the top face is solid
        if direction.y >= 0.0 || origin.y < self.height {
            return None;
        }
        let distance = (self.height - origin.y) / direction.y;
        if distance > max_distance {
            return None;
        }
        let point = origin + direction * distance;
        if self.hole.is_some_and(|hole| hole.contains(point)) {
            return None;
        }
        Some(RayHit {
            point,
            normal: Vector3D::UP,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downward_ray_hits_floor() {
        let floor = Floor::flat(0.5);
        let hit = floor
            .raycast(Vector3D::new(1.0, 2.0, 0.0), Vector3D::DOWN, 10.0, LayerMask::ALL)
            .unwrap();
        assert!(hit.point.approx_eq(&Vector3D::new(1.0, 0.5, 0.0), 1e-6));
        assert_eq!(hit.normal, Vector3D::UP);
    }

    #[test]
    fn test_hole_and_range() {
        let floor = Floor::flat(0.0).with_hole(Rect {
            min_x: 0.0,
            max_x: 1.0,
            min_z: -1.0,
            max_z: 1.0,
        });
        assert!(floor
            .raycast(Vector3D::new(0.5, 1.0, 0.0), Vector3D::DOWN, 10.0, LayerMask::ALL)
            .is_none());
        assert!(floor
            .raycast(Vector3D::new(-0.5, 1.0, 0.0), Vector3D::DOWN, 0.5, LayerMask::ALL)
            .is_none());
        assert!(floor
            .raycast(Vector3D::new(-0.5, 1.0, 0.0), Vector3D::DOWN, 1.5, LayerMask::ALL)
            .is_some());
    }

    #[test]
    fn test_masked_out_layer() {
        let floor = Floor::flat(0.0);
        assert!(floor
            .raycast(Vector3D::new(0.0, 1.0, 0.0), Vector3D::DOWN, 5.0, LayerMask(0b10))
            .is_none());
    }
}
