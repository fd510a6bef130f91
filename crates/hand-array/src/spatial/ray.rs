//! Ray queries against external scene geometry

use serde::{Deserialize, Serialize};

use super::Vector3D;

/// A half-line starting at `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3D,
    pub direction: Vector3D,
}

impl Ray {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Vector3D, direction: Vector3D) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, distance: f32) -> Vector3D {
        self.origin + self.direction * distance
    }
}

/// Nearest intersection reported by a [`Raycaster`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vector3D,
    /// Unit surface normal at the hit point
    pub normal: Vector3D,
}

/// Bit mask selecting which physics layers a query may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);

    pub fn contains(&self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Physics query service: cast a ray, get the nearest hit or nothing.
pub trait Raycaster {
    fn raycast(
        &self,
        origin: Vector3D,
        direction: Vector3D,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    fn cast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        self.raycast(ray.origin, ray.direction, max_distance, mask)
    }
}
