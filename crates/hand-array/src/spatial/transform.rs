//! Position, rotation and scale with parent-relative composition

use serde::{Deserialize, Serialize};

use super::{Quaternion, Vector3D};

/// A complete 3D transform (position + rotation + scale)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vector3D,
    pub rotation: Quaternion,
    pub scale: Vector3D,
}

impl Transform {
    /// Identity transform (origin, no rotation, unit scale)
    pub const IDENTITY: Self = Self {
        position: Vector3D::ZERO,
        rotation: Quaternion::IDENTITY,
        scale: Vector3D::ONE,
    };

    pub fn from_position(position: Vector3D) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_position_rotation(position: Vector3D, rotation: Quaternion) -> Self {
        Self {
            position,
            rotation,
            scale: Vector3D::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vector3D) -> Self {
        self.scale = scale;
        self
    }

    pub fn forward(&self) -> Vector3D {
        self.rotation.forward()
    }

    pub fn right(&self) -> Vector3D {
        self.rotation.right()
    }

    pub fn up(&self) -> Vector3D {
        self.rotation.up()
    }

    /// Local point to parent space
    pub fn transform_point(&self, local: Vector3D) -> Vector3D {
        self.position + self.rotation * local.scale(&self.scale)
    }

    /// Parent-space point back to local space
    pub fn inverse_transform_point(&self, world: Vector3D) -> Vector3D {
        (self.rotation.inverse() * (world - self.position)).scale(&self.scale.recip())
    }

    /// World transform of `child` when `self` is its parent.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale.scale(&child.scale),
        }
    }

    /// The transform that, composed under `self`, yields `world`.
    ///
    /// Exact for uniform parent scale, which is all the hand hierarchy uses.
    pub fn relative(&self, world: &Transform) -> Transform {
        Transform {
            position: self.inverse_transform_point(world.position),
            rotation: (self.rotation.inverse() * world.rotation).normalize(),
            scale: world.scale.scale(&self.scale.recip()),
        }
    }

    /// Blend toward `other`; position and scale lerp, rotation slerps
    pub fn lerp(&self, other: &Transform, t: f32) -> Self {
        Self {
            position: self.position.lerp(&other.position, t),
            rotation: self.rotation.slerp(&other.rotation, t),
            scale: self.scale.lerp(&other.scale, t),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
