//! Scene node holding a parent-relative transform

use super::{Quaternion, Transform, Vector3D};

/// A transform node. The parent is supplied by the caller when composing,
/// which keeps spatial composition separate from who owns the node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpatialNode {
    pub local: Transform,
}

impl SpatialNode {
    pub fn new(local: Transform) -> Self {
        Self { local }
    }

    pub fn position(&self) -> Vector3D {
        self.local.position
    }

    pub fn rotation(&self) -> Quaternion {
        self.local.rotation
    }

    pub fn scale(&self) -> Vector3D {
        self.local.scale
    }

    /// World transform under `parent`
    pub fn world(&self, parent: &Transform) -> Transform {
        parent.compose(&self.local)
    }

    /// Reposition so that the node sits at `world` under `parent`
    pub fn set_world(&mut self, parent: &Transform, world: &Transform) {
        self.local = parent.relative(world);
    }

    /// Step the local position toward `target` by `t`
    pub fn seek_position(&mut self, target: Vector3D, t: f32) {
        self.local.position = self.local.position.lerp(&target, t);
    }

    pub fn seek_rotation(&mut self, target: Quaternion, t: f32) {
        self.local.rotation = self.local.rotation.slerp(&target, t).normalize();
    }

    pub fn seek_scale(&mut self, target: Vector3D, t: f32) {
        self.local.scale = self.local.scale.lerp(&target, t);
    }

    /// Rotate in place about this node's own position
    pub fn spin(&mut self, rotation: Quaternion) {
        self.local.rotation = (rotation * self.local.rotation).normalize();
    }
}
