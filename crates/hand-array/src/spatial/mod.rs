//! Spatial primitives for hand-anchored arrays
//!
//! Uses a right-handed coordinate system:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Forward (+) / Backward (-)
//!
//! Angles at the public surface of the crate are in degrees; the array
//! rotation, slot step angles and input speeds are all expressed that way.

mod node;
mod quaternion;
mod ray;
mod transform;
mod vector3d;

pub use node::SpatialNode;
pub use quaternion::Quaternion;
pub use ray::{LayerMask, Ray, RayHit, Raycaster};
pub use transform::Transform;
pub use vector3d::Vector3D;

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest angular distance from `from` to `to`, in `(-180, 180]`.
pub fn delta_degrees(from: f32, to: f32) -> f32 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 0.0001);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 0.0001);
        let tiny = normalize_degrees(-1e-10);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_delta_degrees_takes_short_way() {
        assert!((delta_degrees(350.0, 10.0) - 20.0).abs() < 0.0001);
        assert!((delta_degrees(10.0, 350.0) + 20.0).abs() < 0.0001);
        assert!((delta_degrees(90.0, 270.0) - 180.0).abs() < 0.0001);
    }
}
