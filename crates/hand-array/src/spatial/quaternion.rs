//! Rotations as unit quaternions
//!
//! Angles at the public surface are in degrees. Composition follows the
//! usual convention: `a * b` applies `b` first, then `a`.

use std::ops::{Mul, Neg};

use serde::{Deserialize, Serialize};

use super::Vector3D;

/// Below this angle between two rotations slerp falls back to nlerp
const SLERP_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self::from_parts(Vector3D::ZERO, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    const fn from_parts(v: Vector3D, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    fn vector_part(&self) -> Vector3D {
        Vector3D::new(self.x, self.y, self.z)
    }

    /// Rotation of `degrees` about `axis`; the axis need not be unit length
    pub fn angle_axis(degrees: f32, axis: Vector3D) -> Self {
        let (sin, cos) = (degrees.to_radians() / 2.0).sin_cos();
        Self::from_parts(axis.normalize() * sin, cos)
    }

    /// Rotation whose local X, Y and Z axes map onto `right`, `up` and
    /// `forward`. The three vectors must form an orthonormal right-handed
    /// basis.
    pub fn from_basis(right: Vector3D, up: Vector3D, forward: Vector3D) -> Self {
        // Shepperd's method: pick the largest diagonal term to divide by
        let trace = right.x + up.y + forward.z;
        let candidates = [trace, right.x, up.y, forward.z];
        let largest = (0..4)
            .max_by(|&a, &b| candidates[a].total_cmp(&candidates[b]))
            .unwrap_or(0);

        let q = match largest {
            0 => {
                let s = (1.0 + trace).sqrt() * 2.0;
                Self::new((up.z - forward.y) / s, (forward.x - right.z) / s, (right.y - up.x) / s, s / 4.0)
            }
            1 => {
                let s = (1.0 + right.x - up.y - forward.z).sqrt() * 2.0;
                Self::new(s / 4.0, (up.x + right.y) / s, (forward.x + right.z) / s, (up.z - forward.y) / s)
            }
            2 => {
                let s = (1.0 + up.y - right.x - forward.z).sqrt() * 2.0;
                Self::new((up.x + right.y) / s, s / 4.0, (forward.y + up.z) / s, (forward.x - right.z) / s)
            }
            _ => {
                let s = (1.0 + forward.z - right.x - up.y).sqrt() * 2.0;
                Self::new((forward.x + right.z) / s, (forward.y + up.z) / s, s / 4.0, (right.y - up.x) / s)
            }
        };
        q.normalize()
    }

    pub fn dot(&self, other: &Quaternion) -> f32 {
        self.vector_part().dot(&other.vector_part()) + self.w * other.w
    }

    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy; a degenerate quaternion becomes the identity
    pub fn normalize(&self) -> Self {
        let len = self.magnitude();
        if len <= f32::EPSILON {
            return Self::IDENTITY;
        }
        Self::from_parts(self.vector_part() / len, self.w / len)
    }

    fn conjugate(&self) -> Self {
        Self::from_parts(-self.vector_part(), self.w)
    }

    pub fn inverse(&self) -> Self {
        let len_sq = self.dot(self);
        if len_sq <= f32::EPSILON {
            return Self::IDENTITY;
        }
        let c = self.conjugate();
        Self::from_parts(c.vector_part() / len_sq, c.w / len_sq)
    }

    pub fn rotate_vector(&self, v: Vector3D) -> Vector3D {
        (*self * Self::from_parts(v, 0.0) * self.conjugate()).vector_part()
    }

    /// Constant-speed interpolation along the shorter arc
    pub fn slerp(&self, other: &Quaternion, t: f32) -> Self {
        let mut to = *other;
        let mut cos = self.dot(other);
        if cos < 0.0 {
            to = -to;
            cos = -cos;
        }

        let angle = cos.min(1.0).acos();
        let (wa, wb) = if angle < SLERP_EPSILON {
            (1.0 - t, t)
        } else {
            let sin = angle.sin();
            (((1.0 - t) * angle).sin() / sin, (t * angle).sin() / sin)
        };

        Self::from_parts(
            self.vector_part() * wa + to.vector_part() * wb,
            self.w * wa + to.w * wb,
        )
        .normalize()
    }

    /// Angle in degrees between two rotations
    pub fn angle_to(&self, other: &Quaternion) -> f32 {
        let cos = self.normalize().dot(&other.normalize()).abs().min(1.0);
        (2.0 * cos.acos()).to_degrees()
    }

    /// Local +Z in world space
    pub fn forward(&self) -> Vector3D {
        self.rotate_vector(Vector3D::FORWARD)
    }

    pub fn right(&self) -> Vector3D {
        self.rotate_vector(Vector3D::RIGHT)
    }

    pub fn up(&self) -> Vector3D {
        self.rotate_vector(Vector3D::UP)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Self::Output {
        Self::from_parts(-self.vector_part(), -self.w)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Self) -> Self::Output {
        let (a, b) = (self.vector_part(), rhs.vector_part());
        Self::from_parts(
            b * self.w + a * rhs.w + a.cross(&b),
            self.w * rhs.w - a.dot(&b),
        )
    }
}

impl Mul<Vector3D> for Quaternion {
    type Output = Vector3D;

    fn mul(self, rhs: Vector3D) -> Self::Output {
        self.rotate_vector(rhs)
    }
}
