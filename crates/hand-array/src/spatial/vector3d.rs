//! 3D vector used for both positions and directions

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A vector in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3D {
    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// All components one (unit scale)
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// Unit vector pointing right (+X)
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector pointing up (+Y)
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector pointing down (-Y)
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    /// Unit vector pointing forward (+Z)
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Same value on every axis
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Unit-length copy, or zero for a zero vector
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > f32::EPSILON {
            *self * (1.0 / mag)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Vector3D) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3D) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn distance(&self, other: &Vector3D) -> f32 {
        (*self - *other).magnitude()
    }

    /// Linear interpolation; `t` is not clamped
    pub fn lerp(&self, other: &Vector3D, t: f32) -> Self {
        *self + (*other - *self) * t
    }

    /// Component-wise product
    pub fn scale(&self, other: &Vector3D) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Component-wise reciprocal; zero components stay zero
    pub fn recip(&self) -> Self {
        let inv = |v: f32| if v.abs() > f32::EPSILON { 1.0 / v } else { 0.0 };
        Self::new(inv(self.x), inv(self.y), inv(self.z))
    }

    /// Remove the component along `normal` (which must be unit length)
    pub fn project_on_plane(&self, normal: &Vector3D) -> Self {
        *self - *normal * self.dot(normal)
    }

    pub fn approx_eq(&self, other: &Vector3D, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Self) -> Self::Output {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f32) -> Self::Output {
        Vector3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vector3D {
    type Output = Vector3D;

    fn div(self, rhs: f32) -> Self::Output {
        Vector3D::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Self::Output {
        Vector3D::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector3D::ZERO.normalize(), Vector3D::ZERO);
        let n = Vector3D::new(0.0, 3.0, 4.0).normalize();
        assert!((n.magnitude() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cross_is_right_handed() {
        let f = Vector3D::RIGHT.cross(&Vector3D::UP);
        assert!(f.approx_eq(&Vector3D::FORWARD, 0.0001));
    }

    #[test]
    fn test_project_on_plane() {
        let v = Vector3D::new(1.0, 2.0, 3.0).project_on_plane(&Vector3D::UP);
        assert!(v.approx_eq(&Vector3D::new(1.0, 0.0, 3.0), 0.0001));
    }

    #[test]
    fn test_recip_keeps_zero() {
        let r = Vector3D::new(2.0, 0.0, -4.0).recip();
        assert!(r.approx_eq(&Vector3D::new(0.5, 0.0, -0.25), 0.0001));
    }
}
