use std::ops::Mul;

use serde::{Deserialize, Serialize};
use strider_core::GeometryError;

use crate::matrix::Matrix3;
use crate::vector::Vector3;

/// Rotation quaternion `w + xi + yj + zk`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about a unit `axis`.
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    /// Hamilton product `self * other`.
    #[must_use]
    pub fn mul_quat(self, o: Self) -> Self {
        Self::new(
            self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
            self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
        )
    }

    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    pub fn norm(self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit quaternion in the same direction.
    ///
    /// # Errors
    ///
    /// [`GeometryError::DegenerateInput`] for a zero quaternion.
    pub fn normalize(self) -> Result<Self, GeometryError> {
        let n = self.norm();
        if n < 1e-12 {
            return Err(GeometryError::DegenerateInput("normalize of zero quaternion"));
        }
        Ok(Self::new(self.w / n, self.x / n, self.y / n, self.z / n))
    }

    /// Rotate `v` by this (unit) quaternion: `q v q*`.
    pub fn rotate_vector(self, v: Vector3) -> Vector3 {
        let p = Self::new(0.0, v.x, v.y, v.z);
        let r = self.mul_quat(p).mul_quat(self.conjugate());
        Vector3::new(r.x, r.y, r.z)
    }

    /// Equivalent rotation matrix. Assumes unit length.
    pub fn to_matrix(self) -> Matrix3 {
        let Self { w, x, y, z } = self;
        Matrix3::from_rows([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ])
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.mul_quat(rhs)
    }
}

impl From<nalgebra::UnitQuaternion<f64>> for Quaternion {
    fn from(q: nalgebra::UnitQuaternion<f64>) -> Self {
        Self::new(q.w, q.i, q.j, q.k)
    }
}

impl From<Quaternion> for nalgebra::UnitQuaternion<f64> {
    fn from(q: Quaternion) -> Self {
        Self::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
    }
}
