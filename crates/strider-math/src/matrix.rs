//! Row-major 3×3 matrices for rotations and local frames.

use std::ops::Mul;

use serde::{Deserialize, Serialize};
use strider_core::GeometryError;

use crate::vector::Vector3;

/// A 3×3 matrix stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3 {
    pub rows: [[f64; 3]; 3],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Build from three column vectors.
    pub const fn from_columns(c0: Vector3, c1: Vector3, c2: Vector3) -> Self {
        Self {
            rows: [[c0.x, c1.x, c2.x], [c0.y, c1.y, c2.y], [c0.z, c1.z, c2.z]],
        }
    }

    pub const fn column(&self, index: usize) -> Vector3 {
        Vector3::new(self.rows[0][index], self.rows[1][index], self.rows[2][index])
    }

    /// Rodrigues rotation about a unit `axis` by `angle` radians.
    ///
    /// `R = cI + s[k]× + (1 − c)kkᵀ`. The axis is used as given.
    pub fn rotation(axis: Vector3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Vector3 { x, y, z } = axis;
        let (tx, ty, tz) = (t * x, t * y, t * z);
        let (sx, sy, sz) = (s * x, s * y, s * z);
        Self::from_rows([
            [tx * x + c, tx * y - sz, tx * z + sy],
            [tx * y + sz, ty * y + c, ty * z - sx],
            [tx * z - sy, ty * z + sx, tz * z + c],
        ])
    }

    /// Orthonormal heading frame.
    ///
    /// Columns are (forward, left, up): `forward` normalized, `left = up_ref ×
    /// forward` normalized, and the recomputed `up = forward × left`. Mapping a
    /// local `(along, lateral, vertical)` offset through this matrix yields the
    /// world offset.
    ///
    /// # Errors
    ///
    /// [`GeometryError::DegenerateInput`] when `forward` is zero-length or
    /// parallel to `up_ref`.
    pub fn heading_frame(forward: Vector3, up_ref: Vector3) -> Result<Self, GeometryError> {
        let forward = forward.normalize()?;
        let left = up_ref
            .cross(forward)
            .normalize()
            .map_err(|_| GeometryError::DegenerateInput("heading parallel to up reference"))?;
        let up = forward.cross(left);
        Ok(Self::from_columns(forward, left, up))
    }

    pub fn mul_vector(&self, v: Vector3) -> Vector3 {
        let r = &self.rows;
        Vector3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }

    #[must_use]
    pub fn mul_matrix(&self, other: &Self) -> Self {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[i][k] * other.rows[k][j]).sum();
            }
        }
        Self { rows }
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let r = &self.rows;
        Self::from_rows([
            [r[0][0], r[1][0], r[2][0]],
            [r[0][1], r[1][1], r[2][1]],
            [r[0][2], r[1][2], r[2][2]],
        ])
    }

    pub fn determinant(&self) -> f64 {
        let r = &self.rows;
        r[0][0] * (r[1][1] * r[2][2] - r[1][2] * r[2][1])
            - r[0][1] * (r[1][0] * r[2][2] - r[1][2] * r[2][0])
            + r[0][2] * (r[1][0] * r[2][1] - r[1][1] * r[2][0])
    }
}

impl Mul for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.mul_matrix(&rhs)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        self.mul_vector(rhs)
    }
}

impl From<nalgebra::Matrix3<f64>> for Matrix3 {
    fn from(m: nalgebra::Matrix3<f64>) -> Self {
        Self::from_rows([
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ])
    }
}

impl From<Matrix3> for nalgebra::Matrix3<f64> {
    fn from(m: Matrix3) -> Self {
        let r = m.rows;
        Self::new(
            r[0][0], r[0][1], r[0][2], r[1][0], r[1][1], r[1][2], r[2][0], r[2][1], r[2][2],
        )
    }
}
