//! Three-component `f64` vector.
//!
//! Every operation is a named, pure function. The arithmetic operator impls
//! at the bottom of the file delegate to those functions so call sites can
//! use either spelling.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use strider_core::GeometryError;

use crate::matrix::Matrix3;

/// Squared length below which a vector is treated as zero.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// A point or direction in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    #[must_use]
    pub fn negate(self) -> Self {
        self.scale(-1.0)
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Self) -> f64 {
        self.sub(other).length()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// True when the vector is too short to define a direction.
    pub fn is_degenerate(self) -> bool {
        self.length_squared() < DEGENERATE_EPSILON
    }

    /// Unit vector in the same direction.
    ///
    /// # Errors
    ///
    /// [`GeometryError::DegenerateInput`] for a zero-length vector.
    pub fn normalize(self) -> Result<Self, GeometryError> {
        if self.is_degenerate() {
            return Err(GeometryError::DegenerateInput("normalize of zero-length vector"));
        }
        Ok(self.scale(1.0 / self.length()))
    }

    /// Unit vector in the same direction, or `fallback` when degenerate.
    #[must_use]
    pub fn normalize_or(self, fallback: Self) -> Self {
        self.normalize().unwrap_or(fallback)
    }

    /// Unit direction from `self` towards `other`.
    pub fn direction_to(self, other: Self) -> Result<Self, GeometryError> {
        other.sub(self).normalize()
    }

    /// Linear interpolation: `self` at `t = 0`, `other` at `t = 1`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self.add(other.sub(self).scale(t))
    }

    /// Copy with the Z component replaced.
    #[must_use]
    pub const fn with_z(self, z: f64) -> Self {
        Self::new(self.x, self.y, z)
    }

    /// Projection onto the ground (XY) plane.
    #[must_use]
    pub const fn horizontal(self) -> Self {
        self.with_z(0.0)
    }

    /// Angle between two vectors in radians, in `[0, π]`.
    ///
    /// The cosine is clamped to `[-1, 1]` before `acos` to absorb rounding.
    /// Returns 0 when either vector is zero-length.
    pub fn angle_to(self, other: Self) -> f64 {
        let denom = self.length() * other.length();
        if denom < DEGENERATE_EPSILON {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }

    /// Rotate about a unit `axis` through the origin by `angle` radians.
    ///
    /// `axis` is not renormalized.
    #[must_use]
    pub fn rotate_about_axis(self, axis: Self, angle: f64) -> Self {
        Matrix3::rotation(axis, angle).mul_vector(self)
    }

    /// Some unit vector perpendicular to `self`.
    ///
    /// Crosses with the world axis least aligned with `self`, so the result is
    /// well conditioned. A zero vector yields [`Vector3::X`].
    #[must_use]
    pub fn any_perpendicular(self) -> Self {
        let (ax, ay, az) = (self.x.abs(), self.y.abs(), self.z.abs());
        let reference = if ax <= ay && ax <= az {
            Self::X
        } else if ay <= az {
            Self::Y
        } else {
            Self::Z
        };
        self.cross(reference).normalize_or(Self::X)
    }

    /// Rotate `self` towards `target`, turning by at most `max_angle`.
    ///
    /// Returns `target` unchanged when it is already within `max_angle`.
    /// Otherwise turns by exactly `max_angle` about `self × target`, or about
    /// an arbitrary perpendicular axis when the two are anti-parallel.
    #[must_use]
    pub fn constrained_rotation_towards(self, target: Self, max_angle: f64) -> Self {
        let angle = self.angle_to(target);
        if angle <= max_angle {
            return target;
        }
        let axis = match self.cross(target).normalize() {
            Ok(axis) => axis,
            Err(_) => self.any_perpendicular(),
        };
        self.rotate_about_axis(axis, max_angle)
    }
}

// -- Operator impls --

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::add(self, rhs)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::sub(self, rhs)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

// -- nalgebra boundary conversions --

impl From<nalgebra::Vector3<f64>> for Vector3 {
    fn from(v: nalgebra::Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for nalgebra::Vector3<f64> {
    fn from(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

// -- approx --

impl approx::AbsDiffEq for Vector3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl approx::RelativeEq for Vector3 {
    fn default_max_relative() -> f64 {
        f64::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}
