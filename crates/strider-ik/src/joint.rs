//! Joints of a kinematic chain.
//!
//! A joint carries a rotation axis and the current direction of the link it
//! drives. The solver only ever touches the direction.

use serde::{Deserialize, Serialize};
use strider_core::ChainError;
use strider_math::{Angle, Vector3};

/// Joint family, with the limits each family can carry.
///
/// Limits are descriptive. The solver does not enforce them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JointKind {
    Revolute {
        rotation_limit: Option<Angle>,
    },
    Prismatic {
        translation_limit: Option<f64>,
    },
    Cylindrical {
        rotation_limit: Option<Angle>,
        translation_limit: Option<f64>,
    },
}

impl JointKind {
    /// Degrees of freedom.
    pub const fn dof(&self) -> u8 {
        match self {
            Self::Revolute { .. } | Self::Prismatic { .. } => 1,
            Self::Cylindrical { .. } => 2,
        }
    }

    pub const fn rotation_limit(&self) -> Option<Angle> {
        match self {
            Self::Revolute { rotation_limit } | Self::Cylindrical { rotation_limit, .. } => {
                *rotation_limit
            }
            Self::Prismatic { .. } => None,
        }
    }

    pub const fn translation_limit(&self) -> Option<f64> {
        match self {
            Self::Prismatic { translation_limit }
            | Self::Cylindrical {
                translation_limit, ..
            } => *translation_limit,
            Self::Revolute { .. } => None,
        }
    }
}

/// A joint: kind, unit rotation axis and unit link direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    kind: JointKind,
    axis: Vector3,
    direction: Vector3,
}

impl Joint {
    /// Create a joint about `axis`.
    ///
    /// The axis is normalized. The initial direction is an arbitrary unit
    /// vector perpendicular to it; use [`Joint::with_direction`] to set one.
    ///
    /// # Errors
    ///
    /// [`ChainError::ZeroLengthAxis`] if `axis` has no length.
    pub fn new(kind: JointKind, axis: Vector3) -> Result<Self, ChainError> {
        let axis = axis.normalize().map_err(|_| ChainError::ZeroLengthAxis)?;
        Ok(Self {
            kind,
            axis,
            direction: axis.any_perpendicular(),
        })
    }

    /// Unlimited revolute joint.
    pub fn revolute(axis: Vector3) -> Result<Self, ChainError> {
        Self::new(
            JointKind::Revolute {
                rotation_limit: None,
            },
            axis,
        )
    }

    /// Unlimited prismatic joint.
    pub fn prismatic(axis: Vector3) -> Result<Self, ChainError> {
        Self::new(
            JointKind::Prismatic {
                translation_limit: None,
            },
            axis,
        )
    }

    /// Unlimited cylindrical joint.
    pub fn cylindrical(axis: Vector3) -> Result<Self, ChainError> {
        Self::new(
            JointKind::Cylindrical {
                rotation_limit: None,
                translation_limit: None,
            },
            axis,
        )
    }

    /// Replace the initial link direction.
    ///
    /// # Errors
    ///
    /// [`ChainError::ZeroLengthDirection`] if `direction` has no length.
    pub fn with_direction(mut self, direction: Vector3) -> Result<Self, ChainError> {
        self.direction = direction
            .normalize()
            .map_err(|_| ChainError::ZeroLengthDirection)?;
        Ok(self)
    }

    pub const fn kind(&self) -> JointKind {
        self.kind
    }

    pub const fn axis(&self) -> Vector3 {
        self.axis
    }

    pub const fn direction(&self) -> Vector3 {
        self.direction
    }

    pub const fn dof(&self) -> u8 {
        self.kind.dof()
    }

    /// Caller guarantees `direction` is unit length.
    pub(crate) const fn set_direction(&mut self, direction: Vector3) {
        self.direction = direction;
    }
}
