//! Leg identifiers and per-leg setup handed to the gait generator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strider_core::GaitError;
use strider_ik::Chain;
use strider_math::Vector3;

/// Identifies one leg of the robot.
///
/// Six named legs cover hexapods and quadrupeds; anything else is an
/// [`LegId::Extra`] printed as `leg_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LegId {
    FrontRight,
    FrontLeft,
    MiddleRight,
    MiddleLeft,
    RearRight,
    RearLeft,
    Extra(u8),
}

impl LegId {
    /// Hexapod legs in ring order, walking around the body.
    pub const HEXAPOD: [Self; 6] = [
        Self::FrontRight,
        Self::MiddleRight,
        Self::RearRight,
        Self::RearLeft,
        Self::MiddleLeft,
        Self::FrontLeft,
    ];

    /// Quadruped legs in ring order.
    pub const QUADRUPED: [Self; 4] = [
        Self::FrontRight,
        Self::RearRight,
        Self::RearLeft,
        Self::FrontLeft,
    ];

    /// Body side: `1.0` for left legs, `-1.0` for right legs.
    ///
    /// Extra legs alternate by index: even indices are right, odd are left.
    pub const fn side(self) -> f64 {
        match self {
            Self::FrontLeft | Self::MiddleLeft | Self::RearLeft => 1.0,
            Self::FrontRight | Self::MiddleRight | Self::RearRight => -1.0,
            Self::Extra(n) => {
                if n % 2 == 0 {
                    -1.0
                } else {
                    1.0
                }
            }
        }
    }

    pub const fn is_left(self) -> bool {
        self.side() > 0.0
    }

    pub const fn is_front(self) -> bool {
        matches!(self, Self::FrontRight | Self::FrontLeft)
    }

    pub const fn is_rear(self) -> bool {
        matches!(self, Self::RearRight | Self::RearLeft)
    }
}

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrontRight => f.write_str("front_right"),
            Self::FrontLeft => f.write_str("front_left"),
            Self::MiddleRight => f.write_str("middle_right"),
            Self::MiddleLeft => f.write_str("middle_left"),
            Self::RearRight => f.write_str("rear_right"),
            Self::RearLeft => f.write_str("rear_left"),
            Self::Extra(n) => write!(f, "leg_{n}"),
        }
    }
}

impl FromStr for LegId {
    type Err = GaitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front_right" => Ok(Self::FrontRight),
            "front_left" => Ok(Self::FrontLeft),
            "middle_right" => Ok(Self::MiddleRight),
            "middle_left" => Ok(Self::MiddleLeft),
            "rear_right" => Ok(Self::RearRight),
            "rear_left" => Ok(Self::RearLeft),
            other => other
                .strip_prefix("leg_")
                .and_then(|n| n.parse().ok())
                .map(Self::Extra)
                .ok_or_else(|| GaitError::InvalidLegId(other.to_owned())),
        }
    }
}

impl TryFrom<String> for LegId {
    type Error = GaitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LegId> for String {
    fn from(id: LegId) -> Self {
        id.to_string()
    }
}

/// Everything the generator needs to drive one leg.
#[derive(Debug, Clone, PartialEq)]
pub struct LegSetup {
    pub id: LegId,
    /// Kinematic chain rooted at the hip, in the body frame.
    pub chain: Chain,
    /// Neutral foot position in the body frame. Only X and Y are used; the
    /// foot height comes from the configured contact height.
    pub neutral: Vector3,
}

impl LegSetup {
    pub const fn new(id: LegId, chain: Chain, neutral: Vector3) -> Self {
        Self { id, chain, neutral }
    }
}
