use std::f64::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An angle kept in the unit it was written in.
///
/// Conversion happens only when the other unit is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Angle {
    Radians(f64),
    Degrees(f64),
}

impl Angle {
    pub const ZERO: Self = Self::Radians(0.0);

    pub const fn from_radians(value: f64) -> Self {
        Self::Radians(value)
    }

    pub const fn from_degrees(value: f64) -> Self {
        Self::Degrees(value)
    }

    pub const fn radians(self) -> f64 {
        match self {
            Self::Radians(r) => r,
            Self::Degrees(d) => d.to_radians(),
        }
    }

    pub const fn degrees(self) -> f64 {
        match self {
            Self::Radians(r) => r.to_degrees(),
            Self::Degrees(d) => d,
        }
    }

    /// Wrap into `[0, 2π)` or `[0°, 360°)`, keeping the stored unit.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Radians(r) => Self::Radians(wrap(r, TAU)),
            Self::Degrees(d) => Self::Degrees(wrap(d, 360.0)),
        }
    }
}

impl Default for Angle {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radians(r) => write!(f, "{r} rad"),
            Self::Degrees(d) => write!(f, "{d}°"),
        }
    }
}

// `rem_euclid` can round up to exactly `period` for tiny negative inputs.
fn wrap(value: f64, period: f64) -> f64 {
    let r = value.rem_euclid(period);
    if r >= period { 0.0 } else { r }
}
