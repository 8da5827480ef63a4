use serde::{Deserialize, Serialize};
use strider_math::Vector3;

/// Desired body motion for one control tick.
///
/// Body frame: X forward, Y left. Positive `turn_rate` is counter-clockwise
/// seen from above (rad/s).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionCommand {
    pub linear_velocity: Vector3,
    #[serde(default)]
    pub turn_rate: f64,
}

impl MotionCommand {
    pub const STOP: Self = Self::new(Vector3::ZERO, 0.0);

    pub const fn new(linear_velocity: Vector3, turn_rate: f64) -> Self {
        Self {
            linear_velocity,
            turn_rate,
        }
    }

    /// Walk forward at `speed` m/s.
    pub const fn forward(speed: f64) -> Self {
        Self::new(Vector3::new(speed, 0.0, 0.0), 0.0)
    }

    /// Turn in place at `turn_rate` rad/s.
    pub const fn turn(turn_rate: f64) -> Self {
        Self::new(Vector3::ZERO, turn_rate)
    }

    pub fn is_finite(&self) -> bool {
        self.linear_velocity.is_finite() && self.turn_rate.is_finite()
    }

    /// No horizontal motion and no turn requested.
    pub fn is_idle(&self) -> bool {
        self.linear_velocity.horizontal().length() <= f64::EPSILON
            && self.turn_rate.abs() <= f64::EPSILON
    }

    /// Limit the horizontal speed to `max_velocity` and the turn rate to
    /// `±max_turn_rate`. Vertical velocity is dropped.
    #[must_use]
    pub fn clamped(&self, max_velocity: f64, max_turn_rate: f64) -> Self {
        let planar = self.linear_velocity.horizontal();
        let speed = planar.length();
        let linear_velocity = if speed > max_velocity {
            planar.scale(max_velocity / speed)
        } else {
            planar
        };
        Self {
            linear_velocity,
            turn_rate: self.turn_rate.clamp(-max_turn_rate, max_turn_rate),
        }
    }
}
