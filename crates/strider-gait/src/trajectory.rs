//! Leg trajectory generator.
//!
//! Turns a leg's local phase into a foot position. Stance glides linearly
//! from `+step/2` to `-step/2` along the travel direction at contact height.
//! Swing lifts the foot back from `-step/2` to `+step/2` along 12-point
//! (degree-11) Bezier curves for both the horizontal S-curve and the height
//! profile, so liftoff and touchdown have zero velocity and acceleration.
//!
//! Everything is a pure function of phase: the same phase always yields the
//! same position, so trajectories restart cleanly from any phase.

use strider_math::{Matrix3, Quaternion, Vector3};

use crate::pattern::LegPhase;

// Horizontal S-curve from 0 to 1. The first three and last three control
// points are equal, giving zero velocity and acceleration at both ends.
const BEZIER_S: [f64; 12] = [
    0.0, 0.0, 0.0, // rest at liftoff
    0.5, 0.5, // transition
    0.5, 0.5, // midpoint plateau
    0.5, 0.5, // transition
    1.0, 1.0, 1.0, // rest at touchdown
];

// Height profile, zero at both ends and peaking at t = 0.5.
const BEZIER_H: [f64; 12] = [
    0.0, 0.0, 0.0, // ground at liftoff
    0.9, 0.9, // rise
    1.0, 1.0, // apex
    0.9, 0.9, // descent
    0.0, 0.0, 0.0, // ground at touchdown
];

// bezier_eval(&BEZIER_H, 0.5); dividing by it makes the apex exactly
// `step_height`.
const BEZIER_H_PEAK: f64 = 0.886_230_468_75;

/// Evaluate a degree-11 Bezier curve at `t` with De Casteljau's algorithm.
fn bezier_eval(points: &[f64; 12], t: f64) -> f64 {
    let mut work = *points;
    for k in 1..12 {
        for i in 0..(12 - k) {
            work[i] = work[i] * (1.0 - t) + work[i + 1] * t;
        }
    }
    work[0]
}

/// Derivative of a degree-11 Bezier curve at `t` (hodograph).
fn bezier_derivative(points: &[f64; 12], t: f64) -> f64 {
    let mut diffs = [0.0; 11];
    for (i, d) in diffs.iter_mut().enumerate() {
        *d = points[i + 1] - points[i];
    }
    for k in 1..11 {
        for i in 0..(11 - k) {
            diffs[i] = diffs[i] * (1.0 - t) + diffs[i + 1] * t;
        }
    }
    11.0 * diffs[0]
}

/// Foot displacement in the travel frame for one phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelOffset {
    /// Signed distance along the travel direction, in `[-step/2, +step/2]`.
    pub along: f64,
    /// Height above the contact plane.
    pub lift: f64,
}

/// Phase-independent trajectory parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepProfile {
    pub duty_factor: f64,
    pub step_height: f64,
    /// Foot height while in contact, in the body frame.
    pub contact_height: f64,
}

impl StepProfile {
    pub const fn new(duty_factor: f64, step_height: f64, contact_height: f64) -> Self {
        Self {
            duty_factor,
            step_height,
            contact_height,
        }
    }

    /// Progress through the current stance (`s`) or swing (`t`), in `[0, 1]`.
    pub fn sub_phase(&self, phase: LegPhase) -> f64 {
        let duty = self.duty_factor;
        let fraction = if phase.is_stance {
            if duty > 0.0 {
                phase.local_phase / duty
            } else {
                0.0
            }
        } else if duty < 1.0 {
            (phase.local_phase - duty) / (1.0 - duty)
        } else {
            0.0
        };
        fraction.clamp(0.0, 1.0)
    }

    /// Signed travel coordinate as a fraction of the step, in `[-0.5, 0.5]`.
    fn travel_fraction(&self, phase: LegPhase) -> f64 {
        let u = self.sub_phase(phase);
        if phase.is_stance {
            0.5 - u
        } else {
            bezier_eval(&BEZIER_S, u) - 0.5
        }
    }

    fn lift(&self, phase: LegPhase) -> f64 {
        if phase.is_stance {
            0.0
        } else {
            bezier_eval(&BEZIER_H, self.sub_phase(phase)) * (self.step_height / BEZIER_H_PEAK)
        }
    }

    /// Displacement along a straight step of `step_length`.
    pub fn travel_offset(&self, phase: LegPhase, step_length: f64) -> TravelOffset {
        TravelOffset {
            along: step_length * self.travel_fraction(phase),
            lift: self.lift(phase),
        }
    }

    /// Foot position for a translating step.
    ///
    /// `step` is the horizontal displacement of one full stance, pointing in
    /// the direction of body travel. The foot moves opposite to it during
    /// stance. A zero step keeps the foot over `neutral`, still lifting it
    /// during swing.
    pub fn foot_position(&self, phase: LegPhase, neutral: Vector3, step: Vector3) -> Vector3 {
        let step = step.horizontal();
        let offset = self.travel_offset(phase, step.length());
        let base = neutral.with_z(self.contact_height);
        let along = match Matrix3::heading_frame(step, Vector3::Z) {
            Ok(frame) => frame.mul_vector(Vector3::new(offset.along, 0.0, 0.0)),
            Err(_) => Vector3::ZERO,
        };
        base.add(along).add(Vector3::Z.scale(offset.lift))
    }

    /// Foot position for a pivoting step.
    ///
    /// The neutral foot rotates about the body Z axis: from `+angle/2` to
    /// `-angle/2` through stance, and back along the swing S-curve.
    pub fn pivot_foot_position(&self, phase: LegPhase, neutral: Vector3, angle: f64) -> Vector3 {
        let yaw = angle * self.travel_fraction(phase);
        let rotated = Quaternion::from_axis_angle(Vector3::Z, yaw).rotate_vector(neutral.horizontal());
        rotated.with_z(self.contact_height + self.lift(phase))
    }

    /// Foot speed along travel and vertically, per second of swing or stance.
    ///
    /// `duration` is the length of the current stance or swing in seconds.
    pub fn travel_velocity(&self, phase: LegPhase, step_length: f64, duration: f64) -> TravelOffset {
        if duration <= 0.0 {
            return TravelOffset {
                along: 0.0,
                lift: 0.0,
            };
        }
        let inv = 1.0 / duration;
        if phase.is_stance {
            return TravelOffset {
                along: -step_length * inv,
                lift: 0.0,
            };
        }
        let u = self.sub_phase(phase);
        TravelOffset {
            along: step_length * bezier_derivative(&BEZIER_S, u) * inv,
            lift: bezier_derivative(&BEZIER_H, u) * (self.step_height / BEZIER_H_PEAK) * inv,
        }
    }
}
