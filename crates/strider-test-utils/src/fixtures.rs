//! Robot layouts for tests.
//!
//! Body frame: X forward, Y left, Z up. Every leg is a three-segment chain
//! (coxa, femur, tibia) rooted at its hip, reaching 0.15 m.

use strider_core::LocomotionConfig;
use strider_gait::{GaitGenerator, LegId, LegSetup};
use strider_ik::{Chain, Joint, Link};
use strider_math::Vector3;

/// Lateral distance from the body center line to each hip.
pub const HIP_OFFSET: f64 = 0.06;

/// Horizontal distance from hip to neutral foot position.
pub const NEUTRAL_REACH: f64 = 0.08;

const SEGMENTS: [f64; 3] = [0.03, 0.05, 0.07];

fn hip_x(id: LegId, spacing: f64) -> f64 {
    if id.is_front() {
        spacing
    } else if id.is_rear() {
        -spacing
    } else {
        0.0
    }
}

/// Coxa and femur point straight out from the body, the tibia angles down.
pub fn leg_chain(id: LegId, hip: Vector3) -> Chain {
    side_leg_chain(id.to_string(), id.side(), hip)
}

/// [`leg_chain`] for a bare body side: `1.0` is left, `-1.0` is right.
pub fn side_leg_chain(name: impl Into<String>, side: f64, hip: Vector3) -> Chain {
    let out = Vector3::new(0.0, side, 0.0);
    let down = Vector3::new(0.0, 0.3 * side, -1.0).normalize_or(Vector3::Z.negate());
    let directions = [out, out, down];
    let segments: Vec<(Joint, Link)> = directions
        .into_iter()
        .zip(SEGMENTS)
        .map(|(direction, length)| {
            let joint = Joint::revolute(Vector3::Z)
                .and_then(|j| j.with_direction(direction))
                .expect("fixture directions are non-zero");
            (joint, Link::new(length).expect("fixture lengths are positive"))
        })
        .collect();
    Chain::from_segments(name, hip, segments)
}

/// Leg rooted at `hip` with its neutral foot [`NEUTRAL_REACH`] further out.
pub fn leg_setup(id: LegId, hip: Vector3) -> LegSetup {
    let neutral = hip.add(Vector3::new(0.0, NEUTRAL_REACH * id.side(), 0.0));
    LegSetup::new(id, leg_chain(id, hip), neutral)
}

/// Six legs in [`LegId::HEXAPOD`] ring order, hips 0.1 m apart along X.
pub fn hexapod_legs() -> Vec<LegSetup> {
    LegId::HEXAPOD
        .into_iter()
        .map(|id| leg_setup(id, Vector3::new(hip_x(id, 0.1), HIP_OFFSET * id.side(), 0.0)))
        .collect()
}

/// Four legs in [`LegId::QUADRUPED`] ring order, hips at +/-0.12 m along X.
pub fn quadruped_legs() -> Vec<LegSetup> {
    LegId::QUADRUPED
        .into_iter()
        .map(|id| leg_setup(id, Vector3::new(hip_x(id, 0.12), HIP_OFFSET * id.side(), 0.0)))
        .collect()
}

/// Stopped hexapod generator with the default configuration (tripod gait).
pub fn hexapod_generator() -> GaitGenerator {
    GaitGenerator::new(LocomotionConfig::default(), hexapod_legs())
        .expect("default hexapod is valid")
}

/// Stopped quadruped generator walking `gait`.
pub fn quadruped_generator(gait: &str) -> GaitGenerator {
    let config = LocomotionConfig {
        default_gait: gait.into(),
        stability_min_stance_legs: 2,
        ..LocomotionConfig::default()
    };
    GaitGenerator::new(config, quadruped_legs()).expect("quadruped gait is valid")
}
