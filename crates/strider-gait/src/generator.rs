//! Gait generator.
//!
//! Owns the leg chains and the gait state machine:
//!
//! ```text
//! Stopped ──start──► Starting ──► Walking ⇄ Transitioning
//!    ▲                                │
//!    └──────── Stopping ◄────stop─────┘
//! ```
//!
//! Each [`GaitGenerator::update`] advances the global phase, places every
//! foot with the trajectory generator, checks the support polygon and runs
//! FABRIK on each leg chain. The result of the latest tick is kept as a
//! [`LocomotionFrame`]; rejected inputs leave it untouched.

use strider_core::{GaitError, LocomotionConfig, StriderError};
use strider_ik::{FabrikSolver, SolveReport};
use strider_math::Vector3;
use tracing::{debug, info, warn};

use crate::command::MotionCommand;
use crate::leg::{LegId, LegSetup};
use crate::pattern::{
    GaitPattern, LegPhase, PatternKind, PhaseSource, StepBehavior, differential_factor, wrap_phase,
};
use crate::stability::{self, StabilityReport};
use crate::trajectory::StepProfile;
use crate::transition::GaitTransition;

// ---------------------------------------------------------------------------
// GaitState
// ---------------------------------------------------------------------------

/// Lifecycle state of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GaitState {
    /// Feet rest at their neutral positions; updates are no-ops.
    #[default]
    Stopped,
    /// Ramping from the neutral stance into the gait.
    Starting,
    Walking,
    /// Blending between two patterns.
    Transitioning,
    /// Ramping from the gait back to the neutral stance.
    Stopping,
}

impl GaitState {
    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// Output for one leg on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct LegFrame {
    pub id: LegId,
    pub phase: LegPhase,
    /// Foot is on the ground: in stance, or at rest while stopped.
    pub contact: bool,
    /// Foot target in the body frame.
    pub target: Vector3,
    /// Joint directions after solving towards `target`.
    pub joint_directions: Vec<Vector3>,
    pub solve: SolveReport,
}

/// Output of one generator tick.
#[derive(Debug, Clone, PartialEq)]
pub struct LocomotionFrame {
    pub state: GaitState,
    /// Pattern being walked, or being blended towards.
    pub pattern: PatternKind,
    pub global_phase: f64,
    /// One entry per leg, in ring order.
    pub legs: Vec<LegFrame>,
    pub stance_count: usize,
    /// See [`stability::stability_margin`].
    pub stability_margin: f64,
    /// Too few feet down, or the body center too close to the support
    /// polygon edge.
    pub unstable: bool,
}

impl LocomotionFrame {
    pub fn leg(&self, id: LegId) -> Option<&LegFrame> {
        self.legs.iter().find(|leg| leg.id == id)
    }

    /// No foot on the ground.
    pub fn is_airborne(&self) -> bool {
        self.stance_count == 0
    }

    /// Worst end-effector error over all legs.
    pub fn max_residual(&self) -> f64 {
        self.legs
            .iter()
            .map(|leg| leg.solve.residual)
            .fold(0.0, f64::max)
    }

    pub fn targets(&self) -> impl Iterator<Item = (LegId, Vector3)> + '_ {
        self.legs.iter().map(|leg| (leg.id, leg.target))
    }
}

// ---------------------------------------------------------------------------
// GaitGenerator
// ---------------------------------------------------------------------------

/// Phase-based leg coordinator and sole owner of the leg chains.
#[derive(Debug, Clone)]
pub struct GaitGenerator {
    config: LocomotionConfig,
    solver: FabrikSolver,
    legs: Vec<LegSetup>,
    ids: Vec<LegId>,
    pattern: GaitPattern,
    transition: Option<GaitTransition>,
    state: GaitState,
    global_phase: f64,
    /// Weight of the gait targets against the neutral stance, in `[0, 1]`.
    gait_weight: f64,
    frame: LocomotionFrame,
}

impl GaitGenerator {
    /// Build a stopped generator walking `config.default_gait` on `legs`.
    ///
    /// Legs are given in ring order. The chains are solved once towards the
    /// neutral stance so [`GaitGenerator::frame`] is valid immediately.
    ///
    /// # Errors
    ///
    /// Invalid configuration, an empty leg chain, or a default gait that is
    /// unknown or unsuitable for the legs.
    pub fn new(config: LocomotionConfig, legs: Vec<LegSetup>) -> Result<Self, StriderError> {
        config.validate()?;
        for leg in &legs {
            leg.chain.validate()?;
        }
        let ids: Vec<LegId> = legs.iter().map(|leg| leg.id).collect();
        let pattern = GaitPattern::from_name(&config.default_gait, &ids, &config.pattern)?;

        let frame = LocomotionFrame {
            state: GaitState::Stopped,
            pattern: pattern.kind(),
            global_phase: 0.0,
            legs: Vec::new(),
            stance_count: 0,
            stability_margin: 0.0,
            unstable: false,
        };
        let mut generator = Self {
            solver: FabrikSolver::new(config.fabrik),
            config,
            legs,
            ids,
            pattern,
            transition: None,
            state: GaitState::Stopped,
            global_phase: 0.0,
            gait_weight: 0.0,
            frame,
        };
        generator.frame = generator.compute_frame(&MotionCommand::STOP)?;
        info!(
            pattern = generator.pattern.name(),
            legs = generator.ids.len(),
            "gait generator ready"
        );
        Ok(generator)
    }

    pub const fn state(&self) -> GaitState {
        self.state
    }

    pub const fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Active pattern. While transitioning this is the pattern being left.
    pub const fn pattern(&self) -> &GaitPattern {
        &self.pattern
    }

    pub const fn transition(&self) -> Option<&GaitTransition> {
        self.transition.as_ref()
    }

    /// Result of the latest accepted tick.
    pub const fn frame(&self) -> &LocomotionFrame {
        &self.frame
    }

    pub const fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn legs(&self) -> &[LegSetup] {
        &self.legs
    }

    /// The phase source currently driving the legs.
    pub fn phase_source(&self) -> &dyn PhaseSource {
        match &self.transition {
            Some(transition) => transition as &dyn PhaseSource,
            None => &self.pattern,
        }
    }

    /// Local phase of `leg` at the current global phase.
    pub fn leg_phase(&self, leg: LegId) -> Result<LegPhase, GaitError> {
        self.phase_source()
            .calculate_leg_phase(leg, self.global_phase)
    }

    /// Cycle-level stability of the current phase source.
    pub fn stability_report(&self) -> StabilityReport {
        StabilityReport::analyze(self.phase_source())
    }

    /// Begin walking. From `Stopped` the global phase restarts at 0; from
    /// `Stopping` the ramp reverses where it is.
    pub fn start(&mut self) {
        match self.state {
            GaitState::Stopped => {
                self.state = GaitState::Starting;
                self.global_phase = 0.0;
                self.gait_weight = 0.0;
                info!(pattern = self.pattern.name(), "gait starting");
            }
            GaitState::Stopping => {
                self.state = GaitState::Starting;
                info!(pattern = self.pattern.name(), "gait resuming");
            }
            GaitState::Starting | GaitState::Walking | GaitState::Transitioning => {}
        }
    }

    /// Ramp the feet back to the neutral stance over `blend_duration`.
    pub fn stop(&mut self) {
        match self.state {
            GaitState::Stopped | GaitState::Stopping => {}
            GaitState::Starting | GaitState::Walking | GaitState::Transitioning => {
                self.state = GaitState::Stopping;
                info!("gait stopping");
            }
        }
    }

    /// Switch to the catalog pattern `name`.
    ///
    /// While walking or transitioning with `blend`, the switch is spread over
    /// `blend_duration`; otherwise it takes effect on the next tick.
    pub fn set_gait_pattern(&mut self, name: &str, blend: bool) -> Result<(), GaitError> {
        let target = GaitPattern::from_name(name, &self.ids, &self.config.pattern)?;
        self.set_pattern(target, blend)
    }

    /// Switch to an arbitrary pattern over the same legs.
    pub fn set_pattern(&mut self, target: GaitPattern, blend: bool) -> Result<(), GaitError> {
        for &id in &self.ids {
            target.leg_phase_offset(id)?;
        }
        if let Some(extra) = target.legs().iter().find(|leg| !self.ids.contains(leg)) {
            return Err(GaitError::UnknownLeg(extra.to_string()));
        }

        let report = StabilityReport::analyze(&target);
        if !report.is_statically_stable(self.config.stability_min_stance_legs) {
            debug!(
                pattern = target.name(),
                min_stance_legs = report.min_stance_legs,
                aerial = report.has_aerial_phase,
                "pattern is not statically stable"
            );
        }

        let blending = blend && matches!(self.state, GaitState::Walking | GaitState::Transitioning);
        if blending {
            let from = match &self.transition {
                Some(transition) => transition.snapshot(),
                None => self.pattern.clone(),
            };
            info!(from = from.name(), to = target.name(), "blending gait pattern");
            self.transition = Some(GaitTransition::new(
                from,
                target,
                self.config.blend_duration,
            )?);
            self.state = GaitState::Transitioning;
        } else {
            info!(
                from = self.pattern.name(),
                to = target.name(),
                "switched gait pattern"
            );
            self.transition = None;
            self.pattern = target;
            if self.state == GaitState::Transitioning {
                self.state = GaitState::Walking;
            }
        }
        Ok(())
    }

    /// Advance one control tick of `dt` seconds.
    ///
    /// The command is clamped to `max_velocity` and `max_turn_rate`. While
    /// stopped the previous frame is returned unchanged.
    ///
    /// # Errors
    ///
    /// [`GaitError::InvalidTimestep`] for a negative or non-finite `dt` and
    /// [`GaitError::InvalidCommand`] for a non-finite command. Nothing is
    /// changed; [`GaitGenerator::frame`] still holds the previous tick.
    pub fn update(
        &mut self,
        dt: f64,
        command: MotionCommand,
    ) -> Result<&LocomotionFrame, GaitError> {
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "rejected timestep");
            return Err(GaitError::InvalidTimestep(dt));
        }
        if !command.is_finite() {
            warn!(?command, "rejected motion command");
            return Err(GaitError::InvalidCommand);
        }
        if self.state.is_stopped() {
            return Ok(&self.frame);
        }

        let command = command.clamped(self.config.max_velocity, self.config.max_turn_rate);
        self.global_phase = wrap_phase(self.global_phase + dt / self.config.cycle_time);
        self.advance_transition(dt, &command)?;
        self.advance_ramp(dt);
        self.frame = self.compute_frame(&command)?;
        Ok(&self.frame)
    }

    fn advance_transition(&mut self, dt: f64, command: &MotionCommand) -> Result<(), GaitError> {
        let finished = self
            .transition
            .as_mut()
            .is_some_and(|transition| transition.advance(dt));
        if finished {
            if let Some(transition) = self.transition.take() {
                self.pattern = transition.into_target();
            }
            if self.state == GaitState::Transitioning {
                self.state = GaitState::Walking;
            }
            info!(pattern = self.pattern.name(), "gait transition complete");
        }

        if self.transition.is_none()
            && self.state == GaitState::Walking
            && let Some(retimed) = self.pattern.retimed_for_turn(command.turn_rate)
        {
            debug!(
                turn_rate = command.turn_rate,
                reversed = retimed.is_ring_reversed(),
                "re-timing wave for turn direction"
            );
            self.transition = Some(GaitTransition::new(
                self.pattern.clone(),
                retimed,
                self.config.blend_duration,
            )?);
            self.state = GaitState::Transitioning;
        }
        Ok(())
    }

    fn advance_ramp(&mut self, dt: f64) {
        let delta = dt / self.config.blend_duration;
        match self.state {
            GaitState::Starting => {
                self.gait_weight = (self.gait_weight + delta).min(1.0);
                if self.gait_weight >= 1.0 {
                    self.state = if self.transition.is_some() {
                        GaitState::Transitioning
                    } else {
                        GaitState::Walking
                    };
                    info!(pattern = self.pattern.name(), "gait walking");
                }
            }
            GaitState::Stopping => {
                self.gait_weight = (self.gait_weight - delta).max(0.0);
                if self.gait_weight <= 0.0 {
                    if let Some(transition) = self.transition.take() {
                        self.pattern = transition.into_target();
                    }
                    self.state = GaitState::Stopped;
                    info!("gait stopped");
                }
            }
            GaitState::Stopped | GaitState::Walking | GaitState::Transitioning => {}
        }
    }

    fn compute_frame(&mut self, command: &MotionCommand) -> Result<LocomotionFrame, GaitError> {
        let global_phase = self.global_phase;
        let rest_height = self.config.contact_height();
        let at_rest = self.state.is_stopped();

        let mut placements = Vec::with_capacity(self.legs.len());
        for leg in &self.legs {
            let (phase, gait_target) = match &self.transition {
                Some(transition) => {
                    let phase = transition.calculate_leg_phase(leg.id, global_phase)?;
                    let duty = transition.duty_factor();
                    let from =
                        self.gait_target(leg, phase, duty, transition.from().behavior(), command);
                    let to =
                        self.gait_target(leg, phase, duty, transition.to().behavior(), command);
                    (phase, from.lerp(to, transition.progress()))
                }
                None => {
                    let phase = self.pattern.calculate_leg_phase(leg.id, global_phase)?;
                    let duty = self.pattern.duty_factor();
                    let target =
                        self.gait_target(leg, phase, duty, self.pattern.behavior(), command);
                    (phase, target)
                }
            };
            let rest = leg.neutral.with_z(rest_height);
            placements.push((phase, rest.lerp(gait_target, self.gait_weight)));
        }

        let stance_feet: Vec<Vector3> = placements
            .iter()
            .filter(|(phase, _)| at_rest || phase.is_stance)
            .map(|&(_, target)| target)
            .collect();
        let stance_count = stance_feet.len();
        let spans_area = stability::support_polygon(&stance_feet).len() >= 3;
        let stability_margin = stability::stability_margin(&stance_feet);
        let unstable = stance_count < self.config.stability_min_stance_legs
            || (spans_area && stability_margin < self.config.min_stability_margin);
        if unstable && !at_rest {
            debug!(
                global_phase,
                stance_count, stability_margin, "support below stability threshold"
            );
        }

        let mut legs = Vec::with_capacity(self.legs.len());
        for (leg, (phase, target)) in self.legs.iter_mut().zip(placements) {
            let solve = self.solver.solve(&mut leg.chain, target);
            if !solve.reachable {
                warn!(
                    leg = %leg.id,
                    residual = solve.residual,
                    "foot target out of reach"
                );
            }
            legs.push(LegFrame {
                id: leg.id,
                phase,
                contact: at_rest || phase.is_stance,
                target,
                joint_directions: leg.chain.joint_directions(),
                solve,
            });
        }

        let pattern = self
            .transition
            .as_ref()
            .map_or(self.pattern.kind(), |transition| transition.to().kind());
        Ok(LocomotionFrame {
            state: self.state,
            pattern,
            global_phase,
            legs,
            stance_count,
            stability_margin,
            unstable,
        })
    }

    /// Foot target for one leg under one step behavior, before the
    /// start/stop ramp.
    fn gait_target(
        &self,
        leg: &LegSetup,
        phase: LegPhase,
        duty_factor: f64,
        behavior: StepBehavior,
        command: &MotionCommand,
    ) -> Vector3 {
        let profile = StepProfile::new(
            duty_factor,
            self.config.step_height,
            self.config.contact_height(),
        );
        let stance_time = self.config.stance_time(duty_factor);
        let max_step = self.config.step_length;
        let linear = command.linear_velocity.horizontal();

        let swirl = Vector3::Z
            .scale(command.turn_rate)
            .cross(leg.neutral.horizontal());
        let step = match behavior {
            StepBehavior::Standard => clamp_length(linear.add(swirl).scale(stance_time), max_step),
            StepBehavior::Differential { gain } => {
                clamp_length(linear.add(swirl).scale(stance_time), max_step).scale(
                    differential_factor(leg.id.side(), gain, command.turn_rate),
                )
            }
            StepBehavior::Crab { heading } => clamp_length(
                linear
                    .rotate_about_axis(Vector3::Z, heading)
                    .scale(stance_time),
                max_step,
            ),
            StepBehavior::Pivot {
                step_angle,
                direction,
            } => {
                // An idle command steps in place; translation alone pivots
                // by the configured angle.
                let angle = if command.turn_rate.abs() > f64::EPSILON {
                    command.turn_rate * stance_time
                } else if command.is_idle() {
                    0.0
                } else {
                    direction.sign() * step_angle
                };
                return profile.pivot_foot_position(phase, leg.neutral, angle);
            }
        };
        profile.foot_position(phase, leg.neutral, step)
    }
}

fn clamp_length(v: Vector3, max: f64) -> Vector3 {
    let length = v.length();
    if length > max {
        v.scale(max / length)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strider_ik::{Chain, Joint, Link};

    const DT: f64 = 0.125;

    fn hip(id: LegId) -> Vector3 {
        let x = if id.is_front() {
            0.1
        } else if id.is_rear() {
            -0.1
        } else {
            0.0
        };
        Vector3::new(x, 0.06 * id.side(), 0.0)
    }

    fn leg(id: LegId) -> LegSetup {
        let hip = hip(id);
        let out = Vector3::new(0.0, id.side(), 0.0);
        let down = Vector3::new(0.0, 0.3 * id.side(), -1.0).normalize().unwrap();
        let chain = Chain::from_segments(
            id.to_string(),
            hip,
            [(out, 0.03), (out, 0.05), (down, 0.07)].map(|(direction, length)| {
                (
                    Joint::revolute(Vector3::Z)
                        .unwrap()
                        .with_direction(direction)
                        .unwrap(),
                    Link::new(length).unwrap(),
                )
            }),
        );
        LegSetup::new(id, chain, hip.add(out.scale(0.08)))
    }

    fn hexapod() -> GaitGenerator {
        GaitGenerator::new(
            LocomotionConfig::default(),
            LegId::HEXAPOD.into_iter().map(leg).collect(),
        )
        .unwrap()
    }

    /// Started and ramped up: Walking at global phase 0.5.
    fn walking() -> GaitGenerator {
        let mut generator = hexapod();
        generator.start();
        for _ in 0..4 {
            generator.update(DT, MotionCommand::STOP).unwrap();
        }
        assert_eq!(generator.state(), GaitState::Walking);
        generator
    }

    fn rest(id: LegId) -> Vector3 {
        leg(id).neutral.with_z(-0.1)
    }

    #[test]
    fn new_generator_rests_on_neutral_stance() {
        let generator = hexapod();
        let frame = generator.frame();
        assert_eq!(frame.state, GaitState::Stopped);
        assert_eq!(frame.pattern, PatternKind::Tripod);
        assert_eq!(frame.stance_count, 6);
        assert!(!frame.unstable);
        for leg in &frame.legs {
            assert_relative_eq!(leg.target, rest(leg.id), epsilon = 1e-12);
            assert!(leg.contact);
            assert_eq!(leg.joint_directions.len(), 3);
        }
    }

    #[test]
    fn updates_while_stopped_do_nothing() {
        let mut generator = hexapod();
        let before = generator.frame().clone();
        let frame = generator.update(0.1, MotionCommand::forward(0.1)).unwrap();
        assert_eq!(*frame, before);
        assert_eq!(generator.global_phase(), 0.0);
    }

    #[test]
    fn start_ramps_into_walking() {
        let mut generator = hexapod();
        generator.start();
        assert_eq!(generator.state(), GaitState::Starting);
        generator.update(DT, MotionCommand::STOP).unwrap();
        assert_eq!(generator.state(), GaitState::Starting);
        assert_relative_eq!(generator.global_phase(), 0.125);
        for _ in 0..3 {
            generator.update(DT, MotionCommand::STOP).unwrap();
        }
        assert_eq!(generator.state(), GaitState::Walking);
        assert_relative_eq!(generator.global_phase(), 0.5);
    }

    #[test]
    fn tripod_frame_has_three_feet_down() {
        let generator = walking();
        let frame = generator.frame();
        assert_eq!(frame.stance_count, 3);
        assert!(frame.stability_margin > 0.0);
        assert!(!frame.unstable);
        assert!(frame.leg(LegId::FrontLeft).unwrap().contact);
        assert!(!frame.leg(LegId::FrontRight).unwrap().contact);
    }

    #[test]
    fn stance_feet_move_backward_when_walking_forward() {
        let mut generator = walking();
        let command = MotionCommand::forward(0.1);
        let first = generator.update(0.01, command).unwrap().leg(LegId::FrontLeft).unwrap().target;
        let second = generator.update(0.01, command).unwrap().leg(LegId::FrontLeft).unwrap().target;
        assert!(second.x < first.x);
        assert_relative_eq!(second.z, -0.1, epsilon = 1e-12);
    }

    #[test]
    fn step_is_clamped_to_step_length() {
        let mut generator = walking();
        // Front left touches down exactly at global phase 0.5.
        let frame = generator.update(0.0, MotionCommand::forward(10.0)).unwrap();
        let target = frame.leg(LegId::FrontLeft).unwrap().target;
        let neutral = rest(LegId::FrontLeft);
        assert_relative_eq!(target.x, neutral.x + 0.04, epsilon = 1e-12);
        assert_relative_eq!(target.y, neutral.y, epsilon = 1e-12);
    }

    #[test]
    fn turning_in_place_sweeps_feet_around_body() {
        let mut generator = walking();
        let frame = generator.update(0.0, MotionCommand::turn(0.2)).unwrap();
        let target = frame.leg(LegId::FrontLeft).unwrap().target;
        let neutral = rest(LegId::FrontLeft);
        // Stance start sits half a step ahead along omega x r.
        let swirl = Vector3::new(-0.2 * neutral.y, 0.2 * neutral.x, 0.0).scale(0.5 * 0.5);
        assert_relative_eq!(target, neutral.add(swirl), epsilon = 1e-12);
    }

    #[test]
    fn rejected_inputs_hold_previous_frame() {
        let mut generator = walking();
        let before = generator.frame().clone();
        assert_eq!(
            generator.update(-0.1, MotionCommand::STOP).unwrap_err(),
            GaitError::InvalidTimestep(-0.1)
        );
        assert!(matches!(
            generator.update(f64::NAN, MotionCommand::STOP),
            Err(GaitError::InvalidTimestep(_))
        ));
        assert_eq!(
            generator.update(0.01, MotionCommand::turn(f64::INFINITY)).unwrap_err(),
            GaitError::InvalidCommand
        );
        assert_eq!(*generator.frame(), before);
        assert_relative_eq!(generator.global_phase(), 0.5);
    }

    #[test]
    fn identical_state_and_input_give_identical_output() {
        let mut a = walking();
        a.update(0.01, MotionCommand::new(Vector3::new(0.05, 0.02, 0.0), 0.3))
            .unwrap();
        let mut b = a.clone();
        let command = MotionCommand::new(Vector3::new(0.1, -0.03, 0.0), -0.4);
        let fa = a.update(0.017, command).unwrap().clone();
        let fb = b.update(0.017, command).unwrap().clone();
        assert_eq!(fa, fb);
    }

    #[test]
    fn stop_ramps_back_to_neutral() {
        let mut generator = walking();
        let command = MotionCommand::forward(0.1);
        generator.update(0.0, command).unwrap();
        generator.stop();
        assert_eq!(generator.state(), GaitState::Stopping);
        for _ in 0..4 {
            generator.update(DT, command).unwrap();
        }
        assert_eq!(generator.state(), GaitState::Stopped);
        let frame = generator.frame().clone();
        assert_eq!(frame.stance_count, 6);
        for leg in &frame.legs {
            assert_relative_eq!(leg.target, rest(leg.id), epsilon = 1e-12);
        }
        generator.update(DT, command).unwrap();
        assert_eq!(*generator.frame(), frame);
    }

    #[test]
    fn start_after_stop_resets_phase() {
        let mut generator = walking();
        generator.stop();
        for _ in 0..4 {
            generator.update(DT, MotionCommand::STOP).unwrap();
        }
        generator.start();
        assert_eq!(generator.global_phase(), 0.0);
        assert_eq!(generator.state(), GaitState::Starting);
    }

    #[test]
    fn blended_switch_goes_through_transitioning() {
        let mut generator = walking();
        generator.set_gait_pattern("wave", true).unwrap();
        assert_eq!(generator.state(), GaitState::Transitioning);
        assert_eq!(generator.pattern().kind(), PatternKind::Tripod);
        let frame = generator.update(DT, MotionCommand::STOP).unwrap();
        assert_eq!(frame.pattern, PatternKind::Wave);
        for _ in 0..3 {
            generator.update(DT, MotionCommand::STOP).unwrap();
        }
        assert_eq!(generator.state(), GaitState::Walking);
        assert_eq!(generator.pattern().kind(), PatternKind::Wave);
        assert!(generator.transition().is_none());
        assert_eq!(generator.stability_report().min_stance_legs, 5);
    }

    #[test]
    fn foot_targets_stay_continuous_through_blend() {
        let mut generator = walking();
        let command = MotionCommand::forward(0.08);
        let mut previous: Vec<Vector3> = generator
            .update(0.0, command)
            .unwrap()
            .targets()
            .map(|(_, t)| t)
            .collect();
        generator.set_gait_pattern("wave", true).unwrap();
        for _ in 0..200 {
            let frame = generator.update(0.005, command).unwrap();
            for ((_, target), before) in frame.targets().zip(&previous) {
                assert!(target.distance(*before) < 0.02);
            }
            previous = frame.targets().map(|(_, t)| t).collect();
        }
        assert_eq!(generator.state(), GaitState::Walking);
    }

    #[test]
    fn immediate_switch_skips_blend() {
        let mut generator = walking();
        generator.set_gait_pattern("ripple", false).unwrap();
        assert_eq!(generator.state(), GaitState::Walking);
        assert_eq!(generator.pattern().kind(), PatternKind::Ripple);
    }

    #[test]
    fn bad_pattern_names_leave_state_alone() {
        let mut generator = walking();
        assert_eq!(
            generator.set_gait_pattern("moonwalk", true).unwrap_err(),
            GaitError::UnknownPattern("moonwalk".into())
        );
        assert!(matches!(
            generator.set_gait_pattern("gallop", true),
            Err(GaitError::UnsuitableLegCount { legs: 6, .. })
        ));
        assert_eq!(generator.state(), GaitState::Walking);
        assert_eq!(generator.pattern().kind(), PatternKind::Tripod);
    }

    #[test]
    fn pronk_leaves_the_ground() {
        let mut generator = walking();
        generator.set_gait_pattern("pronk", false).unwrap();
        let frame = generator.update(0.0, MotionCommand::STOP).unwrap();
        assert!(frame.is_airborne());
        assert!(frame.unstable);
        assert!(generator.stability_report().has_aerial_phase);
    }

    #[test]
    fn differential_wave_retimes_for_clockwise_turn() {
        let mut generator = walking();
        generator.set_gait_pattern("differential_wave", false).unwrap();
        generator.update(0.01, MotionCommand::forward(0.05)).unwrap();
        assert_eq!(generator.state(), GaitState::Walking);
        generator
            .update(0.01, MotionCommand::new(Vector3::new(0.05, 0.0, 0.0), -0.5))
            .unwrap();
        assert_eq!(generator.state(), GaitState::Transitioning);
        assert!(generator.transition().unwrap().to().is_ring_reversed());
    }

    #[test]
    fn differential_steps_shorten_inside_legs() {
        let mut generator = walking();
        generator.set_gait_pattern("differential_tripod", false).unwrap();
        // Counter-clockwise: left legs are inside.
        let frame = generator
            .update(0.0, MotionCommand::new(Vector3::new(0.1, 0.0, 0.0), 0.5))
            .unwrap();
        let left = frame.leg(LegId::FrontLeft).unwrap().target;
        let right = frame.leg(LegId::MiddleRight).unwrap().target;
        // (v + omega x r) * stance_time, scaled by 0.75 and 1.25, half a step ahead.
        assert_relative_eq!(
            left,
            rest(LegId::FrontLeft).add(Vector3::new(0.005_625, 0.009_375, 0.0)),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            right,
            rest(LegId::MiddleRight).add(Vector3::new(0.05, 0.0, 0.0)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn differential_tripod_turns_in_place() {
        let mut generator = walking();
        generator.set_gait_pattern("differential_tripod", false).unwrap();
        let frame = generator.update(0.0, MotionCommand::turn(0.8)).unwrap();
        let left = frame.leg(LegId::FrontLeft).unwrap().target;
        let right = frame.leg(LegId::MiddleRight).unwrap().target;
        assert_relative_eq!(
            left,
            rest(LegId::FrontLeft).add(Vector3::new(-0.0168, 0.012, 0.0)),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            right,
            rest(LegId::MiddleRight).add(Vector3::new(0.0392, 0.0, 0.0)),
            epsilon = 1e-12
        );

        let mut excursion: f64 = 0.0;
        for _ in 0..50 {
            let frame = generator.update(0.02, MotionCommand::turn(0.8)).unwrap();
            for leg in &frame.legs {
                let offset = leg.target.sub(rest(leg.id)).horizontal().length();
                excursion = excursion.max(offset);
            }
        }
        assert!(excursion > 0.03);
    }

    #[test]
    fn pivot_rotates_feet_by_default_angle() {
        let mut generator = walking();
        generator.set_gait_pattern("pivot_turn", false).unwrap();
        let frame = generator.update(0.0, MotionCommand::forward(0.05)).unwrap();
        let target = frame.leg(LegId::FrontLeft).unwrap().target;
        let neutral = rest(LegId::FrontLeft);
        assert_relative_eq!(target.z, -0.1, epsilon = 1e-12);
        assert_relative_eq!(
            target.horizontal().length(),
            neutral.horizontal().length(),
            epsilon = 1e-12
        );
        let swept = neutral.horizontal().angle_to(target.horizontal());
        assert_relative_eq!(swept, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn pivot_steps_in_place_when_idle() {
        let mut generator = walking();
        generator.set_gait_pattern("pivot_turn", false).unwrap();
        for _ in 0..20 {
            let frame = generator.update(0.03, MotionCommand::STOP).unwrap();
            for leg in &frame.legs {
                assert_relative_eq!(
                    leg.target.horizontal(),
                    rest(leg.id).horizontal(),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn unreachable_targets_are_reported_not_raised() {
        let mut legs: Vec<LegSetup> = LegId::HEXAPOD.into_iter().map(leg).collect();
        legs[0].neutral = Vector3::new(1.0, -1.0, 0.0);
        let generator = GaitGenerator::new(LocomotionConfig::default(), legs).unwrap();
        let far = generator.frame().leg(LegId::FrontRight).unwrap();
        assert!(!far.solve.reachable);
        assert!(generator.frame().max_residual() > 1.0);
    }

    #[test]
    fn construction_errors() {
        let legs = || LegId::HEXAPOD.into_iter().map(leg).collect::<Vec<_>>();
        let config = LocomotionConfig {
            cycle_time: 0.0,
            ..LocomotionConfig::default()
        };
        assert!(matches!(
            GaitGenerator::new(config, legs()),
            Err(StriderError::Config(_))
        ));

        let config = LocomotionConfig {
            default_gait: "shuffle".into(),
            ..LocomotionConfig::default()
        };
        assert!(matches!(
            GaitGenerator::new(config, legs()),
            Err(StriderError::Gait(GaitError::UnknownPattern(_)))
        ));

        let quad = LegId::QUADRUPED.into_iter().map(leg).collect();
        assert!(matches!(
            GaitGenerator::new(LocomotionConfig::default(), quad),
            Err(StriderError::Gait(GaitError::UnsuitableLegCount { legs: 4, .. }))
        ));

        let mut broken = legs();
        broken[2].chain = Chain::named("stub", Vector3::ZERO);
        assert!(matches!(
            GaitGenerator::new(LocomotionConfig::default(), broken),
            Err(StriderError::Chain(_))
        ));
    }
}
