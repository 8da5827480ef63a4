//! Gait pattern catalog.
//!
//! A [`GaitPattern`] is an immutable descriptor: a duty factor, one phase
//! offset per leg, the leg ring order and a [`StepBehavior`] telling the
//! generator how to turn a motion command into per-leg steps. Each leg's
//! local phase is `(global_phase + offset) mod 1`; the leg is in stance while
//! the local phase is below the duty factor.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strider_core::{GaitError, PatternParams, TurnDirection};

use crate::leg::LegId;

/// Phases this close below 1.0 wrap to 0.0.
pub const PHASE_EPSILON: f64 = 1e-9;

/// Differential step factor bounds, as multiples of the base step length.
pub const DIFFERENTIAL_MIN_FACTOR: f64 = 0.1;
pub const DIFFERENTIAL_MAX_FACTOR: f64 = 2.0;

/// Wrap a phase into `[0, 1)`.
pub fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(1.0);
    if wrapped >= 1.0 - PHASE_EPSILON {
        0.0
    } else {
        wrapped
    }
}

/// A leg's position within its own cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegPhase {
    /// Local phase in `[0, 1)`.
    pub local_phase: f64,
    pub is_stance: bool,
}

impl LegPhase {
    /// Derive the stance flag from a local phase and duty factor.
    pub fn new(local_phase: f64, duty_factor: f64) -> Self {
        Self {
            local_phase,
            is_stance: local_phase < duty_factor,
        }
    }
}

// ---------------------------------------------------------------------------
// PhaseSource
// ---------------------------------------------------------------------------

/// Anything that maps a global phase to per-leg phases.
///
/// Implemented by [`GaitPattern`] and by an in-progress
/// [`GaitTransition`](crate::GaitTransition), so stability analysis and the
/// generator treat both the same way.
pub trait PhaseSource {
    /// Legs in ring order.
    fn legs(&self) -> &[LegId];

    fn duty_factor(&self) -> f64;

    /// Phase offset of `leg` in `[0, 1)`.
    fn leg_phase_offset(&self, leg: LegId) -> Result<f64, GaitError>;

    /// Local phase and stance flag of `leg` at `global_phase`.
    fn calculate_leg_phase(&self, leg: LegId, global_phase: f64) -> Result<LegPhase, GaitError> {
        let offset = self.leg_phase_offset(leg)?;
        Ok(LegPhase::new(
            wrap_phase(global_phase + offset),
            self.duty_factor(),
        ))
    }
}

// ---------------------------------------------------------------------------
// PatternKind
// ---------------------------------------------------------------------------

/// Names of the catalog patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Tripod,
    Wave,
    Ripple,
    QuadrupedTrot,
    DynamicTrot,
    Bound,
    Gallop,
    Pronk,
    FastTripod,
    DynamicWave,
    DifferentialTripod,
    DifferentialWave,
    CrabWalk,
    PivotTurn,
}

impl PatternKind {
    pub const ALL: [Self; 14] = [
        Self::Tripod,
        Self::Wave,
        Self::Ripple,
        Self::QuadrupedTrot,
        Self::DynamicTrot,
        Self::Bound,
        Self::Gallop,
        Self::Pronk,
        Self::FastTripod,
        Self::DynamicWave,
        Self::DifferentialTripod,
        Self::DifferentialWave,
        Self::CrabWalk,
        Self::PivotTurn,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Tripod => "tripod",
            Self::Wave => "wave",
            Self::Ripple => "ripple",
            Self::QuadrupedTrot => "quadruped_trot",
            Self::DynamicTrot => "dynamic_trot",
            Self::Bound => "bound",
            Self::Gallop => "gallop",
            Self::Pronk => "pronk",
            Self::FastTripod => "fast_tripod",
            Self::DynamicWave => "dynamic_wave",
            Self::DifferentialTripod => "differential_tripod",
            Self::DifferentialWave => "differential_wave",
            Self::CrabWalk => "crab_walk",
            Self::PivotTurn => "pivot_turn",
        }
    }

    /// Whether the pattern's structure fits `count` legs.
    pub const fn is_suitable_for_legs(self, count: usize) -> bool {
        match self {
            Self::Tripod | Self::FastTripod | Self::DifferentialTripod | Self::Ripple => count == 6,
            Self::QuadrupedTrot | Self::DynamicTrot | Self::Bound | Self::Gallop => count == 4,
            Self::Wave | Self::DynamicWave | Self::DifferentialWave => count >= 4,
            Self::Pronk | Self::CrabWalk | Self::PivotTurn => count >= 1,
        }
    }

    /// Patterns whose concurrent stance count can drop below a statically
    /// stable support set.
    pub const fn requires_dynamic_stability(self) -> bool {
        matches!(
            self,
            Self::DynamicTrot | Self::Bound | Self::Gallop | Self::Pronk
        )
    }

    /// Catalog duty factor for `legs` legs.
    #[allow(clippy::cast_precision_loss)]
    pub fn nominal_duty_factor(self, legs: usize) -> f64 {
        match self {
            Self::Wave | Self::DifferentialWave => {
                let n = legs.max(1) as f64;
                (n - 1.0) / n
            }
            Self::Ripple => 0.75,
            Self::QuadrupedTrot | Self::DynamicTrot | Self::DynamicWave => 0.6,
            Self::Bound | Self::FastTripod => 0.35,
            Self::Gallop => 0.25,
            Self::Pronk => 0.3,
            Self::Tripod | Self::DifferentialTripod | Self::CrabWalk | Self::PivotTurn => 0.5,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternKind {
    type Err = GaitError;

    /// Case-insensitive; spaces and dashes count as underscores. `trot`,
    /// `crab` and `pivot` are accepted as short names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "trot" => return Ok(Self::QuadrupedTrot),
            "crab" => return Ok(Self::CrabWalk),
            "pivot" => return Ok(Self::PivotTurn),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| GaitError::UnknownPattern(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// StepBehavior
// ---------------------------------------------------------------------------

/// How a pattern turns a motion command into foot steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepBehavior {
    /// Step vector follows the commanded linear and angular velocity.
    Standard,
    /// Per-leg step length scaled by `1 - side * gain * turn_rate`.
    Differential { gain: f64 },
    /// Linear velocity rotated by `heading` in the body frame; no yaw.
    Crab { heading: f64 },
    /// Feet rotate about the body Z axis instead of translating.
    Pivot {
        step_angle: f64,
        direction: TurnDirection,
    },
}

impl StepBehavior {
    fn for_kind(kind: PatternKind, params: &PatternParams) -> Self {
        match kind {
            PatternKind::DifferentialTripod | PatternKind::DifferentialWave => Self::Differential {
                gain: params.differential_gain,
            },
            PatternKind::CrabWalk => Self::Crab {
                heading: params.crab_heading,
            },
            PatternKind::PivotTurn => Self::Pivot {
                step_angle: params.pivot_step_angle,
                direction: params.pivot_direction,
            },
            _ => Self::Standard,
        }
    }
}

// ---------------------------------------------------------------------------
// GaitPattern
// ---------------------------------------------------------------------------

/// An immutable gait descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct GaitPattern {
    kind: PatternKind,
    duty_factor: f64,
    offsets: BTreeMap<LegId, f64>,
    ring: Vec<LegId>,
    behavior: StepBehavior,
    ring_reversed: bool,
}

impl GaitPattern {
    /// Build a catalog pattern by name for the given legs (in ring order).
    ///
    /// # Errors
    ///
    /// [`GaitError::UnknownPattern`] for an unrecognized name, plus every
    /// error of [`GaitPattern::create`].
    pub fn from_name(
        name: &str,
        legs: &[LegId],
        params: &PatternParams,
    ) -> Result<Self, GaitError> {
        Self::create(name.parse()?, legs, params)
    }

    /// Build a catalog pattern for the given legs (in ring order).
    ///
    /// # Errors
    ///
    /// - [`GaitError::NoLegs`] / [`GaitError::DuplicateLeg`] for a bad leg list
    /// - [`GaitError::UnsuitableLegCount`] when the pattern does not fit the
    ///   leg count
    /// - [`GaitError::MissingLeg`] when a pattern with named groups (tripod
    ///   family, quadruped family) lacks one of them
    pub fn create(
        kind: PatternKind,
        legs: &[LegId],
        params: &PatternParams,
    ) -> Result<Self, GaitError> {
        check_leg_list(legs)?;
        if !kind.is_suitable_for_legs(legs.len()) {
            return Err(GaitError::UnsuitableLegCount {
                pattern: kind.name().into(),
                legs: legs.len(),
            });
        }
        Ok(Self {
            kind,
            duty_factor: kind.nominal_duty_factor(legs.len()),
            offsets: catalog_offsets(kind, legs)?,
            ring: legs.to_vec(),
            behavior: StepBehavior::for_kind(kind, params),
            ring_reversed: false,
        })
    }

    /// Assemble a pattern from already-validated parts.
    pub(crate) fn from_parts(
        kind: PatternKind,
        duty_factor: f64,
        offsets: BTreeMap<LegId, f64>,
        ring: Vec<LegId>,
        behavior: StepBehavior,
        ring_reversed: bool,
    ) -> Self {
        Self {
            kind,
            duty_factor,
            offsets,
            ring,
            behavior,
            ring_reversed,
        }
    }

    /// Replace the catalog duty factor.
    ///
    /// # Errors
    ///
    /// [`GaitError::InvalidDutyFactor`] unless `duty_factor` is in `(0, 1]`.
    pub fn with_duty_factor(mut self, duty_factor: f64) -> Result<Self, GaitError> {
        if duty_factor.is_nan() || duty_factor <= 0.0 || duty_factor > 1.0 {
            return Err(GaitError::InvalidDutyFactor(duty_factor));
        }
        self.duty_factor = duty_factor;
        Ok(self)
    }

    pub const fn kind(&self) -> PatternKind {
        self.kind
    }

    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub const fn behavior(&self) -> StepBehavior {
        self.behavior
    }

    pub fn offsets(&self) -> &BTreeMap<LegId, f64> {
        &self.offsets
    }

    pub const fn is_ring_reversed(&self) -> bool {
        self.ring_reversed
    }

    /// Normalized swing progress of `leg` in `[0, 1]`; 0.0 while in stance.
    pub fn swing_progress(&self, leg: LegId, global_phase: f64) -> Result<f64, GaitError> {
        let phase = self.calculate_leg_phase(leg, global_phase)?;
        if phase.is_stance || self.duty_factor >= 1.0 {
            return Ok(0.0);
        }
        Ok((phase.local_phase - self.duty_factor) / (1.0 - self.duty_factor))
    }

    /// Stance flags over a look-ahead horizon.
    ///
    /// Returns `contacts[step][leg]` with legs in ring order, starting at
    /// `global_phase` and advancing `dt / cycle_time` per step.
    #[allow(clippy::cast_precision_loss)]
    pub fn contact_schedule(
        &self,
        global_phase: f64,
        horizon: usize,
        dt: f64,
        cycle_time: f64,
    ) -> Vec<Vec<bool>> {
        (0..horizon)
            .map(|k| {
                let future = wrap_phase(global_phase + k as f64 * dt / cycle_time);
                self.ring
                    .iter()
                    .map(|&leg| {
                        let offset = self.offsets.get(&leg).copied().unwrap_or(0.0);
                        wrap_phase(future + offset) < self.duty_factor
                    })
                    .collect()
            })
            .collect()
    }

    /// Step length for `leg` while turning.
    ///
    /// For differential patterns the base length is scaled by
    /// `1 - side * gain * turn_rate`, clamped to `[0.1, 2.0]`. Left legs have
    /// side `+1`; positive turn rate is counter-clockwise, so inside legs
    /// shorten. Other patterns return `base` unchanged.
    pub fn differential_step_length(&self, leg: LegId, base: f64, turn_rate: f64) -> f64 {
        match self.behavior {
            StepBehavior::Differential { gain } => {
                base * differential_factor(leg.side(), gain, turn_rate)
            }
            _ => base,
        }
    }

    /// Re-timed copy for the current turn sense, if this pattern needs one.
    ///
    /// Differential wave runs its ring forward while turning
    /// counter-clockwise (or going straight) and backward while turning
    /// clockwise. Returns `None` when no change is needed.
    #[must_use]
    pub fn retimed_for_turn(&self, turn_rate: f64) -> Option<Self> {
        if self.kind != PatternKind::DifferentialWave {
            return None;
        }
        let want_reversed = turn_rate < 0.0;
        if want_reversed == self.ring_reversed {
            return None;
        }
        let offsets = if want_reversed {
            reverse_ring_offsets(&self.ring)
        } else {
            ring_offsets(&self.ring)
        };
        Some(Self {
            offsets,
            ring_reversed: want_reversed,
            ..self.clone()
        })
    }
}

impl PhaseSource for GaitPattern {
    fn legs(&self) -> &[LegId] {
        &self.ring
    }

    fn duty_factor(&self) -> f64 {
        self.duty_factor
    }

    fn leg_phase_offset(&self, leg: LegId) -> Result<f64, GaitError> {
        self.offsets
            .get(&leg)
            .copied()
            .ok_or_else(|| GaitError::UnknownLeg(leg.to_string()))
    }
}

/// `1 - side * gain * turn_rate`, clamped to the differential bounds.
pub fn differential_factor(side: f64, gain: f64, turn_rate: f64) -> f64 {
    (1.0 - side * gain * turn_rate).clamp(DIFFERENTIAL_MIN_FACTOR, DIFFERENTIAL_MAX_FACTOR)
}

// ---------------------------------------------------------------------------
// Catalog offsets
// ---------------------------------------------------------------------------

fn check_leg_list(legs: &[LegId]) -> Result<(), GaitError> {
    if legs.is_empty() {
        return Err(GaitError::NoLegs);
    }
    let mut seen = BTreeSet::new();
    for leg in legs {
        if !seen.insert(*leg) {
            return Err(GaitError::DuplicateLeg(leg.to_string()));
        }
    }
    Ok(())
}

fn require_legs(kind: PatternKind, legs: &[LegId], required: &[LegId]) -> Result<(), GaitError> {
    match required.iter().find(|leg| !legs.contains(leg)) {
        Some(missing) => Err(GaitError::MissingLeg {
            pattern: kind.name().into(),
            leg: missing.to_string(),
        }),
        None => Ok(()),
    }
}

fn has_exactly(legs: &[LegId], set: &[LegId]) -> bool {
    legs.len() == set.len() && set.iter().all(|leg| legs.contains(leg))
}

/// Tripod groups: {FR, ML, RR} lead, {FL, MR, RL} trail by half a cycle.
const fn tripod_offset(leg: LegId) -> f64 {
    match leg {
        LegId::FrontRight | LegId::MiddleLeft | LegId::RearRight => 0.0,
        _ => 0.5,
    }
}

/// Trot diagonals: {FR, RL} lead, {FL, RR} trail by half a cycle.
const fn trot_offset(leg: LegId) -> f64 {
    match leg {
        LegId::FrontRight | LegId::RearLeft => 0.0,
        _ => 0.5,
    }
}

#[allow(clippy::cast_precision_loss)]
fn ring_offsets(ring: &[LegId]) -> BTreeMap<LegId, f64> {
    let n = ring.len() as f64;
    ring.iter()
        .enumerate()
        .map(|(i, &leg)| (leg, i as f64 / n))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn reverse_ring_offsets(ring: &[LegId]) -> BTreeMap<LegId, f64> {
    let len = ring.len();
    let n = len as f64;
    ring.iter()
        .enumerate()
        .map(|(i, &leg)| (leg, ((len - i) % len) as f64 / n))
        .collect()
}

fn catalog_offsets(kind: PatternKind, legs: &[LegId]) -> Result<BTreeMap<LegId, f64>, GaitError> {
    let by = |f: fn(LegId) -> f64| -> BTreeMap<LegId, f64> {
        legs.iter().map(|&leg| (leg, f(leg))).collect()
    };
    let offsets = match kind {
        PatternKind::Tripod | PatternKind::FastTripod | PatternKind::DifferentialTripod => {
            require_legs(kind, legs, &LegId::HEXAPOD)?;
            by(tripod_offset)
        }
        PatternKind::QuadrupedTrot | PatternKind::DynamicTrot => {
            require_legs(kind, legs, &LegId::QUADRUPED)?;
            by(trot_offset)
        }
        PatternKind::Bound => {
            require_legs(kind, legs, &LegId::QUADRUPED)?;
            by(|leg| if leg.is_front() { 0.0 } else { 0.5 })
        }
        PatternKind::Gallop => {
            require_legs(kind, legs, &LegId::QUADRUPED)?;
            by(|leg| match leg {
                LegId::FrontLeft => 0.125,
                LegId::RearRight => 0.25,
                LegId::RearLeft => 0.375,
                _ => 0.0,
            })
        }
        PatternKind::Pronk => by(|_| 0.0),
        PatternKind::Wave
        | PatternKind::Ripple
        | PatternKind::DynamicWave
        | PatternKind::DifferentialWave => ring_offsets(legs),
        PatternKind::CrabWalk | PatternKind::PivotTurn => {
            if has_exactly(legs, &LegId::HEXAPOD) {
                by(tripod_offset)
            } else if has_exactly(legs, &LegId::QUADRUPED) {
                by(trot_offset)
            } else {
                legs.iter()
                    .enumerate()
                    .map(|(i, &leg)| (leg, if i % 2 == 0 { 0.0 } else { 0.5 }))
                    .collect()
            }
        }
    };
    Ok(offsets)
}
