//! Blended switch between two gait patterns.
//!
//! Duty factor and every leg's phase offset move linearly from the source
//! pattern to the target pattern as the blend progresses, so local phases
//! and therefore foot targets never jump.

use std::collections::BTreeMap;

use strider_core::GaitError;

use crate::leg::LegId;
use crate::pattern::{GaitPattern, PhaseSource};

/// An in-progress blend from one pattern to another.
#[derive(Debug, Clone, PartialEq)]
pub struct GaitTransition {
    from: GaitPattern,
    to: GaitPattern,
    progress: f64,
    duration: f64,
}

impl GaitTransition {
    /// Start a blend lasting `duration` seconds.
    ///
    /// A non-positive duration yields an already-complete transition.
    ///
    /// # Errors
    ///
    /// [`GaitError::UnknownLeg`] if the two patterns do not drive the same
    /// legs.
    pub fn new(from: GaitPattern, to: GaitPattern, duration: f64) -> Result<Self, GaitError> {
        for leg in from.legs() {
            to.leg_phase_offset(*leg)?;
        }
        for leg in to.legs() {
            from.leg_phase_offset(*leg)?;
        }
        let progress = if duration > 0.0 { 0.0 } else { 1.0 };
        Ok(Self {
            from,
            to,
            progress,
            duration,
        })
    }

    /// Advance the blend by `dt` seconds. Returns true once complete.
    pub fn advance(&mut self, dt: f64) -> bool {
        if self.duration > 0.0 && dt > 0.0 {
            self.progress = (self.progress + dt / self.duration).min(1.0);
        }
        self.is_complete()
    }

    /// Blend progress in `[0, 1]`.
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    pub const fn from(&self) -> &GaitPattern {
        &self.from
    }

    pub const fn to(&self) -> &GaitPattern {
        &self.to
    }

    pub fn into_target(self) -> GaitPattern {
        self.to
    }

    /// Freeze the current blend into a pattern.
    ///
    /// The result carries the target's kind and step behavior with the
    /// blended duty factor and offsets. Used to retarget a transition
    /// mid-blend without a jump.
    #[must_use]
    pub fn snapshot(&self) -> GaitPattern {
        let offsets: BTreeMap<LegId, f64> = self
            .to
            .legs()
            .iter()
            .filter_map(|&leg| self.leg_phase_offset(leg).ok().map(|o| (leg, o)))
            .collect();
        GaitPattern::from_parts(
            self.to.kind(),
            self.duty_factor(),
            offsets,
            self.to.legs().to_vec(),
            self.to.behavior(),
            self.to.is_ring_reversed(),
        )
    }

    fn blend(&self, from: f64, to: f64) -> f64 {
        from + (to - from) * self.progress
    }
}

impl PhaseSource for GaitTransition {
    fn legs(&self) -> &[LegId] {
        self.to.legs()
    }

    fn duty_factor(&self) -> f64 {
        self.blend(self.from.duty_factor(), self.to.duty_factor())
    }

    fn leg_phase_offset(&self, leg: LegId) -> Result<f64, GaitError> {
        let from = self.from.leg_phase_offset(leg)?;
        let to = self.to.leg_phase_offset(leg)?;
        Ok(self.blend(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternKind;
    use approx::assert_relative_eq;
    use strider_core::PatternParams;

    fn hexapod(kind: PatternKind) -> GaitPattern {
        GaitPattern::create(kind, &LegId::HEXAPOD, &PatternParams::default()).unwrap()
    }

    #[test]
    fn blends_duty_and_offsets_linearly() {
        let mut t = GaitTransition::new(
            hexapod(PatternKind::Tripod),
            hexapod(PatternKind::Wave),
            1.0,
        )
        .unwrap();
        assert_relative_eq!(t.duty_factor(), 0.5);
        assert!(!t.advance(0.5));
        assert_relative_eq!(t.progress(), 0.5);
        assert_relative_eq!(t.duty_factor(), 0.5 + 0.5 * (5.0 / 6.0 - 0.5));
        // Front left: tripod 0.5, wave 5/6.
        assert_relative_eq!(
            t.leg_phase_offset(LegId::FrontLeft).unwrap(),
            0.5 + 0.5 * (5.0 / 6.0 - 0.5),
            epsilon = 1e-12
        );
        assert!(t.advance(0.75));
        assert_relative_eq!(t.progress(), 1.0);
        assert_relative_eq!(t.duty_factor(), 5.0 / 6.0);
    }

    #[test]
    fn snapshot_freezes_blend() {
        let mut t = GaitTransition::new(
            hexapod(PatternKind::Tripod),
            hexapod(PatternKind::Ripple),
            2.0,
        )
        .unwrap();
        t.advance(0.5);
        let frozen = t.snapshot();
        assert_eq!(frozen.kind(), PatternKind::Ripple);
        assert_relative_eq!(frozen.duty_factor(), t.duty_factor());
        for &leg in &LegId::HEXAPOD {
            let a = t.calculate_leg_phase(leg, 0.3).unwrap();
            let b = frozen.calculate_leg_phase(leg, 0.3).unwrap();
            assert_relative_eq!(a.local_phase, b.local_phase, epsilon = 1e-12);
            assert_eq!(a.is_stance, b.is_stance);
        }
    }

    #[test]
    fn local_phase_is_continuous_through_blend() {
        let mut t = GaitTransition::new(
            hexapod(PatternKind::Tripod),
            hexapod(PatternKind::Wave),
            0.5,
        )
        .unwrap();
        let mut previous = t.leg_phase_offset(LegId::MiddleRight).unwrap();
        while !t.advance(0.01) {
            let current = t.leg_phase_offset(LegId::MiddleRight).unwrap();
            assert!((current - previous).abs() < 0.02);
            previous = current;
        }
    }

    #[test]
    fn rejects_mismatched_leg_sets() {
        let quad = GaitPattern::create(
            PatternKind::CrabWalk,
            &LegId::QUADRUPED,
            &PatternParams::default(),
        )
        .unwrap();
        let err = GaitTransition::new(hexapod(PatternKind::CrabWalk), quad, 1.0).unwrap_err();
        assert!(matches!(err, GaitError::UnknownLeg(_)));
    }

    #[test]
    fn zero_duration_is_complete() {
        let mut t = GaitTransition::new(
            hexapod(PatternKind::Tripod),
            hexapod(PatternKind::FastTripod),
            0.0,
        )
        .unwrap();
        assert!(t.is_complete());
        assert!(t.advance(0.0));
        assert_eq!(t.into_target().kind(), PatternKind::FastTripod);
    }
}
