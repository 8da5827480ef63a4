//! Catalog-level gait properties checked through the public API.

use approx::assert_relative_eq;
use strider_core::{GaitError, PatternParams};
use strider_gait::stability::{has_aerial_phase, min_stance_legs, stance_legs};
use strider_gait::{GaitPattern, LegId, LegPhase, PatternKind, PhaseSource};

fn create(name: &str, legs: &[LegId]) -> GaitPattern {
    GaitPattern::from_name(name, legs, &PatternParams::default()).unwrap()
}

#[test]
fn tripod_offsets_and_phases() {
    let tripod = create("tripod", &LegId::HEXAPOD);
    for leg in [LegId::FrontRight, LegId::MiddleLeft, LegId::RearRight] {
        assert_eq!(tripod.leg_phase_offset(leg).unwrap(), 0.0);
    }
    for leg in [LegId::FrontLeft, LegId::MiddleRight, LegId::RearLeft] {
        assert_eq!(tripod.leg_phase_offset(leg).unwrap(), 0.5);
    }
    assert_eq!(
        tripod.calculate_leg_phase(LegId::FrontRight, 0.0).unwrap(),
        LegPhase {
            local_phase: 0.0,
            is_stance: true
        }
    );
    assert_eq!(
        tripod.calculate_leg_phase(LegId::FrontLeft, 0.0).unwrap(),
        LegPhase {
            local_phase: 0.5,
            is_stance: false
        }
    );
}

#[test]
fn wave_on_six_legs_keeps_five_down() {
    let wave = create("wave", &LegId::HEXAPOD);
    assert_relative_eq!(wave.duty_factor(), 5.0 / 6.0);
    for i in 0..1000 {
        let phase = f64::from(i) / 1000.0;
        assert!(stance_legs(&wave, phase).len() >= 5, "phase {phase}");
    }
    assert_eq!(min_stance_legs(&wave), 5);
}

#[test]
fn pronk_is_synchronous_with_aerial_phase() {
    for legs in [&LegId::HEXAPOD[..], &LegId::QUADRUPED[..]] {
        let pronk = create("pronk", legs);
        for &leg in legs {
            assert_eq!(pronk.leg_phase_offset(leg).unwrap(), 0.0);
        }
        assert_eq!(min_stance_legs(&pronk), 0);
        assert!(has_aerial_phase(&pronk));
    }
}

#[test]
fn gallop_offsets_are_sequential() {
    let gallop = create("gallop", &LegId::QUADRUPED);
    let expected = [
        (LegId::FrontRight, 0.0),
        (LegId::FrontLeft, 0.125),
        (LegId::RearRight, 0.25),
        (LegId::RearLeft, 0.375),
    ];
    for (leg, offset) in expected {
        assert_eq!(gallop.leg_phase_offset(leg).unwrap(), offset);
    }
    assert_relative_eq!(gallop.duty_factor(), 0.25);
}

#[test]
fn trot_family_keeps_a_pair_down() {
    for name in ["quadruped_trot", "dynamic_trot"] {
        let trot = create(name, &LegId::QUADRUPED);
        assert!(min_stance_legs(&trot) >= 2, "{name}");
    }
}

#[test]
fn differential_tripod_step_lengths() {
    let pattern = create("differential_tripod", &LegId::HEXAPOD);
    let base = 0.08;
    for &leg in &LegId::HEXAPOD {
        assert_eq!(pattern.differential_step_length(leg, base, 0.0), base);
    }
    for turn_rate in [0.3, -0.3, 1.0, -1.0, 50.0, -50.0] {
        for &leg in &LegId::HEXAPOD {
            let length = pattern.differential_step_length(leg, base, turn_rate);
            let inside = (turn_rate > 0.0) == leg.is_left();
            if inside {
                assert!(length < base);
            } else {
                assert!(length > base);
            }
            assert!((0.1 * base..=2.0 * base).contains(&length));
        }
    }
}

#[test]
fn dynamic_patterns_are_flagged() {
    let dynamic: Vec<PatternKind> = PatternKind::ALL
        .into_iter()
        .filter(|kind| kind.requires_dynamic_stability())
        .collect();
    assert_eq!(
        dynamic,
        vec![
            PatternKind::DynamicTrot,
            PatternKind::Bound,
            PatternKind::Gallop,
            PatternKind::Pronk
        ]
    );
}

#[test]
fn every_pattern_builds_where_suitable() {
    let params = PatternParams::default();
    for kind in PatternKind::ALL {
        for legs in [&LegId::HEXAPOD[..], &LegId::QUADRUPED[..]] {
            let result = GaitPattern::create(kind, legs, &params);
            if kind.is_suitable_for_legs(legs.len()) {
                let pattern = result.unwrap();
                let duty = pattern.duty_factor();
                assert!(duty > 0.0 && duty <= 1.0);
                assert_eq!(pattern.legs(), legs);
            } else {
                assert!(matches!(result, Err(GaitError::UnsuitableLegCount { .. })));
            }
        }
    }
}

#[test]
fn unknown_names_are_rejected() {
    let err = GaitPattern::from_name("canter", &LegId::QUADRUPED, &PatternParams::default())
        .unwrap_err();
    assert_eq!(err, GaitError::UnknownPattern("canter".into()));
}
