//! Static stability analysis.
//!
//! Counts stance legs for any [`PhaseSource`], finds the worst case over a
//! whole cycle, and measures how far the body center sits inside the support
//! polygon formed by the stance feet.

use strider_math::Vector3;

use crate::leg::LegId;
use crate::pattern::{PhaseSource, wrap_phase};

/// Legs in stance at `global_phase`, in ring order.
pub fn stance_legs<P: PhaseSource + ?Sized>(source: &P, global_phase: f64) -> Vec<LegId> {
    source
        .legs()
        .iter()
        .copied()
        .filter(|&leg| is_in_stance(source, leg, global_phase))
        .collect()
}

/// True iff at least `min_required` legs are in stance at `global_phase`.
pub fn is_stable<P: PhaseSource + ?Sized>(
    source: &P,
    global_phase: f64,
    min_required: usize,
) -> bool {
    stance_count(source, global_phase) >= min_required
}

/// Worst-case number of legs simultaneously in stance over one cycle.
///
/// The stance set only changes where some leg touches down (global phase
/// `-offset`) or lifts off (`duty - offset`). Sampling once between each pair
/// of neighbouring events covers every distinct stance set exactly.
pub fn min_stance_legs<P: PhaseSource + ?Sized>(source: &P) -> usize {
    let duty = source.duty_factor();
    let mut events: Vec<f64> = source
        .legs()
        .iter()
        .filter_map(|&leg| source.leg_phase_offset(leg).ok())
        .flat_map(|offset| [wrap_phase(-offset), wrap_phase(duty - offset)])
        .collect();
    if events.is_empty() {
        return 0;
    }
    events.sort_by(f64::total_cmp);
    events.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

    let first = events[0];
    let mut samples: Vec<f64> = events
        .windows(2)
        .map(|pair| 0.5 * (pair[0] + pair[1]))
        .collect();
    let last = events[events.len() - 1];
    samples.push(wrap_phase(0.5 * (last + first + 1.0)));

    samples
        .into_iter()
        .map(|phase| stance_count(source, phase))
        .min()
        .unwrap_or(0)
}

/// True iff some instant of the cycle has no leg on the ground.
pub fn has_aerial_phase<P: PhaseSource + ?Sized>(source: &P) -> bool {
    min_stance_legs(source) == 0
}

fn stance_count<P: PhaseSource + ?Sized>(source: &P, global_phase: f64) -> usize {
    source
        .legs()
        .iter()
        .filter(|&&leg| is_in_stance(source, leg, global_phase))
        .count()
}

fn is_in_stance<P: PhaseSource + ?Sized>(source: &P, leg: LegId, global_phase: f64) -> bool {
    source
        .calculate_leg_phase(leg, global_phase)
        .is_ok_and(|phase| phase.is_stance)
}

// ---------------------------------------------------------------------------
// Support polygon
// ---------------------------------------------------------------------------

/// Convex hull of foot positions projected onto the ground plane.
///
/// Returned counter-clockwise with `z = 0`, without repeated or collinear
/// points. Fewer than three distinct feet yield the distinct points.
pub fn support_polygon(feet: &[Vector3]) -> Vec<Vector3> {
    let mut points: Vec<Vector3> = feet.iter().map(|p| p.horizontal()).collect();
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup_by(|a, b| a.distance(*b) < 1e-12);
    if points.len() < 3 {
        return points;
    }

    // Andrew's monotone chain.
    let mut hull: Vec<Vector3> = Vec::with_capacity(points.len() * 2);
    for &p in &points {
        while hull.len() >= 2 && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Signed distance from the body center's ground projection to the nearest
/// edge of the support polygon.
///
/// Inside the polygon this is the distance to the closest edge line; outside
/// it is minus the distance to the polygon boundary. `0.0` when fewer than
/// three stance feet span an area.
pub fn stability_margin(feet: &[Vector3]) -> f64 {
    stability_margin_about(feet, Vector3::ZERO)
}

/// [`stability_margin`] measured from an arbitrary ground point.
pub fn stability_margin_about(feet: &[Vector3], point: Vector3) -> f64 {
    let hull = support_polygon(feet);
    if hull.len() < 3 {
        return 0.0;
    }
    let p = point.horizontal();
    let edges = || hull.iter().copied().zip(hull.iter().copied().cycle().skip(1));
    if edges().all(|(a, b)| turn(a, b, p) >= 0.0) {
        edges()
            .map(|(a, b)| turn(a, b, p) / b.distance(a))
            .fold(f64::INFINITY, f64::min)
    } else {
        -edges()
            .map(|(a, b)| segment_distance(a, b, p))
            .fold(f64::INFINITY, f64::min)
    }
}

fn segment_distance(a: Vector3, b: Vector3, p: Vector3) -> f64 {
    let edge = b.sub(a);
    let t = (p.sub(a).dot(edge) / edge.length_squared()).clamp(0.0, 1.0);
    p.distance(a.add(edge.scale(t)))
}

/// Z component of `(b - a) x (c - a)`; positive when `c` is left of `a -> b`.
fn turn(a: Vector3, b: Vector3, c: Vector3) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

// ---------------------------------------------------------------------------
// StabilityReport
// ---------------------------------------------------------------------------

/// Cycle-level stability summary of a phase source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityReport {
    pub min_stance_legs: usize,
    pub has_aerial_phase: bool,
}

impl StabilityReport {
    pub fn analyze<P: PhaseSource + ?Sized>(source: &P) -> Self {
        let min_stance_legs = min_stance_legs(source);
        Self {
            min_stance_legs,
            has_aerial_phase: min_stance_legs == 0,
        }
    }

    /// True if the worst case keeps at least `threshold` feet down.
    pub const fn is_statically_stable(&self, threshold: usize) -> bool {
        self.min_stance_legs >= threshold
    }
}
