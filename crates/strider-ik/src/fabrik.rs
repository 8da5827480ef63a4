//! FABRIK (Forward And Backward Reaching Inverse Kinematics) solver.
//!
//! Positional IK over a [`Chain`]: alternately pins the tip to the target and
//! walks inward, then pins the root back to the origin and walks outward.
//! Only joint directions are mutated. Joint limits carried by
//! [`JointKind`](crate::JointKind) are not enforced.

use std::iter;

use strider_core::FabrikConfig;
use strider_math::Vector3;
use tracing::trace;

use crate::chain::Chain;
use crate::joint::Joint;

/// Outcome of one [`FabrikSolver::solve`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Backward/forward rounds executed.
    pub iterations: u32,
    /// Distance from the final end effector to the target.
    pub residual: f64,
    /// Whether the target was within the chain's reach.
    pub reachable: bool,
}

impl SolveReport {
    /// True if the end effector ended within `tolerance` of the target.
    pub fn converged(&self, tolerance: f64) -> bool {
        self.residual < tolerance
    }
}

/// FABRIK solver with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct FabrikSolver {
    config: FabrikConfig,
}

impl FabrikSolver {
    pub const fn new(config: FabrikConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FabrikConfig::default())
    }

    pub const fn config(&self) -> &FabrikConfig {
        &self.config
    }

    /// Move the chain's end effector towards `target`.
    ///
    /// 1. Target beyond reach: every joint points from the origin towards the
    ///    target, 0 iterations.
    /// 2. End effector already within tolerance: no change, 0 iterations.
    /// 3. Otherwise backward/forward rounds until the residual drops below
    ///    `tolerance`, improves by less than `min_travel`, or
    ///    `max_iterations` rounds have run.
    ///
    /// Never fails. Non-convergence shows up as a residual at or above the
    /// tolerance.
    pub fn solve(&self, chain: &mut Chain, target: Vector3) -> SolveReport {
        let origin = chain.origin();
        let states = chain.chain_state();
        if states.is_empty() {
            return SolveReport {
                iterations: 0,
                residual: origin.distance(target),
                reachable: false,
            };
        }

        let lengths: Vec<f64> = states.iter().map(|s| s.length).collect();
        let mut directions: Vec<Vector3> = chain
            .joints()
            .take(lengths.len())
            .map(Joint::direction)
            .collect();

        let reach = chain.reach();
        if origin.distance(target) > reach {
            let direction = target.sub(origin).normalize_or(directions[0]);
            let joint_count = chain.joints().count();
            chain.set_directions(&vec![direction; joint_count]);
            let residual = chain.end_effector().distance(target);
            trace!(reach, residual, "fabrik: target out of reach");
            return SolveReport {
                iterations: 0,
                residual,
                reachable: false,
            };
        }

        let mut positions: Vec<Vector3> = iter::once(origin)
            .chain(states.iter().map(|s| s.end))
            .collect();
        let tip = lengths.len();

        let mut previous = positions[tip].distance(target);
        if previous < self.config.tolerance {
            return SolveReport {
                iterations: 0,
                residual: previous,
                reachable: true,
            };
        }

        let mut iterations = 0;
        let residual = loop {
            // Backward: tip pinned to the target.
            positions[tip] = target;
            for i in (0..tip).rev() {
                let d = positions[i]
                    .sub(positions[i + 1])
                    .normalize_or(directions[i].negate());
                positions[i] = positions[i + 1].add(d.scale(lengths[i]));
            }

            // Forward: root pinned to the origin.
            positions[0] = origin;
            for i in 0..tip {
                let d = positions[i + 1]
                    .sub(positions[i])
                    .normalize_or(directions[i]);
                directions[i] = d;
                positions[i + 1] = positions[i].add(d.scale(lengths[i]));
            }

            iterations += 1;
            let current = positions[tip].distance(target);
            if current < self.config.tolerance
                || (current - previous).abs() < self.config.min_travel
                || iterations >= self.config.max_iterations
            {
                break current;
            }
            previous = current;
        };

        chain.set_directions(&directions);
        trace!(iterations, residual, "fabrik: solved");
        SolveReport {
            iterations,
            residual,
            reachable: true,
        }
    }
}
