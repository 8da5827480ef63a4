//! Shared test fixtures and utilities for strider crates.
//!
//! Provides deterministic RNG setup, leg chain builders and ready-made
//! hexapod and quadruped layouts.

pub mod fixtures;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use fixtures::{
    HIP_OFFSET, NEUTRAL_REACH, hexapod_generator, hexapod_legs, leg_chain, leg_setup,
    quadruped_generator, quadruped_legs, side_leg_chain,
};
pub use rng::{random_chain, random_unit_vector, seeded_rng};
