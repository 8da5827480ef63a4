//! Deterministic RNG utilities for reproducible tests.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use strider_ik::{Chain, Joint, Link};
use strider_math::Vector3;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniformly distributed unit vector.
pub fn random_unit_vector(rng: &mut impl Rng) -> Vector3 {
    loop {
        let v = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let length = v.length();
        if length > 0.1 && length <= 1.0 {
            return v.scale(1.0 / length);
        }
    }
}

/// Chain of `links` revolute segments with random lengths in
/// `[0.05, 0.5)` and random initial directions, rooted at `origin`.
pub fn random_chain(rng: &mut impl Rng, origin: Vector3, links: usize) -> Chain {
    let segments: Vec<(Joint, Link)> = (0..links)
        .map(|_| {
            let joint = Joint::revolute(random_unit_vector(rng))
                .and_then(|j| j.with_direction(random_unit_vector(rng)))
                .expect("unit vectors are never degenerate");
            let link = Link::new(rng.gen_range(0.05..0.5)).expect("length is positive");
            (joint, link)
        })
        .collect();
    Chain::from_segments("random", origin, segments)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
