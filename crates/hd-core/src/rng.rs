//! Deterministic per-user and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each simulated user gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (user_ordinal * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive ordinals uniformly across the seed space.
//! This means:
//!
//! - Users never share RNG state, so generation order does not matter and
//!   users can be generated on any thread.
//! - Growing the population does not disturb the draws of existing users.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── UserRng ───────────────────────────────────────────────────────────────────

/// Per-user deterministic RNG used for every trip, window and price draw of
/// one customer.
pub struct UserRng(SmallRng);

impl UserRng {
    /// Seed deterministically from the run's global seed and a user ordinal
    /// (the user's position in generation order).
    pub fn new(global_seed: u64, ordinal: u32) -> Self {
        let seed = global_seed ^ (ordinal as u64 + 1).wrapping_mul(MIXING_CONSTANT);
        UserRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand_distr` distribution
    /// types (`rng.inner().sample(normal)`).
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global draws (persona assignment).
///
/// Used only in single-threaded contexts.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
