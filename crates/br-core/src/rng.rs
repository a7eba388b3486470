//! Deterministic RNG wrapper.
//!
//! # Determinism strategy
//!
//! A run owns exactly one root `SimRng` seeded from [`RunConfig::seed`].
//! Every random decision of the search (initial bits, tournaments, crossover
//! points, mutations) draws from it in a fixed order.  Candidate evaluations
//! do **not** draw from the root directly: before a batch of evaluations
//! starts, one child RNG per candidate is derived from the root with
//! [`SimRng::child`].  The children are then consumed independently, so a
//! batch evaluated on many threads yields exactly the same objectives as the
//! same batch evaluated sequentially.
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space.
//!
//! [`RunConfig::seed`]: crate::RunConfig::seed

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Run-level RNG for search operators and Monte-Carlo sampling.
///
/// Not `Sync`: if you need parallel randomness, give each worker its own
/// `SimRng` derived with [`child`](Self::child).
#[derive(Debug, Clone)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    ///
    /// Advances `self` by one `u64` draw.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
