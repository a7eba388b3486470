//! Run configuration.
//!
//! One immutable `RunConfig` is built at startup and passed by reference to
//! the evaluator and the search engine.  Nothing reads these values from
//! globals.

use crate::{BrError, BrResult};

/// Top-level configuration of one planning run.
///
/// `RunConfig::default()` is the reference configuration:
///
/// | Field                    | Default |
/// |--------------------------|---------|
/// | `seed`                   | 100     |
/// | `num_scenarios`          | 100     |
/// | `ini_num_population`     | 50      |
/// | `search_num_population`  | 20      |
/// | `num_generation`         | 30      |
/// | `mutation_rate`          | 0.1     |
/// | `crossover_rate`         | 1.0     |
/// | `damage_state`           | `"E"`   |
/// | `solver_time_limit_secs` | 60      |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Monte-Carlo trials per expected-IPW estimate.
    pub num_scenarios: usize,

    /// Size of the randomly generated initial population.
    pub ini_num_population: usize,

    /// Offspring per generation, and the size the population is truncated
    /// back to after every generation.
    pub search_num_population: usize,

    /// Number of generations to run.  There is no other stopping rule.
    pub num_generation: usize,

    /// Probability that an offspring receives a single-bit mutation.
    pub mutation_rate: f64,

    /// Probability that an offspring is produced by crossover rather than
    /// copied from its first parent.
    pub crossover_rate: f64,

    /// Damage state whose fragility values drive bridge failure sampling.
    pub damage_state: String,

    /// Wall-clock limit for a single max-flow solve.
    pub solver_time_limit_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed:                   100,
            num_scenarios:          100,
            ini_num_population:     50,
            search_num_population:  20,
            num_generation:         30,
            mutation_rate:          0.1,
            crossover_rate:         1.0,
            damage_state:           "E".to_owned(),
            solver_time_limit_secs: 60,
        }
    }
}

impl RunConfig {
    /// Reject values the evaluator or search engine cannot run with.
    pub fn validate(&self) -> BrResult<()> {
        if self.num_scenarios == 0 {
            return Err(BrError::Config("num_scenarios must be at least 1".into()));
        }
        if self.ini_num_population == 0 {
            return Err(BrError::Config("ini_num_population must be at least 1".into()));
        }
        if self.search_num_population == 0 {
            return Err(BrError::Config("search_num_population must be at least 1".into()));
        }
        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(BrError::Config(format!("{name} must lie in [0, 1], got {rate}")));
            }
        }
        if self.damage_state.trim().is_empty() {
            return Err(BrError::Config("damage_state must not be empty".into()));
        }
        Ok(())
    }

    /// Per-solve time limit as a `Duration`.
    pub fn solver_time_limit(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.solver_time_limit_secs)
    }
}
