//! The `Search` struct and its generation loop.

use tracing::{debug, info};

use br_core::{RunConfig, SimRng};
use br_eval::ObjectiveFunction;

use crate::operators::{crossover, mutate, select_parents};
use crate::population::{Candidate, Population};
use crate::sort::rank_and_crowd;
use crate::{SearchObserver, SearchResult};

// ── SearchParams ──────────────────────────────────────────────────────────────

/// The slice of [`RunConfig`] the engine needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchParams {
    pub ini_num_population:    usize,
    pub search_num_population: usize,
    pub num_generation:        usize,
    pub mutation_rate:         f64,
    pub crossover_rate:        f64,
}

impl From<&RunConfig> for SearchParams {
    fn from(c: &RunConfig) -> Self {
        Self {
            ini_num_population:    c.ini_num_population,
            search_num_population: c.search_num_population,
            num_generation:        c.num_generation,
            mutation_rate:         c.mutation_rate,
            crossover_rate:        c.crossover_rate,
        }
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// NSGA-II over retrofit decision vectors.
///
/// # Generation step
///
/// 1. Rank the population (fast non-dominated sort + crowding distance).
/// 2. Produce `search_num_population` offspring: binary-tournament parents,
///    single-point crossover with probability `crossover_rate` (otherwise a
///    copy of the first parent), one-bit mutation with probability
///    `mutation_rate`.
/// 3. Evaluate the offspring (in parallel with the `parallel` feature).
/// 4. Merge, re-rank and truncate to `search_num_population`.
///
/// Every random choice draws from one root [`SimRng`] in a fixed order.
/// Before a batch is evaluated, one child RNG per candidate is split off the
/// root, so the batch's results do not depend on evaluation order.
///
/// Create via [`SearchBuilder`][crate::SearchBuilder].
pub struct Search<F: ObjectiveFunction> {
    pub params: SearchParams,

    /// Fitness function.  Called once per new candidate.
    pub objective: F,

    /// Root RNG for search operators and evaluation-RNG derivation.
    pub rng: SimRng,

    /// Current population, ranked after every completed generation.
    pub population: Population,

    /// Generations completed so far.
    pub generation: usize,
}

impl<F: ObjectiveFunction> Search<F> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Initialise (if needed) and run every remaining generation.
    ///
    /// Calls observer hooks at every generation boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SearchObserver>(&mut self, observer: &mut O) -> SearchResult<&Population> {
        self.ensure_initialized()?;
        while self.generation < self.params.num_generation {
            self.step(observer)?;
        }
        observer.on_search_end(&self.population);
        Ok(&self.population)
    }

    /// Random initial population of `ini_num_population` evaluated
    /// candidates.
    pub fn initialize(&mut self) -> SearchResult<()> {
        let dimension = self.objective.dimension();
        let mut candidates: Vec<Candidate> = (0..self.params.ini_num_population)
            .map(|_| Candidate::random(dimension, &mut self.rng))
            .collect();
        self.evaluate_batch(&mut candidates)?;
        rank_and_crowd(&mut candidates);
        self.population = Population::new(candidates);
        info!(
            population = self.population.len(),
            front0 = self.population.front_len(),
            "initial population evaluated"
        );
        Ok(())
    }

    /// Build the random initial population when there is none, or evaluate a
    /// seeded one that has not been scored yet.
    pub fn ensure_initialized(&mut self) -> SearchResult<()> {
        if self.population.is_empty() {
            return self.initialize();
        }
        if self.population.iter().any(|c| !c.is_evaluated()) {
            let mut candidates = std::mem::take(&mut self.population.candidates);
            self.evaluate_batch(&mut candidates)?;
            rank_and_crowd(&mut candidates);
            self.population = Population::new(candidates);
        }
        Ok(())
    }

    /// Run exactly one generation, initialising first if the population is
    /// still empty.
    pub fn step<O: SearchObserver>(&mut self, observer: &mut O) -> SearchResult<()> {
        self.ensure_initialized()?;
        let generation = self.generation;
        observer.on_generation_start(generation);

        rank_and_crowd(&mut self.population.candidates);

        let mut offspring = self.make_offspring();
        self.evaluate_batch(&mut offspring)?;

        let merged = &mut self.population.candidates;
        merged.extend(offspring);
        rank_and_crowd(merged);
        merged.truncate(self.params.search_num_population);

        self.generation += 1;
        self.log_generation(generation);
        observer.on_generation_end(generation, &self.population);
        Ok(())
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn into_population(self) -> Population {
        self.population
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn make_offspring(&mut self) -> Vec<Candidate> {
        let parents = &self.population.candidates;
        let rng = &mut self.rng;
        (0..self.params.search_num_population)
            .map(|_| {
                let (a, b) = select_parents(parents, rng);
                let mut child = if rng.gen_bool(self.params.crossover_rate) {
                    crossover(&parents[a].decision, &parents[b].decision, rng)
                } else {
                    parents[a].decision.clone()
                };
                if rng.gen_bool(self.params.mutation_rate) {
                    mutate(&mut child, rng);
                }
                Candidate::new(child)
            })
            .collect()
    }

    /// Evaluate every candidate that has no objectives yet.
    pub(crate) fn evaluate_batch(&mut self, candidates: &mut [Candidate]) -> SearchResult<()> {
        // Child RNGs are derived sequentially, in candidate order, before any
        // evaluation runs.
        let pending: Vec<(&mut Candidate, SimRng)> = candidates
            .iter_mut()
            .filter(|c| !c.is_evaluated())
            .enumerate()
            .map(|(i, c)| (c, self.rng.child(i as u64)))
            .collect();
        debug!(count = pending.len(), "evaluating candidates");

        let objective = &self.objective;

        #[cfg(not(feature = "parallel"))]
        {
            for (candidate, mut rng) in pending {
                candidate.objectives = Some(objective.evaluate(&candidate.decision, &mut rng)?);
            }
            Ok(())
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            pending.into_par_iter().try_for_each(|(candidate, mut rng)| -> SearchResult<()> {
                candidate.objectives = Some(objective.evaluate(&candidate.decision, &mut rng)?);
                Ok(())
            })
        }
    }

    fn log_generation(&self, generation: usize) {
        let stats = self.population.stats();
        info!(
            generation,
            population = self.population.len(),
            front0 = self.population.front_len(),
            min_cost = stats.min_cost,
            best_average_eipw = stats.best_average_eipw,
            min_difference_eipw = stats.min_difference_eipw,
            "generation complete"
        );
    }
}
