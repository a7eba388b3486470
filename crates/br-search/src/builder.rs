//! Fluent builder for constructing a [`Search`].

use br_core::{RunConfig, SimRng};
use br_eval::ObjectiveFunction;

use crate::engine::SearchParams;
use crate::population::{Candidate, Population};
use crate::{Search, SearchError, SearchResult};

/// Fluent builder for [`Search<F>`].
///
/// # Required inputs
///
/// - [`RunConfig`]: population sizes, generation count, rates, seed
/// - `F: ObjectiveFunction`: usually a [`br_eval::FitnessEvaluator`]
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                                 |
/// |---------------------------|-----------------------------------------|
/// | `.seed(s)`                | `config.seed`                           |
/// | `.initial_population(v)`  | `ini_num_population` random candidates  |
///
/// # Example
///
/// ```rust,ignore
/// let fitness = FitnessEvaluator::new(ReliabilityEvaluator::new(&net, solver, &config)?)?;
/// let mut search = SearchBuilder::new(&config, fitness).build()?;
/// let front = search.run(&mut NoopObserver)?;
/// ```
pub struct SearchBuilder<F: ObjectiveFunction> {
    params:    SearchParams,
    seed:      u64,
    objective: F,
    initial:   Option<Vec<Vec<bool>>>,
}

impl<F: ObjectiveFunction> SearchBuilder<F> {
    pub fn new(config: &RunConfig, objective: F) -> Self {
        Self {
            params: SearchParams::from(config),
            seed: config.seed,
            objective,
            initial: None,
        }
    }

    /// Override the root RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Start from the given decision vectors instead of random ones.
    ///
    /// They are evaluated on the first call to `run` or `step`.
    pub fn initial_population(mut self, decisions: Vec<Vec<bool>>) -> Self {
        self.initial = Some(decisions);
        self
    }

    /// Validate inputs and return a ready-to-run [`Search`].
    pub fn build(self) -> SearchResult<Search<F>> {
        let p = &self.params;
        if p.ini_num_population == 0 {
            return Err(SearchError::Config("ini_num_population must be at least 1".into()));
        }
        if p.search_num_population == 0 {
            return Err(SearchError::Config("search_num_population must be at least 1".into()));
        }
        for (name, rate) in [("mutation_rate", p.mutation_rate), ("crossover_rate", p.crossover_rate)] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SearchError::Config(format!("{name} must lie in [0, 1], got {rate}")));
            }
        }
        let dimension = self.objective.dimension();
        if dimension == 0 {
            return Err(SearchError::Config("network has no bridges to decide on".into()));
        }

        let mut search = Search {
            params:     self.params,
            objective:  self.objective,
            rng:        SimRng::new(self.seed),
            population: Population::default(),
            generation: 0,
        };

        if let Some(decisions) = self.initial {
            if let Some(bad) = decisions.iter().find(|d| d.len() != dimension) {
                return Err(SearchError::Config(format!(
                    "initial decision vector has {} bits, expected {dimension}",
                    bad.len()
                )));
            }
            if decisions.is_empty() {
                return Err(SearchError::Config("initial population is empty".into()));
            }
            search.population = Population::new(decisions.into_iter().map(Candidate::new).collect());
        }
        Ok(search)
    }
}
