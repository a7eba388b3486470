//! Monte-Carlo estimate of the expected number of independent pathways.
//!
//! # Trial loop
//!
//! ```text
//! for trial in 0..num_scenarios:
//!     scenario  = Scenario::resample(decision, probabilities, rng)
//!     usable    = scenario.fill_usability(network)
//!     total    += solver.max_flow(network, source, target, usable)?
//! return total / num_scenarios
//! ```
//!
//! The scenario and mask buffers are reused across trials.  A solver error
//! aborts the whole estimate; a failed solve is never counted as zero.

use tracing::warn;

use br_core::{NodeId, RunConfig, SimRng};
use br_flow::{FlowError, FlowSolver};
use br_network::BridgeNetwork;

use crate::scenario::{FailureProbabilities, Scenario};
use crate::{EvalError, EvalResult};

/// Expected-IPW estimator for one network, damage state and solver.
pub struct ReliabilityEvaluator<'a, S: FlowSolver> {
    network:       &'a BridgeNetwork,
    solver:        S,
    probabilities: Vec<FailureProbabilities>,
    num_scenarios: usize,
}

impl<'a, S: FlowSolver> ReliabilityEvaluator<'a, S> {
    /// Resolve every bridge's failure probabilities for
    /// `config.damage_state`.
    ///
    /// Returns [`EvalError::MissingFragility`] when a bridge lacks either
    /// probability for that damage state, and [`EvalError::DegenerateInput`]
    /// when `config.num_scenarios` is zero.
    pub fn new(network: &'a BridgeNetwork, solver: S, config: &RunConfig) -> EvalResult<Self> {
        if config.num_scenarios == 0 {
            return Err(EvalError::DegenerateInput("num_scenarios must be at least 1".into()));
        }
        let probabilities = FailureProbabilities::resolve(network, &config.damage_state)?;
        Ok(Self { network, solver, probabilities, num_scenarios: config.num_scenarios })
    }

    pub fn network(&self) -> &'a BridgeNetwork {
        self.network
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn num_scenarios(&self) -> usize {
        self.num_scenarios
    }

    pub fn probabilities(&self) -> &[FailureProbabilities] {
        &self.probabilities
    }

    /// Check that `decision` has one bit per undirected bridge.
    pub fn check_decision(&self, decision: &[bool]) -> EvalResult<()> {
        if decision.len() != self.network.bridge_count() {
            return Err(EvalError::DecisionLength {
                expected: self.network.bridge_count(),
                got:      decision.len(),
            });
        }
        Ok(())
    }

    /// Mean max-flow from `source` to `target` over `num_scenarios` freshly
    /// sampled scenarios.
    ///
    /// Draws exactly `num_scenarios × bridge_count` uniforms from `rng`.
    pub fn expected_ipw(
        &self,
        decision: &[bool],
        source:   NodeId,
        target:   NodeId,
        rng:      &mut SimRng,
    ) -> EvalResult<f64> {
        self.check_decision(decision)?;

        let mut scenario = Scenario::default();
        let mut usable = Vec::with_capacity(self.network.arc_count());
        let mut total = 0.0;

        for trial in 0..self.num_scenarios {
            scenario.resample(decision, &self.probabilities, rng);
            scenario.fill_usability(self.network, &mut usable);

            match self.solver.max_flow(self.network, source, target, &usable) {
                Ok(flow) => total += flow,
                Err(source_err @ FlowError::NonOptimal { .. }) => {
                    warn!(
                        scenario = trial,
                        source = %self.network.label(source),
                        target = %self.network.label(target),
                        failed_bridges = scenario.failed_count(),
                        error = %source_err,
                        "flow solve did not reach optimality"
                    );
                    return Err(EvalError::SolverNonOptimal { scenario: trial, source: source_err });
                }
                Err(other) => return Err(other.into()),
            }
        }

        Ok(total / self.num_scenarios as f64)
    }
}
