//! Three-objective fitness of a retrofit plan.
//!
//! | Objective               | Definition                                          |
//! |-------------------------|-----------------------------------------------------|
//! | `cost`                  | Σ retrofit cost of bridges whose bit is set         |
//! | `neg_mean_connectivity` | −(mean expected IPW over resident × hospital pairs) |
//! | `fairness`              | √Σ_{i<j} (EIPW_i − EIPW_j)² over residents          |
//!
//! `EIPW_r` is the sum of resident `r`'s expected IPW over every hospital.
//! All three are minimised.

use tracing::debug;

use br_core::SimRng;
use br_flow::FlowSolver;
use br_network::BridgeNetwork;

use crate::reliability::ReliabilityEvaluator;
use crate::{EvalError, EvalResult};

// ── Objectives ────────────────────────────────────────────────────────────────

/// One candidate's objective triple.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Objectives {
    pub cost:                  f64,
    pub neg_mean_connectivity: f64,
    pub fairness:              f64,
}

impl Objectives {
    pub const COUNT: usize = 3;

    pub fn new(cost: f64, neg_mean_connectivity: f64, fairness: f64) -> Self {
        Self { cost, neg_mean_connectivity, fairness }
    }

    #[inline]
    pub fn as_array(&self) -> [f64; Self::COUNT] {
        [self.cost, self.neg_mean_connectivity, self.fairness]
    }

    /// Mean expected connectivity with the sign restored.
    #[inline]
    pub fn average_eipw(&self) -> f64 {
        -self.neg_mean_connectivity
    }

    /// Pareto dominance under minimisation: no objective worse and at
    /// least one strictly better.
    pub fn dominates(&self, other: &Objectives) -> bool {
        let a = self.as_array();
        let b = other.as_array();
        let mut strictly_better = false;
        for k in 0..Self::COUNT {
            if a[k] > b[k] {
                return false;
            }
            if a[k] < b[k] {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

// ── Evaluation ────────────────────────────────────────────────────────────────

/// Objectives together with the per-pair expected IPW they were built from.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub objectives: Objectives,
    /// Row-major `residents × hospitals`.
    pub pair_ipw:   Vec<f64>,
    pub residents:  usize,
    pub hospitals:  usize,
}

impl Evaluation {
    #[inline]
    pub fn pair(&self, resident: usize, hospital: usize) -> f64 {
        self.pair_ipw[resident * self.hospitals + hospital]
    }

    /// `EIPW_r`: each resident's expected IPW summed over hospitals.
    pub fn resident_totals(&self) -> Vec<f64> {
        self.pair_ipw.chunks(self.hospitals).map(|row| row.iter().sum()).collect()
    }
}

/// √ of the summed squared differences over unordered distinct pairs.
pub fn dispersion(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    for i in 0..values.len() {
        for j in (i + 1)..values.len() {
            let d = values[i] - values[j];
            sum += d * d;
        }
    }
    sum.sqrt()
}

// ── ObjectiveFunction ─────────────────────────────────────────────────────────

/// What the search engine needs from a fitness function.
///
/// `Sync` so the engine can evaluate candidates from worker threads; every
/// call receives its own RNG.
pub trait ObjectiveFunction: Sync {
    /// Decision-vector length.
    fn dimension(&self) -> usize;

    fn evaluate(&self, decision: &[bool], rng: &mut SimRng) -> EvalResult<Objectives>;
}

// ── FitnessEvaluator ──────────────────────────────────────────────────────────

/// Scores decision vectors on a fixed network.
pub struct FitnessEvaluator<'a, S: FlowSolver> {
    reliability: ReliabilityEvaluator<'a, S>,
}

impl<'a, S: FlowSolver> FitnessEvaluator<'a, S> {
    /// Fails with [`EvalError::DegenerateInput`] when the network has no
    /// resident or no hospital node.
    pub fn new(reliability: ReliabilityEvaluator<'a, S>) -> EvalResult<Self> {
        let network = reliability.network();
        if network.residents().is_empty() {
            return Err(EvalError::DegenerateInput("network has no resident nodes".into()));
        }
        if network.hospitals().is_empty() {
            return Err(EvalError::DegenerateInput("network has no hospital nodes".into()));
        }
        Ok(Self { reliability })
    }

    pub fn network(&self) -> &'a BridgeNetwork {
        self.reliability.network()
    }

    pub fn reliability(&self) -> &ReliabilityEvaluator<'a, S> {
        &self.reliability
    }

    /// Full evaluation, keeping the pair matrix.
    ///
    /// Pairs are visited residents-outer, hospitals-inner, which fixes the
    /// order in which `rng` is consumed.
    pub fn evaluate_detailed(&self, decision: &[bool], rng: &mut SimRng) -> EvalResult<Evaluation> {
        self.reliability.check_decision(decision)?;
        let network = self.network();
        let residents = network.residents();
        let hospitals = network.hospitals();

        let cost = network.retrofit_cost(decision);

        let mut pair_ipw = Vec::with_capacity(residents.len() * hospitals.len());
        for &r in residents {
            for &h in hospitals {
                pair_ipw.push(self.reliability.expected_ipw(decision, r, h, rng)?);
            }
        }

        let mut evaluation = Evaluation {
            objectives: Objectives::new(cost, 0.0, 0.0),
            pair_ipw,
            residents: residents.len(),
            hospitals: hospitals.len(),
        };
        let mean = evaluation.pair_ipw.iter().sum::<f64>() / evaluation.pair_ipw.len() as f64;
        let fairness = dispersion(&evaluation.resident_totals());
        evaluation.objectives.neg_mean_connectivity = -mean;
        evaluation.objectives.fairness = fairness;

        debug!(
            retrofits = decision.iter().filter(|&&b| b).count(),
            cost,
            average_eipw = mean,
            fairness,
            "candidate evaluated"
        );
        Ok(evaluation)
    }
}

impl<S: FlowSolver> ObjectiveFunction for FitnessEvaluator<'_, S> {
    fn dimension(&self) -> usize {
        self.network().bridge_count()
    }

    fn evaluate(&self, decision: &[bool], rng: &mut SimRng) -> EvalResult<Objectives> {
        self.evaluate_detailed(decision, rng).map(|e| e.objectives)
    }
}
