//! One Monte-Carlo trial's bridge fail/intact realisation.
//!
//! A `Scenario` lives inside a single `expected_ipw` call: it is sampled,
//! turned into an arc usability mask, handed to the flow solver and then
//! overwritten by the next trial.

use br_core::{BridgeId, SimRng};
use br_network::{BridgeNetwork, RetrofitStatus};

use crate::{EvalError, EvalResult};

// ── FailureProbabilities ──────────────────────────────────────────────────────

/// Failure probabilities of one bridge for the run's damage state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FailureProbabilities {
    pub retrofit:     f64,
    pub pre_retrofit: f64,
}

impl FailureProbabilities {
    /// Probability selected by a decision bit.
    #[inline]
    pub fn for_decision(&self, retrofit: bool) -> f64 {
        if retrofit { self.retrofit } else { self.pre_retrofit }
    }

    /// Resolve every bridge's probabilities for `damage_state`, indexed by
    /// `BridgeId`.
    pub fn resolve(network: &BridgeNetwork, damage_state: &str) -> EvalResult<Vec<Self>> {
        network
            .bridges
            .iter()
            .enumerate()
            .map(|(i, bridge)| -> EvalResult<Self> {
                let lookup = |status: RetrofitStatus, name: &'static str| {
                    bridge
                        .fragility
                        .failure_probability(damage_state, status)
                        .ok_or_else(|| EvalError::MissingFragility {
                            bridge:       BridgeId(i as u32),
                            status:       name,
                            damage_state: damage_state.to_owned(),
                        })
                };
                Ok(FailureProbabilities {
                    retrofit:     lookup(RetrofitStatus::Retrofit, "retrofit")?,
                    pre_retrofit: lookup(RetrofitStatus::PreRetrofit, "pre-retrofit")?,
                })
            })
            .collect()
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

/// Fail/intact flag per undirected bridge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scenario {
    failed: Vec<bool>,
}

impl Scenario {
    /// Draw a fresh scenario.
    ///
    /// Exactly one uniform number is drawn per bridge, in `BridgeId` order,
    /// whatever the probabilities are.  A bridge fails when the draw is
    /// below the probability its decision bit selects.
    pub fn sample(decision: &[bool], probabilities: &[FailureProbabilities], rng: &mut SimRng) -> Self {
        let mut scenario = Scenario::default();
        scenario.resample(decision, probabilities, rng);
        scenario
    }

    /// Like [`sample`](Self::sample) but reuses this scenario's buffer.
    pub fn resample(&mut self, decision: &[bool], probabilities: &[FailureProbabilities], rng: &mut SimRng) {
        self.failed.clear();
        self.failed.extend(
            decision
                .iter()
                .zip(probabilities)
                .map(|(&bit, p)| rng.uniform() < p.for_decision(bit)),
        );
    }

    /// Build a scenario from explicit flags (tests, replay).
    pub fn from_flags(failed: Vec<bool>) -> Self {
        Self { failed }
    }

    #[inline]
    pub fn is_failed(&self, bridge: BridgeId) -> bool {
        self.failed[bridge.index()]
    }

    pub fn failed_count(&self) -> usize {
        self.failed.iter().filter(|&&f| f).count()
    }

    /// Fill `usable` with one flag per directed arc: ordinary roads are
    /// always usable, bridge arcs follow their bridge's flag (both
    /// orientations together).
    pub fn fill_usability(&self, network: &BridgeNetwork, usable: &mut Vec<bool>) {
        usable.clear();
        usable.extend(
            network
                .arc_bridge
                .iter()
                .map(|&bridge| bridge.is_none_or(|b| !self.failed[b.index()])),
        );
    }
}
