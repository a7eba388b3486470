use thiserror::Error;

use br_core::BridgeId;
use br_flow::FlowError;

#[derive(Debug, Error)]
pub enum EvalError {
    /// No residents or no hospitals: the connectivity mean is undefined.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("bridge {bridge} has no {status} failure probability for damage state {damage_state:?}")]
    MissingFragility {
        bridge:       BridgeId,
        status:       &'static str,
        damage_state: String,
    },

    #[error("decision vector has {got} bits, network has {expected} bridges")]
    DecisionLength { expected: usize, got: usize },

    #[error("flow solve failed in scenario {scenario}: {source}")]
    SolverNonOptimal {
        scenario: usize,
        #[source]
        source:   FlowError,
    },

    #[error("flow solver rejected its input: {0}")]
    Flow(#[from] FlowError),
}

pub type EvalResult<T> = Result<T, EvalError>;
