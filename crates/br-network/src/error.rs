//! Network-loading error type.
//!
//! Every variant is a configuration error: the run must stop before any
//! search starts.

use thiserror::Error;

/// Errors produced by `br-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {0:?} is declared more than once")]
    DuplicateNode(String),

    #[error("unknown node {0:?}")]
    UnknownNode(String),

    #[error("arc {from:?} -> {to:?} is declared more than once")]
    DuplicateArc { from: String, to: String },

    #[error("bridge {from:?} -> {to:?} is not in the set of arcs")]
    BridgeNotAnArc { from: String, to: String },

    #[error("bridge {from:?} -> {to:?} has failure probability {value} outside [0, 1]")]
    InvalidProbability { from: String, to: String, value: f64 },

    #[error("bridge {from:?} -> {to:?} has no usable retrofit cost")]
    MissingRetrofitCost { from: String, to: String },

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
