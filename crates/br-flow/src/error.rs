//! Flow-solver error type.

use thiserror::Error;

use br_core::NodeId;

/// Errors produced by `br-flow`.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The solve stopped before proving optimality.  The partial value is
    /// never returned.
    #[error("flow solve from {source_node} to {sink} did not reach optimality: {status}")]
    NonOptimal {
        source_node: NodeId,
        sink:        NodeId,
        status:      String,
    },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("usability mask has {got} entries, network has {expected} arcs")]
    MaskLength { expected: usize, got: usize },
}

pub type FlowResult<T> = Result<T, FlowError>;
