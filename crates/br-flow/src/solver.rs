//! Flow-solver trait and the default augmenting-path implementation.
//!
//! # Problem
//!
//! Every arc carries at most one unit of flow.  Arcs marked unusable for the
//! current scenario carry none.  Flow is conserved at every node other than
//! the source and sink, and the value returned is the net flow leaving the
//! source, which equals the number of arc-disjoint source→sink pathways
//! ("IPW") still open.
//!
//! # Pluggability
//!
//! The reliability evaluator calls solvers through [`FlowSolver`], so an LP
//! engine ([`LpFlowSolver`](crate::LpFlowSolver) with the `lp` feature) or
//! any other exact max-flow method can replace [`AugmentingPathSolver`].
//!
//! # Statelessness
//!
//! Solvers hold configuration only.  Each call builds its own residual graph
//! (or LP model) and drops it on return, so one solver value can be shared
//! by every scenario and by concurrent worker threads.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::trace;

use br_core::NodeId;
use br_network::BridgeNetwork;

use crate::{FlowError, FlowResult};

/// Residual capacities below this are treated as saturated.
const EPS: f64 = 1e-9;

// ── FlowSolver trait ──────────────────────────────────────────────────────────

/// Pluggable max-flow engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so the same solver can be shared
/// across Rayon worker threads during parallel evaluation.
pub trait FlowSolver: Send + Sync {
    /// Maximum flow from `source` to `sink` where arc `a` may carry flow
    /// only if `usable[a]` is `true`.
    ///
    /// `usable` must have exactly `network.arc_count()` entries.  Returns
    /// `0.0` when `source == sink`.
    fn max_flow(
        &self,
        network: &BridgeNetwork,
        source:  NodeId,
        sink:    NodeId,
        usable:  &[bool],
    ) -> FlowResult<f64>;
}

/// Shared argument checks for solver implementations.
pub(crate) fn check_inputs(
    network: &BridgeNetwork,
    source:  NodeId,
    sink:    NodeId,
    usable:  &[bool],
) -> FlowResult<()> {
    if usable.len() != network.arc_count() {
        return Err(FlowError::MaskLength { expected: network.arc_count(), got: usable.len() });
    }
    for node in [source, sink] {
        if node.index() >= network.node_count() {
            return Err(FlowError::NodeNotFound(node));
        }
    }
    Ok(())
}

// ── AugmentingPathSolver ──────────────────────────────────────────────────────

/// Edmonds–Karp (BFS augmenting paths) on a residual graph built per call.
///
/// With unit capacities each augmentation adds one unit, so a solve takes
/// at most `out_degree(source)` BFS passes.  The LP optimum of the
/// continuous [0, 1] formulation is integral on this problem, so the value
/// matches an LP engine exactly.
///
/// A solve that exceeds `time_limit` before the residual graph has no
/// augmenting path left fails with [`FlowError::NonOptimal`].
#[derive(Debug, Clone)]
pub struct AugmentingPathSolver {
    pub time_limit: Duration,
}

impl AugmentingPathSolver {
    pub fn new(time_limit: Duration) -> Self {
        Self { time_limit }
    }
}

impl Default for AugmentingPathSolver {
    /// 60-second limit per solve.
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl FlowSolver for AugmentingPathSolver {
    fn max_flow(
        &self,
        network: &BridgeNetwork,
        source:  NodeId,
        sink:    NodeId,
        usable:  &[bool],
    ) -> FlowResult<f64> {
        check_inputs(network, source, sink, usable)?;
        if source == sink {
            return Ok(0.0);
        }

        let started = Instant::now();
        let mut residual = Residual::build(network, usable);
        let mut total = 0.0;

        while let Some(path) = residual.shortest_augmenting_path(source, sink) {
            if started.elapsed() >= self.time_limit {
                return Err(FlowError::NonOptimal {
                    source_node: source,
                    sink,
                    status: format!("time limit of {:?} reached after {total} units", self.time_limit),
                });
            }
            total += residual.augment(&path);
        }

        trace!(%source, %sink, flow = total, "max flow solved");
        Ok(total)
    }
}

// ── Residual graph ────────────────────────────────────────────────────────────

/// Residual graph with paired edges: edge `2a` is arc `a` forward, edge
/// `2a + 1` its reverse (initial capacity 0).
struct Residual {
    capacity: Vec<f64>,
    head:     Vec<NodeId>,
    /// Residual edges leaving each node.
    adjacency: Vec<Vec<usize>>,
}

impl Residual {
    fn build(network: &BridgeNetwork, usable: &[bool]) -> Self {
        let edges = network.arc_count() * 2;
        let mut capacity = vec![0.0; edges];
        let mut head     = vec![NodeId(0); edges];
        let mut adjacency: Vec<Vec<usize>> = (0..network.node_count())
            .map(|n| Vec::with_capacity(network.out_degree(NodeId(n as u32))))
            .collect();

        for n in 0..network.node_count() {
            let from = NodeId(n as u32);
            for arc in network.out_arcs(from) {
                let to = network.arc_to[arc.index()];
                let forward = 2 * arc.index();

                adjacency[from.index()].push(forward);
                capacity[forward] = if usable[arc.index()] { 1.0 } else { 0.0 };
                head[forward] = to;

                adjacency[to.index()].push(forward + 1);
                head[forward + 1] = from;
            }
        }

        Self { capacity, head, adjacency }
    }

    /// BFS over edges with positive residual capacity.  Returns the edge
    /// sequence of a fewest-edge `source → sink` path.
    fn shortest_augmenting_path(&self, source: NodeId, sink: NodeId) -> Option<Vec<usize>> {
        let mut prev_edge: Vec<Option<usize>> = vec![None; self.adjacency.len()];
        let mut visited = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::new();

        visited[source.index()] = true;
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            for &edge in &self.adjacency[node.index()] {
                let next = self.head[edge];
                if visited[next.index()] || self.capacity[edge] <= EPS {
                    continue;
                }
                visited[next.index()] = true;
                prev_edge[next.index()] = Some(edge);
                if next == sink {
                    return Some(self.trace(prev_edge, sink));
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn trace(&self, prev_edge: Vec<Option<usize>>, sink: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cur = sink;
        while let Some(edge) = prev_edge[cur.index()] {
            path.push(edge);
            // Tail of edge e is the head of its partner e ^ 1.
            cur = self.head[edge ^ 1];
        }
        path.reverse();
        path
    }

    /// Push the bottleneck amount along `path`; returns the amount pushed.
    fn augment(&mut self, path: &[usize]) -> f64 {
        let bottleneck = path
            .iter()
            .map(|&e| self.capacity[e])
            .fold(f64::INFINITY, f64::min);
        for &e in path {
            self.capacity[e] -= bottleneck;
            self.capacity[e ^ 1] += bottleneck;
        }
        bottleneck
    }
}
