//! LP formulation of the unit-capacity flow problem.
//!
//! Variables: one flow variable per arc, bounded to `[0, 1]` (or `[0, 0]`
//! when the arc is unusable), plus the pathway count `ipw >= 0`.
//!
//! ```text
//! maximise  ipw
//! s.t.      outflow(source) - inflow(source) = ipw
//!           inflow(sink)    - outflow(sink)  = ipw
//!           inflow(v)       - outflow(v)     = 0     for every other v
//! ```
//!
//! A fresh model is built for every call.

use std::time::{Duration, Instant};

use good_lp::solvers::clarabel::clarabel;
use good_lp::{constraint, variable, variables, Expression, Solution, SolverModel, Variable};
use tracing::trace;

use br_core::NodeId;
use br_network::BridgeNetwork;

use crate::solver::{check_inputs, FlowSolver};
use crate::{FlowError, FlowResult};

/// [`FlowSolver`] backed by the `clarabel` interior-point LP solver.
#[derive(Debug, Clone)]
pub struct LpFlowSolver {
    pub time_limit: Duration,
}

impl LpFlowSolver {
    pub fn new(time_limit: Duration) -> Self {
        Self { time_limit }
    }
}

impl Default for LpFlowSolver {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl FlowSolver for LpFlowSolver {
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
        let mut vars = variables!();

        let flow: Vec<Variable> = usable
            .iter()
            .map(|&ok| vars.add(variable().min(0.0).max(if ok { 1.0 } else { 0.0 })))
            .collect();
        let ipw = vars.add(variable().min(0.0));

        // inflow - outflow per node
        let mut balance: Vec<Expression> = vec![Expression::from(0.0); network.node_count()];
        for (a, &f) in flow.iter().enumerate() {
            balance[network.arc_to[a].index()] += f;
            balance[network.arc_from[a].index()] -= f;
        }

        let mut model = vars.maximise(ipw).using(clarabel);
        for (n, net_inflow) in balance.into_iter().enumerate() {
            let node = NodeId(n as u32);
            model = if node == source {
                model.with(constraint!(net_inflow + ipw == 0.0))
            } else if node == sink {
                model.with(constraint!(net_inflow == ipw))
            } else {
                model.with(constraint!(net_inflow == 0.0))
            };
        }

        let solution = model.solve().map_err(|e| FlowError::NonOptimal {
            source_node: source,
            sink,
            status: e.to_string(),
        })?;

        if started.elapsed() > self.time_limit {
            return Err(FlowError::NonOptimal {
                source_node: source,
                sink,
                status: format!("time limit of {:?} exceeded", self.time_limit),
            });
        }

        let value = solution.value(ipw).max(0.0);
        trace!(%source, %sink, flow = value, "LP max flow solved");
        Ok(value)
    }
}
