//! `br-eval` — how good is a retrofit plan?
//!
//! A plan is a decision vector: one bit per undirected bridge, `true` =
//! retrofit.  This crate turns a plan into three minimised objectives.
//!
//! ```text
//! decision ──► Scenario::sample  (one draw per bridge per trial)
//!          ──► arc usability mask
//!          ──► FlowSolver::max_flow(resident, hospital)
//!          ──► mean over trials            = expected IPW of the pair
//!          ──► cost, −mean(pairs), dispersion(resident totals)
//! ```
//!
//! | Module          | Contents                                            |
//! |-----------------|-----------------------------------------------------|
//! | [`scenario`]    | `Scenario`, `FailureProbabilities`                  |
//! | [`reliability`] | `ReliabilityEvaluator::expected_ipw`                |
//! | [`fitness`]     | `Objectives`, `Evaluation`, `FitnessEvaluator`, `ObjectiveFunction` |
//! | [`error`]       | `EvalError`, `EvalResult<T>`                        |

pub mod error;
pub mod fitness;
pub mod reliability;
pub mod scenario;


pub use error::{EvalError, EvalResult};
pub use fitness::{dispersion, Evaluation, FitnessEvaluator, ObjectiveFunction, Objectives};
pub use reliability::ReliabilityEvaluator;
pub use scenario::{FailureProbabilities, Scenario};
