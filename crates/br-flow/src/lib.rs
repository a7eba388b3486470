//! `br-flow` — max-flow between a source and a sink on a damaged network.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`solver`]    | `FlowSolver` trait, `AugmentingPathSolver`                |
//! | [`lp`]        | `LpFlowSolver` (feature = `"lp"` only)                    |
//! | [`error`]     | `FlowError`, `FlowResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag | Effect                                                          |
//! |------|-----------------------------------------------------------------|
//! | `lp` | Enables the LP formulation via `good_lp` with `clarabel`.       |

pub mod error;
pub mod solver;

#[cfg(feature = "lp")]
pub mod lp;


pub use error::{FlowError, FlowResult};
pub use solver::{AugmentingPathSolver, FlowSolver};

#[cfg(feature = "lp")]
pub use lp::LpFlowSolver;
