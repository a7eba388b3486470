//! `br-core` — foundational types for the `bridge_retrofit` planner.
//!
//! This crate is a dependency of every other `br-*` crate.  It has no
//! `br-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `ArcId`, `BridgeId`                          |
//! | [`config`] | `RunConfig` (scenario count, population sizes, seed)   |
//! | [`rng`]    | `SimRng` (seeded `SmallRng` with child derivation)     |
//! | [`error`]  | `BrError`, `BrResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RunConfig;
pub use error::{BrError, BrResult};
pub use ids::{ArcId, BridgeId, NodeId};
pub use rng::SimRng;
