//! `br-network` — the road/bridge graph the planner evaluates.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`network`] | `BridgeNetwork` (CSR arcs + bridge table), builder, kinds    |
//! | [`loader`]  | `load_network_csv`, `load_network_readers`                   |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                           |
//!
//! The network is built once at startup and never mutated afterwards.

pub mod error;
pub mod loader;
pub mod network;


pub use error::{NetworkError, NetworkResult};
pub use loader::{load_network_csv, load_network_readers};
pub use network::{
    Bridge, BridgeNetwork, BridgeNetworkBuilder, Fragility, FragilityEntry, NodeKind,
    RetrofitStatus,
};
