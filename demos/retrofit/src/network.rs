//! Synthetic river-town network shared by `retrofit --synthetic` and
//! `export_network`.
//!
//! Three residential districts and two hospitals on either side of a river.
//! Five crossings are bridges: `North–Mercy`, `J1–J3`, `J2–J3`,
//! `J3–General` and `East–J3`.  South can only leave its bank over a
//! bridge, so its connectivity depends most on the retrofit plan.  Every
//! road is two-way.

use br_core::NodeId;
use br_network::{BridgeNetwork, BridgeNetworkBuilder, NetworkError, NetworkResult, NodeKind};

/// `(label, kind)`
pub const NODES: [(&str, NodeKind); 8] = [
    ("North",   NodeKind::Resident),
    ("East",    NodeKind::Resident),
    ("South",   NodeKind::Resident),
    ("Mercy",   NodeKind::Hospital),
    ("General", NodeKind::Hospital),
    ("J1",      NodeKind::Generic),
    ("J2",      NodeKind::Generic),
    ("J3",      NodeKind::Generic),
];

/// Ordinary two-way roads.
pub const ROADS: [(&str, &str); 6] = [
    ("North", "J1"),
    ("East",  "J2"),
    ("South", "J3"),
    ("J1",    "Mercy"),
    ("J2",    "General"),
    ("J2",    "J1"),
];

/// `(from, to, retrofit cost, [(damage state, retrofit p, pre-retrofit p)])`
pub const BRIDGES: [(&str, &str, f64, [(&str, f64, f64); 2]); 5] = [
    ("North", "Mercy",   60.0,  [("C", 0.01, 0.15), ("E", 0.05, 0.45)]),
    ("J1",    "J3",      150.0, [("C", 0.02, 0.20), ("E", 0.08, 0.55)]),
    ("J2",    "J3",      90.0,  [("C", 0.01, 0.10), ("E", 0.04, 0.35)]),
    ("J3",    "General", 200.0, [("C", 0.03, 0.25), ("E", 0.10, 0.60)]),
    ("East",  "J3",      120.0, [("C", 0.02, 0.18), ("E", 0.06, 0.50)]),
];

/// Build the synthetic network.  Every road and bridge is bidirectional.
pub fn build_network() -> NetworkResult<BridgeNetwork> {
    let mut b = BridgeNetworkBuilder::new();
    for (label, kind) in NODES {
        b.add_node(label, kind)?;
    }
    for (from, to) in ROADS {
        let (f, t) = (node(&b, from)?, node(&b, to)?);
        b.add_bidirectional_arc(f, t, None);
    }
    for (from, to, cost, fragility) in BRIDGES {
        let (f, t) = (node(&b, from)?, node(&b, to)?);
        b.add_bidirectional_arc(f, t, Some(cost));
        b.add_bridge(f, t, cost, &fragility);
    }
    b.build()
}

fn node(b: &BridgeNetworkBuilder, label: &str) -> NetworkResult<NodeId> {
    b.node_id(label).ok_or_else(|| NetworkError::UnknownNode(label.to_owned()))
}
