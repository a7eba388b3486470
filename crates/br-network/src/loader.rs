//! CSV network loader.
//!
//! # CSV formats
//!
//! Three tables, each with a header row.  Columns not listed are ignored.
//!
//! **Nodes**
//!
//! ```csv
//! NodeID,Type
//! 1,resident
//! 2,
//! 3,Hospital
//! ```
//!
//! `Type` is `resident` / `hospital` in either letter case; anything else
//! (including blank) is a generic node.
//!
//! **Arcs**
//!
//! ```csv
//! From,To,Bidirection,Retrofit Cost
//! 1,2,1,
//! 2,3,1,250
//! ```
//!
//! A truthy `Bidirection` (`1`, `true`, `yes`, `y`) mirrors the arc.
//! `Retrofit Cost` is optional and only used for bridges whose bridge rows
//! leave the cost blank.
//!
//! **Bridges**
//!
//! ```csv
//! From,To,Status,Damage State,Retrofit Cost,Probability
//! 2,3,retrofit,E,250,0.05
//! 2,3,pre-retrofit,E,250,0.40
//! ```
//!
//! One row per `(From, To, Status, Damage State)`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use br_core::NodeId;

use crate::network::{BridgeNetwork, BridgeNetworkBuilder, NodeKind, RetrofitStatus};
use crate::{NetworkError, NetworkResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    #[serde(rename = "NodeID")]
    node_id: String,
    #[serde(rename = "Type", default)]
    kind:    Option<String>,
}

#[derive(Deserialize)]
struct ArcRecord {
    #[serde(rename = "From")]
    from:          String,
    #[serde(rename = "To")]
    to:            String,
    #[serde(rename = "Bidirection", default)]
    bidirection:   Option<String>,
    #[serde(rename = "Retrofit Cost", default)]
    retrofit_cost: Option<f64>,
}

#[derive(Deserialize)]
struct BridgeRecord {
    #[serde(rename = "From")]
    from:          String,
    #[serde(rename = "To")]
    to:            String,
    #[serde(rename = "Status")]
    status:        String,
    #[serde(rename = "Damage State")]
    damage_state:  String,
    #[serde(rename = "Retrofit Cost", default)]
    retrofit_cost: Option<f64>,
    #[serde(rename = "Probability")]
    probability:   f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`BridgeNetwork`] from the node, arc, and bridge CSV files.
pub fn load_network_csv(
    nodes:   &Path,
    arcs:    &Path,
    bridges: &Path,
) -> NetworkResult<BridgeNetwork> {
    load_network_readers(
        std::fs::File::open(nodes)?,
        std::fs::File::open(arcs)?,
        std::fs::File::open(bridges)?,
    )
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or for embedded networks.
pub fn load_network_readers<N: Read, A: Read, B: Read>(
    nodes:   N,
    arcs:    A,
    bridges: B,
) -> NetworkResult<BridgeNetwork> {
    let mut builder = BridgeNetworkBuilder::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    for result in table_reader(nodes).deserialize::<NodeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(format!("node table: {e}")))?;
        let kind = row.kind.as_deref().map(NodeKind::from_type_tag).unwrap_or_default();
        builder.add_node(row.node_id.trim(), kind)?;
    }

    // ── Arcs ──────────────────────────────────────────────────────────────
    for result in table_reader(arcs).deserialize::<ArcRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(format!("arc table: {e}")))?;
        let from = resolve(&builder, &row.from)?;
        let to   = resolve(&builder, &row.to)?;
        if row.bidirection.as_deref().is_some_and(is_truthy) {
            builder.add_bidirectional_arc(from, to, row.retrofit_cost);
        } else {
            builder.add_arc(from, to, row.retrofit_cost);
        }
    }

    // ── Bridges ───────────────────────────────────────────────────────────
    for result in table_reader(bridges).deserialize::<BridgeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(format!("bridge table: {e}")))?;
        let from = resolve(&builder, &row.from)?;
        let to   = resolve(&builder, &row.to)?;
        let status = RetrofitStatus::parse(&row.status).ok_or_else(|| {
            NetworkError::Parse(format!(
                "invalid bridge status {:?}: expected \"retrofit\" or \"pre-retrofit\"",
                row.status
            ))
        })?;
        builder.add_bridge_row(
            from,
            to,
            status,
            row.damage_state.trim(),
            row.probability,
            row.retrofit_cost,
        );
    }

    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn table_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source)
}

fn resolve(builder: &BridgeNetworkBuilder, label: &str) -> NetworkResult<NodeId> {
    let label = label.trim();
    builder
        .node_id(label)
        .ok_or_else(|| NetworkError::UnknownNode(label.to_owned()))
}

fn is_truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "1.0" | "true" | "yes" | "y"
    )
}
