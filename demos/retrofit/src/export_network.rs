//! Export the synthetic network as the three input CSV tables.
//!
//! Writes to `output/synthetic/` (or the directory given as the only
//! argument):
//!   - `node.csv`    — `NodeID,Type`
//!   - `arc.csv`     — `From,To,Bidirection,Retrofit Cost`
//!   - `Bridges.csv` — `From,To,Status,Damage State,Retrofit Cost,Probability`
//!
//! The result can be fed straight back into `retrofit <dir>`.
//!
//! Run with: `cargo run -p retrofit --bin export_network`

mod network;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use csv::Writer;

use br_network::NodeKind;

use network::{BRIDGES, NODES, ROADS};

fn type_tag(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Resident => "resident",
        NodeKind::Hospital => "hospital",
        NodeKind::Generic  => "",
    }
}

fn main() -> Result<()> {
    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("output/synthetic"));
    fs::create_dir_all(&dir)?;

    // ── node.csv ──────────────────────────────────────────────────────────────
    let mut w = Writer::from_path(dir.join("node.csv"))?;
    w.write_record(["NodeID", "Type"])?;
    for (label, kind) in NODES {
        w.write_record([label, type_tag(kind)])?;
    }
    w.flush()?;
    println!("Wrote {} ({} nodes)", dir.join("node.csv").display(), NODES.len());

    // ── arc.csv ───────────────────────────────────────────────────────────────
    let mut w = Writer::from_path(dir.join("arc.csv"))?;
    w.write_record(["From", "To", "Bidirection", "Retrofit Cost"])?;
    for (from, to) in ROADS {
        w.write_record([from, to, "1", ""])?;
    }
    for (from, to, cost, _) in BRIDGES {
        let cost = cost.to_string();
        w.write_record([from, to, "1", cost.as_str()])?;
    }
    w.flush()?;
    println!("Wrote {} ({} roads)", dir.join("arc.csv").display(), ROADS.len() + BRIDGES.len());

    // ── Bridges.csv ───────────────────────────────────────────────────────────
    let mut w = Writer::from_path(dir.join("Bridges.csv"))?;
    w.write_record(["From", "To", "Status", "Damage State", "Retrofit Cost", "Probability"])?;
    let mut rows = 0;
    for (from, to, cost, fragility) in BRIDGES {
        for (state, retrofit_p, pre_p) in fragility {
            let cost = cost.to_string();
            let (retrofit_p, pre_p) = (retrofit_p.to_string(), pre_p.to_string());
            w.write_record([from, to, "retrofit", state, cost.as_str(), retrofit_p.as_str()])?;
            w.write_record([from, to, "pre-retrofit", state, cost.as_str(), pre_p.as_str()])?;
            rows += 2;
        }
    }
    w.flush()?;
    println!("Wrote {} ({rows} fragility rows)", dir.join("Bridges.csv").display());

    Ok(())
}
