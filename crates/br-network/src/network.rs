//! Bridge network representation and builder.
//!
//! # Data layout
//!
//! Directed arcs are stored in **Compressed Sparse Row (CSR)** order.  Given
//! a `NodeId n`, its outgoing arcs occupy the slice:
//!
//! ```text
//! arc_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All arc arrays (`arc_from`, `arc_to`, `arc_retrofit_cost`, `arc_bridge`)
//! are sorted by source node and indexed by `ArcId`.  Every arc carries one
//! unit of capacity; only bridges can lose it.
//!
//! # Bridges
//!
//! A bridge is declared as a directed `(from, to)` pair that must already be
//! an arc.  Bridges are deduplicated by **unordered** endpoint pair: the
//! resulting `bridges` vector is the canonical decision-vector ordering
//! (position = `BridgeId`), fixed at build time.  Each undirected bridge
//! owns every directed arc between its endpoints, so a failure closes both
//! orientations at once.

use std::collections::HashMap;

use br_core::{ArcId, BridgeId, NodeId};

use crate::{NetworkError, NetworkResult};

// ── Node kinds ────────────────────────────────────────────────────────────────

/// Role of a node in the connectivity objectives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    #[default]
    Generic,
    Resident,
    Hospital,
}

impl NodeKind {
    /// Classify a `Type` column value.  Anything other than
    /// hospital/resident (in any letter case) is a generic node.
    pub fn from_type_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("hospital") {
            NodeKind::Hospital
        } else if tag.eq_ignore_ascii_case("resident") {
            NodeKind::Resident
        } else {
            NodeKind::Generic
        }
    }
}

/// Retrofit status a fragility value applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetrofitStatus {
    Retrofit,
    PreRetrofit,
}

impl RetrofitStatus {
    /// Parse a `Status` column value (`retrofit` / `pre-retrofit`).
    pub fn parse(s: &str) -> Option<Self> {
        let norm = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match norm.as_str() {
            "retrofit" | "retrofitted" => Some(RetrofitStatus::Retrofit),
            "pre-retrofit" | "preretrofit" => Some(RetrofitStatus::PreRetrofit),
            _ => None,
        }
    }

    /// Status selected by a decision bit.
    #[inline]
    pub fn from_decision(retrofit: bool) -> Self {
        if retrofit { RetrofitStatus::Retrofit } else { RetrofitStatus::PreRetrofit }
    }
}

// ── Fragility ─────────────────────────────────────────────────────────────────

/// Failure probabilities of one bridge for one damage state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FragilityEntry {
    pub damage_state: String,
    pub retrofit:     Option<f64>,
    pub pre_retrofit: Option<f64>,
}

/// Per-damage-state failure probabilities of a bridge.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fragility {
    pub entries: Vec<FragilityEntry>,
}

impl Fragility {
    /// Record `probability` for `(damage_state, status)`, overwriting any
    /// earlier value for the same key.
    pub fn set(&mut self, damage_state: &str, status: RetrofitStatus, probability: f64) {
        let idx = match self.entries.iter().position(|e| e.damage_state == damage_state) {
            Some(i) => i,
            None => {
                self.entries.push(FragilityEntry {
                    damage_state: damage_state.to_owned(),
                    retrofit:     None,
                    pre_retrofit: None,
                });
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[idx];
        match status {
            RetrofitStatus::Retrofit    => entry.retrofit = Some(probability),
            RetrofitStatus::PreRetrofit => entry.pre_retrofit = Some(probability),
        }
    }

    /// Failure probability for `damage_state` under `status`, if declared.
    pub fn failure_probability(&self, damage_state: &str, status: RetrofitStatus) -> Option<f64> {
        let entry = self.entries.iter().find(|e| e.damage_state == damage_state)?;
        match status {
            RetrofitStatus::Retrofit    => entry.retrofit,
            RetrofitStatus::PreRetrofit => entry.pre_retrofit,
        }
    }
}

// ── Bridge ────────────────────────────────────────────────────────────────────

/// One undirected bridge: one position in every decision vector.
#[derive(Clone, Debug)]
pub struct Bridge {
    /// Endpoints as first declared in the bridge table.
    pub from: NodeId,
    pub to:   NodeId,
    /// Cost of retrofitting this bridge.
    pub retrofit_cost: f64,
    /// Every directed arc between the endpoints (one or two).
    pub arcs: Vec<ArcId>,
    pub fragility: Fragility,
}

// ── BridgeNetwork ─────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus the undirected bridge table.
///
/// Fields are `pub` for direct indexed access on the flow solver's hot path.
/// Do not construct directly; use [`BridgeNetworkBuilder`].
pub struct BridgeNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// External `NodeID` label of each node.  Indexed by `NodeId`.
    pub node_label: Vec<String>,

    /// Role of each node.  Indexed by `NodeId`.
    pub node_kind: Vec<NodeKind>,

    // ── CSR arc adjacency ─────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Arc data (indexed by ArcId) ───────────────────────────────────────
    pub arc_from: Vec<NodeId>,
    pub arc_to:   Vec<NodeId>,

    /// Per-arc `Retrofit Cost` attribute, when the arc table carried one.
    pub arc_retrofit_cost: Vec<Option<f64>>,

    /// Undirected bridge owning each arc; `None` for ordinary roads.
    pub arc_bridge: Vec<Option<BridgeId>>,

    // ── Bridges (indexed by BridgeId) ─────────────────────────────────────
    pub bridges: Vec<Bridge>,

    residents:   Vec<NodeId>,
    hospitals:   Vec<NodeId>,
    label_index: HashMap<String, NodeId>,
    arc_index:   HashMap<(NodeId, NodeId), ArcId>,
}

impl BridgeNetwork {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_label.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arc_to.len()
    }

    /// Number of undirected bridges = decision-vector length.
    pub fn bridge_count(&self) -> usize {
        self.bridges.len()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// Resident nodes in load order.
    pub fn residents(&self) -> &[NodeId] {
        &self.residents
    }

    /// Hospital nodes in load order.
    pub fn hospitals(&self) -> &[NodeId] {
        &self.hospitals
    }

    pub fn node_by_label(&self, label: &str) -> Option<NodeId> {
        self.label_index.get(label).copied()
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.node_label[node.index()]
    }

    /// The directed arc `from → to`, if present.
    pub fn find_arc(&self, from: NodeId, to: NodeId) -> Option<ArcId> {
        self.arc_index.get(&(from, to)).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `ArcId`s of all outgoing arcs from `node`.
    #[inline]
    pub fn out_arcs(&self, node: NodeId) -> impl Iterator<Item = ArcId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| ArcId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Sum of retrofit costs of the bridges selected by `decision`.
    ///
    /// Bits beyond the bridge count are ignored.
    pub fn retrofit_cost(&self, decision: &[bool]) -> f64 {
        // `Sum` for f64 starts at -0.0; an empty plan must cost +0.0.
        self.bridges
            .iter()
            .zip(decision)
            .filter(|&(_, &bit)| bit)
            .fold(0.0, |acc, (b, _)| acc + b.retrofit_cost)
    }
}

// ── BridgeNetworkBuilder ──────────────────────────────────────────────────────

/// Construct a [`BridgeNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use br_network::{BridgeNetworkBuilder, NodeKind};
///
/// let mut b = BridgeNetworkBuilder::new();
/// let r = b.add_node("R", NodeKind::Resident).unwrap();
/// let m = b.add_node("B", NodeKind::Generic).unwrap();
/// let h = b.add_node("H", NodeKind::Hospital).unwrap();
/// b.add_bidirectional_arc(r, m, None);
/// b.add_bidirectional_arc(m, h, None);
/// b.add_bridge(r, m, 100.0, &[("E", 0.0, 0.5)]);
/// let net = b.build().unwrap();
/// assert_eq!(net.arc_count(), 4);
/// assert_eq!(net.bridge_count(), 1);
/// assert_eq!(net.bridges[0].arcs.len(), 2);
/// ```
pub struct BridgeNetworkBuilder {
    labels:      Vec<String>,
    kinds:       Vec<NodeKind>,
    label_index: HashMap<String, NodeId>,
    raw_arcs:    Vec<RawArc>,
    raw_bridges: Vec<RawBridgeRow>,
}

struct RawArc {
    from:          NodeId,
    to:            NodeId,
    retrofit_cost: Option<f64>,
    bidirectional: bool,
}

struct RawBridgeRow {
    from:          NodeId,
    to:            NodeId,
    retrofit_cost: Option<f64>,
    fragility:     Option<(String, RetrofitStatus, f64)>,
}

impl BridgeNetworkBuilder {
    pub fn new() -> Self {
        Self {
            labels:      Vec::new(),
            kinds:       Vec::new(),
            label_index: HashMap::new(),
            raw_arcs:    Vec::new(),
            raw_bridges: Vec::new(),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, label: &str, kind: NodeKind) -> NetworkResult<NodeId> {
        if self.label_index.contains_key(label) {
            return Err(NetworkError::DuplicateNode(label.to_owned()));
        }
        let id = NodeId(self.labels.len() as u32);
        self.labels.push(label.to_owned());
        self.kinds.push(kind);
        self.label_index.insert(label.to_owned(), id);
        Ok(id)
    }

    /// Look up a node added earlier by its label.
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.label_index.get(label).copied()
    }

    /// Add a **directed** arc from `from` to `to`.
    pub fn add_arc(&mut self, from: NodeId, to: NodeId, retrofit_cost: Option<f64>) {
        self.raw_arcs.push(RawArc { from, to, retrofit_cost, bidirectional: false });
    }

    /// Add an arc flagged bidirectional.  `build()` creates the reverse arc
    /// with the same attributes unless the reverse is declared explicitly.
    pub fn add_bidirectional_arc(&mut self, from: NodeId, to: NodeId, retrofit_cost: Option<f64>) {
        self.raw_arcs.push(RawArc { from, to, retrofit_cost, bidirectional: true });
    }

    /// Record one row of the bridge table: the failure probability of the
    /// bridge `from → to` under `status` in `damage_state`.
    pub fn add_bridge_row(
        &mut self,
        from:          NodeId,
        to:            NodeId,
        status:        RetrofitStatus,
        damage_state:  &str,
        probability:   f64,
        retrofit_cost: Option<f64>,
    ) {
        self.raw_bridges.push(RawBridgeRow {
            from,
            to,
            retrofit_cost,
            fragility: Some((damage_state.to_owned(), status, probability)),
        });
    }

    /// Convenience: declare a bridge with its cost and a list of
    /// `(damage_state, retrofit_probability, pre_retrofit_probability)`.
    pub fn add_bridge(
        &mut self,
        from:      NodeId,
        to:        NodeId,
        cost:      f64,
        fragility: &[(&str, f64, f64)],
    ) {
        if fragility.is_empty() {
            self.raw_bridges.push(RawBridgeRow { from, to, retrofit_cost: Some(cost), fragility: None });
        }
        for &(state, retrofit, pre_retrofit) in fragility {
            self.add_bridge_row(from, to, RetrofitStatus::Retrofit, state, retrofit, Some(cost));
            self.add_bridge_row(from, to, RetrofitStatus::PreRetrofit, state, pre_retrofit, Some(cost));
        }
    }

    pub fn node_count(&self) -> usize { self.labels.len() }
    pub fn arc_count(&self) -> usize { self.raw_arcs.len() }

    /// Consume the builder and produce a [`BridgeNetwork`].
    ///
    /// Steps: mirror bidirectional arcs, sort arcs into CSR order, validate
    /// that every bridge is an arc, and dedup bridges by unordered pair in
    /// first-appearance order.
    pub fn build(self) -> NetworkResult<BridgeNetwork> {
        let node_count = self.labels.len();
        let label = |n: NodeId| self.labels[n.index()].clone();

        // ── Directed arc set, with mirrors ────────────────────────────────
        let mut seen: HashMap<(NodeId, NodeId), usize> = HashMap::with_capacity(self.raw_arcs.len() * 2);
        let mut arcs: Vec<(NodeId, NodeId, Option<f64>)> = Vec::with_capacity(self.raw_arcs.len() * 2);
        for a in &self.raw_arcs {
            if seen.insert((a.from, a.to), arcs.len()).is_some() {
                return Err(NetworkError::DuplicateArc { from: label(a.from), to: label(a.to) });
            }
            arcs.push((a.from, a.to, a.retrofit_cost));
        }
        for a in self.raw_arcs.iter().filter(|a| a.bidirectional) {
            if !seen.contains_key(&(a.to, a.from)) {
                seen.insert((a.to, a.from), arcs.len());
                arcs.push((a.to, a.from, a.retrofit_cost));
            }
        }

        // Stable sort keeps declaration order within a source node.
        arcs.sort_by_key(|&(from, _, _)| from.0);

        let arc_from: Vec<NodeId> = arcs.iter().map(|a| a.0).collect();
        let arc_to:   Vec<NodeId> = arcs.iter().map(|a| a.1).collect();
        let arc_retrofit_cost: Vec<Option<f64>> = arcs.iter().map(|a| a.2).collect();
        let arc_index: HashMap<(NodeId, NodeId), ArcId> = arcs
            .iter()
            .enumerate()
            .map(|(i, a)| ((a.0, a.1), ArcId(i as u32)))
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _, _) in &arcs {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, arcs.len());

        // ── Undirected bridge table ───────────────────────────────────────
        let mut bridge_slot: HashMap<(NodeId, NodeId), BridgeId> = HashMap::new();
        let mut bridges: Vec<Bridge> = Vec::new();
        let mut declared_cost: Vec<Option<f64>> = Vec::new();

        for row in &self.raw_bridges {
            if !arc_index.contains_key(&(row.from, row.to)) {
                return Err(NetworkError::BridgeNotAnArc { from: label(row.from), to: label(row.to) });
            }
            let key = (row.from.min(row.to), row.from.max(row.to));
            let id = *bridge_slot.entry(key).or_insert_with(|| {
                bridges.push(Bridge {
                    from:          row.from,
                    to:            row.to,
                    retrofit_cost: 0.0,
                    arcs:          Vec::new(),
                    fragility:     Fragility::default(),
                });
                declared_cost.push(None);
                BridgeId((bridges.len() - 1) as u32)
            });

            if let Some((state, status, p)) = &row.fragility {
                if !(0.0..=1.0).contains(p) {
                    return Err(NetworkError::InvalidProbability {
                        from:  label(row.from),
                        to:    label(row.to),
                        value: *p,
                    });
                }
                bridges[id.index()].fragility.set(state, *status, *p);
            }
            if declared_cost[id.index()].is_none() {
                declared_cost[id.index()] = row.retrofit_cost;
            }
        }

        let mut arc_bridge: Vec<Option<BridgeId>> = vec![None; arcs.len()];
        for (i, bridge) in bridges.iter_mut().enumerate() {
            let id = BridgeId(i as u32);
            for (a, b) in [(bridge.from, bridge.to), (bridge.to, bridge.from)] {
                if let Some(&arc) = arc_index.get(&(a, b)) {
                    bridge.arcs.push(arc);
                    arc_bridge[arc.index()] = Some(id);
                }
            }

            // Bridge-table cost first, then the arc attribute.
            let cost = declared_cost[i]
                .or_else(|| bridge.arcs.iter().find_map(|arc| arc_retrofit_cost[arc.index()]));
            match cost {
                Some(c) if c.is_finite() && c >= 0.0 => bridge.retrofit_cost = c,
                _ => {
                    return Err(NetworkError::MissingRetrofitCost {
                        from: label(bridge.from),
                        to:   label(bridge.to),
                    });
                }
            }
        }

        let residents = (0..node_count)
            .filter(|&i| self.kinds[i] == NodeKind::Resident)
            .map(|i| NodeId(i as u32))
            .collect();
        let hospitals = (0..node_count)
            .filter(|&i| self.kinds[i] == NodeKind::Hospital)
            .map(|i| NodeId(i as u32))
            .collect();

        Ok(BridgeNetwork {
            node_label: self.labels,
            node_kind:  self.kinds,
            node_out_start,
            arc_from,
            arc_to,
            arc_retrofit_cost,
            arc_bridge,
            bridges,
            residents,
            hospitals,
            label_index: self.label_index,
            arc_index,
        })
    }
}

impl Default for BridgeNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
