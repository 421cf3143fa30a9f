//! Condition overlay: per-request time weights over an immutable graph.
//!
//! # Weights
//!
//! Every edge costs `length_m / speed_mps` seconds.  An edge whose
//! `(u, v)` pair appears in a [`ConditionRule`] is additionally multiplied
//! by that rule's `penalty_factor`; when several rules match, all factors
//! apply.
//!
//! # Sparsity
//!
//! [`WeightView`] borrows the graph and only materialises an
//! `EdgeId → override` map for penalised edges.  Building it touches the
//! out-edges of each rule's source nodes, never the whole edge array, and
//! never copies topology.

use rustc_hash::{FxHashMap, FxHashSet};

use pf_core::network::{is_valid_speed_kmh, kmh_to_mps};
use pf_core::EdgeId;

use crate::network::RoadGraph;
use crate::router::EdgeWeights;
use crate::{GraphError, GraphResult};

// ── ConditionRule ─────────────────────────────────────────────────────────────

/// A temporary traversal penalty (closure, congestion, works…).
///
/// Edges are named by the OSM ids of their endpoints so one rule set can be
/// applied to any graph; pairs absent from a graph are ignored for it.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionRule {
    pub name:           String,
    pub description:    String,
    pub penalty_factor: f64,
    pub edges:          FxHashSet<(i64, i64)>,
}

impl ConditionRule {
    /// Create a rule, rejecting factors that are not finite and `> 1`.
    pub fn new(
        name:           impl Into<String>,
        description:    impl Into<String>,
        penalty_factor: f64,
        edges:          impl IntoIterator<Item = (i64, i64)>,
    ) -> GraphResult<Self> {
        let name = name.into();
        if !valid_penalty(penalty_factor) {
            return Err(GraphError::InvalidPenalty { rule: name, factor: penalty_factor });
        }
        Ok(Self {
            name,
            description: description.into(),
            penalty_factor,
            edges: edges.into_iter().collect(),
        })
    }
}

fn valid_penalty(factor: f64) -> bool {
    factor.is_finite() && factor > 1.0
}

/// The rule that penalised a path segment, as reported to callers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedCondition {
    pub name:        String,
    pub description: String,
}

impl From<&ConditionRule> for AppliedCondition {
    fn from(rule: &ConditionRule) -> Self {
        Self { name: rule.name.clone(), description: rule.description.clone() }
    }
}

// ── WeightView ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct EdgeOverride {
    factor: f64,
    /// Indices into the view's rule slice, in rule order.
    rules:  Vec<usize>,
}

/// Time weights for one request, layered over a shared [`RoadGraph`].
pub struct WeightView<'a> {
    graph:     &'a RoadGraph,
    rules:     &'a [ConditionRule],
    speed_mps: f64,
    overrides: FxHashMap<EdgeId, EdgeOverride>,
}

impl<'a> WeightView<'a> {
    /// Build the overlay for `rules` at `speed_kmh`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidSpeed`] unless `speed_kmh` lies in
    ///   [`SPEED_RANGE_KMH`](pf_core::SPEED_RANGE_KMH).
    /// - [`GraphError::InvalidPenalty`] for a rule whose factor is not finite
    ///   and `> 1` (rules assembled field by field skip [`ConditionRule::new`]).
    pub fn build(graph: &'a RoadGraph, rules: &'a [ConditionRule], speed_kmh: f64) -> GraphResult<Self> {
        if !is_valid_speed_kmh(speed_kmh) {
            return Err(GraphError::InvalidSpeed(speed_kmh));
        }
        if let Some(rule) = rules.iter().find(|r| !valid_penalty(r.penalty_factor)) {
            return Err(GraphError::InvalidPenalty { rule: rule.name.clone(), factor: rule.penalty_factor });
        }

        let mut overrides: FxHashMap<EdgeId, EdgeOverride> = FxHashMap::default();
        for (idx, rule) in rules.iter().enumerate() {
            for &(osm_u, osm_v) in &rule.edges {
                let (Some(u), Some(v)) = (graph.node_by_osm_id(osm_u), graph.node_by_osm_id(osm_v)) else {
                    log::debug!("condition {:?}: edge ({osm_u}, {osm_v}) not in graph, ignored", rule.name);
                    continue;
                };
                for edge in graph.edges_between(u, v) {
                    let entry = overrides
                        .entry(edge)
                        .or_insert_with(|| EdgeOverride { factor: 1.0, rules: Vec::new() });
                    entry.factor *= rule.penalty_factor;
                    entry.rules.push(idx);
                }
            }
        }

        Ok(Self { graph, rules, speed_mps: kmh_to_mps(speed_kmh), overrides })
    }

    /// A view with no conditions: plain `length / speed` times.
    pub fn plain(graph: &'a RoadGraph, speed_kmh: f64) -> GraphResult<Self> {
        Self::build(graph, &[], speed_kmh)
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    /// Number of edges carrying a penalty.
    pub fn penalized_edges(&self) -> usize {
        self.overrides.len()
    }

    /// Product of all penalty factors on `edge` (1.0 when unpenalised).
    pub fn factor(&self, edge: EdgeId) -> f64 {
        self.overrides.get(&edge).map_or(1.0, |o| o.factor)
    }

    /// Adjusted traversal time of `edge` in seconds.
    pub fn time_s(&self, edge: EdgeId) -> f64 {
        self.graph.edge_length_m(edge) / self.speed_mps * self.factor(edge)
    }

    /// Rules penalising `edge`, in rule order.
    pub fn conditions(&self, edge: EdgeId) -> impl Iterator<Item = &ConditionRule> + '_ {
        self.overrides
            .get(&edge)
            .into_iter()
            .flat_map(|o| o.rules.iter().map(|&i| &self.rules[i]))
    }
}

impl EdgeWeights for WeightView<'_> {
    #[inline]
    fn weight(&self, edge: EdgeId) -> f64 {
        self.time_s(edge)
    }
}
