//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `pf-engine` calls routing through the [`Router`] trait so applications
//! can swap in A* or contraction hierarchies without touching the engine.
//!
//! # Weights
//!
//! The search is objective-agnostic: it minimises whatever an
//! [`EdgeWeights`] source returns.  [`ByLength`] yields raw metres,
//! [`crate::WeightView`] yields condition-adjusted seconds.
//!
//! # Parallel edges
//!
//! The predecessor array stores the `EdgeId` that produced each node's
//! best relaxation, so the returned [`Route`] names the exact parallel edge
//! the search used.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use pf_core::{EdgeId, NodeId};

use crate::network::RoadGraph;
use crate::{GraphError, GraphResult};

// ── Weights ───────────────────────────────────────────────────────────────────

/// Source of non-negative edge costs for a search.
pub trait EdgeWeights {
    fn weight(&self, edge: EdgeId) -> f64;
}

/// Physical edge length in metres.
pub struct ByLength<'a>(pub &'a RoadGraph);

impl EdgeWeights for ByLength<'_> {
    #[inline]
    fn weight(&self, edge: EdgeId) -> f64 {
        self.0.edge_length_m(edge)
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The node sequence and the specific edges chosen between them.
///
/// `edges[i]` connects `nodes[i]` to `nodes[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes:        Vec<NodeId>,
    pub edges:        Vec<EdgeId>,
    /// Sum of the search weights along `edges`.
    pub total_weight: f64,
}

impl Route {
    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Physical length of the chosen edges, whatever the search objective.
    pub fn length_m(&self, graph: &RoadGraph) -> f64 {
        self.edges.iter().map(|&e| graph.edge_length_m(e)).sum()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path search.
///
/// Implementations must be `Send + Sync`; one router instance serves every
/// concurrent request.
pub trait Router: Send + Sync {
    /// Compute the least-weight route from `from` to `to`.
    ///
    /// `from == to` yields a trivial route rather than an error.
    fn route(
        &self,
        graph:   &RoadGraph,
        from:    NodeId,
        to:      NodeId,
        weights: &dyn EdgeWeights,
    ) -> GraphResult<Route>;
}

/// Standard Dijkstra over the CSR graph with a binary heap.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph:   &RoadGraph,
        from:    NodeId,
        to:      NodeId,
        weights: &dyn EdgeWeights,
    ) -> GraphResult<Route> {
        shortest_path(graph, from, to, weights)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Eq for State {}

// Min-heap on cost, then on node id so equal-cost pops are deterministic.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-pair Dijkstra.  Stops as soon as `to` is settled.
///
/// # Errors
///
/// - [`GraphError::NodeNotFound`] if either endpoint is outside the graph.
/// - [`GraphError::NoRoute`] if `to` is unreachable from `from`.
pub fn shortest_path<W>(graph: &RoadGraph, from: NodeId, to: NodeId, weights: &W) -> GraphResult<Route>
where
    W: EdgeWeights + ?Sized,
{
    for node in [from, to] {
        if !graph.contains_node(node) {
            return Err(GraphError::NodeNotFound(node));
        }
    }
    if from == to {
        return Ok(Route { nodes: vec![from], edges: vec![], total_weight: 0.0 });
    }

    let n = graph.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut settled   = vec![false; n];

    dist[from.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: from });

    while let Some(State { cost, node }) = heap.pop() {
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if node == to {
            return reconstruct(graph, &prev_edge, from, to, cost);
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if settled[neighbor.index()] {
                continue;
            }
            let w = weights.weight(edge);
            debug_assert!(w >= 0.0, "negative weight on {edge}");
            let new_cost = cost + w;

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(State { cost: new_cost, node: neighbor });
            }
        }
    }

    Err(GraphError::NoRoute { from, to })
}

fn reconstruct(
    graph:     &RoadGraph,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    total:     f64,
) -> GraphResult<Route> {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if !e.is_valid() {
            return Err(GraphError::InconsistentPath { edge: e, reason: "missing predecessor edge" });
        }
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| graph.edge_to[e.index()]));

    Ok(Route { nodes, edges, total_weight: total })
}
