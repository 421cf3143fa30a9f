//! Street multigraph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays are sorted by source node and indexed by `EdgeId`.  The
//! sort is stable, so parallel edges between the same ordered pair keep
//! their insertion order (and therefore ascending `parallel_key`) inside a
//! node's slice.
//!
//! Edge geometries are stored the same way: the points of edge `e` are
//! `geom_points[ edge_geom_start[e] .. edge_geom_start[e+1] ]`, empty when
//! the edge has no geometry.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over unit-sphere vectors maps a coordinate to its
//! nearest node.  See [`crate::snap`].
//!
//! A built `RoadGraph` is never mutated.  Caches share it behind an `Arc`
//! and per-request weights live in a separate [`crate::WeightView`].

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use pf_core::{EdgeId, GeoPoint, NodeId};

use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the spatial index: a node's unit-sphere position.
#[derive(Clone)]
pub(crate) struct NodeEntry {
    pub(crate) point: [f64; 3],
    pub(crate) id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length on the unit sphere.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed street multigraph in CSR format plus a spatial index.
///
/// Edge and node arrays are `pub` for indexed access on the search hot
/// path.  Do not construct directly; use [`RoadGraphBuilder`].
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Upstream (OSM) identifier of each node.  Indexed by `NodeId`.
    pub node_osm_id: Vec<i64>,

    osm_index: FxHashMap<i64, NodeId>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    /// Source node of each edge.  Needed to walk predecessor edges back
    /// during path reconstruction.
    pub edge_from: Vec<NodeId>,

    pub edge_to: Vec<NodeId>,

    /// Distinguishes parallel edges between the same ordered pair,
    /// numbered from 0 in insertion order.
    pub edge_key: Vec<u32>,

    /// Physical length in metres.  Always `>= 0`.
    pub edge_length_m: Vec<f64>,

    /// Free-flow travel time reported by the source, if any.
    pub edge_travel_time_s: Vec<Option<f64>>,

    edge_geom_start: Vec<u32>,
    geom_points:     Vec<GeoPoint>,

    // ── Spatial index ─────────────────────────────────────────────────────
    pub(crate) spatial_idx: RTree<NodeEntry>,
}

impl RoadGraph {
    /// Construct a graph with no nodes or edges.  Any snap against it fails
    /// with [`GraphError::EmptyGraph`].
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Node lookups ──────────────────────────────────────────────────────

    #[inline]
    pub fn node_pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn osm_id(&self, node: NodeId) -> i64 {
        self.node_osm_id[node.index()]
    }

    pub fn node_by_osm_id(&self, osm_id: i64) -> Option<NodeId> {
        self.osm_index.get(&osm_id).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// All parallel edges `from → to`, in ascending `parallel_key` order.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from)
            .filter(move |e| self.edge_to[e.index()] == to)
    }

    // ── Edge attributes ───────────────────────────────────────────────────

    #[inline]
    pub fn edge_length_m(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()]
    }

    #[inline]
    pub fn parallel_key(&self, edge: EdgeId) -> u32 {
        self.edge_key[edge.index()]
    }

    /// Geometry of `edge`, from its source towards its target.
    ///
    /// `None` when the edge was built without one.
    pub fn geometry(&self, edge: EdgeId) -> Option<&[GeoPoint]> {
        let start = self.edge_geom_start[edge.index()] as usize;
        let end   = self.edge_geom_start[edge.index() + 1] as usize;
        (end > start).then(|| &self.geom_points[start..end])
    }
}

// Counts only; the node and edge arrays are not printed.
impl std::fmt::Debug for RoadGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish_non_exhaustive()
    }
}

// ── EdgeAttrs ─────────────────────────────────────────────────────────────────

/// Attributes of one directed edge handed to the builder.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    pub length_m:      f64,
    pub travel_time_s: Option<f64>,
    /// Ordered points from source to target.  Fewer than two points is
    /// treated as "no geometry".
    pub geometry:      Option<Vec<GeoPoint>>,
}

impl EdgeAttrs {
    pub fn new(length_m: f64) -> Self {
        Self { length_m, travel_time_s: None, geometry: None }
    }

    pub fn with_geometry(mut self, geometry: Vec<GeoPoint>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_travel_time(mut self, secs: f64) -> Self {
        self.travel_time_s = Some(secs);
        self
    }

    /// Same attributes for the opposite direction (geometry reversed).
    pub fn reversed(&self) -> Self {
        Self {
            length_m:      self.length_m,
            travel_time_s: self.travel_time_s,
            geometry:      self.geometry.as_ref().map(|g| g.iter().rev().copied().collect()),
        }
    }
}

/// Geometry endpoints further than this (degrees, ~11 m) from their edge's
/// nodes are logged.  Node positions and geometries are sourced
/// independently and are never required to match exactly.
const GEOMETRY_ENDPOINT_TOLERANCE_DEG: f64 = 1e-4;

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use pf_core::GeoPoint;
/// use pf_graph::{EdgeAttrs, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(101, GeoPoint::new(-22.92, -42.82)).unwrap();
/// let c = b.add_node(102, GeoPoint::new(-22.91, -42.81)).unwrap();
/// b.add_road(a, c, EdgeAttrs::new(1_500.0)).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    nodes:     Vec<GeoPoint>,
    osm_ids:   Vec<i64>,
    osm_index: FxHashMap<i64, NodeId>,
    raw_edges: Vec<RawEdge>,
    next_key:  FxHashMap<(NodeId, NodeId), u32>,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    key:   u32,
    attrs: EdgeAttrs,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            osm_ids:   Vec::with_capacity(nodes),
            osm_index: FxHashMap::default(),
            raw_edges: Vec::with_capacity(edges),
            next_key:  FxHashMap::default(),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, osm_id: i64, pos: GeoPoint) -> GraphResult<NodeId> {
        if self.osm_index.contains_key(&osm_id) {
            return Err(GraphError::DuplicateNode(osm_id));
        }
        let id = NodeId::try_from(self.nodes.len())
            .map_err(|_| GraphError::Capacity("nodes"))?;
        self.nodes.push(pos);
        self.osm_ids.push(osm_id);
        self.osm_index.insert(osm_id, id);
        Ok(id)
    }

    /// Add a **directed** edge and return its parallel key.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) -> GraphResult<u32> {
        for node in [from, to] {
            if node.index() >= self.nodes.len() {
                return Err(GraphError::NodeNotFound(node));
            }
        }
        if !(attrs.length_m.is_finite() && attrs.length_m >= 0.0) {
            return Err(GraphError::InvalidLength { from, to, length_m: attrs.length_m });
        }

        if let Some([first, .., last]) = attrs.geometry.as_deref() {
            let (u, v) = (self.nodes[from.index()], self.nodes[to.index()]);
            if !first.approx_eq(u, GEOMETRY_ENDPOINT_TOLERANCE_DEG)
                || !last.approx_eq(v, GEOMETRY_ENDPOINT_TOLERANCE_DEG)
            {
                log::debug!("edge {from} -> {to}: geometry endpoints {first} .. {last} far from nodes {u} .. {v}");
            }
        }

        let slot = self.next_key.entry((from, to)).or_insert(0);
        let key = *slot;
        *slot += 1;

        self.raw_edges.push(RawEdge { from, to, key, attrs });
        Ok(key)
    }

    /// Convenience: add a directed edge with only a length.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) -> GraphResult<u32> {
        self.add_edge(from, to, EdgeAttrs::new(length_m))
    }

    /// Add edges in **both directions** for a two-way street.  The reverse
    /// edge gets the reversed geometry.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) -> GraphResult<()> {
        let back = attrs.reversed();
        self.add_edge(a, b, attrs)?;
        self.add_edge(b, a, back)?;
        Ok(())
    }

    /// Position of a node added earlier, for loaders that derive edge
    /// lengths from node coordinates.
    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_by_osm_id(&self, osm_id: i64) -> Option<NodeId> {
        self.osm_index.get(&osm_id).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// O(E log E) for the edge sort + O(N log N) for the R-tree bulk load.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();

        // Stable: parallel edges stay in key order within a source slice.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from);

        let edge_count = raw.len();
        let mut edge_from          = Vec::with_capacity(edge_count);
        let mut edge_to            = Vec::with_capacity(edge_count);
        let mut edge_key           = Vec::with_capacity(edge_count);
        let mut edge_length_m      = Vec::with_capacity(edge_count);
        let mut edge_travel_time_s = Vec::with_capacity(edge_count);
        let mut edge_geom_start    = Vec::with_capacity(edge_count + 1);
        let mut geom_points        = Vec::new();

        edge_geom_start.push(0u32);
        for e in raw.iter() {
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_key.push(e.key);
            edge_length_m.push(e.attrs.length_m);
            edge_travel_time_s.push(e.attrs.travel_time_s);
            if let Some(g) = e.attrs.geometry.as_ref().filter(|g| g.len() >= 2) {
                geom_points.extend_from_slice(g);
            }
            edge_geom_start.push(geom_points.len() as u32);
        }

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry {
                point: pos.unit_vector(),
                id:    NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadGraph {
            node_pos: self.nodes,
            node_osm_id: self.osm_ids,
            osm_index: self.osm_index,
            node_out_start,
            edge_from,
            edge_to,
            edge_key,
            edge_length_m,
            edge_travel_time_s,
            edge_geom_start,
            geom_points,
            spatial_idx,
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
