//! Nearest-node snapping.
//!
//! The spatial index stores unit-sphere vectors, so its Euclidean ordering
//! matches the haversine metric used for edge lengths.  Several nodes at
//! exactly the minimal distance resolve to the smallest `NodeId`.

use pf_core::{GeoPoint, NodeId};

use crate::network::RoadGraph;
use crate::{GraphError, GraphResult};

impl RoadGraph {
    /// Return the node nearest to `pos`, or `None` for an empty graph.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        let query = pos.unit_vector();
        let mut candidates = self.spatial_idx.nearest_neighbor_iter_with_distance_2(&query);

        let (first, best_d2) = candidates.next()?;
        let mut best = first.id;
        for (entry, d2) in candidates {
            if d2 > best_d2 {
                break;
            }
            best = best.min(entry.id);
        }
        Some(best)
    }

    /// Return up to `k` nearest nodes to `pos`, by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.unit_vector())
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

/// Snap a raw coordinate to its nearest graph node.
///
/// # Errors
///
/// [`GraphError::EmptyGraph`] if the graph has no nodes.
pub fn snap(graph: &RoadGraph, lat: f64, lon: f64) -> GraphResult<NodeId> {
    graph
        .snap_to_node(GeoPoint::new(lat, lon))
        .ok_or(GraphError::EmptyGraph)
}
