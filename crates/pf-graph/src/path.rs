//! Path extraction: node-level route → coordinate polyline + segments.
//!
//! The polyline starts at the first node's position.  Each chosen edge then
//! contributes its geometry minus the first point (which repeats the
//! previous end), or just its target node when it has no geometry.  A point
//! equal to the last emitted one is never pushed twice.

use pf_core::{EdgeId, GeoPoint, NodeId};

use crate::network::RoadGraph;
use crate::overlay::{AppliedCondition, WeightView};
use crate::{GraphError, GraphResult};

/// One traversed edge of a route.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSegment {
    pub edge:     EdgeId,
    pub from:     NodeId,
    pub to:       NodeId,
    pub length_m: f64,
    pub time_s:   f64,
    /// First rule that penalised this edge, if any.
    pub applied_condition: Option<AppliedCondition>,
}

/// Polyline and per-edge breakdown of a route.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathGeometry {
    pub coordinates: Vec<GeoPoint>,
    pub segments:    Vec<PathSegment>,
}

/// Stitch `nodes`/`edges` into a [`PathGeometry`], timing each segment
/// with `view`.
///
/// `edges[i]` must run from `nodes[i]` to `nodes[i + 1]`.
///
/// # Errors
///
/// [`GraphError::EmptyPath`] for an empty node list and
/// [`GraphError::InconsistentPath`] if an edge does not connect its pair.
pub fn extract(
    graph: &RoadGraph,
    nodes: &[NodeId],
    edges: &[EdgeId],
    view:  &WeightView<'_>,
) -> GraphResult<PathGeometry> {
    let Some(&first) = nodes.first() else {
        return Err(GraphError::EmptyPath);
    };
    if edges.len() + 1 != nodes.len() {
        let edge = edges.first().copied().unwrap_or(EdgeId::INVALID);
        return Err(GraphError::InconsistentPath { edge, reason: "edge count does not match node count" });
    }
    if !graph.contains_node(first) {
        return Err(GraphError::NodeNotFound(first));
    }

    let mut out = PathGeometry {
        coordinates: vec![graph.node_pos(first)],
        segments:    Vec::with_capacity(edges.len()),
    };

    for (pair, &edge) in nodes.windows(2).zip(edges) {
        let (u, v) = (pair[0], pair[1]);
        if edge.index() >= graph.edge_count() {
            return Err(GraphError::InconsistentPath { edge, reason: "edge not in graph" });
        }
        if graph.edge_from[edge.index()] != u || graph.edge_to[edge.index()] != v {
            return Err(GraphError::InconsistentPath { edge, reason: "edge does not connect its node pair" });
        }

        match graph.geometry(edge) {
            Some(points) => {
                for &p in &points[1..] {
                    push_point(&mut out.coordinates, p);
                }
            }
            None => push_point(&mut out.coordinates, graph.node_pos(v)),
        }

        out.segments.push(PathSegment {
            edge,
            from: u,
            to: v,
            length_m: graph.edge_length_m(edge),
            time_s: view.time_s(edge),
            applied_condition: view.conditions(edge).next().map(AppliedCondition::from),
        });
    }

    Ok(out)
}

fn push_point(coords: &mut Vec<GeoPoint>, p: GeoPoint) {
    if coords.last() != Some(&p) {
        coords.push(p);
    }
}
