//! Synthetic Maricá, RJ street network.
//!
//! Nine intersections around the town centre, a lagoon-side avenue with a
//! curved geometry, and a service road running parallel to one block so the
//! drive graph is a true multigraph.  Stands in for a map-data download.

use std::thread;
use std::time::Duration;

use pf_cache::{GraphKey, GraphSource, SourceError, SourceResult};
use pf_core::{GeoPoint, NetworkType, NodeId};
use pf_graph::{EdgeAttrs, GraphError, RoadGraph, RoadGraphBuilder};

/// `(osm_id, lat, lon)`.
const INTERSECTIONS: [(i64, f64, f64); 9] = [
    (3_001, -22.9194, -42.8186), // Praça Orlando de Barros Pimentel
    (3_002, -22.9188, -42.8160),
    (3_003, -22.9181, -42.8131),
    (3_004, -22.9215, -42.8190),
    (3_005, -22.9209, -42.8163),
    (3_006, -22.9202, -42.8129),
    (3_007, -22.9240, -42.8195), // lagoon side
    (3_008, -22.9236, -42.8165),
    (3_009, -22.9230, -42.8124),
];

/// Two-way streets `(a, b, intermediate points)`.
const STREETS: [(i64, i64, &[(f64, f64)]); 10] = [
    (3_001, 3_002, &[]),
    (3_002, 3_003, &[]),
    (3_004, 3_005, &[]),
    (3_005, 3_006, &[]),
    (3_001, 3_004, &[]),
    (3_002, 3_005, &[]),
    (3_003, 3_006, &[]),
    (3_004, 3_007, &[]),
    (3_006, 3_009, &[]),
    // Lagoon avenue, curving south of the block.
    (3_007, 3_009, &[(-22.9247, -42.8178), (-22.9249, -42.8151), (-22.9241, -42.8133)]),
];

/// One-way service road `3_005 → 3_008`, parallel to a two-way street.
const SERVICE_ROAD: &[(f64, f64)] = &[(-22.9221, -42.8158)];

/// Pedestrian-only footbridge.
const FOOTBRIDGE: (i64, i64) = (3_008, 3_009);

/// Build the network for `network`.  `walk` and `all` include the
/// footbridge; `drive` and `all` include the service road.
pub fn build_network(network: NetworkType) -> Result<RoadGraph, GraphError> {
    let mut b = RoadGraphBuilder::with_capacity(INTERSECTIONS.len(), 2 * STREETS.len() + 3);
    for (osm_id, lat, lon) in INTERSECTIONS {
        b.add_node(osm_id, GeoPoint::new(lat, lon))?;
    }

    let pos = |b: &RoadGraphBuilder, osm_id: i64| {
        b.node_by_osm_id(osm_id)
            .and_then(|n| b.node_pos(n).map(|p| (n, p)))
            .ok_or(GraphError::NodeNotFound(NodeId::INVALID))
    };

    for (a, c, bends) in STREETS {
        let ((na, pa), (nc, pc)) = (pos(&b, a)?, pos(&b, c)?);
        b.add_road(na, nc, polyline(pa, bends, pc))?;
    }

    let ((n5, p5), (n8, p8)) = (pos(&b, 3_005)?, pos(&b, 3_008)?);
    b.add_road(n5, n8, polyline(p5, &[], p8))?;
    if matches!(network, NetworkType::Drive | NetworkType::All) {
        b.add_edge(n5, n8, polyline(p5, SERVICE_ROAD, p8))?;
    }

    if matches!(network, NetworkType::Walk | NetworkType::All) {
        let ((na, pa), (nc, pc)) = (pos(&b, FOOTBRIDGE.0)?, pos(&b, FOOTBRIDGE.1)?);
        b.add_road(na, nc, polyline(pa, &[], pc))?;
    }

    Ok(b.build())
}

/// Edge attributes whose length is the haversine length of the polyline.
fn polyline(from: GeoPoint, bends: &[(f64, f64)], to: GeoPoint) -> EdgeAttrs {
    let mut points = Vec::with_capacity(bends.len() + 2);
    points.push(from);
    points.extend(bends.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)));
    points.push(to);

    let length_m = points.windows(2).map(|w| w[0].distance_m(w[1])).sum();
    let attrs = EdgeAttrs::new(length_m);
    if bends.is_empty() { attrs } else { attrs.with_geometry(points) }
}

// ── SyntheticSource ───────────────────────────────────────────────────────────

/// A [`GraphSource`] that "downloads" [`build_network`] after a delay.
pub struct SyntheticSource {
    pub latency: Duration,
}

impl GraphSource for SyntheticSource {
    fn fetch(&self, key: &GraphKey, place_query: &str) -> SourceResult<RoadGraph> {
        log::info!("fetching {} network for {place_query:?}", key.network);
        thread::sleep(self.latency);
        build_network(key.network).map_err(SourceError::from)
    }
}
