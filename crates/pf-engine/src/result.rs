//! Route results and their wire form.

use pf_core::GeoPoint;
use pf_graph::AppliedCondition;

use crate::OptimizeFor;

// ── RouteResult ───────────────────────────────────────────────────────────────

/// A query coordinate and the graph node it snapped to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnappedEndpoint {
    pub query:       GeoPoint,
    pub node_osm_id: i64,
    pub node_pos:    GeoPoint,
}

/// One traversed edge.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSegment {
    /// Source node id.
    pub u:            i64,
    /// Target node id.
    pub v:            i64,
    /// Which of the parallel `u → v` edges was traversed.
    pub parallel_key: u32,
    pub length_m:     f64,
    pub time_s:       f64,
    /// This edge's own polyline, `u` first and `v` last.
    pub coordinates:  Vec<GeoPoint>,
    pub applied_condition: Option<AppliedCondition>,
}

/// Outcome of [`RoutingEngine::route`](crate::RoutingEngine::route).
///
/// `total_length_m` is always the physical length of the chosen edges.
/// `total_time_s` is the overlay-weighted sum for [`OptimizeFor::Time`] and
/// `total_length_m / speed` for [`OptimizeFor::Distance`].
#[derive(Clone, Debug, PartialEq)]
pub struct RouteResult {
    pub total_length_m: f64,
    pub total_time_s:   f64,
    pub coordinates:    Vec<GeoPoint>,
    pub segments:       Vec<RouteSegment>,
    pub start:          SnappedEndpoint,
    pub end:            SnappedEndpoint,
    pub optimize_for:   OptimizeFor,
    pub speed_kmh:      f64,
}

impl RouteResult {
    /// Snapped start node id.
    pub fn start_node(&self) -> i64 {
        self.start.node_osm_id
    }

    /// Snapped end node id.
    pub fn end_node(&self) -> i64 {
        self.end.node_osm_id
    }

    /// `true` when start and end snapped to the same node.
    pub fn is_trivial(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments that carry a condition.
    pub fn affected_segments(&self) -> usize {
        self.segments.iter().filter(|s| s.applied_condition.is_some()).count()
    }

    /// Shape into the service response: metres to 2 decimals, minutes to 1.
    pub fn to_response(&self) -> RouteResponse {
        RouteResponse {
            start_point:         EndpointResponse::from(&self.start),
            end_point:           EndpointResponse::from(&self.end),
            path_coordinates:    self.coordinates.iter().copied().map(Coordinate::from).collect(),
            total_length_meters: round_to(self.total_length_m, 2),
            total_time_minutes:  round_to(self.total_time_s / 60.0, 1),
            optimize_for:        self.optimize_for,
            average_speed_kmh:   self.speed_kmh,
            path_segments:       self.segments.iter().map(SegmentResponse::from).collect(),
        }
    }
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

// ── RouteResponse ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl From<GeoPoint> for Coordinate {
    fn from(p: GeoPoint) -> Self {
        Self { lat: p.lat, lon: p.lon }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndpointResponse {
    /// Query coordinate, before snapping.
    pub lat: f64,
    pub lon: f64,
    pub nearest_node_osmid: i64,
}

impl From<&SnappedEndpoint> for EndpointResponse {
    fn from(e: &SnappedEndpoint) -> Self {
        Self { lat: e.query.lat, lon: e.query.lon, nearest_node_osmid: e.node_osm_id }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentResponse {
    pub u:             i64,
    pub v:             i64,
    pub key:           u32,
    pub length_meters: f64,
    pub time_minutes:  f64,
    pub coordinates:   Vec<Coordinate>,
    pub applied_condition: Option<AppliedCondition>,
}

impl From<&RouteSegment> for SegmentResponse {
    fn from(s: &RouteSegment) -> Self {
        Self {
            u:                 s.u,
            v:                 s.v,
            key:               s.parallel_key,
            length_meters:     round_to(s.length_m, 2),
            time_minutes:      round_to(s.time_s / 60.0, 1),
            coordinates:       s.coordinates.iter().copied().map(Coordinate::from).collect(),
            applied_condition: s.applied_condition.clone(),
        }
    }
}

/// Service-facing route response.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResponse {
    pub start_point:         EndpointResponse,
    pub end_point:           EndpointResponse,
    pub path_coordinates:    Vec<Coordinate>,
    pub total_length_meters: f64,
    pub total_time_minutes:  f64,
    pub optimize_for:        OptimizeFor,
    pub average_speed_kmh:   f64,
    pub path_segments:       Vec<SegmentResponse>,
}
