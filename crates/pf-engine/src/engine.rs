//! The routing engine: cache lookup, snapping, search, and assembly.

use std::sync::Arc;
use std::time::Instant;

use pf_cache::{GraphCache, GraphKey, GraphSource};
use pf_core::{EdgeId, GeoPoint};
use pf_graph::{
    extract, snap, ByLength, ConditionRule, DijkstraRouter, GraphError, PathSegment, RoadGraph,
    Router, WeightView,
};

use crate::{
    EngineConfig, EngineResult, OptimizeFor, RouteError, RouteQuery, RouteRequest, RouteResponse,
    RouteResult, RouteSegment, SnappedEndpoint,
};

/// Answers route requests against graphs held in a shared [`GraphCache`].
///
/// # Type parameters
///
/// - `S`: how graphs are acquired on a cache miss.
/// - `R`: the search algorithm.  Defaults to [`DijkstraRouter`]; swap it at
///   compile time with no runtime overhead.
///
/// The engine holds no per-request state.  One instance (typically behind an
/// `Arc`) serves every worker; condition overlays are built per call and
/// never touch the cached graph.
pub struct RoutingEngine<S: GraphSource, R: Router = DijkstraRouter> {
    cache:  Arc<GraphCache<S>>,
    router: R,
    config: EngineConfig,
}

impl<S: GraphSource> RoutingEngine<S, DijkstraRouter> {
    /// Create an engine using Dijkstra search.
    ///
    /// # Errors
    ///
    /// [`RouteError::Config`] if `config` fails [`EngineConfig::validate`].
    pub fn new(cache: Arc<GraphCache<S>>, config: EngineConfig) -> EngineResult<Self> {
        Self::with_router(cache, DijkstraRouter, config)
    }
}

impl<S: GraphSource, R: Router> RoutingEngine<S, R> {
    pub fn with_router(cache: Arc<GraphCache<S>>, router: R, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { cache, router, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &GraphCache<S> {
        &self.cache
    }

    /// Validate a raw query, route it, and shape the response.
    pub fn query(&self, query: &RouteQuery, conditions: &[ConditionRule]) -> EngineResult<RouteResponse> {
        let request = query.validate()?;
        Ok(self.route(&request, conditions)?.to_response())
    }

    /// Route `request`, applying `conditions` when optimising for time.
    ///
    /// # Errors
    ///
    /// | Variant                             | Cause                                   |
    /// |-------------------------------------|-----------------------------------------|
    /// | [`RouteError::InputValidation`]     | coordinate or speed out of range        |
    /// | [`RouteError::GraphUnavailable`]    | graph acquisition failed                |
    /// | [`RouteError::NodeSnapFailure`]     | graph has no nodes                      |
    /// | [`RouteError::NoPathFound`]         | end not reachable from start            |
    /// | [`RouteError::InternalComputation`] | anything else                           |
    pub fn route(&self, request: &RouteRequest, conditions: &[ConditionRule]) -> EngineResult<RouteResult> {
        request.validate()?;
        let key = self.config.key(request.network);
        let graph = self.cache.get_or_load(&key, &self.config.place_query)?;
        self.route_on(&key, &graph, request, conditions)
    }

    fn route_on(
        &self,
        key:        &GraphKey,
        graph:      &RoadGraph,
        request:    &RouteRequest,
        conditions: &[ConditionRule],
    ) -> EngineResult<RouteResult> {
        let fail = |e: GraphError| classify(key, graph, request, e);
        let speed_kmh = request
            .speed_override_kmh
            .unwrap_or_else(|| self.config.speeds.speed_kmh(request.network));

        // ── Snap ──────────────────────────────────────────────────────────
        let from = snap(graph, request.start.lat, request.start.lon).map_err(fail)?;
        let to = snap(graph, request.end.lat, request.end.lon).map_err(fail)?;
        let start = SnappedEndpoint { query: request.start, node_osm_id: graph.osm_id(from), node_pos: graph.node_pos(from) };
        let end = SnappedEndpoint { query: request.end, node_osm_id: graph.osm_id(to), node_pos: graph.node_pos(to) };

        if from == to {
            log::debug!("{key}: start and end snap to node {}", start.node_osm_id);
            return Ok(RouteResult {
                total_length_m: 0.0,
                total_time_s:   0.0,
                coordinates:    vec![start.node_pos],
                segments:       Vec::new(),
                start,
                end,
                optimize_for:   request.optimize_for,
                speed_kmh,
            });
        }

        // ── Search ────────────────────────────────────────────────────────
        let t0 = Instant::now();
        let (route, view) = match request.optimize_for {
            OptimizeFor::Distance => {
                let view = WeightView::plain(graph, speed_kmh).map_err(fail)?;
                (self.router.route(graph, from, to, &ByLength(graph)), view)
            }
            OptimizeFor::Time => {
                let view = WeightView::build(graph, conditions, speed_kmh).map_err(fail)?;
                (self.router.route(graph, from, to, &view), view)
            }
        };
        let route = route.map_err(fail)?;
        log::debug!(
            "{key}: {} route {} -> {} over {} edges ({} penalised) in {:.1} ms",
            request.optimize_for,
            start.node_osm_id,
            end.node_osm_id,
            route.edges.len(),
            view.penalized_edges(),
            t0.elapsed().as_secs_f64() * 1e3,
        );

        // ── Assemble ──────────────────────────────────────────────────────
        let path = extract(graph, &route.nodes, &route.edges, &view).map_err(fail)?;
        let total_length_m = route.length_m(graph);
        let total_time_s = match request.optimize_for {
            OptimizeFor::Distance => total_length_m / view.speed_mps(),
            OptimizeFor::Time     => path.segments.iter().map(|s| s.time_s).sum(),
        };

        Ok(RouteResult {
            total_length_m,
            total_time_s,
            coordinates: path.coordinates,
            segments: path.segments.into_iter().map(|s| segment(graph, s)).collect(),
            start,
            end,
            optimize_for: request.optimize_for,
            speed_kmh,
        })
    }
}

fn segment(graph: &RoadGraph, s: PathSegment) -> RouteSegment {
    RouteSegment {
        u:                 graph.osm_id(s.from),
        v:                 graph.osm_id(s.to),
        parallel_key:      graph.parallel_key(s.edge),
        length_m:          s.length_m,
        time_s:            s.time_s,
        coordinates:       edge_polyline(graph, s.edge),
        applied_condition: s.applied_condition,
    }
}

fn edge_polyline(graph: &RoadGraph, edge: EdgeId) -> Vec<GeoPoint> {
    match graph.geometry(edge) {
        Some(points) => points.to_vec(),
        None => vec![
            graph.node_pos(graph.edge_from[edge.index()]),
            graph.node_pos(graph.edge_to[edge.index()]),
        ],
    }
}

/// Map a graph-layer failure onto the routing taxonomy.
fn classify(key: &GraphKey, graph: &RoadGraph, request: &RouteRequest, e: GraphError) -> RouteError {
    match e {
        GraphError::EmptyGraph => RouteError::NodeSnapFailure { key: key.clone() },
        GraphError::NoRoute { from, to } => RouteError::NoPathFound {
            key:  key.clone(),
            from: graph.osm_id(from),
            to:   graph.osm_id(to),
        },
        other => {
            log::warn!("{key}: routing {} -> {} failed: {other}", request.start, request.end);
            RouteError::InternalComputation {
                context: format!("graph {key}, route {} -> {}: {other}", request.start, request.end),
            }
        }
    }
}
