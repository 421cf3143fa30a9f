//! Unit tests for pf-graph.
//!
//! All tests use hand-built graphs so they run without any map data.

#[cfg(test)]
mod helpers {
    use pf_core::{GeoPoint, NodeId};
    use crate::{EdgeAttrs, RoadGraph, RoadGraphBuilder};

    /// Small grid.
    ///
    /// Nodes (lat, lon), OSM ids 100..=104:
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Two-way streets: 0-1, 1-2, 2-4 (100 m each), 0-3 (500 m), 3-4 (100 m).
    /// Shortest 0→4 by length is 0→1→2→4 = 300 m; the detour 0→3→4 is 600 m.
    pub fn grid() -> (RoadGraph, [NodeId; 5]) {
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_node(100, GeoPoint::new(0.0, 0.0)).unwrap();
        let n1 = b.add_node(101, GeoPoint::new(0.0, 1.0)).unwrap();
        let n2 = b.add_node(102, GeoPoint::new(0.0, 2.0)).unwrap();
        let n3 = b.add_node(103, GeoPoint::new(1.0, 0.0)).unwrap();
        let n4 = b.add_node(104, GeoPoint::new(1.0, 2.0)).unwrap();

        b.add_road(n0, n1, EdgeAttrs::new(100.0)).unwrap();
        b.add_road(n1, n2, EdgeAttrs::new(100.0)).unwrap();
        b.add_road(n2, n4, EdgeAttrs::new(100.0)).unwrap();
        b.add_road(n0, n3, EdgeAttrs::new(500.0)).unwrap();
        b.add_road(n3, n4, EdgeAttrs::new(100.0)).unwrap();

        (b.build(), [n0, n1, n2, n3, n4])
    }

    /// Two nodes joined by two parallel one-way edges a→b.
    ///
    /// key 0: 100 m, straight.  key 1: 40 m with a bent geometry.
    pub fn parallel_pair() -> (RoadGraph, NodeId, NodeId) {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_node(2, GeoPoint::new(0.0, 0.001)).unwrap();
        b.add_directed_edge(a, c, 100.0).unwrap();
        let bent = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0002, 0.0005),
            GeoPoint::new(0.0, 0.001),
        ];
        b.add_edge(a, c, EdgeAttrs::new(40.0).with_geometry(bent)).unwrap();
        (b.build(), a, c)
    }
}

// ── Builder & graph structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use pf_core::{GeoPoint, NodeId};
    use crate::{EdgeAttrs, GraphError, RoadGraphBuilder};

    #[test]
    fn empty_build() {
        let g = RoadGraphBuilder::new().build();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn csr_out_edges() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::grid();
        assert_eq!(g.out_degree(n0), 2);
        assert_eq!(g.out_degree(n1), 2);
        assert_eq!(g.out_degree(n2), 2);
        assert_eq!(g.out_degree(n3), 2);
        assert_eq!(g.out_degree(n4), 2);
        for e in g.out_edges(n0) {
            assert_eq!(g.edge_from[e.index()], n0);
        }
        assert!(g.out_edges(n0).any(|e| g.edge_to[e.index()] == n1));
    }

    #[test]
    fn osm_ids_resolve() {
        let (g, [_, n1, ..]) = super::helpers::grid();
        assert_eq!(g.node_by_osm_id(101), Some(n1));
        assert_eq!(g.osm_id(n1), 101);
        assert_eq!(g.node_by_osm_id(999), None);
    }

    #[test]
    fn parallel_keys_follow_insertion_order() {
        let (g, a, c) = super::helpers::parallel_pair();
        let edges: Vec<_> = g.edges_between(a, c).collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(g.parallel_key(edges[0]), 0);
        assert_eq!(g.parallel_key(edges[1]), 1);
        assert_eq!(g.edge_length_m(edges[0]), 100.0);
        assert_eq!(g.edge_length_m(edges[1]), 40.0);
        assert!(g.geometry(edges[0]).is_none());
        assert_eq!(g.geometry(edges[1]).map(<[_]>::len), Some(3));
    }

    #[test]
    fn duplicate_osm_id_rejected() {
        let mut b = RoadGraphBuilder::new();
        b.add_node(7, GeoPoint::new(0.0, 0.0)).unwrap();
        let err = b.add_node(7, GeoPoint::new(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode(7)));
    }

    #[test]
    fn negative_or_nan_length_rejected() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_node(2, GeoPoint::new(0.0, 1.0)).unwrap();
        assert!(matches!(
            b.add_directed_edge(a, c, -1.0),
            Err(GraphError::InvalidLength { .. })
        ));
        assert!(b.add_directed_edge(a, c, f64::NAN).is_err());
        assert!(b.add_directed_edge(a, c, 0.0).is_ok());
    }

    #[test]
    fn edge_to_unknown_node_rejected() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let err = b.add_directed_edge(a, NodeId(5), 1.0).unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(NodeId(5))));
    }

    #[test]
    fn add_road_reverses_geometry() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_node(2, GeoPoint::new(0.0, 1.0)).unwrap();
        let geom = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.1, 0.5), GeoPoint::new(0.0, 1.0)];
        b.add_road(a, c, EdgeAttrs::new(120.0).with_geometry(geom.clone())).unwrap();
        let g = b.build();

        let fwd = g.edges_between(a, c).next().unwrap();
        let back = g.edges_between(c, a).next().unwrap();
        assert_eq!(g.geometry(fwd).unwrap(), geom.as_slice());
        let reversed: Vec<_> = geom.iter().rev().copied().collect();
        assert_eq!(g.geometry(back).unwrap(), reversed.as_slice());
    }

    #[test]
    fn debug_summarises_counts() {
        let (g, _) = super::helpers::grid();
        let shown = format!("{g:?}");
        assert!(shown.starts_with("RoadGraph"), "{shown}");
        assert!(shown.contains(&format!("nodes: {}", g.node_count())), "{shown}");
        assert!(shown.contains(&format!("edges: {}", g.edge_count())), "{shown}");
    }

    #[test]
    fn single_point_geometry_is_absent() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_node(2, GeoPoint::new(0.0, 1.0)).unwrap();
        b.add_edge(a, c, EdgeAttrs::new(1.0).with_geometry(vec![GeoPoint::new(0.0, 0.0)])).unwrap();
        let g = b.build();
        assert!(g.geometry(pf_core::EdgeId(0)).is_none());
    }
}

// ── Snapping ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use pf_core::{GeoPoint, NodeId};
    use crate::{snap, GraphError, RoadGraphBuilder};

    #[test]
    fn snap_exact_position() {
        let (g, [n0, ..]) = super::helpers::grid();
        assert_eq!(snap(&g, 0.0, 0.0).unwrap(), n0);
    }

    #[test]
    fn snap_nearest() {
        let (g, [n0, n1, ..]) = super::helpers::grid();
        assert_eq!(snap(&g, 0.0, 0.4).unwrap(), n0);
        assert_eq!(snap(&g, 0.0, 0.6).unwrap(), n1);
    }

    #[test]
    fn empty_graph_fails() {
        let g = RoadGraphBuilder::new().build();
        assert!(g.snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
        assert!(matches!(snap(&g, 0.0, 0.0), Err(GraphError::EmptyGraph)));
    }

    #[test]
    fn ties_break_to_smallest_node_id() {
        let mut b = RoadGraphBuilder::new();
        b.add_node(50, GeoPoint::new(5.0, 5.0)).unwrap();
        let first = b.add_node(90, GeoPoint::new(1.0, 1.0)).unwrap();
        let second = b.add_node(10, GeoPoint::new(1.0, 1.0)).unwrap();
        let g = b.build();
        assert!(first < second);
        assert_eq!(snap(&g, 1.2, 1.2).unwrap(), first);
    }

    #[test]
    fn equidistant_distinct_nodes_break_to_smallest_node_id() {
        // Mirrored about the query on the equator, so the chord lengths are
        // exactly equal.  The higher OSM id gets the lower NodeId.
        let mut b = RoadGraphBuilder::new();
        let west = b.add_node(700, GeoPoint::new(0.0, -0.01)).unwrap();
        let east = b.add_node(600, GeoPoint::new(0.0, 0.01)).unwrap();
        let g = b.build();
        assert!(west < east);
        assert_eq!(snap(&g, 0.0, 0.0).unwrap(), west);

        let mut b = RoadGraphBuilder::new();
        let east = b.add_node(600, GeoPoint::new(0.0, 0.01)).unwrap();
        let west = b.add_node(700, GeoPoint::new(0.0, -0.01)).unwrap();
        let g = b.build();
        assert!(east < west);
        assert_eq!(snap(&g, 0.0, 0.0).unwrap(), east);
    }

    #[test]
    fn snapping_is_geodesic_not_planar() {
        // At 60° N one degree of longitude is ~55.6 km, one of latitude
        // ~111 km.  Planar degrees would pick `north`.
        let mut b = RoadGraphBuilder::new();
        let north = b.add_node(1, GeoPoint::new(61.0, 10.0)).unwrap();
        let east = b.add_node(2, GeoPoint::new(60.0, 11.5)).unwrap();
        let g = b.build();
        assert_eq!(snap(&g, 60.0, 10.0).unwrap(), east);
        assert_ne!(east, north);
    }

    #[test]
    fn k_nearest_order() {
        let (g, nodes) = super::helpers::grid();
        let nearest = g.k_nearest_nodes(GeoPoint::new(0.0, 0.1), 2);
        assert_eq!(nearest, vec![nodes[0], nodes[1]]);
        let _: NodeId = nearest[0];
    }
}

// ── Dijkstra routing ─────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use pf_core::{GeoPoint, NodeId};
    use crate::{shortest_path, ByLength, DijkstraRouter, GraphError, RoadGraphBuilder, Router};

    #[test]
    fn trivial_same_node() {
        let (g, [n0, ..]) = super::helpers::grid();
        let r = DijkstraRouter.route(&g, n0, n0, &ByLength(&g)).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.nodes, vec![n0]);
        assert_eq!(r.total_weight, 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (g, [n0, n1, n2, _, n4]) = super::helpers::grid();
        let r = shortest_path(&g, n0, n4, &ByLength(&g)).unwrap();
        assert_eq!(r.total_weight, 300.0);
        assert_eq!(r.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(r.edges.len(), 3);
        for (i, e) in r.edges.iter().enumerate() {
            assert_eq!(g.edge_from[e.index()], r.nodes[i]);
            assert_eq!(g.edge_to[e.index()], r.nodes[i + 1]);
        }
        assert_eq!(r.length_m(&g), 300.0);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_node(2, GeoPoint::new(1.0, 0.0)).unwrap();
        let g = b.build();
        let result = shortest_path(&g, a, c, &ByLength(&g));
        assert!(matches!(result, Err(GraphError::NoRoute { .. })));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_node(2, GeoPoint::new(0.0, 1.0)).unwrap();
        b.add_directed_edge(a, c, 100.0).unwrap();
        let g = b.build();
        assert!(shortest_path(&g, a, c, &ByLength(&g)).is_ok());
        assert!(matches!(
            shortest_path(&g, c, a, &ByLength(&g)),
            Err(GraphError::NoRoute { .. })
        ));
    }

    #[test]
    fn unknown_endpoint_is_node_not_found() {
        let (g, [n0, ..]) = super::helpers::grid();
        let result = shortest_path(&g, n0, NodeId(42), &ByLength(&g));
        assert!(matches!(result, Err(GraphError::NodeNotFound(NodeId(42)))));
    }

    #[test]
    fn cheapest_parallel_edge_is_tracked() {
        let (g, a, c) = super::helpers::parallel_pair();
        let r = shortest_path(&g, a, c, &ByLength(&g)).unwrap();
        assert_eq!(r.edges.len(), 1);
        assert_eq!(g.parallel_key(r.edges[0]), 1);
        assert_eq!(r.length_m(&g), 40.0);
    }

    #[test]
    fn equal_cost_parallel_edges_pick_lowest_key() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_node(2, GeoPoint::new(0.0, 1.0)).unwrap();
        b.add_directed_edge(a, c, 70.0).unwrap();
        b.add_directed_edge(a, c, 70.0).unwrap();
        let g = b.build();
        let r = shortest_path(&g, a, c, &ByLength(&g)).unwrap();
        assert_eq!(g.parallel_key(r.edges[0]), 0);
    }
}

// ── Condition overlay ────────────────────────────────────────────────────────

#[cfg(test)]
mod overlay {
    use crate::{shortest_path, ByLength, ConditionRule, EdgeWeights, GraphError, WeightView};

    fn closure_on_1_2() -> ConditionRule {
        ConditionRule::new("works", "Road works on 101-102", 10.0, [(101, 102)]).unwrap()
    }

    #[test]
    fn base_weight_is_length_over_speed() {
        let (g, [n0, n1, ..]) = super::helpers::grid();
        let view = WeightView::plain(&g, 36.0).unwrap(); // 10 m/s
        let e = g.edges_between(n0, n1).next().unwrap();
        assert!((view.time_s(e) - 10.0).abs() < 1e-9);
        assert_eq!(view.penalized_edges(), 0);
    }

    #[test]
    fn penalty_multiplies_matching_direction_only() {
        let (g, [_, n1, n2, ..]) = super::helpers::grid();
        let rules = [closure_on_1_2()];
        let view = WeightView::build(&g, &rules, 36.0).unwrap();
        let fwd = g.edges_between(n1, n2).next().unwrap();
        let back = g.edges_between(n2, n1).next().unwrap();
        assert!((view.weight(fwd) - 100.0).abs() < 1e-9);
        assert!((view.weight(back) - 10.0).abs() < 1e-9);
        assert_eq!(view.penalized_edges(), 1);
        assert_eq!(view.conditions(fwd).next().map(|r| r.name.as_str()), Some("works"));
        assert_eq!(view.conditions(back).count(), 0);
    }

    #[test]
    fn overlapping_rules_compose() {
        let (g, [_, n1, n2, ..]) = super::helpers::grid();
        let rules = [
            closure_on_1_2(),
            ConditionRule::new("jam", "Congestion", 1.5, [(101, 102), (555, 556)]).unwrap(),
        ];
        let view = WeightView::build(&g, &rules, 36.0).unwrap();
        let e = g.edges_between(n1, n2).next().unwrap();
        assert!((view.factor(e) - 15.0).abs() < 1e-9);
        let names: Vec<_> = view.conditions(e).map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["works", "jam"]);
    }

    #[test]
    fn penalty_applies_to_every_parallel_edge() {
        let (g, a, c) = super::helpers::parallel_pair();
        let rules = [ConditionRule::new("x", "", 2.0, [(1, 2)]).unwrap()];
        let view = WeightView::build(&g, &rules, 36.0).unwrap();
        assert_eq!(view.penalized_edges(), 2);
        for e in g.edges_between(a, c) {
            assert_eq!(view.factor(e), 2.0);
        }
    }

    #[test]
    fn time_objective_avoids_penalty_length_objective_does_not() {
        let (g, [n0, _, _, n3, n4]) = super::helpers::grid();
        let rules = [closure_on_1_2()];
        let view = WeightView::build(&g, &rules, 36.0).unwrap();

        let by_time = shortest_path(&g, n0, n4, &view).unwrap();
        assert_eq!(by_time.nodes, vec![n0, n3, n4]);
        assert_eq!(by_time.length_m(&g), 600.0);

        let by_length = shortest_path(&g, n0, n4, &ByLength(&g)).unwrap();
        assert_eq!(by_length.length_m(&g), 300.0);
    }

    #[test]
    fn invalid_inputs_rejected() {
        let (g, _) = super::helpers::grid();
        assert!(matches!(
            ConditionRule::new("soft", "", 1.0, [(1, 2)]),
            Err(GraphError::InvalidPenalty { .. })
        ));
        assert!(ConditionRule::new("nan", "", f64::NAN, [(0, 0); 0]).is_err());
        assert!(matches!(WeightView::plain(&g, 0.0), Err(GraphError::InvalidSpeed(_))));
        assert!(matches!(WeightView::plain(&g, 1e-306), Err(GraphError::InvalidSpeed(_))));
    }

    #[test]
    fn hand_built_rule_with_bad_factor_rejected() {
        let (g, _) = super::helpers::grid();
        for factor in [0.5, -2.0, f64::NAN] {
            let rules = [ConditionRule { penalty_factor: factor, ..closure_on_1_2() }];
            match WeightView::build(&g, &rules, 36.0) {
                Err(GraphError::InvalidPenalty { rule, .. }) => assert_eq!(rule, "works"),
                Err(e) => panic!("{factor}: unexpected error {e}"),
                Ok(_) => panic!("{factor}: accepted"),
            }
        }
    }
}

// ── Path extraction ──────────────────────────────────────────────────────────

#[cfg(test)]
mod path {
    use pf_core::{EdgeId, GeoPoint};
    use crate::{extract, shortest_path, ByLength, EdgeAttrs, GraphError, RoadGraphBuilder, WeightView};

    #[test]
    fn geometry_is_stitched_without_duplicating_first_point() {
        let u_pos = GeoPoint::new(10.0, 20.0);
        let v_pos = GeoPoint::new(10.003, 20.003);
        // p0 approximates u but is not bit-identical.
        let p0 = GeoPoint::new(10.000_000_1, 20.0);
        let p1 = GeoPoint::new(10.001, 20.0005);
        let p2 = GeoPoint::new(10.002, 20.002);
        let p3 = GeoPoint::new(10.003, 20.003);

        let mut b = RoadGraphBuilder::new();
        let u = b.add_node(1, u_pos).unwrap();
        let v = b.add_node(2, v_pos).unwrap();
        b.add_edge(u, v, EdgeAttrs::new(450.0).with_geometry(vec![p0, p1, p2, p3])).unwrap();
        let g = b.build();

        let view = WeightView::plain(&g, 36.0).unwrap();
        let out = extract(&g, &[u, v], &[EdgeId(0)], &view).unwrap();
        assert_eq!(out.coordinates, vec![u_pos, p1, p2, p3]);
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.segments[0].length_m, 450.0);
        assert!((out.segments[0].time_s - 45.0).abs() < 1e-9);
    }

    #[test]
    fn edges_without_geometry_emit_target_nodes() {
        let (g, [n0, n1, n2, _, n4]) = super::helpers::grid();
        let r = shortest_path(&g, n0, n4, &ByLength(&g)).unwrap();
        let view = WeightView::plain(&g, 36.0).unwrap();
        let out = extract(&g, &r.nodes, &r.edges, &view).unwrap();
        let expected: Vec<_> = [n0, n1, n2, n4].iter().map(|&n| g.node_pos(n)).collect();
        assert_eq!(out.coordinates, expected);
        assert_eq!(out.segments.iter().map(|s| s.from).collect::<Vec<_>>(), vec![n0, n1, n2]);
    }

    #[test]
    fn chosen_parallel_edge_geometry_is_used() {
        let (g, a, c) = super::helpers::parallel_pair();
        let r = shortest_path(&g, a, c, &ByLength(&g)).unwrap();
        let view = WeightView::plain(&g, 36.0).unwrap();
        let out = extract(&g, &r.nodes, &r.edges, &view).unwrap();
        assert_eq!(out.coordinates.len(), 3);
        assert_eq!(out.coordinates[1], GeoPoint::new(0.0002, 0.0005));
    }

    #[test]
    fn no_consecutive_duplicates() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_node(2, GeoPoint::new(0.0, 0.0)).unwrap(); // co-located
        let d = b.add_node(3, GeoPoint::new(0.0, 1.0)).unwrap();
        b.add_directed_edge(a, c, 0.0).unwrap();
        b.add_directed_edge(c, d, 100.0).unwrap();
        let g = b.build();
        let r = shortest_path(&g, a, d, &ByLength(&g)).unwrap();
        let view = WeightView::plain(&g, 36.0).unwrap();
        let out = extract(&g, &r.nodes, &r.edges, &view).unwrap();
        assert_eq!(out.coordinates, vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]);
        assert_eq!(out.segments.len(), 2);
        for w in out.coordinates.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn single_node_path_has_one_coordinate() {
        let (g, [n0, ..]) = super::helpers::grid();
        let view = WeightView::plain(&g, 36.0).unwrap();
        let out = extract(&g, &[n0], &[], &view).unwrap();
        assert_eq!(out.coordinates, vec![g.node_pos(n0)]);
        assert!(out.segments.is_empty());
    }

    #[test]
    fn inconsistent_inputs_rejected() {
        let (g, [n0, n1, n2, ..]) = super::helpers::grid();
        let view = WeightView::plain(&g, 36.0).unwrap();
        assert!(matches!(extract(&g, &[], &[], &view), Err(GraphError::EmptyPath)));

        let e01 = g.edges_between(n0, n1).next().unwrap();
        assert!(matches!(
            extract(&g, &[n0, n2], &[e01], &view),
            Err(GraphError::InconsistentPath { .. })
        ));
        assert!(matches!(
            extract(&g, &[n0, n1, n2], &[e01], &view),
            Err(GraphError::InconsistentPath { .. })
        ));
    }
}

// ── Optimality (property) ────────────────────────────────────────────────────

#[cfg(test)]
mod optimality {
    use proptest::prelude::*;

    use pf_core::{GeoPoint, NodeId};
    use crate::{shortest_path, ByLength, GraphError, RoadGraph, RoadGraphBuilder};

    /// Reference distances by Bellman-Ford relaxation over every edge.
    fn bellman_ford(g: &RoadGraph, from: NodeId) -> Vec<f64> {
        let mut dist = vec![f64::INFINITY; g.node_count()];
        dist[from.index()] = 0.0;
        for _ in 0..g.node_count() {
            for e in 0..g.edge_count() {
                let (u, v) = (g.edge_from[e], g.edge_to[e]);
                let cand = dist[u.index()] + g.edge_length_m[e];
                if cand < dist[v.index()] {
                    dist[v.index()] = cand;
                }
            }
        }
        dist
    }

    fn build(n: usize, edges: &[(usize, usize, u16)]) -> RoadGraph {
        let mut b = RoadGraphBuilder::new();
        let ids: Vec<_> = (0..n)
            .map(|i| b.add_node(i as i64, GeoPoint::new(0.0, i as f64 * 0.01)).unwrap())
            .collect();
        for &(u, v, len) in edges {
            b.add_directed_edge(ids[u % n], ids[v % n], f64::from(len)).unwrap();
        }
        b.build()
    }

    proptest! {
        #[test]
        fn dijkstra_matches_exhaustive_reference(
            n in 2usize..9,
            edges in prop::collection::vec((0usize..9, 0usize..9, 0u16..500), 0..30),
            src in 0usize..9,
            dst in 0usize..9,
        ) {
            let g = build(n, &edges);
            let (from, to) = (NodeId((src % n) as u32), NodeId((dst % n) as u32));
            let reference = bellman_ford(&g, from)[to.index()];

            match shortest_path(&g, from, to, &ByLength(&g)) {
                Ok(route) => {
                    prop_assert_eq!(route.total_weight, reference);
                    prop_assert_eq!(route.length_m(&g), reference);
                    prop_assert_eq!(route.nodes.first().copied(), Some(from));
                    prop_assert_eq!(route.nodes.last().copied(), Some(to));
                    for (i, e) in route.edges.iter().enumerate() {
                        prop_assert_eq!(g.edge_from[e.index()], route.nodes[i]);
                        prop_assert_eq!(g.edge_to[e.index()], route.nodes[i + 1]);
                    }
                }
                Err(GraphError::NoRoute { .. }) => prop_assert!(reference.is_infinite()),
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}
