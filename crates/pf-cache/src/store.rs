//! CSV graph store.
//!
//! # Layout
//!
//! One directory per [`GraphKey`] under the store root:
//!
//! ```text
//! <root>/<place_prefix>_<network>/nodes.csv
//! <root>/<place_prefix>_<network>/edges.csv
//! ```
//!
//! ```csv
//! osm_id,lat,lon
//! 1001,-22.9194,-42.8186
//! ```
//!
//! ```csv
//! u,v,length_m,travel_time_s,geometry
//! 1001,1002,152.4,,-22.9194 -42.8186;-22.9201 -42.8179;-22.9205 -42.8171
//! ```
//!
//! `u`/`v` are node OSM ids.  `travel_time_s` and `geometry` may be empty.
//! Rows for the same `(u, v)` pair keep their order, so parallel keys
//! survive a save/load round trip.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pf_core::{EdgeId, GeoPoint};
use pf_graph::{EdgeAttrs, RoadGraph, RoadGraphBuilder};

use crate::{GraphKey, GraphSource, SourceError, SourceResult};

const NODES_FILE: &str = "nodes.csv";
const EDGES_FILE: &str = "edges.csv";

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct NodeRecord {
    osm_id: i64,
    lat:    f64,
    lon:    f64,
}

#[derive(Serialize, Deserialize)]
struct EdgeRecord {
    u:             i64,
    v:             i64,
    length_m:      f64,
    travel_time_s: Option<f64>,
    geometry:      String,
}

// ── CsvGraphStore ─────────────────────────────────────────────────────────────

/// Persisted graphs on the local filesystem.
#[derive(Clone, Debug)]
pub struct CsvGraphStore {
    root: PathBuf,
}

impl CsvGraphStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the graph for `key`.
    pub fn graph_dir(&self, key: &GraphKey) -> SourceResult<PathBuf> {
        if !key.is_path_safe() {
            return Err(SourceError::InvalidKey(key.place_prefix.clone()));
        }
        Ok(self.root.join(key.to_string()))
    }

    /// `true` if both CSV files for `key` exist.
    pub fn contains(&self, key: &GraphKey) -> bool {
        self.graph_dir(key)
            .map(|dir| dir.join(NODES_FILE).is_file() && dir.join(EDGES_FILE).is_file())
            .unwrap_or(false)
    }

    pub fn load(&self, key: &GraphKey) -> SourceResult<RoadGraph> {
        let dir = self.graph_dir(key)?;
        if !self.contains(key) {
            return Err(SourceError::NotFound(key.to_string()));
        }
        let nodes = std::fs::File::open(dir.join(NODES_FILE))?;
        let edges = std::fs::File::open(dir.join(EDGES_FILE))?;
        load_graph_reader(nodes, edges)
    }

    /// Write `graph` under `key`, replacing any previous copy.  Returns the
    /// graph directory.
    pub fn save(&self, key: &GraphKey, graph: &RoadGraph) -> SourceResult<PathBuf> {
        let dir = self.graph_dir(key)?;
        std::fs::create_dir_all(&dir)?;
        let nodes = std::fs::File::create(dir.join(NODES_FILE))?;
        let edges = std::fs::File::create(dir.join(EDGES_FILE))?;
        write_graph(graph, nodes, edges)?;
        Ok(dir)
    }
}

impl GraphSource for CsvGraphStore {
    fn fetch(&self, key: &GraphKey, _place_query: &str) -> SourceResult<RoadGraph> {
        self.load(key)
    }
}

// ── Readers / writers ─────────────────────────────────────────────────────────

/// Build a graph from `nodes.csv` and `edges.csv` content.
///
/// Useful for testing (pass `std::io::Cursor`s) or loading from archives.
pub fn load_graph_reader<N: Read, E: Read>(nodes: N, edges: E) -> SourceResult<RoadGraph> {
    let mut builder = RoadGraphBuilder::new();

    for row in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = row.map_err(|e| SourceError::Parse(e.to_string()))?;
        builder.add_node(row.osm_id, GeoPoint::new(row.lat, row.lon))?;
    }

    for row in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let row = row.map_err(|e| SourceError::Parse(e.to_string()))?;
        let lookup = |osm_id: i64| {
            builder.node_by_osm_id(osm_id).ok_or_else(|| {
                SourceError::Parse(format!("edge {} -> {} references unknown node {osm_id}", row.u, row.v))
            })
        };
        let (u, v) = (lookup(row.u)?, lookup(row.v)?);

        let mut attrs = EdgeAttrs::new(row.length_m);
        attrs.travel_time_s = row.travel_time_s;
        if !row.geometry.trim().is_empty() {
            attrs.geometry = Some(parse_geometry(&row.geometry)?);
        }
        builder.add_edge(u, v, attrs)?;
    }

    Ok(builder.build())
}

/// Serialise `graph` as `nodes.csv` / `edges.csv` content.
pub fn write_graph<N: Write, E: Write>(graph: &RoadGraph, nodes: N, edges: E) -> SourceResult<()> {
    let csv_err = |e: csv::Error| SourceError::Parse(e.to_string());

    let mut w = csv::Writer::from_writer(nodes);
    for (pos, &osm_id) in graph.node_pos.iter().zip(&graph.node_osm_id) {
        w.serialize(NodeRecord { osm_id, lat: pos.lat, lon: pos.lon }).map_err(csv_err)?;
    }
    w.flush()?;

    let mut w = csv::Writer::from_writer(edges);
    for i in 0..graph.edge_count() {
        let e = EdgeId(i as u32);
        w.serialize(EdgeRecord {
            u:             graph.osm_id(graph.edge_from[i]),
            v:             graph.osm_id(graph.edge_to[i]),
            length_m:      graph.edge_length_m(e),
            travel_time_s: graph.edge_travel_time_s[i],
            geometry:      graph.geometry(e).map(format_geometry).unwrap_or_default(),
        })
        .map_err(csv_err)?;
    }
    w.flush()?;
    Ok(())
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

fn format_geometry(points: &[GeoPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", p.lat, p.lon))
        .collect::<Vec<_>>()
        .join(";")
}

fn parse_geometry(s: &str) -> SourceResult<Vec<GeoPoint>> {
    s.split(';')
        .map(|pair| {
            let mut it = pair.split_whitespace().map(str::parse::<f64>);
            match (it.next(), it.next(), it.next()) {
                (Some(Ok(lat)), Some(Ok(lon)), None) => Ok(GeoPoint::new(lat, lon)),
                _ => Err(SourceError::Parse(format!(
                    "invalid geometry point {pair:?}: expected \"lat lon\""
                ))),
            }
        })
        .collect()
}
