//! quickstart — smallest end-to-end example for the pathfinder engine.
//!
//! Serves a batch of route queries over a synthetic Maricá, RJ network from
//! a pool of Rayon workers sharing one graph cache.  The first query per
//! network type triggers a (simulated) download; the result is persisted as
//! CSV under the data directory so the next run loads it from disk.
//!
//! ```text
//! RUST_LOG=info cargo run -p quickstart -- [data_dir]
//! ```

mod network;

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rayon::prelude::*;

use pf_cache::{load_conditions_reader, CsvGraphStore, GraphCache, PersistingSource};
use pf_engine::{EngineConfig, RouteQuery, RoutingEngine};

use network::SyntheticSource;

// ── Constants ─────────────────────────────────────────────────────────────────

const PLACE_PREFIX: &str = "marica";
const PLACE_QUERY:  &str = "Maricá, Rio de Janeiro, Brazil";
const LATENCY:      Duration = Duration::from_millis(300);

// Flooding on the block north of the lagoon and works on the service road.
const CONDITIONS_CSV: &str = "\
name,description,penalty_factor,u,v\n\
alagamento,Rua alagada,6.0,3004,3005\n\
alagamento,Rua alagada,6.0,3005,3004\n\
obras,Obras na via de servico,3.0,3005,3008\n\
";

// ── Queries ───────────────────────────────────────────────────────────────────

fn query(network: &str, start: (f64, f64), end: (f64, f64), optimize_for: Option<&str>, speed: Option<f64>) -> RouteQuery {
    RouteQuery {
        network_type:      network.to_string(),
        start_lat:         start.0,
        start_lon:         start.1,
        end_lat:           end.0,
        end_lon:           end.1,
        optimize_for:      optimize_for.map(str::to_string),
        average_speed_kmh: speed,
    }
}

fn queries() -> Vec<RouteQuery> {
    let centre = (-22.9195, -42.8185);
    let lagoon = (-22.9239, -42.8196);
    let east   = (-22.9229, -42.8125);
    let south  = (-22.9237, -42.8166);
    vec![
        query("drive", centre, east,   None,             None),
        query("drive", centre, east,   Some("time"),     None),
        query("drive", lagoon, south,  Some("distance"), Some(30.0)),
        query("drive", lagoon, south,  Some("time"),     Some(30.0)),
        query("walk",  south,  east,   None,             None),
        query("bike",  centre, lagoon, Some("time"),     None),
        query("drive", centre, centre, None,             None),
        // Rejected at the boundary.
        query("boat",  centre, east,   None,             None),
        query("drive", (95.0, 0.0), east, None,          None),
    ]
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("pathfinder-quickstart"));
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    println!("=== quickstart — pathfinder routing engine ===");
    println!("Place: {PLACE_QUERY}  |  Data: {}", data_dir.display());
    println!();

    // 1. Graph cache: disk first, synthetic download on a miss.
    let source = PersistingSource::new(CsvGraphStore::new(&data_dir), SyntheticSource { latency: LATENCY });
    let cache = Arc::new(GraphCache::new(source));

    // 2. Engine.
    let engine = RoutingEngine::new(Arc::clone(&cache), EngineConfig::new(PLACE_PREFIX, PLACE_QUERY))?;

    // 3. Current conditions.
    let conditions = load_conditions_reader(Cursor::new(CONDITIONS_CSV)).context("loading conditions")?;
    println!("Loaded {} condition rules", conditions.len());

    // 4. Serve the batch concurrently.
    let batch = queries();
    let t0 = Instant::now();
    let answers: Vec<_> = batch
        .par_iter()
        .map(|q| (q, engine.query(q, &conditions)))
        .collect();
    let elapsed = t0.elapsed();

    for (q, answer) in &answers {
        println!(
            "-- {} {} ({}, {}) -> ({}, {})",
            q.network_type,
            q.optimize_for.as_deref().unwrap_or("distance"),
            q.start_lat, q.start_lon, q.end_lat, q.end_lon,
        );
        match answer {
            Ok(resp) => println!("{}", serde_json::to_string_pretty(resp)?),
            Err(e)   => println!("error {}: {e}", e.http_status()),
        }
    }

    println!();
    println!(
        "{} queries in {:.1} ms  |  cached graphs: {}",
        answers.len(),
        elapsed.as_secs_f64() * 1e3,
        cache.keys().iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
    );
    Ok(())
}
