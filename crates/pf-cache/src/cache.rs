//! Keyed registry of loaded graphs with per-key single-flight acquisition.
//!
//! # Concurrency
//!
//! - Loaded graphs sit in an `RwLock<HashMap<GraphKey, Arc<RoadGraph>>>`.
//!   A hit costs one read lock and an `Arc` clone.  The write lock is held
//!   only for the insert.
//! - A miss joins the key's *flight*, an `Arc<OnceLock<outcome>>` held in a
//!   small `Mutex<HashMap>` for the duration of the acquisition.  The
//!   mutex guards only the flight map, never a fetch, so a slow acquisition
//!   for one key does not delay first loads of other keys.
//! - `OnceLock::get_or_init` runs exactly one initialiser per flight; every
//!   other caller of that flight blocks until it finishes and observes the
//!   same outcome, success or failure.
//! - The caller that ran the initialiser retires the flight.  A later miss
//!   after a failed flight starts a fresh one, so failures are never cached.
//!
//! # Failure mode
//!
//! There is no timeout: a source that never returns blocks every caller of
//! that key's flight indefinitely.  Other keys are unaffected.
//!
//! Graphs are never evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};
use std::time::Instant;

use pf_graph::RoadGraph;

use crate::{CacheError, CacheResult, GraphKey, GraphSource};

type Outcome = Result<Arc<RoadGraph>, String>;
type Flight  = Arc<OnceLock<Outcome>>;

/// Process-wide graph cache.  Construct once at service start and share by
/// reference (or `Arc`) with every routing worker.
pub struct GraphCache<S> {
    source:    S,
    graphs:    RwLock<HashMap<GraphKey, Arc<RoadGraph>>>,
    in_flight: Mutex<HashMap<GraphKey, Flight>>,
}

impl<S: GraphSource> GraphCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            graphs:    RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Return the graph for `key`, acquiring it on first use.
    ///
    /// # Errors
    ///
    /// [`CacheError::Unavailable`] if the acquisition this call joined (or
    /// started) failed.  Nothing is cached in that case.
    pub fn get_or_load(&self, key: &GraphKey, place_query: &str) -> CacheResult<Arc<RoadGraph>> {
        if let Some(graph) = self.get(key) {
            return Ok(graph);
        }

        let flight = {
            let mut in_flight = lock(&self.in_flight);
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };

        let mut led = false;
        let outcome = flight.get_or_init(|| {
            led = true;
            self.acquire(key, place_query)
        });

        if led {
            let mut in_flight = lock(&self.in_flight);
            if in_flight.get(key).is_some_and(|f| Arc::ptr_eq(f, &flight)) {
                in_flight.remove(key);
            }
        }

        outcome
            .clone()
            .map_err(|reason| CacheError::Unavailable { key: key.clone(), reason })
    }

    /// Return the cached graph for `key` without acquiring it.
    pub fn get(&self, key: &GraphKey) -> Option<Arc<RoadGraph>> {
        self.graphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Preload a graph, replacing any cached entry for `key`.
    pub fn insert(&self, key: GraphKey, graph: RoadGraph) -> Arc<RoadGraph> {
        let graph = Arc::new(graph);
        self.graphs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&graph));
        graph
    }

    pub fn contains(&self, key: &GraphKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.graphs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached keys in ascending order.
    pub fn keys(&self) -> Vec<GraphKey> {
        let mut keys: Vec<_> = self
            .graphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Callers currently attached to `key`'s flight (0 when none is open).
    #[cfg(test)]
    pub(crate) fn flight_callers(&self, key: &GraphKey) -> usize {
        lock(&self.in_flight).get(key).map_or(0, |f| Arc::strong_count(f) - 1)
    }

    // Runs at most once per flight.
    fn acquire(&self, key: &GraphKey, place_query: &str) -> Outcome {
        // A flight retired just before this one started may have inserted.
        if let Some(graph) = self.get(key) {
            return Ok(graph);
        }

        let t0 = Instant::now();
        match self.source.fetch(key, place_query) {
            Ok(graph) => {
                log::info!(
                    "graph {key} acquired in {:.2} s: {} nodes, {} edges",
                    t0.elapsed().as_secs_f64(),
                    graph.node_count(),
                    graph.edge_count(),
                );
                Ok(self.insert(key.clone(), graph))
            }
            Err(e) => {
                log::warn!("failed to acquire graph {key}: {e}");
                Err(e.to_string())
            }
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
