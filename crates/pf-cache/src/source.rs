//! Graph acquisition.
//!
//! A [`GraphSource`] obtains a graph for a key, synchronously.  It may be
//! slow (a map-data download can take minutes) and may fail; the cache
//! never retries on its behalf.

use std::sync::Arc;

use pf_graph::RoadGraph;

use crate::store::CsvGraphStore;
use crate::{GraphKey, SourceResult};

/// Obtains a [`RoadGraph`] by download or by reading persisted storage.
///
/// `place_query` is the free-text place description handed to upstream
/// providers (e.g. `"Maricá, RJ, Brazil"`); stores keyed on disk use
/// `key` alone.
pub trait GraphSource: Send + Sync {
    fn fetch(&self, key: &GraphKey, place_query: &str) -> SourceResult<RoadGraph>;
}

impl<S: GraphSource + ?Sized> GraphSource for Arc<S> {
    fn fetch(&self, key: &GraphKey, place_query: &str) -> SourceResult<RoadGraph> {
        (**self).fetch(key, place_query)
    }
}

impl<S: GraphSource + ?Sized> GraphSource for Box<S> {
    fn fetch(&self, key: &GraphKey, place_query: &str) -> SourceResult<RoadGraph> {
        (**self).fetch(key, place_query)
    }
}

// ── PersistingSource ──────────────────────────────────────────────────────────

/// Read from disk when possible, otherwise fetch upstream and persist.
///
/// A graph already in the store is loaded without contacting `upstream`.
/// After a successful upstream fetch the graph is saved; a failed save is
/// logged and the fetched graph is still returned.
pub struct PersistingSource<U> {
    store:    CsvGraphStore,
    upstream: U,
}

impl<U: GraphSource> PersistingSource<U> {
    pub fn new(store: CsvGraphStore, upstream: U) -> Self {
        Self { store, upstream }
    }

    pub fn store(&self) -> &CsvGraphStore {
        &self.store
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }
}

impl<U: GraphSource> GraphSource for PersistingSource<U> {
    fn fetch(&self, key: &GraphKey, place_query: &str) -> SourceResult<RoadGraph> {
        if self.store.contains(key) {
            log::info!("graph {key} found on disk, loading");
            return self.store.load(key);
        }

        log::info!("downloading {} network for {place_query:?}", key.network);
        let graph = self.upstream.fetch(key, place_query)?;

        match self.store.save(key, &graph) {
            Ok(dir) => log::info!("graph {key} saved to {}", dir.display()),
            Err(e)  => log::warn!("graph {key} fetched but not persisted: {e}"),
        }
        Ok(graph)
    }
}
