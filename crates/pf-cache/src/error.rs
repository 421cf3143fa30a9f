use thiserror::Error;

use pf_graph::GraphError;

use crate::GraphKey;

/// Failure to acquire a graph from a [`crate::GraphSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// Upstream provider or transport problem.  Retrying later may succeed.
    #[error("graph provider unavailable: {0}")]
    Unavailable(String),

    #[error("no persisted graph for {0}")]
    NotFound(String),

    #[error("invalid graph key {0:?}")]
    InvalidKey(String),

    #[error("graph data parse error: {0}")]
    Parse(String),

    #[error("graph construction error: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure surfaced by [`crate::GraphCache`].
///
/// `reason` is the rendered [`SourceError`]; every caller waiting on the
/// same acquisition receives the same text.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("graph {key} unavailable: {reason}")]
    Unavailable { key: GraphKey, reason: String },
}

pub type CacheResult<T> = Result<T, CacheError>;
