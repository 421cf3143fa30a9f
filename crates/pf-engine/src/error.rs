use thiserror::Error;

use pf_cache::{CacheError, GraphKey};
use pf_core::CoreError;

/// Failures surfaced by [`RoutingEngine`](crate::RoutingEngine).
///
/// `NodeSnapFailure` and `NoPathFound` are deliberately separate variants:
/// an empty graph and a disconnected pair call for different responses.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route query: {0}")]
    InputValidation(String),

    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("graph {key} unavailable: {reason}")]
    GraphUnavailable { key: GraphKey, reason: String },

    #[error("graph {key} has no nodes to snap to")]
    NodeSnapFailure { key: GraphKey },

    #[error(
        "no path found in graph {key} between the nearest nodes ({from} and {to}); \
         the locations might be in disconnected parts of the graph"
    )]
    NoPathFound { key: GraphKey, from: i64, to: i64 },

    #[error("unexpected error during pathfinding: {context}")]
    InternalComputation { context: String },
}

impl RouteError {
    /// HTTP status a service layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            RouteError::InputValidation(_) => 400,
            RouteError::NodeSnapFailure { .. } | RouteError::NoPathFound { .. } => 404,
            RouteError::Config(_)
            | RouteError::GraphUnavailable { .. }
            | RouteError::InternalComputation { .. } => 500,
        }
    }
}

impl From<CoreError> for RouteError {
    fn from(e: CoreError) -> Self {
        RouteError::InputValidation(e.to_string())
    }
}

impl From<CacheError> for RouteError {
    fn from(e: CacheError) -> Self {
        match e {
            CacheError::Unavailable { key, reason } => RouteError::GraphUnavailable { key, reason },
        }
    }
}

pub type EngineResult<T> = Result<T, RouteError>;
