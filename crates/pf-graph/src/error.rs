//! Graph-subsystem error type.

use thiserror::Error;

use pf_core::{EdgeId, NodeId};

/// Errors produced by `pf-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("graph has no nodes to snap to")]
    EmptyGraph,

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("node with OSM id {0} added twice")]
    DuplicateNode(i64),

    #[error("edge {from} -> {to} has invalid length {length_m}")]
    InvalidLength { from: NodeId, to: NodeId, length_m: f64 },

    #[error("graph exceeds the id space for {0}")]
    Capacity(&'static str),

    #[error("condition {rule:?} has penalty factor {factor}; factors must be finite and > 1")]
    InvalidPenalty { rule: String, factor: f64 },

    #[error("speed {0} km/h is outside 0.1..=1000")]
    InvalidSpeed(f64),

    #[error("path is inconsistent at edge {edge}: {reason}")]
    InconsistentPath { edge: EdgeId, reason: &'static str },

    #[error("path has no nodes")]
    EmptyPath,
}

pub type GraphResult<T> = Result<T, GraphError>;
