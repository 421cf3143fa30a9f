//! `pf-graph` — street multigraph, snapping, weighting, search, and path
//! extraction.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadGraph` (CSR multigraph + R-tree), `RoadGraphBuilder`   |
//! | [`snap`]    | nearest-node snapping with deterministic tie-break          |
//! | [`overlay`] | `ConditionRule`, `WeightView` (sparse per-request weights)  |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`, `EdgeWeights`    |
//! | [`path`]    | `extract` → `PathGeometry` (polyline + segments)            |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on reported types.         |

pub mod error;
pub mod network;
pub mod overlay;
pub mod path;
pub mod router;
pub mod snap;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use network::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
pub use overlay::{AppliedCondition, ConditionRule, WeightView};
pub use path::{extract, PathGeometry, PathSegment};
pub use router::{shortest_path, ByLength, DijkstraRouter, EdgeWeights, Route, Router};
pub use snap::snap;
