//! `pf-engine` — route queries over cached street graphs.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`config`]  | `EngineConfig` — place, upstream query, default speeds          |
//! | [`request`] | `RouteQuery` (raw) → `RouteRequest` (validated), `OptimizeFor`  |
//! | [`engine`]  | `RoutingEngine<S, R>` — cache → snap → search → assemble        |
//! | [`result`]  | `RouteResult`, `RouteSegment`, `RouteResponse` (wire form)      |
//! | [`error`]   | `RouteError`, `EngineResult<T>`                                 |
//!
//! # Request pipeline
//!
//! 1. `RouteQuery::validate` rejects bad coordinates, network types,
//!    objectives, and speeds before anything else runs.
//! 2. The graph for `(place_prefix, network)` comes from the shared
//!    [`GraphCache`](pf_cache::GraphCache), acquired once per key.
//! 3. Both endpoints snap to their nearest nodes.  Equal nodes short-circuit
//!    to a one-coordinate, zero-length result.
//! 4. Distance searches weigh raw edge lengths; time searches weigh
//!    `length / speed × penalties` through a per-request
//!    [`WeightView`](pf_graph::WeightView).
//! 5. The chosen edges (parallel keys included) are stitched into
//!    coordinates and annotated segments.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                           |
//! |---------|------------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on queries, responses, config. |

pub mod config;
pub mod engine;
pub mod error;
pub mod request;
pub mod result;


pub use config::EngineConfig;
pub use engine::RoutingEngine;
pub use error::{EngineResult, RouteError};
pub use request::{OptimizeFor, RouteQuery, RouteRequest};
pub use result::{
    Coordinate, EndpointResponse, RouteResponse, RouteResult, RouteSegment, SegmentResponse,
    SnappedEndpoint,
};
