//! `pf-core` — foundational types for the `pathfinder` routing engine.
//!
//! This crate is a dependency of every other `pf-*` crate.  It has no
//! `pf-*` dependencies and a single external one (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`                                    |
//! | [`geo`]         | `GeoPoint`, haversine distance, unit-sphere vectors   |
//! | [`network`]     | `NetworkType` enum, `SpeedTable`                      |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod network;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId};
pub use network::{is_valid_speed_kmh, NetworkType, SpeedTable, SPEED_RANGE_KMH};
