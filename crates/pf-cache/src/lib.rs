//! `pf-cache` — graph acquisition and the process-wide graph cache.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`key`]        | `GraphKey` — `(place_prefix, network_type)`               |
//! | [`source`]     | `GraphSource` trait, `PersistingSource`                   |
//! | [`cache`]      | `GraphCache` — per-key single-flight loading              |
//! | [`store`]      | `CsvGraphStore` — on-disk nodes/edges CSV                 |
//! | [`conditions`] | `load_conditions_csv` — condition-rule CSV source         |
//! | [`error`]      | `SourceError`, `CacheError`                               |
//!
//! # Acquisition flow
//!
//! ```text
//! GraphCache::get_or_load(key)
//!   ├─ cached?            → Arc<RoadGraph>           (read lock only)
//!   └─ join key's flight  → first caller runs GraphSource::fetch,
//!                           every other caller for that key waits and
//!                           observes the same outcome
//! ```

pub mod cache;
pub mod conditions;
pub mod error;
pub mod key;
pub mod source;
pub mod store;


pub use cache::GraphCache;
pub use conditions::{load_conditions_csv, load_conditions_reader};
pub use error::{CacheError, CacheResult, SourceError, SourceResult};
pub use key::GraphKey;
pub use source::{GraphSource, PersistingSource};
pub use store::CsvGraphStore;
