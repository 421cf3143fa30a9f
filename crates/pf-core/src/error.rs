//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` covers the parsing
//! and validation helpers that live in this crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown network type {0:?}: expected one of drive, bike, walk, all")]
    UnknownNetworkType(String),

    #[error("coordinate ({lat}, {lon}) is outside WGS-84 bounds")]
    CoordinateOutOfRange { lat: f64, lon: f64 },

    #[error("speed {0} km/h is outside 0.1..=1000")]
    InvalidSpeed(f64),
}

pub type CoreResult<T> = Result<T, CoreError>;
