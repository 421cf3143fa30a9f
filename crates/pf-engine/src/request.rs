//! Route requests and boundary validation.
//!
//! [`RouteQuery`] is the raw, untrusted form a service layer receives.
//! [`RouteQuery::validate`] turns it into a typed [`RouteRequest`]; nothing
//! unvalidated reaches the cache or the search.

use std::fmt;
use std::str::FromStr;

use pf_core::{is_valid_speed_kmh, CoreError, GeoPoint, NetworkType};

use crate::{EngineResult, RouteError};

// ── OptimizeFor ───────────────────────────────────────────────────────────────

/// Search objective.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptimizeFor {
    /// Shortest physical length.  Condition rules are ignored.
    #[default]
    Distance,
    /// Fastest under the condition overlay.
    Time,
}

impl OptimizeFor {
    pub fn as_str(self) -> &'static str {
        match self {
            OptimizeFor::Distance => "distance",
            OptimizeFor::Time     => "time",
        }
    }
}

impl FromStr for OptimizeFor {
    type Err = RouteError;

    /// Accepts `distance` (alias `length`) and `time`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distance" | "length" => Ok(OptimizeFor::Distance),
            "time"                => Ok(OptimizeFor::Time),
            other => Err(RouteError::InputValidation(format!(
                "unknown optimize_for {other:?}: expected distance or time"
            ))),
        }
    }
}

impl fmt::Display for OptimizeFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RouteRequest ──────────────────────────────────────────────────────────────

/// A validated route request.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteRequest {
    pub start:              GeoPoint,
    pub end:                GeoPoint,
    pub network:            NetworkType,
    pub optimize_for:       OptimizeFor,
    /// Overrides the network type's default speed when set.
    pub speed_override_kmh: Option<f64>,
}

impl RouteRequest {
    /// Distance-optimised request at the network's default speed.
    pub fn new(start: GeoPoint, end: GeoPoint, network: NetworkType) -> Self {
        Self { start, end, network, optimize_for: OptimizeFor::Distance, speed_override_kmh: None }
    }

    pub fn optimize_for(mut self, objective: OptimizeFor) -> Self {
        self.optimize_for = objective;
        self
    }

    pub fn with_speed_kmh(mut self, kmh: f64) -> Self {
        self.speed_override_kmh = Some(kmh);
        self
    }

    /// Re-check invariants of a request built directly rather than through
    /// [`RouteQuery::validate`].
    pub fn validate(&self) -> EngineResult<()> {
        for p in [self.start, self.end] {
            if !p.is_valid() {
                return Err(CoreError::CoordinateOutOfRange { lat: p.lat, lon: p.lon }.into());
            }
        }
        if let Some(kmh) = self.speed_override_kmh {
            if !is_valid_speed_kmh(kmh) {
                return Err(CoreError::InvalidSpeed(kmh).into());
            }
        }
        Ok(())
    }
}

// ── RouteQuery ────────────────────────────────────────────────────────────────

/// Raw query parameters as received by a service layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteQuery {
    pub network_type: String,
    pub start_lat:    f64,
    pub start_lon:    f64,
    pub end_lat:      f64,
    pub end_lon:      f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub optimize_for: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub average_speed_kmh: Option<f64>,
}

impl RouteQuery {
    /// Validate and convert into a [`RouteRequest`].
    ///
    /// # Errors
    ///
    /// [`RouteError::InputValidation`] for an unknown network type or
    /// objective, a non-finite or out-of-range coordinate, or a speed
    /// outside [`SPEED_RANGE_KMH`](pf_core::SPEED_RANGE_KMH).
    pub fn validate(&self) -> EngineResult<RouteRequest> {
        let network: NetworkType = self.network_type.parse()?;

        let optimize_for = match self.optimize_for.as_deref() {
            None | Some("") => OptimizeFor::default(),
            Some(s) => s.parse()?,
        };

        let request = RouteRequest {
            start: GeoPoint::new(self.start_lat, self.start_lon),
            end: GeoPoint::new(self.end_lat, self.end_lon),
            network,
            optimize_for,
            speed_override_kmh: self.average_speed_kmh,
        };
        request.validate()?;
        Ok(request)
    }
}
