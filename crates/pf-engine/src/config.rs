//! Engine configuration.

use pf_cache::GraphKey;
use pf_core::{NetworkType, SpeedTable};

use crate::{EngineResult, RouteError};

/// Service-level routing configuration.
///
/// Typically loaded from a JSON/TOML file by the application crate and
/// handed to [`RoutingEngine::new`](crate::RoutingEngine::new).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Short place identifier; first half of every [`GraphKey`] and the
    /// directory-name prefix of persisted graphs (e.g. `"marica"`).
    pub place_prefix: String,

    /// Free-text place description handed to graph sources on a miss
    /// (e.g. `"Maricá, Rio de Janeiro, Brazil"`).
    pub place_query: String,

    /// Default speed per network type when a request has no override.
    pub speeds: SpeedTable,
}

impl EngineConfig {
    pub fn new(place_prefix: impl Into<String>, place_query: impl Into<String>) -> Self {
        Self {
            place_prefix: place_prefix.into(),
            place_query:  place_query.into(),
            speeds:       SpeedTable::default(),
        }
    }

    pub fn with_speeds(mut self, speeds: SpeedTable) -> Self {
        self.speeds = speeds;
        self
    }

    /// Cache key for `network` in this place.
    pub fn key(&self, network: NetworkType) -> GraphKey {
        GraphKey::new(self.place_prefix.clone(), network)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.key(NetworkType::Drive).is_path_safe() {
            return Err(RouteError::Config(format!(
                "place prefix {:?} must be non-empty and contain no path separators",
                self.place_prefix
            )));
        }
        self.speeds
            .validate()
            .map_err(|e| RouteError::Config(e.to_string()))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new("marica", "Maricá, Rio de Janeiro, Brazil")
    }
}
