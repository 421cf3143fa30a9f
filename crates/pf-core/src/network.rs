//! Street-network types and their default travel speeds.
//!
//! A `NetworkType` selects which graph is routed over (one cached graph per
//! place and type) and which default speed converts length into time.

use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::CoreError;

/// The kind of street network a graph was acquired for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NetworkType {
    /// Roads open to private vehicles.
    Drive,
    /// Cycle-accessible ways.
    Bike,
    /// Pedestrian-accessible ways.
    Walk,
    /// Every way regardless of access.
    All,
}

impl NetworkType {
    pub const ALL: [NetworkType; 4] =
        [NetworkType::Drive, NetworkType::Bike, NetworkType::Walk, NetworkType::All];

    /// Lowercase label used in graph keys, file names and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkType::Drive => "drive",
            NetworkType::Bike  => "bike",
            NetworkType::Walk  => "walk",
            NetworkType::All   => "all",
        }
    }
}

impl FromStr for NetworkType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drive" => Ok(NetworkType::Drive),
            "bike"  => Ok(NetworkType::Bike),
            "walk"  => Ok(NetworkType::Walk),
            "all"   => Ok(NetworkType::All),
            _       => Err(CoreError::UnknownNetworkType(s.to_owned())),
        }
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SpeedTable ────────────────────────────────────────────────────────────────

/// Default average speed (km/h) per network type, used when a request does
/// not override it.
///
/// | Type    | Default |
/// |---------|---------|
/// | `drive` | 50      |
/// | `bike`  | 15      |
/// | `walk`  | 5       |
/// | `all`   | 10      |
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpeedTable {
    pub drive_kmh: f64,
    pub bike_kmh:  f64,
    pub walk_kmh:  f64,
    /// Used for `all`, which mixes modes.
    pub fallback_kmh: f64,
}

impl SpeedTable {
    pub fn speed_kmh(&self, network: NetworkType) -> f64 {
        match network {
            NetworkType::Drive => self.drive_kmh,
            NetworkType::Bike  => self.bike_kmh,
            NetworkType::Walk  => self.walk_kmh,
            NetworkType::All   => self.fallback_kmh,
        }
    }

    /// Check that every entry lies in [`SPEED_RANGE_KMH`].
    pub fn validate(&self) -> Result<(), CoreError> {
        for network in NetworkType::ALL {
            let kmh = self.speed_kmh(network);
            if !is_valid_speed_kmh(kmh) {
                return Err(CoreError::InvalidSpeed(kmh));
            }
        }
        Ok(())
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self { drive_kmh: 50.0, bike_kmh: 15.0, walk_kmh: 5.0, fallback_kmh: 10.0 }
    }
}

/// Accepted average speeds in km/h.  Below the lower bound per-edge times
/// overflow to infinity and connected nodes look unreachable.
pub const SPEED_RANGE_KMH: RangeInclusive<f64> = 0.1..=1000.0;

/// `true` if `kmh` lies in [`SPEED_RANGE_KMH`].  NaN never does.
#[inline]
pub fn is_valid_speed_kmh(kmh: f64) -> bool {
    SPEED_RANGE_KMH.contains(&kmh)
}

/// Convert km/h to m/s.
#[inline]
pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh * 1000.0 / 3600.0
}
