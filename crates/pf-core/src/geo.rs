//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` stores `f64` latitude/longitude.  Route coordinates are handed
//! back to callers verbatim, so the graph keeps the precision it was
//! acquired with.

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if both components are finite and within WGS-84 bounds.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Edge lengths computed by loaders use this function, and node
    /// snapping orders candidates by the same metric.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Position on the unit sphere.
    ///
    /// Chord length between two such vectors grows monotonically with the
    /// great-circle distance, so a Euclidean nearest-neighbour query over
    /// these vectors ranks candidates exactly as [`distance_m`](Self::distance_m)
    /// would.
    #[inline]
    pub fn unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// Loose equality for coordinates that were sourced independently
    /// (node position vs. edge geometry endpoint).
    #[inline]
    pub fn approx_eq(self, other: GeoPoint, tolerance_deg: f64) -> bool {
        (self.lat - other.lat).abs() <= tolerance_deg
            && (self.lon - other.lon).abs() <= tolerance_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
