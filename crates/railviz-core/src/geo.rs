//! Geographic primitives shared by the interpolator and the engine.
//!
//! All geometry works directly in degree space (`lng`, `lat`). At city
//! scale the Euclidean approximation is well within marker-placement
//! accuracy, and it keeps every operation branch-free and allocation-free.

/// A point in geographic coordinates, `[lng, lat]` order like the source
/// GeoJSON data.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Squared Euclidean distance in degrees. Used for nearest-vertex
    /// searches where only ordering matters.
    pub fn dist_sq_deg(self, other: Self) -> f64 {
        let dx = self.lng - other.lng;
        let dy = self.lat - other.lat;
        dx * dx + dy * dy
    }

    /// Euclidean distance in degrees. Good enough for arc-length
    /// parameterization of a single line's polyline.
    pub fn dist_deg(self, other: Self) -> f64 {
        self.dist_sq_deg(other).sqrt()
    }

    /// Linear interpolation toward `other`. `t` outside `[0, 1]` is clamped.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            lng: self.lng + (other.lng - self.lng) * t,
            lat: self.lat + (other.lat - self.lat) * t,
        }
    }
}

/// Forward azimuth from `from` to `to` in compass degrees `[0, 360)`.
///
/// Great-circle formula; coincident points return 0 rather than NaN.
pub fn bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    if from == to {
        return 0.0;
    }
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    let theta = y.atan2(x).to_degrees();
    theta.rem_euclid(360.0)
}

/// Rotate a compass bearing by 180 degrees, staying in `[0, 360)`.
pub fn flip_bearing(b: f64) -> f64 {
    (b + 180.0).rem_euclid(360.0)
}
