//! Route interpolator: maps "go from station i to station j, fraction t"
//! requests onto real track geometry.
//!
//! Built per line from the traversal-ordered station coordinates plus an
//! optional detailed polyline of the physical track. Each station is mapped
//! to the polyline vertex (or several, for loop lines whose track revisits
//! an interchange) closest to it within a small tolerance; lookups then
//! pick the occurrence pair that gives a forward, non-backtracking
//! sub-path and walk it by cumulative arc length.
//!
//! Failure policy: never panics, always returns best-effort coordinates.
//! Missing geometry or unmapped stations fall back to straight lines, and
//! zero-length spans return their start point with bearing 0.

use crate::geo::{self, GeoPoint};

/// Snap tolerance for station-to-vertex mapping, in degrees (~200 m).
pub const SNAP_TOLERANCE_DEG: f64 = 0.0018;

/// A concrete point on the track with the forward azimuth of the
/// micro-segment containing it.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TrackPoint {
    pub lng: f64,
    pub lat: f64,
    /// Forward-sense bearing (increasing station index); callers rotate
    /// 180° for reverse-direction trains.
    pub bearing: f64,
}

impl TrackPoint {
    fn new(p: GeoPoint, bearing: f64) -> Self {
        Self {
            lng: p.lng,
            lat: p.lat,
            bearing,
        }
    }
}

/// Per-line geometry lookup. Immutable after construction.
#[derive(Debug, Clone)]
pub struct RouteInterpolator {
    /// Station coordinates in traversal order.
    stations: Vec<GeoPoint>,
    /// Detailed track polyline; empty means straight-line mode.
    path: Vec<GeoPoint>,
    /// For each station, polyline vertex indices within tolerance, one per
    /// pass of the track (ascending). Empty when unmapped.
    occurrences: Vec<Vec<usize>>,
    /// Whether polyline vertex order runs with increasing station index.
    forward_oriented: bool,
}

impl RouteInterpolator {
    pub fn new(stations: Vec<GeoPoint>, detailed_path: Option<Vec<GeoPoint>>) -> Self {
        let path = detailed_path.unwrap_or_default();
        let occurrences: Vec<Vec<usize>> = stations
            .iter()
            .map(|s| map_occurrences(*s, &path))
            .collect();

        // Orientation: compare the primary occurrence of the first and
        // last mapped stations.
        let mapped: Vec<usize> = occurrences
            .iter()
            .filter_map(|occ| occ.first().copied())
            .collect();
        let forward_oriented = match (mapped.first(), mapped.last()) {
            (Some(first), Some(last)) => last >= first,
            _ => true,
        };

        Self {
            stations,
            path,
            occurrences,
            forward_oriented,
        }
    }

    /// Number of stations in this line's traversal order.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Point and bearing at fraction `t` of the track between stations `i`
    /// and `j` (traversal indices). `i == j` returns the station's on-track
    /// position, which is what dwell snapping uses. Out-of-range indices
    /// clamp; `t` clamps to `[0, 1]`.
    pub fn position_between_stations(&self, i: usize, j: usize, t: f64) -> TrackPoint {
        let n = self.stations.len();
        if n == 0 {
            return TrackPoint::new(GeoPoint::new(0.0, 0.0), 0.0);
        }
        let i = i.min(n - 1);
        let j = j.min(n - 1);

        if i == j {
            let point = match self.occurrences[i].first() {
                Some(&v) => self.path[v],
                None => self.stations[i],
            };
            return TrackPoint::new(point, self.bearing_at_station(i));
        }

        match self.choose_span(i, j) {
            Some((va, vb)) => self.walk_span(va, vb, t),
            None => self.straight_line(i, j, t),
        }
    }

    /// Bearing at a station: azimuth between the vertices immediately
    /// before and after its mapped polyline vertex, flipped when the
    /// polyline's overall ordering runs opposite to station order. Falls
    /// back to the azimuth toward the neighboring station.
    pub fn bearing_at_station(&self, index: usize) -> f64 {
        let n = self.stations.len();
        if n == 0 {
            return 0.0;
        }
        let index = index.min(n - 1);

        if let Some(&v) = self.occurrences[index].first() {
            let prev = self.path[v.saturating_sub(1)];
            let next = self.path[(v + 1).min(self.path.len() - 1)];
            if prev != next {
                let b = geo::bearing(prev, next);
                return if self.forward_oriented {
                    b
                } else {
                    geo::flip_bearing(b)
                };
            }
        }

        // No usable geometry: face the next station in traversal order.
        if index + 1 < n {
            geo::bearing(self.stations[index], self.stations[index + 1])
        } else if index > 0 {
            geo::bearing(self.stations[index - 1], self.stations[index])
        } else {
            0.0
        }
    }

    /// Pick the vertex pair for stations `i` -> `j`, minimizing index
    /// distance with a strong preference for a forward-increasing range so
    /// loop lines never route the long way around.
    fn choose_span(&self, i: usize, j: usize) -> Option<(usize, usize)> {
        let occ_i = &self.occurrences[i];
        let occ_j = &self.occurrences[j];
        if self.path.is_empty() || occ_i.is_empty() || occ_j.is_empty() {
            return None;
        }

        let backward_penalty = self.path.len();
        let mut best: Option<((usize, usize), usize)> = None;
        for &va in occ_i {
            for &vb in occ_j {
                let score = if vb >= va {
                    vb - va
                } else {
                    (va - vb) + backward_penalty
                };
                if best.is_none_or(|(_, s)| score < s) {
                    best = Some(((va, vb), score));
                }
            }
        }
        best.map(|(pair, _)| pair)
    }

    /// Walk the sub-path `va..=vb` (reversed when `va > vb`) by cumulative
    /// Euclidean arc length to the point at fraction `t`.
    fn walk_span(&self, va: usize, vb: usize, t: f64) -> TrackPoint {
        let sub: Vec<GeoPoint> = if va <= vb {
            self.path[va..=vb].to_vec()
        } else {
            self.path[vb..=va].iter().rev().copied().collect()
        };

        let mut cumulative = Vec::with_capacity(sub.len());
        cumulative.push(0.0);
        let mut total = 0.0;
        for pair in sub.windows(2) {
            total += pair[0].dist_deg(pair[1]);
            cumulative.push(total);
        }

        if total <= f64::EPSILON {
            return TrackPoint::new(sub[0], 0.0);
        }

        let target = t.clamp(0.0, 1.0) * total;
        for k in 0..sub.len() - 1 {
            if target <= cumulative[k + 1] {
                let len = cumulative[k + 1] - cumulative[k];
                let frac = if len <= f64::EPSILON {
                    0.0
                } else {
                    (target - cumulative[k]) / len
                };
                let point = sub[k].lerp(sub[k + 1], frac);
                return TrackPoint::new(point, geo::bearing(sub[k], sub[k + 1]));
            }
        }

        let last = sub[sub.len() - 1];
        TrackPoint::new(last, geo::bearing(sub[sub.len() - 2], last))
    }

    /// Straight-line fallback when geometry is missing for either station.
    fn straight_line(&self, i: usize, j: usize, t: f64) -> TrackPoint {
        let a = self.stations[i];
        let b = self.stations[j];
        if a == b {
            return TrackPoint::new(a, 0.0);
        }
        TrackPoint::new(a.lerp(b, t), geo::bearing(a, b))
    }
}

/// Find every polyline pass near a station: vertices within tolerance are
/// grouped into consecutive runs, and the closest vertex of each run is
/// kept. A loop line that visits an interchange twice yields two entries.
fn map_occurrences(station: GeoPoint, path: &[GeoPoint]) -> Vec<usize> {
    let tol_sq = SNAP_TOLERANCE_DEG * SNAP_TOLERANCE_DEG;
    let mut result = Vec::new();
    let mut run_best: Option<(usize, f64)> = None;

    for (idx, vertex) in path.iter().enumerate() {
        let d = station.dist_sq_deg(*vertex);
        if d <= tol_sq {
            match run_best {
                Some((_, best_d)) if best_d <= d => {}
                _ => run_best = Some((idx, d)),
            }
        } else if let Some((best_idx, _)) = run_best.take() {
            result.push(best_idx);
        }
    }
    if let Some((best_idx, _)) = run_best {
        result.push(best_idx);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lng, lat)
    }

    /// Three stations on a straight east-west track with dense vertices.
    fn straight_interpolator() -> RouteInterpolator {
        let stations = vec![point(103.70, 1.30), point(103.72, 1.30), point(103.74, 1.30)];
        let path: Vec<GeoPoint> = (0..=40)
            .map(|i| point(103.70 + f64::from(i) * 0.001, 1.30))
            .collect();
        RouteInterpolator::new(stations, Some(path))
    }

    #[test]
    fn station_count_is_traversal_length() {
        assert_eq!(straight_interpolator().station_count(), 3);
    }

    #[test]
    fn endpoints_land_on_station_vertices() {
        let interp = straight_interpolator();
        let start = interp.position_between_stations(0, 1, 0.0);
        let end = interp.position_between_stations(0, 1, 1.0);
        assert!((start.lng - 103.70).abs() < 1e-9);
        assert!((end.lng - 103.72).abs() < 1e-9);
        assert!((start.lat - 1.30).abs() < 1e-9);
    }

    #[test]
    fn fraction_walks_monotonically() {
        let interp = straight_interpolator();
        let mut prev = -1.0;
        for step in 0..=10 {
            let t = f64::from(step) / 10.0;
            let p = interp.position_between_stations(0, 2, t);
            assert!(p.lng > prev, "lng must increase along the walk");
            prev = p.lng;
        }
    }

    #[test]
    fn bearing_on_eastward_track_is_east() {
        let interp = straight_interpolator();
        let p = interp.position_between_stations(0, 1, 0.5);
        assert!((p.bearing - 90.0).abs() < 0.5);
        assert!((interp.bearing_at_station(1) - 90.0).abs() < 0.5);
    }

    #[test]
    fn same_station_snaps_to_track_vertex() {
        // Station sits slightly off the track; the dwell position must be
        // the on-track vertex, not the raw station coordinate.
        let stations = vec![point(103.700, 1.3004), point(103.720, 1.30)];
        let path: Vec<GeoPoint> = (0..=20)
            .map(|i| point(103.70 + f64::from(i) * 0.001, 1.30))
            .collect();
        let interp = RouteInterpolator::new(stations, Some(path));
        let p = interp.position_between_stations(0, 0, 0.0);
        assert!((p.lat - 1.30).abs() < 1e-9);
    }

    #[test]
    fn missing_geometry_falls_back_to_straight_line() {
        let stations = vec![point(103.70, 1.30), point(103.72, 1.32)];
        let interp = RouteInterpolator::new(stations.clone(), None);
        let mid = interp.position_between_stations(0, 1, 0.5);
        assert!((mid.lng - 103.71).abs() < 1e-9);
        assert!((mid.lat - 1.31).abs() < 1e-9);
        assert!(mid.bearing.is_finite());
    }

    #[test]
    fn unmapped_station_falls_back_to_straight_line() {
        // Second station is ~2 km from the track, beyond tolerance.
        let stations = vec![point(103.70, 1.30), point(103.72, 1.32)];
        let path: Vec<GeoPoint> = (0..=20)
            .map(|i| point(103.70 + f64::from(i) * 0.001, 1.30))
            .collect();
        let interp = RouteInterpolator::new(stations, Some(path));
        let mid = interp.position_between_stations(0, 1, 0.5);
        assert!((mid.lng - 103.71).abs() < 1e-9);
        assert!((mid.lat - 1.31).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_indices_clamp() {
        let interp = straight_interpolator();
        let p = interp.position_between_stations(10, 99, 0.5);
        assert!(p.lng.is_finite());
        assert!(p.lat.is_finite());
    }

    #[test]
    fn zero_length_span_returns_start_with_zero_bearing() {
        let stations = vec![point(103.70, 1.30), point(103.70, 1.30)];
        let path = vec![point(103.70, 1.30), point(103.70, 1.30)];
        let interp = RouteInterpolator::new(stations, Some(path));
        let p = interp.position_between_stations(0, 1, 0.5);
        assert_eq!(p.bearing, 0.0);
        assert!((p.lng - 103.70).abs() < 1e-12);
    }

    #[test]
    fn loop_line_prefers_forward_span() {
        // Out-and-back track: west to east then back west. Station B is
        // visited on both passes, so it has two vertex occurrences.
        let b = point(103.72, 1.30);
        let mut path: Vec<GeoPoint> = (0..=40)
            .map(|i| point(103.70 + f64::from(i) * 0.001, 1.30))
            .collect();
        path.extend((1..=40).map(|i| point(103.74 - f64::from(i) * 0.001, 1.30)));
        // Traversal: A, B(outbound), C, B(return), A.
        let stations = vec![point(103.70, 1.30), b, point(103.74, 1.30), b, point(103.70, 1.30)];
        let interp = RouteInterpolator::new(stations, Some(path));

        assert!(
            interp.occurrences[1].len() >= 2,
            "revisited station should map to multiple vertices"
        );

        // Leg C -> B(return) must use the second pass: positions should
        // move westward from C rather than jumping back to the outbound
        // occurrence.
        let near_c = interp.position_between_stations(2, 3, 0.1);
        let near_b = interp.position_between_stations(2, 3, 0.9);
        assert!(near_c.lng > near_b.lng);
        assert!(near_c.lng <= 103.74 + 1e-9);
        assert!(near_b.lng >= 103.72 - 1e-9);
    }

    #[test]
    fn never_returns_non_finite_coordinates() {
        let interp = straight_interpolator();
        for i in 0..3 {
            for j in 0..3 {
                for step in 0..=4 {
                    let p = interp.position_between_stations(i, j, f64::from(step) / 4.0);
                    assert!(p.lng.is_finite() && p.lat.is_finite() && p.bearing.is_finite());
                }
            }
        }
    }
}
