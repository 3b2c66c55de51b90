//! Static line and network configuration.
//!
//! A [`LineGeometry`] is pure data handed in by the external geometry
//! provider: ordered stations, optional loop traversal order, optional
//! detailed track polyline. The engine never mutates it.

use crate::geo::GeoPoint;
use std::collections::BTreeMap;

/// One station on a line's timetable.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Station {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Station {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lng, self.lat)
    }
}

/// Static geometry and identity for one line.
///
/// `loop_path` is the explicit traversal order for lines that revisit an
/// interchange (loop shuttles): a list of station codes, each of which must
/// appear in `stations`. When present it is authoritative for the timetable
/// order; the raw `stations` list then only supplies coordinates and names.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineGeometry {
    pub code: String,
    pub name: String,
    pub color: String,
    pub stations: Vec<Station>,
    #[serde(default)]
    pub loop_path: Option<Vec<String>>,
    /// Detailed track polyline, `[lng, lat]` vertices. Empty when the
    /// provider has no high-resolution geometry for this line; the
    /// interpolator then falls back to straight station-to-station lines.
    #[serde(default)]
    pub detailed_path: Vec<GeoPoint>,
}

impl LineGeometry {
    /// Resolve the traversal station sequence: `loop_path` order when
    /// defined (unknown codes silently skipped), the raw station order
    /// otherwise. This sequence is what the timetable walk, the travel-time
    /// table, and the interpolator all index into.
    pub fn traversal_stations(&self) -> Vec<Station> {
        match &self.loop_path {
            Some(path) => path
                .iter()
                .filter_map(|code| self.stations.iter().find(|s| &s.code == code))
                .cloned()
                .collect(),
            None => self.stations.clone(),
        }
    }
}

/// The full network as supplied by the geometry provider, keyed by line
/// code. `BTreeMap` so every engine pass visits lines in a stable order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Network {
    pub lines: BTreeMap<String, LineGeometry>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, line: LineGeometry) {
        self.lines.insert(line.code.clone(), line);
    }

    pub fn get(&self, code: &str) -> Option<&LineGeometry> {
        self.lines.get(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(code: &str, lng: f64, lat: f64) -> Station {
        Station {
            code: code.to_string(),
            name: code.to_string(),
            lat,
            lng,
        }
    }

    #[test]
    fn traversal_without_loop_path_is_station_order() {
        let line = LineGeometry {
            code: "AB".into(),
            name: "Test".into(),
            color: "#000".into(),
            stations: vec![station("A", 0.0, 0.0), station("B", 1.0, 0.0)],
            loop_path: None,
            detailed_path: vec![],
        };
        let t = line.traversal_stations();
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].code, "A");
    }

    #[test]
    fn traversal_follows_loop_path_with_repeats() {
        let line = LineGeometry {
            code: "LP".into(),
            name: "Loop".into(),
            color: "#000".into(),
            stations: vec![
                station("A", 0.0, 0.0),
                station("B", 1.0, 0.0),
                station("C", 1.0, 1.0),
            ],
            loop_path: Some(vec![
                "A".into(),
                "B".into(),
                "C".into(),
                "B".into(),
                "A".into(),
            ]),
            detailed_path: vec![],
        };
        let t = line.traversal_stations();
        assert_eq!(t.len(), 5);
        assert_eq!(t[3].code, "B");
        assert_eq!(t[4].code, "A");
    }

    #[test]
    fn traversal_skips_unknown_codes() {
        let line = LineGeometry {
            code: "LP".into(),
            name: "Loop".into(),
            color: "#000".into(),
            stations: vec![station("A", 0.0, 0.0)],
            loop_path: Some(vec!["A".into(), "MISSING".into(), "A".into()]),
            detailed_path: vec![],
        };
        assert_eq!(line.traversal_stations().len(), 2);
    }

    #[test]
    fn network_iterates_in_code_order() {
        let mut network = Network::new();
        for code in ["NS", "BP", "EW"] {
            network.insert(LineGeometry {
                code: code.into(),
                name: code.into(),
                color: "#000".into(),
                stations: vec![],
                loop_path: None,
                detailed_path: vec![],
            });
        }
        let codes: Vec<&str> = network.lines.keys().map(String::as_str).collect();
        assert_eq!(codes, vec!["BP", "EW", "NS"]);
    }
}
