//! Maintenance depots and their connections to the running lines.
//!
//! A depot serves one or more lines but has exactly one modeled connector:
//! a fixed polyline from the depot to a junction station on a specific
//! line. Trains entering or leaving service animate along that connector.

use crate::geo::GeoPoint;
use std::collections::BTreeMap;

/// The fixed path between a depot and its junction station.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DepotConnection {
    /// Line the connector joins.
    pub line: String,
    /// Station where the connector meets the main track.
    pub station_code: String,
    /// Polyline from depot to station, `[lng, lat]` vertices.
    pub path: Vec<GeoPoint>,
}

/// One maintenance depot.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Depot {
    pub name: String,
    pub coordinates: GeoPoint,
    pub capacity: u32,
    /// Lines this depot stables trains for. A line can be served without
    /// having a modeled connector (the connection may join a different
    /// line); such trains spawn directly onto the track instead.
    pub serves_lines: Vec<String>,
    pub connection: DepotConnection,
}

/// All depots, keyed by short depot id (e.g. `"BSD"`).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DepotBook {
    pub depots: BTreeMap<String, Depot>,
}

impl DepotBook {
    pub fn get(&self, id: &str) -> Option<&Depot> {
        self.depots.get(id)
    }

    /// Depots listing `line` among the lines they serve, in id order.
    pub fn serving(&self, line: &str) -> Vec<(&str, &Depot)> {
        self.depots
            .iter()
            .filter(|(_, d)| d.serves_lines.iter().any(|l| l == line))
            .map(|(id, d)| (id.as_str(), d))
            .collect()
    }

    /// The depot whose connector joins `line` at `station_code`, if any.
    /// This is the withdrawal opportunity check: a retiring train may only
    /// leave the track where such a connection exists.
    pub fn connector_at(&self, line: &str, station_code: &str) -> Option<(&str, &Depot)> {
        self.depots
            .iter()
            .find(|(_, d)| {
                d.serves_lines.iter().any(|l| l == line)
                    && d.connection.line == line
                    && d.connection.station_code == station_code
            })
            .map(|(id, d)| (id.as_str(), d))
    }
}
