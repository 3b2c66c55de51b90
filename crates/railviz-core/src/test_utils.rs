//! Small fixture networks for tests and benches.
//!
//! Available to downstream crates through the `test-utils` feature.

use crate::depot::{Depot, DepotBook, DepotConnection};
use crate::engine::SimulationEngine;
use crate::geo::GeoPoint;
use crate::line::{LineGeometry, Network, Station};
use crate::schedule::{LineSchedule, ScheduleBook, TravelTimeTable};

/// Code of the single line in the tiny fixture network.
pub const TINY_LINE: &str = "TL";

/// Three stations on a straight east-west track near the equator, with a
/// dense track polyline so interpolator snapping is exercised.
pub fn tiny_network() -> Network {
    let station = |code: &str, lng: f64| Station {
        code: code.to_string(),
        name: format!("{code} Station"),
        lat: 1.30,
        lng,
    };
    let detailed_path: Vec<GeoPoint> = (0..=40)
        .map(|i| GeoPoint::new(103.70 + f64::from(i) * 0.001, 1.30))
        .collect();

    let mut network = Network::new();
    network.insert(LineGeometry {
        code: TINY_LINE.into(),
        name: "Test Line".into(),
        color: "#d42e12".into(),
        stations: vec![
            station("T1", 103.70),
            station("T2", 103.72),
            station("T3", 103.74),
        ],
        loop_path: None,
        detailed_path,
    });
    network
}

/// Schedule book with one entry for [`TINY_LINE`]: 05:30 to midnight,
/// fleet cap 10, global defaults otherwise.
pub fn tiny_schedules() -> ScheduleBook {
    let mut book = ScheduleBook::default();
    book.lines.insert(
        TINY_LINE.into(),
        LineSchedule {
            start_time: 330.0,
            end_time: 1440.0,
            dwell_secs: None,
            max_fleet: 10,
            frequency: None,
        },
    );
    book
}

/// Travel times for the tiny network: 2 minutes then 3 minutes.
pub fn tiny_travel_times() -> TravelTimeTable {
    let mut table = TravelTimeTable::default();
    table.lines.insert(TINY_LINE.into(), vec![2.0, 3.0]);
    table
}

/// One depot `TLD` whose connector joins [`TINY_LINE`] at `T1`.
pub fn tiny_depots() -> DepotBook {
    let mut book = DepotBook::default();
    book.depots.insert(
        "TLD".into(),
        Depot {
            name: "Test Line Depot".into(),
            coordinates: GeoPoint::new(103.69, 1.31),
            capacity: 20,
            serves_lines: vec![TINY_LINE.into()],
            connection: DepotConnection {
                line: TINY_LINE.into(),
                station_code: "T1".into(),
                path: vec![GeoPoint::new(103.69, 1.31), GeoPoint::new(103.70, 1.30)],
            },
        },
    );
    book
}

/// Engine over the tiny network with no depots, fixed seed.
pub fn tiny_engine() -> SimulationEngine {
    SimulationEngine::with_seed(
        tiny_network(),
        tiny_schedules(),
        tiny_travel_times(),
        DepotBook::default(),
        7,
    )
}

/// Engine over the tiny network with the `TLD` depot, fixed seed.
pub fn tiny_engine_with_depot() -> SimulationEngine {
    SimulationEngine::with_seed(
        tiny_network(),
        tiny_schedules(),
        tiny_travel_times(),
        tiny_depots(),
        7,
    )
}
