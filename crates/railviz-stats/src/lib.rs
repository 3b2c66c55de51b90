//! Network statistics for the railviz engine.
//!
//! A read-side projection over the fleet state that position resolution
//! produces: train counts partitioned by at-station vs in-motion, per-line
//! tallies, and the current service band. Collecting statistics runs the
//! same query pipeline as a position query, so a renderer can call either
//! (or both) per frame without double-advancing the simulation.

use railviz_core::engine::SimulationEngine;
use railviz_core::schedule::OperatingStatus;
use std::collections::BTreeMap;

/// Aggregate snapshot for one query time.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NetworkStats {
    pub total_trains: usize,
    pub trains_at_station: usize,
    pub trains_in_motion: usize,
    /// Live train count per operating line, in line-code order.
    pub trains_by_line: BTreeMap<String, usize>,
    /// Number of lines inside their operating window at this time.
    pub active_lines: usize,
    pub is_peak_hour: bool,
    pub operating_status: OperatingStatus,
    /// Representative network headway for the current service band,
    /// minutes (the global config value, not a per-line override).
    pub frequency: f64,
}

/// Collect statistics for clock time `t`. Runs fleet reconciliation and
/// position resolution for `t` first, so the counts reflect exactly what a
/// position query at the same instant would return.
pub fn collect(engine: &mut SimulationEngine, t: f64) -> NetworkStats {
    engine.train_positions(t);

    let mut total_trains = 0;
    let mut trains_at_station = 0;
    let mut trains_by_line = BTreeMap::new();
    let mut active_lines = 0;

    let codes: Vec<String> = engine
        .line_codes()
        .into_iter()
        .map(str::to_string)
        .collect();
    for code in codes {
        if !engine.schedules().is_operating(&code, t) {
            continue;
        }
        active_lines += 1;

        let fleet = engine.fleet(&code);
        total_trains += fleet.len();
        trains_at_station += fleet.iter().filter(|tr| tr.is_at_station).count();
        trains_by_line.insert(code, fleet.len());
    }

    let schedules = engine.schedules();
    let operating_status = schedules.operating_status(t);
    let frequency = match operating_status {
        OperatingStatus::PeakHour => schedules.config.peak_frequency,
        OperatingStatus::LateNight => schedules.config.late_night_frequency,
        OperatingStatus::OffPeak => schedules.config.off_peak_frequency,
    };

    NetworkStats {
        total_trains,
        trains_at_station,
        trains_in_motion: total_trains - trains_at_station,
        trains_by_line,
        active_lines,
        is_peak_hour: schedules.is_peak_hour(t),
        operating_status,
        frequency,
    }
}
