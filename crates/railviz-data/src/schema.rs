//! Serde data file structs for network configuration.
//!
//! These structs define the on-disk format for line geometry, operating
//! schedules, travel-time tables, and depots. They are deserialized from
//! RON, JSON, or TOML data files and then resolved into engine types by
//! the loader.

use serde::Deserialize;

// ===========================================================================
// Network geometry
// ===========================================================================

/// Top-level network file: every line on the map.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkFile {
    pub lines: Vec<LineData>,
}

/// One line's geometry definition.
#[derive(Debug, Clone, Deserialize)]
pub struct LineData {
    pub code: String,
    pub name: String,
    pub color: String,
    pub stations: Vec<StationData>,
    /// Explicit traversal order for loop lines; station codes, which must
    /// all appear in `stations`.
    #[serde(default)]
    pub loop_path: Option<Vec<String>>,
    /// High-resolution track polyline as `[lng, lat]` pairs. Optional; the
    /// engine falls back to straight station-to-station geometry.
    #[serde(default)]
    pub detailed_path: Vec<[f64; 2]>,
}

/// One station entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StationData {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

// ===========================================================================
// Schedules
// ===========================================================================

/// Schedule file: optional global config overrides plus per-line entries.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleFile {
    #[serde(default)]
    pub config: Option<ScheduleConfigData>,
    pub lines: Vec<LineScheduleData>,
}

/// Overrides for the network-wide schedule defaults. Any omitted field
/// keeps its built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleConfigData {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub peak_windows: Option<Vec<(f64, f64)>>,
    pub late_night_start: Option<f64>,
    pub peak_frequency: Option<f64>,
    pub off_peak_frequency: Option<f64>,
    pub late_night_frequency: Option<f64>,
    pub default_dwell_secs: Option<f64>,
    pub default_segment_minutes: Option<f64>,
}

/// One line's schedule entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LineScheduleData {
    pub line: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub dwell_secs: Option<f64>,
    pub max_fleet: u32,
    #[serde(default)]
    pub frequency: Option<FrequencyData>,
}

/// Per-line headway overrides, minutes.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FrequencyData {
    pub peak: f64,
    pub off_peak: f64,
    pub late_night: f64,
}

// ===========================================================================
// Travel times
// ===========================================================================

/// Travel-time file: per-line per-segment arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct TravelTimeFile {
    pub lines: Vec<TravelTimeData>,
}

/// Travel times for one line, one entry per traversal hop, minutes. Short
/// arrays are padded with the default segment time at lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct TravelTimeData {
    pub line: String,
    pub segments: Vec<f64>,
}

// ===========================================================================
// Depots
// ===========================================================================

/// Depot file.
#[derive(Debug, Clone, Deserialize)]
pub struct DepotFile {
    pub depots: Vec<DepotData>,
}

/// One depot definition.
#[derive(Debug, Clone, Deserialize)]
pub struct DepotData {
    /// Short id, e.g. `"BSD"`.
    pub id: String,
    pub name: String,
    /// `[lng, lat]`.
    pub coordinates: [f64; 2],
    pub capacity: u32,
    pub serves_lines: Vec<String>,
    pub connection: DepotConnectionData,
}

/// The connector from a depot to its junction station.
#[derive(Debug, Clone, Deserialize)]
pub struct DepotConnectionData {
    pub line: String,
    pub station_code: String,
    /// `[lng, lat]` vertices from depot to station.
    pub path: Vec<[f64; 2]>,
}
