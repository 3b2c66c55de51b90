//! Resolution pipeline: reads data files, resolves cross-references, builds
//! the engine's configuration types.
//!
//! A data directory holds up to four files: `network` (required),
//! `schedules`, `travel-times`, and `depots` (each optional), in RON, JSON,
//! or TOML. Every cross-reference (schedule line codes, loop-path station
//! codes, depot connector stations) is checked here so the engine can
//! assume referential integrity.

use crate::schema::{
    DepotFile, LineData, NetworkFile, ScheduleConfigData, ScheduleFile, TravelTimeFile,
};
use railviz_core::depot::{Depot, DepotBook, DepotConnection};
use railviz_core::geo::GeoPoint;
use railviz_core::line::{LineGeometry, Network, Station};
use railviz_core::schedule::{FrequencyRule, LineSchedule, ScheduleBook, TravelTimeTable};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A line or station reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {context}")]
    UnresolvedRef {
        context: String,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate line code, station code, or depot id was found.
    #[error("duplicate {kind} '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without
/// extension). Looks for `{base_name}.ron`, `.toml`, and `.json`. Returns
/// `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if multiple
/// formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format (detected from
/// the extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Json => serde_json::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Toml => toml::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
    }
}

// ===========================================================================
// Resolution
// ===========================================================================

/// Everything the engine needs, fully resolved and cross-checked.
#[derive(Debug, Clone)]
pub struct NetworkData {
    pub network: Network,
    pub schedules: ScheduleBook,
    pub travel_times: TravelTimeTable,
    pub depots: DepotBook,
}

/// Load a full network configuration from a data directory. The `network`
/// file is required; `schedules`, `travel-times`, and `depots` default to
/// empty when absent (the engine then runs no service until schedules are
/// provided programmatically).
pub fn load_network_data(dir: &Path) -> Result<NetworkData, DataLoadError> {
    let network_path =
        find_data_file(dir, "network")?.ok_or_else(|| DataLoadError::MissingRequired {
            file: "network",
            dir: dir.to_path_buf(),
        })?;
    let network_file: NetworkFile = deserialize_file(&network_path)?;
    let network = resolve_network(&network_file)?;

    let schedules = match find_data_file(dir, "schedules")? {
        Some(path) => {
            let file: ScheduleFile = deserialize_file(&path)?;
            resolve_schedules(&file, &network)?
        }
        None => ScheduleBook::default(),
    };

    let travel_times = match find_data_file(dir, "travel-times")? {
        Some(path) => {
            let file: TravelTimeFile = deserialize_file(&path)?;
            resolve_travel_times(&file, &network)?
        }
        None => TravelTimeTable::default(),
    };

    let depots = match find_data_file(dir, "depots")? {
        Some(path) => {
            let file: DepotFile = deserialize_file(&path)?;
            resolve_depots(&file, &network)?
        }
        None => DepotBook::default(),
    };

    Ok(NetworkData {
        network,
        schedules,
        travel_times,
        depots,
    })
}

pub(crate) fn resolve_network(file: &NetworkFile) -> Result<Network, DataLoadError> {
    let mut network = Network::new();
    for line in &file.lines {
        if network.get(&line.code).is_some() {
            return Err(DataLoadError::DuplicateName {
                kind: "line code",
                name: line.code.clone(),
            });
        }
        network.insert(resolve_line(line)?);
    }
    Ok(network)
}

fn resolve_line(line: &LineData) -> Result<LineGeometry, DataLoadError> {
    let stations: Vec<Station> = line
        .stations
        .iter()
        .map(|s| Station {
            code: s.code.clone(),
            name: s.name.clone(),
            lat: s.lat,
            lng: s.lng,
        })
        .collect();

    for (i, station) in stations.iter().enumerate() {
        if stations[..i].iter().any(|s| s.code == station.code) {
            return Err(DataLoadError::DuplicateName {
                kind: "station code",
                name: format!("{}/{}", line.code, station.code),
            });
        }
    }

    if let Some(loop_path) = &line.loop_path {
        for code in loop_path {
            if !stations.iter().any(|s| &s.code == code) {
                return Err(DataLoadError::UnresolvedRef {
                    context: format!("line {} loop_path", line.code),
                    name: code.clone(),
                    expected_kind: "station",
                });
            }
        }
    }

    Ok(LineGeometry {
        code: line.code.clone(),
        name: line.name.clone(),
        color: line.color.clone(),
        stations,
        loop_path: line.loop_path.clone(),
        detailed_path: line
            .detailed_path
            .iter()
            .map(|&[lng, lat]| GeoPoint::new(lng, lat))
            .collect(),
    })
}

fn resolve_schedules(
    file: &ScheduleFile,
    network: &Network,
) -> Result<ScheduleBook, DataLoadError> {
    let mut book = ScheduleBook::default();
    if let Some(config) = &file.config {
        apply_config_overrides(&mut book, config);
    }

    for entry in &file.lines {
        if network.get(&entry.line).is_none() {
            return Err(DataLoadError::UnresolvedRef {
                context: "schedules".into(),
                name: entry.line.clone(),
                expected_kind: "line",
            });
        }
        if book.lines.contains_key(&entry.line) {
            return Err(DataLoadError::DuplicateName {
                kind: "schedule entry",
                name: entry.line.clone(),
            });
        }
        book.lines.insert(
            entry.line.clone(),
            LineSchedule {
                start_time: entry.start_time,
                end_time: entry.end_time,
                dwell_secs: entry.dwell_secs,
                max_fleet: entry.max_fleet,
                frequency: entry.frequency.map(|f| FrequencyRule {
                    peak: f.peak,
                    off_peak: f.off_peak,
                    late_night: f.late_night,
                }),
            },
        );
    }
    Ok(book)
}

fn apply_config_overrides(book: &mut ScheduleBook, config: &ScheduleConfigData) {
    let c = &mut book.config;
    if let Some(v) = config.start_time {
        c.start_time = v;
    }
    if let Some(v) = config.end_time {
        c.end_time = v;
    }
    if let Some(v) = &config.peak_windows {
        c.peak_windows = v.clone();
    }
    if let Some(v) = config.late_night_start {
        c.late_night_start = v;
    }
    if let Some(v) = config.peak_frequency {
        c.peak_frequency = v;
    }
    if let Some(v) = config.off_peak_frequency {
        c.off_peak_frequency = v;
    }
    if let Some(v) = config.late_night_frequency {
        c.late_night_frequency = v;
    }
    if let Some(v) = config.default_dwell_secs {
        c.default_dwell_secs = v;
    }
    if let Some(v) = config.default_segment_minutes {
        c.default_segment_minutes = v;
    }
}

fn resolve_travel_times(
    file: &TravelTimeFile,
    network: &Network,
) -> Result<TravelTimeTable, DataLoadError> {
    let mut table = TravelTimeTable::default();
    for entry in &file.lines {
        if network.get(&entry.line).is_none() {
            return Err(DataLoadError::UnresolvedRef {
                context: "travel-times".into(),
                name: entry.line.clone(),
                expected_kind: "line",
            });
        }
        if table.lines.contains_key(&entry.line) {
            return Err(DataLoadError::DuplicateName {
                kind: "travel-time entry",
                name: entry.line.clone(),
            });
        }
        table.lines.insert(entry.line.clone(), entry.segments.clone());
    }
    Ok(table)
}

fn resolve_depots(file: &DepotFile, network: &Network) -> Result<DepotBook, DataLoadError> {
    let mut book = DepotBook::default();
    for depot in &file.depots {
        if book.depots.contains_key(&depot.id) {
            return Err(DataLoadError::DuplicateName {
                kind: "depot id",
                name: depot.id.clone(),
            });
        }
        for line in &depot.serves_lines {
            if network.get(line).is_none() {
                return Err(DataLoadError::UnresolvedRef {
                    context: format!("depot {}", depot.id),
                    name: line.clone(),
                    expected_kind: "line",
                });
            }
        }
        let conn = &depot.connection;
        let Some(line) = network.get(&conn.line) else {
            return Err(DataLoadError::UnresolvedRef {
                context: format!("depot {} connection", depot.id),
                name: conn.line.clone(),
                expected_kind: "line",
            });
        };
        if !line.stations.iter().any(|s| s.code == conn.station_code) {
            return Err(DataLoadError::UnresolvedRef {
                context: format!("depot {} connection", depot.id),
                name: conn.station_code.clone(),
                expected_kind: "station",
            });
        }

        book.depots.insert(
            depot.id.clone(),
            Depot {
                name: depot.name.clone(),
                coordinates: GeoPoint::new(depot.coordinates[0], depot.coordinates[1]),
                capacity: depot.capacity,
                serves_lines: depot.serves_lines.clone(),
                connection: DepotConnection {
                    line: conn.line.clone(),
                    station_code: conn.station_code.clone(),
                    path: conn
                        .path
                        .iter()
                        .map(|&[lng, lat]| GeoPoint::new(lng, lat))
                        .collect(),
                },
            },
        );
    }
    Ok(book)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "railviz_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const NETWORK_JSON: &str = r##"{
        "lines": [{
            "code": "AB",
            "name": "Alpha Line",
            "color": "#d42e12",
            "stations": [
                { "code": "A1", "name": "Alpha", "lat": 1.30, "lng": 103.70 },
                { "code": "A2", "name": "Beta", "lat": 1.30, "lng": 103.72 }
            ]
        }]
    }"##;

    #[test]
    fn loads_minimal_network_with_defaults() {
        let dir = make_test_dir("minimal");
        fs::write(dir.join("network.json"), NETWORK_JSON).unwrap();

        let data = load_network_data(&dir).unwrap();
        assert_eq!(data.network.lines.len(), 1);
        assert!(data.schedules.lines.is_empty());
        assert!(data.travel_times.lines.is_empty());
        assert!(data.depots.depots.is_empty());
        cleanup(&dir);
    }

    #[test]
    fn missing_network_file_is_an_error() {
        let dir = make_test_dir("missing");
        let err = load_network_data(&dir).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingRequired { file: "network", .. }
        ));
        cleanup(&dir);
    }

    #[test]
    fn conflicting_formats_are_rejected() {
        let dir = make_test_dir("conflict");
        fs::write(dir.join("network.json"), NETWORK_JSON).unwrap();
        fs::write(dir.join("network.ron"), "(lines: [])").unwrap();
        let err = load_network_data(&dir).unwrap_err();
        assert!(matches!(err, DataLoadError::ConflictingFormats { .. }));
        cleanup(&dir);
    }

    #[test]
    fn schedule_for_unknown_line_is_rejected() {
        let dir = make_test_dir("sched_ref");
        fs::write(dir.join("network.json"), NETWORK_JSON).unwrap();
        fs::write(
            dir.join("schedules.json"),
            r#"{ "lines": [{ "line": "XX", "start_time": 330, "end_time": 1440, "max_fleet": 10 }] }"#,
        )
        .unwrap();
        let err = load_network_data(&dir).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnresolvedRef { expected_kind: "line", .. }
        ));
        cleanup(&dir);
    }

    #[test]
    fn loop_path_with_unknown_station_is_rejected() {
        let dir = make_test_dir("loop_ref");
        fs::write(
            dir.join("network.json"),
            r##"{
                "lines": [{
                    "code": "LP",
                    "name": "Loop",
                    "color": "#748477",
                    "stations": [{ "code": "L1", "name": "One", "lat": 1.3, "lng": 103.7 }],
                    "loop_path": ["L1", "L9", "L1"]
                }]
            }"##,
        )
        .unwrap();
        let err = load_network_data(&dir).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnresolvedRef { expected_kind: "station", .. }
        ));
        cleanup(&dir);
    }

    #[test]
    fn depot_connector_station_must_exist_on_its_line() {
        let dir = make_test_dir("depot_ref");
        fs::write(dir.join("network.json"), NETWORK_JSON).unwrap();
        fs::write(
            dir.join("depots.json"),
            r#"{
                "depots": [{
                    "id": "TD",
                    "name": "Test Depot",
                    "coordinates": [103.69, 1.31],
                    "capacity": 20,
                    "serves_lines": ["AB"],
                    "connection": { "line": "AB", "station_code": "A9", "path": [[103.69, 1.31], [103.70, 1.30]] }
                }]
            }"#,
        )
        .unwrap();
        let err = load_network_data(&dir).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnresolvedRef { expected_kind: "station", .. }
        ));
        cleanup(&dir);
    }

    #[test]
    fn duplicate_line_codes_are_rejected() {
        let dir = make_test_dir("dup_line");
        fs::write(
            dir.join("network.json"),
            r##"{
                "lines": [
                    { "code": "AB", "name": "One", "color": "#000", "stations": [] },
                    { "code": "AB", "name": "Two", "color": "#111", "stations": [] }
                ]
            }"##,
        )
        .unwrap();
        let err = load_network_data(&dir).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::DuplicateName { kind: "line code", .. }
        ));
        cleanup(&dir);
    }

    #[test]
    fn full_configuration_round_trip() {
        let dir = make_test_dir("full");
        fs::write(dir.join("network.json"), NETWORK_JSON).unwrap();
        fs::write(
            dir.join("schedules.json"),
            r#"{
                "config": { "default_dwell_secs": 20 },
                "lines": [{
                    "line": "AB",
                    "start_time": 330,
                    "end_time": 1440,
                    "max_fleet": 12,
                    "frequency": { "peak": 3.0, "off_peak": 7.0, "late_night": 10.0 }
                }]
            }"#,
        )
        .unwrap();
        fs::write(
            dir.join("travel-times.json"),
            r#"{ "lines": [{ "line": "AB", "segments": [2.5] }] }"#,
        )
        .unwrap();
        fs::write(
            dir.join("depots.json"),
            r#"{
                "depots": [{
                    "id": "TD",
                    "name": "Test Depot",
                    "coordinates": [103.69, 1.31],
                    "capacity": 20,
                    "serves_lines": ["AB"],
                    "connection": { "line": "AB", "station_code": "A1", "path": [[103.69, 1.31], [103.70, 1.30]] }
                }]
            }"#,
        )
        .unwrap();

        let data = load_network_data(&dir).unwrap();
        assert!((data.schedules.config.default_dwell_secs - 20.0).abs() < 1e-12);
        let schedule = data.schedules.line("AB").unwrap();
        assert_eq!(schedule.max_fleet, 12);
        assert_eq!(data.travel_times.lines["AB"], vec![2.5]);
        assert_eq!(data.depots.connector_at("AB", "A1").unwrap().0, "TD");
        cleanup(&dir);
    }

    #[test]
    fn toml_network_parses() {
        let dir = make_test_dir("toml");
        fs::write(
            dir.join("network.toml"),
            r##"
                [[lines]]
                code = "AB"
                name = "Alpha Line"
                color = "#d42e12"

                [[lines.stations]]
                code = "A1"
                name = "Alpha"
                lat = 1.30
                lng = 103.70
            "##,
        )
        .unwrap();
        let data = load_network_data(&dir).unwrap();
        assert_eq!(data.network.get("AB").unwrap().stations.len(), 1);
        cleanup(&dir);
    }

    #[test]
    fn ron_network_parses() {
        let dir = make_test_dir("ron");
        fs::write(
            dir.join("network.ron"),
            r##"(
                lines: [(
                    code: "AB",
                    name: "Alpha Line",
                    color: "#d42e12",
                    stations: [(code: "A1", name: "Alpha", lat: 1.30, lng: 103.70)],
                )],
            )"##,
        )
        .unwrap();
        let data = load_network_data(&dir).unwrap();
        assert_eq!(data.network.get("AB").unwrap().name, "Alpha Line");
        cleanup(&dir);
    }

    #[test]
    fn ron_and_json_resolve_identically() {
        let json_dir = make_test_dir("equiv_json");
        fs::write(json_dir.join("network.json"), NETWORK_JSON).unwrap();
        let ron_dir = make_test_dir("equiv_ron");
        fs::write(
            ron_dir.join("network.ron"),
            r##"(
                lines: [(
                    code: "AB",
                    name: "Alpha Line",
                    color: "#d42e12",
                    stations: [
                        (code: "A1", name: "Alpha", lat: 1.30, lng: 103.70),
                        (code: "A2", name: "Beta", lat: 1.30, lng: 103.72),
                    ],
                )],
            )"##,
        )
        .unwrap();

        let from_json = load_network_data(&json_dir).unwrap();
        let from_ron = load_network_data(&ron_dir).unwrap();
        assert_eq!(from_json.network, from_ron.network);
        cleanup(&json_dir);
        cleanup(&ron_dir);
    }
}
