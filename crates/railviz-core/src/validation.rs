//! Non-fatal dataset lint pass.
//!
//! The engine degrades gracefully around imperfect configuration (missing
//! travel times, unmapped geometry, lines without schedules), so none of
//! these conditions are errors. This pass surfaces them as a list of issues
//! a dataset author can act on. Loaders reject hard reference breakage
//! before construction; everything here is about data that loads fine but
//! probably isn't what the author meant.

use crate::depot::DepotBook;
use crate::line::Network;
use crate::schedule::{ScheduleBook, TravelTimeTable};
use std::fmt;

/// One dataset problem. `Display` renders a single human-readable line.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// A travel-time array whose length doesn't match the line's hop count.
    TravelTimeLengthMismatch {
        line: String,
        expected: usize,
        actual: usize,
    },
    /// Travel times supplied for a line the network doesn't define.
    TravelTimesForUnknownLine { line: String },
    /// A `loop_path` entry naming a station the line doesn't have.
    UnknownLoopPathStation { line: String, station: String },
    /// A schedule whose window ends at or before it starts.
    InvertedOperatingWindow { line: String, start: f64, end: f64 },
    /// A schedule entry for a line the network doesn't define.
    ScheduleForUnknownLine { line: String },
    /// A network line with no schedule entry; it will never run service.
    LineWithoutSchedule { line: String },
    /// A depot claiming to serve a line the network doesn't define.
    DepotServesUnknownLine { depot: String, line: String },
    /// A depot connector joining a line the network doesn't define.
    ConnectorToUnknownLine { depot: String, line: String },
    /// A depot connector joining a station its line doesn't have.
    ConnectorToUnknownStation {
        depot: String,
        line: String,
        station: String,
    },
    /// A connector path too short to animate along.
    ConnectorPathTooShort { depot: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TravelTimeLengthMismatch {
                line,
                expected,
                actual,
            } => write!(
                f,
                "line {line}: {actual} travel-time entries for {expected} segments"
            ),
            Self::TravelTimesForUnknownLine { line } => {
                write!(f, "travel times for unknown line {line}")
            }
            Self::UnknownLoopPathStation { line, station } => {
                write!(f, "line {line}: loop_path names unknown station {station}")
            }
            Self::InvertedOperatingWindow { line, start, end } => {
                write!(f, "line {line}: operating window {start}..{end} is inverted")
            }
            Self::ScheduleForUnknownLine { line } => {
                write!(f, "schedule for unknown line {line}")
            }
            Self::LineWithoutSchedule { line } => {
                write!(f, "line {line} has no schedule and will never operate")
            }
            Self::DepotServesUnknownLine { depot, line } => {
                write!(f, "depot {depot} serves unknown line {line}")
            }
            Self::ConnectorToUnknownLine { depot, line } => {
                write!(f, "depot {depot}: connector joins unknown line {line}")
            }
            Self::ConnectorToUnknownStation {
                depot,
                line,
                station,
            } => write!(
                f,
                "depot {depot}: connector station {station} not on line {line}"
            ),
            Self::ConnectorPathTooShort { depot } => {
                write!(f, "depot {depot}: connector path has fewer than 2 vertices")
            }
        }
    }
}

/// Lint a full dataset. Empty result means clean.
pub fn validate(
    network: &Network,
    schedules: &ScheduleBook,
    travel_times: &TravelTimeTable,
    depots: &DepotBook,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (code, line) in &network.lines {
        if let Some(loop_path) = &line.loop_path {
            for station in loop_path {
                if !line.stations.iter().any(|s| &s.code == station) {
                    issues.push(ValidationIssue::UnknownLoopPathStation {
                        line: code.clone(),
                        station: station.clone(),
                    });
                }
            }
        }

        match schedules.line(code) {
            Some(schedule) if schedule.end_time <= schedule.start_time => {
                issues.push(ValidationIssue::InvertedOperatingWindow {
                    line: code.clone(),
                    start: schedule.start_time,
                    end: schedule.end_time,
                });
            }
            Some(_) => {}
            None => issues.push(ValidationIssue::LineWithoutSchedule { line: code.clone() }),
        }

        if let Some(times) = travel_times.lines.get(code) {
            let expected = line.traversal_stations().len().saturating_sub(1);
            if times.len() != expected {
                issues.push(ValidationIssue::TravelTimeLengthMismatch {
                    line: code.clone(),
                    expected,
                    actual: times.len(),
                });
            }
        }
    }

    for line in schedules.lines.keys() {
        if network.get(line).is_none() {
            issues.push(ValidationIssue::ScheduleForUnknownLine { line: line.clone() });
        }
    }
    for line in travel_times.lines.keys() {
        if network.get(line).is_none() {
            issues.push(ValidationIssue::TravelTimesForUnknownLine { line: line.clone() });
        }
    }

    for (id, depot) in &depots.depots {
        for line in &depot.serves_lines {
            if network.get(line).is_none() {
                issues.push(ValidationIssue::DepotServesUnknownLine {
                    depot: id.clone(),
                    line: line.clone(),
                });
            }
        }
        let conn = &depot.connection;
        match network.get(&conn.line) {
            None => issues.push(ValidationIssue::ConnectorToUnknownLine {
                depot: id.clone(),
                line: conn.line.clone(),
            }),
            Some(line) => {
                if !line.stations.iter().any(|s| s.code == conn.station_code) {
                    issues.push(ValidationIssue::ConnectorToUnknownStation {
                        depot: id.clone(),
                        line: conn.line.clone(),
                        station: conn.station_code.clone(),
                    });
                }
            }
        }
        if conn.path.len() < 2 {
            issues.push(ValidationIssue::ConnectorPathTooShort { depot: id.clone() });
        }
    }

    issues
}
