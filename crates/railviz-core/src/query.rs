//! Read-only snapshot types handed to presentation consumers.
//!
//! All fields are owned copies -- no references into engine storage, so a
//! renderer can hold positions across frames or ship them over FFI.

use crate::train::Direction;

/// One positioned train, ready to draw as a map marker.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TrainPosition {
    pub id: String,
    /// Line code, e.g. `"NS"`.
    pub line: String,
    /// Marker color: the line color, or a neutral non-revenue color for
    /// trains on a depot connector.
    pub color: String,
    pub line_name: String,
    pub direction: Direction,
    pub lng: f64,
    pub lat: f64,
    /// Compass degrees `[0, 360)`, already direction-adjusted.
    pub bearing: f64,
    pub is_at_station: bool,
    /// Traversal station index while on the timetable; `None` on a depot
    /// connector.
    pub station_index: Option<usize>,
    /// Station name while dwelling, `"FROM → TO"` codes while in a
    /// segment, or a depot transfer status.
    pub station_name: String,
    /// Display speed 0..=100 (40 flat on depot connectors).
    pub speed: u8,
}
