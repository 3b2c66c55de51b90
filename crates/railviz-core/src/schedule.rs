//! Operating schedules and timing tables.
//!
//! Everything here is pure data plus pure functions over a clock time in
//! minutes from midnight. Values at or past 1440 denote past-midnight
//! continuation of the same service day, so comparisons are done on the
//! raw value, never modulo a day.

use std::collections::BTreeMap;
use std::fmt;

/// Network-wide defaults, applied wherever a line has no override.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScheduleConfig {
    /// Default operating window start, minutes from midnight.
    pub start_time: f64,
    /// Default operating window end. May exceed 1440.
    pub end_time: f64,
    /// Peak windows as `(start, end)` pairs.
    pub peak_windows: Vec<(f64, f64)>,
    /// Times at or after this are "late night" service.
    pub late_night_start: f64,
    /// Headways in minutes.
    pub peak_frequency: f64,
    pub off_peak_frequency: f64,
    pub late_night_frequency: f64,
    /// Default dwell at each station, seconds.
    pub default_dwell_secs: f64,
    /// Fallback for a missing segment travel-time entry, minutes.
    pub default_segment_minutes: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_time: 5.0 * 60.0 + 30.0,
            end_time: 24.0 * 60.0,
            peak_windows: vec![(7.0 * 60.0, 9.0 * 60.0), (17.0 * 60.0, 20.0 * 60.0)],
            late_night_start: 22.0 * 60.0,
            peak_frequency: 2.5,
            off_peak_frequency: 6.0,
            late_night_frequency: 10.0,
            default_dwell_secs: 30.0,
            default_segment_minutes: 2.0,
        }
    }
}

/// Per-line headway overrides by time-of-day band.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrequencyRule {
    pub peak: f64,
    pub off_peak: f64,
    pub late_night: f64,
}

/// One line's operating schedule.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineSchedule {
    /// Operating window `[start_time, end_time)`, minutes from midnight.
    pub start_time: f64,
    pub end_time: f64,
    /// Dwell override in seconds; `None` uses the global default.
    #[serde(default)]
    pub dwell_secs: Option<f64>,
    /// Maximum trains available to this line. The in-service target is a
    /// fixed fraction of this (see [`crate::fleet::FLEET_UTILIZATION`]).
    pub max_fleet: u32,
    /// Headway override; `None` uses the global defaults.
    #[serde(default)]
    pub frequency: Option<FrequencyRule>,
}

/// Human-readable service state for a clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OperatingStatus {
    PeakHour,
    LateNight,
    OffPeak,
}

impl fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeakHour => write!(f, "Peak Hour"),
            Self::LateNight => write!(f, "Late Night"),
            Self::OffPeak => write!(f, "Off-Peak"),
        }
    }
}

/// All schedules for the network: global config plus per-line entries.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScheduleBook {
    pub config: ScheduleConfig,
    pub lines: BTreeMap<String, LineSchedule>,
}

impl ScheduleBook {
    pub fn line(&self, code: &str) -> Option<&LineSchedule> {
        self.lines.get(code)
    }

    /// Whether `code` runs service at time `t`. The window is half-open,
    /// `[start_time, end_time)`. Lines with no schedule entry never operate.
    pub fn is_operating(&self, code: &str, t: f64) -> bool {
        self.line(code)
            .is_some_and(|s| t >= s.start_time && t < s.end_time)
    }

    pub fn is_peak_hour(&self, t: f64) -> bool {
        self.config
            .peak_windows
            .iter()
            .any(|&(start, end)| t >= start && t <= end)
    }

    pub fn is_late_night(&self, t: f64) -> bool {
        t >= self.config.late_night_start
    }

    /// Target headway for `code` at time `t`, in minutes.
    pub fn line_frequency(&self, code: &str, t: f64) -> f64 {
        let rule = self.line(code).and_then(|s| s.frequency);
        if self.is_late_night(t) {
            rule.map_or(self.config.late_night_frequency, |r| r.late_night)
        } else if self.is_peak_hour(t) {
            rule.map_or(self.config.peak_frequency, |r| r.peak)
        } else {
            rule.map_or(self.config.off_peak_frequency, |r| r.off_peak)
        }
    }

    /// Dwell time at each of `code`'s stations, in minutes.
    pub fn dwell_minutes(&self, code: &str) -> f64 {
        let secs = self
            .line(code)
            .and_then(|s| s.dwell_secs)
            .unwrap_or(self.config.default_dwell_secs);
        secs / 60.0
    }

    pub fn operating_status(&self, t: f64) -> OperatingStatus {
        if self.is_late_night(t) {
            OperatingStatus::LateNight
        } else if self.is_peak_hour(t) {
            OperatingStatus::PeakHour
        } else {
            OperatingStatus::OffPeak
        }
    }
}

/// Per-line per-segment travel times in minutes. One entry per hop in the
/// traversal order; a missing line or a short array falls back to the
/// default segment time at lookup.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TravelTimeTable {
    pub lines: BTreeMap<String, Vec<f64>>,
}

impl TravelTimeTable {
    /// Travel times for `code`, padded or defaulted to `segment_count`
    /// entries of `default` minutes each.
    pub fn segment_times(&self, code: &str, segment_count: usize, default: f64) -> Vec<f64> {
        match self.lines.get(code) {
            Some(times) => (0..segment_count)
                .map(|i| times.get(i).copied().unwrap_or(default))
                .collect(),
            None => vec![default; segment_count],
        }
    }
}

/// Format minutes-from-midnight as `HH:MM`, wrapping past-midnight values
/// back onto the 24-hour clock for display.
pub fn format_time(minutes: f64) -> String {
    let total = minutes.max(0.0).floor() as u64;
    let hours = (total / 60) % 24;
    let mins = total % 60;
    format!("{hours:02}:{mins:02}")
}

/// Parse `HH:MM` into minutes from midnight.
pub fn parse_time(s: &str) -> Option<f64> {
    let (h, m) = s.split_once(':')?;
    let hours: u32 = h.parse().ok()?;
    let mins: u32 = m.parse().ok()?;
    if mins >= 60 {
        return None;
    }
    Some(f64::from(hours) * 60.0 + f64::from(mins))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with(code: &str, schedule: LineSchedule) -> ScheduleBook {
        let mut book = ScheduleBook::default();
        book.lines.insert(code.to_string(), schedule);
        book
    }

    fn basic_schedule() -> LineSchedule {
        LineSchedule {
            start_time: 330.0,
            end_time: 1440.0,
            dwell_secs: None,
            max_fleet: 20,
            frequency: None,
        }
    }

    #[test]
    fn operating_window_is_half_open() {
        let book = book_with("NS", basic_schedule());
        assert!(!book.is_operating("NS", 329.0));
        assert!(book.is_operating("NS", 330.0));
        assert!(book.is_operating("NS", 800.0));
        assert!(book.is_operating("NS", 1439.9));
        assert!(!book.is_operating("NS", 1440.0));
    }

    #[test]
    fn unknown_line_never_operates() {
        let book = ScheduleBook::default();
        assert!(!book.is_operating("XX", 800.0));
    }

    #[test]
    fn peak_hour_windows() {
        let book = ScheduleBook::default();
        assert!(book.is_peak_hour(7.0 * 60.0));
        assert!(book.is_peak_hour(8.5 * 60.0));
        assert!(!book.is_peak_hour(10.0 * 60.0));
        assert!(book.is_peak_hour(18.0 * 60.0));
        assert!(!book.is_peak_hour(21.0 * 60.0));
    }

    #[test]
    fn frequency_bands() {
        let book = book_with("NS", basic_schedule());
        // Peak.
        assert_eq!(book.line_frequency("NS", 8.0 * 60.0), 2.5);
        // Off-peak.
        assert_eq!(book.line_frequency("NS", 12.0 * 60.0), 6.0);
        // Late night wins over everything after 22:00.
        assert_eq!(book.line_frequency("NS", 23.0 * 60.0), 10.0);
    }

    #[test]
    fn per_line_frequency_override() {
        let mut schedule = basic_schedule();
        schedule.frequency = Some(FrequencyRule {
            peak: 3.0,
            off_peak: 7.0,
            late_night: 9.0,
        });
        let book = book_with("BP", schedule);
        assert_eq!(book.line_frequency("BP", 8.0 * 60.0), 3.0);
        assert_eq!(book.line_frequency("BP", 12.0 * 60.0), 7.0);
        assert_eq!(book.line_frequency("BP", 23.5 * 60.0), 9.0);
    }

    #[test]
    fn dwell_defaults_and_overrides() {
        let book = book_with("NS", basic_schedule());
        assert!((book.dwell_minutes("NS") - 0.5).abs() < 1e-12);
        // Unknown lines also get the global default.
        assert!((book.dwell_minutes("XX") - 0.5).abs() < 1e-12);

        let mut schedule = basic_schedule();
        schedule.dwell_secs = Some(20.0);
        let book = book_with("PG", schedule);
        assert!((book.dwell_minutes("PG") - 20.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn operating_status_labels() {
        let book = ScheduleBook::default();
        assert_eq!(book.operating_status(8.0 * 60.0), OperatingStatus::PeakHour);
        assert_eq!(book.operating_status(12.0 * 60.0), OperatingStatus::OffPeak);
        assert_eq!(
            book.operating_status(23.0 * 60.0),
            OperatingStatus::LateNight
        );
        assert_eq!(book.operating_status(8.0 * 60.0).to_string(), "Peak Hour");
    }

    #[test]
    fn travel_times_default_when_missing() {
        let table = TravelTimeTable::default();
        assert_eq!(table.segment_times("XX", 3, 2.0), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn travel_times_pad_short_arrays() {
        let mut table = TravelTimeTable::default();
        table.lines.insert("NS".into(), vec![3.0, 4.0]);
        assert_eq!(table.segment_times("NS", 4, 2.0), vec![3.0, 4.0, 2.0, 2.0]);
    }

    #[test]
    fn time_formatting_round_trip() {
        assert_eq!(format_time(330.0), "05:30");
        assert_eq!(format_time(1439.0), "23:59");
        // Past-midnight values wrap for display only.
        assert_eq!(format_time(1500.0), "01:00");
        assert_eq!(parse_time("05:30"), Some(330.0));
        assert_eq!(parse_time("23:59"), Some(1439.0));
        assert_eq!(parse_time("5:61"), None);
        assert_eq!(parse_time("junk"), None);
    }
}
