//! Per-train lifecycle state.
//!
//! Trains are owned exclusively by the engine, one live set per line. A
//! running train carries no per-tick state: its position is a pure function
//! of (line config, entry time, direction, query time). Everything else is
//! a lifecycle transition, expressed as an exhaustively matched union.

use crate::geo::GeoPoint;

/// Travel direction along the traversal station order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending station order.
    Forward,
    /// Descending station order.
    Reverse,
}

impl Direction {
    pub fn is_reverse(self) -> bool {
        matches!(self, Self::Reverse)
    }
}

/// Lifecycle state. Connector bookkeeping lives only in the states that
/// need it, so a `Running` train cannot carry stale depot references.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainState {
    /// On the timetable loop.
    Running,
    /// Moving from a depot toward `target_station` along `path`.
    Injecting {
        depot: String,
        started: f64,
        path: Vec<GeoPoint>,
        target_station: String,
    },
    /// Moving from the track back to a depot, along `path` reversed.
    Withdrawing {
        depot: String,
        started: f64,
        path: Vec<GeoPoint>,
    },
    /// Terminal decay: finish the current timetable loop, then remove.
    /// Used for retiring trains that never reach a depot-connected station.
    Despawning,
}

impl TrainState {
    /// Whether this train counts toward the line's in-service capacity.
    /// Withdrawing and despawning trains are already leaving service.
    pub fn in_service(&self) -> bool {
        matches!(self, Self::Running | Self::Injecting { .. })
    }
}

/// One train in a line's active set.
#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    pub id: String,
    pub line: String,
    pub direction: Direction,
    /// Simulation minute marking the start of the current timetable cycle.
    /// May be negative or in the future; re-derived when injection
    /// completes so the train joins the timetable at the station it
    /// physically arrived at.
    pub entry_time: f64,
    pub state: TrainState,
    /// Set by position resolution each query.
    pub is_at_station: bool,
    /// Flagged by fleet reconciliation when the line is over target. The
    /// train keeps running until it is next found at a depot-connected
    /// station; it is never yanked mid-segment.
    pub wants_to_retire: bool,
    /// When the retire flag was raised, for the stuck-withdrawal timeout.
    pub retire_requested_at: Option<f64>,
}

impl Train {
    /// A train already on the timetable (direct spawn, no depot animation).
    pub fn running(id: String, line: &str, direction: Direction, entry_time: f64) -> Self {
        Self {
            id,
            line: line.to_string(),
            direction,
            entry_time,
            state: TrainState::Running,
            is_at_station: false,
            wants_to_retire: false,
            retire_requested_at: None,
        }
    }

    /// A train leaving a depot along a connector. `entry_time` is
    /// back-computed when the connector run completes.
    pub fn injecting(
        id: String,
        line: &str,
        direction: Direction,
        depot: String,
        started: f64,
        path: Vec<GeoPoint>,
        target_station: String,
    ) -> Self {
        Self {
            id,
            line: line.to_string(),
            direction,
            entry_time: started,
            state: TrainState::Injecting {
                depot,
                started,
                path,
                target_station,
            },
            is_at_station: false,
            wants_to_retire: false,
            retire_requested_at: None,
        }
    }
}

/// Monotonic id allocator. Combined with the per-spawn tag (and an rng
/// suffix for injections) this keeps every id unique for the lifetime of
/// an engine, including across coarse resyncs.
#[derive(Debug, Clone, Default)]
pub struct TrainIdGen {
    next_seq: u64,
}

impl TrainIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, line: &str, tag: &str) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        format!("{line}-{seq:04}-{tag}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_service_states() {
        assert!(TrainState::Running.in_service());
        assert!(
            TrainState::Injecting {
                depot: "BSD".into(),
                started: 0.0,
                path: vec![],
                target_station: "NS17".into(),
            }
            .in_service()
        );
        assert!(
            !TrainState::Withdrawing {
                depot: "BSD".into(),
                started: 0.0,
                path: vec![],
            }
            .in_service()
        );
        assert!(!TrainState::Despawning.in_service());
    }

    #[test]
    fn id_gen_is_unique_and_ordered() {
        let mut ids = TrainIdGen::new();
        let a = ids.next("NS", "F0");
        let b = ids.next("NS", "F0");
        let c = ids.next("EW", "R1");
        assert_ne!(a, b);
        assert_eq!(a, "NS-0000-F0");
        assert_eq!(b, "NS-0001-F0");
        assert_eq!(c, "EW-0002-R1");
    }

    #[test]
    fn running_constructor_defaults() {
        let train = Train::running("NS-0000-F0".into(), "NS", Direction::Forward, 500.0);
        assert_eq!(train.state, TrainState::Running);
        assert!(!train.wants_to_retire);
        assert!(!train.is_at_station);
        assert_eq!(train.retire_requested_at, None);
    }
}
