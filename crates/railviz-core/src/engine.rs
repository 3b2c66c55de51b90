//! The simulation engine: per-line fleets and position resolution.
//!
//! Pull-based and single-threaded. The engine holds no timer; every query
//! for a clock time `t` runs the full pipeline inside the call:
//!
//! 1. fleet reconciliation (coarse resync on a large time jump, otherwise
//!    one-step inject/retire convergence),
//! 2. per-train lifecycle advancement (depot connector animations,
//!    timetable joins, withdrawals, despawns),
//! 3. elapsed-time-to-position mapping through the dwell walk, the
//!    trapezoidal motion profile, and the route interpolator.
//!
//! Calling with the same time twice yields the same visible output. The
//! only nondeterminism (depot choice, id suffixes) flows through the
//! seedable [`SimRng`].

use crate::depot::DepotBook;
use crate::fleet::{self, FleetContext};
use crate::geo::{self, GeoPoint};
use crate::interpolator::{RouteInterpolator, TrackPoint};
use crate::line::{Network, Station};
use crate::motion;
use crate::query::TrainPosition;
use crate::rng::SimRng;
use crate::schedule::{ScheduleBook, TravelTimeTable};
use crate::train::{Direction, Train, TrainIdGen, TrainState};
use std::collections::BTreeMap;

/// Time jump beyond which incremental reconciliation is abandoned and
/// every line's fleet is re-seeded from scratch, minutes.
pub const RESYNC_THRESHOLD_MIN: f64 = 5.0;

/// Fixed duration of a depot connector run (both directions), minutes.
pub const DEPOT_TRANSIT_MIN: f64 = 2.0;

/// How long a retire-flagged train may circle without finding a depot
/// station before it is despawned at the end of its current loop, minutes.
pub const MAX_RETIRE_WAIT_MIN: f64 = 30.0;

/// Marker color for trains on a depot connector (not in revenue service).
pub const NON_REVENUE_COLOR: &str = "#555";

/// Flat display speed while on a depot connector.
const DEPOT_TRANSIT_SPEED: u8 = 40;

const DEFAULT_SEED: u64 = 0x7261_696C_7669_7A21;

/// One line with its geometry pre-resolved: traversal-ordered stations and
/// a built interpolator. Never changes after construction.
#[derive(Debug, Clone)]
struct ResolvedLine {
    name: String,
    color: String,
    /// Stations in traversal order (loop order applied).
    stations: Vec<Station>,
    interpolator: RouteInterpolator,
}

/// The simulation engine. Explicitly constructed and explicitly owned;
/// "reset" is constructing a new instance.
#[derive(Debug)]
pub struct SimulationEngine {
    lines: BTreeMap<String, ResolvedLine>,
    schedules: ScheduleBook,
    travel_times: TravelTimeTable,
    depots: DepotBook,
    fleets: BTreeMap<String, Vec<Train>>,
    last_update: Option<f64>,
    last_injection: BTreeMap<String, f64>,
    rng: SimRng,
    ids: TrainIdGen,
}

impl SimulationEngine {
    pub fn new(
        network: Network,
        schedules: ScheduleBook,
        travel_times: TravelTimeTable,
        depots: DepotBook,
    ) -> Self {
        Self::with_seed(network, schedules, travel_times, depots, DEFAULT_SEED)
    }

    /// Like [`new`](Self::new) with an explicit RNG seed, for reproducible
    /// fleet decisions in tests.
    pub fn with_seed(
        network: Network,
        schedules: ScheduleBook,
        travel_times: TravelTimeTable,
        depots: DepotBook,
        seed: u64,
    ) -> Self {
        let lines: BTreeMap<String, ResolvedLine> = network
            .lines
            .into_iter()
            .map(|(code, line)| {
                let stations = line.traversal_stations();
                let points: Vec<GeoPoint> = stations.iter().map(Station::point).collect();
                let detailed = if line.detailed_path.is_empty() {
                    None
                } else {
                    Some(line.detailed_path)
                };
                let resolved = ResolvedLine {
                    name: line.name,
                    color: line.color,
                    stations,
                    interpolator: RouteInterpolator::new(points, detailed),
                };
                (code, resolved)
            })
            .collect();

        Self {
            lines,
            schedules,
            travel_times,
            depots,
            fleets: BTreeMap::new(),
            last_update: None,
            last_injection: BTreeMap::new(),
            rng: SimRng::new(seed),
            ids: TrainIdGen::new(),
        }
    }

    // --- Timing lookups -------------------------------------------------

    /// Per-segment travel times for a line, one entry per traversal hop,
    /// defaulted where the table has no data.
    pub fn segment_travel_times(&self, code: &str) -> Vec<f64> {
        let segments = self
            .lines
            .get(code)
            .map_or(0, |l| l.stations.len().saturating_sub(1));
        self.travel_times
            .segment_times(code, segments, self.schedules.config.default_segment_minutes)
    }

    /// Full loop duration: all segment times plus one dwell per station.
    pub fn total_journey_time(&self, code: &str) -> f64 {
        let times = self.segment_travel_times(code);
        let station_count = self.lines.get(code).map_or(0, |l| l.stations.len());
        let travel: f64 = times.iter().sum();
        travel + station_count as f64 * self.schedules.dwell_minutes(code)
    }

    /// Elapsed cycle time at which a train arrives (starts dwelling) at
    /// traversal `station_index` when running in `direction`.
    pub fn time_to_station(&self, code: &str, station_index: usize, direction: Direction) -> f64 {
        let times = self.segment_travel_times(code);
        let dwell = self.schedules.dwell_minutes(code);
        timetable_offset(&times, dwell, station_index, direction)
    }

    // --- Read accessors -------------------------------------------------

    pub fn line_codes(&self) -> Vec<&str> {
        self.lines.keys().map(String::as_str).collect()
    }

    pub fn line_name(&self, code: &str) -> Option<&str> {
        self.lines.get(code).map(|l| l.name.as_str())
    }

    pub fn schedules(&self) -> &ScheduleBook {
        &self.schedules
    }

    /// The live train set for a line. Empty until the first query, and for
    /// lines outside their operating window.
    pub fn fleet(&self, code: &str) -> &[Train] {
        self.fleets.get(code).map_or(&[], Vec::as_slice)
    }

    // --- The query pipeline ---------------------------------------------

    /// All positioned trains at clock time `t` (minutes from midnight,
    /// values past 1440 meaning past-midnight service).
    pub fn train_positions(&mut self, t: f64) -> Vec<TrainPosition> {
        self.update_fleets(t);

        let codes: Vec<String> = self.lines.keys().cloned().collect();
        let mut all = Vec::new();

        for code in &codes {
            let mut fleet = self.fleets.remove(code).unwrap_or_default();
            let line = &self.lines[code];
            if line.stations.is_empty() {
                self.fleets.insert(code.clone(), fleet);
                continue;
            }

            let dwell = self.schedules.dwell_minutes(code);
            let segment_times = self.segment_travel_times(code);
            let journey = self.total_journey_time(code);
            let mut survivors = Vec::with_capacity(fleet.len());

            for mut train in fleet.drain(..) {
                // A finished injection joins the timetable and falls
                // through to running resolution in the same frame.
                if let TrainState::Injecting {
                    started,
                    path,
                    target_station,
                    ..
                } = &train.state
                {
                    let progress = (t - started) / DEPOT_TRANSIT_MIN;
                    if progress < 1.0 && path.len() >= 2 {
                        let point = connector_point(path, progress);
                        all.push(connector_marker(&train, code, line, point, "Leaving Depot"));
                        survivors.push(train);
                        continue;
                    }

                    let station_index = line
                        .stations
                        .iter()
                        .position(|s| &s.code == target_station)
                        .unwrap_or(0);
                    let offset =
                        timetable_offset(&segment_times, dwell, station_index, train.direction);
                    train.entry_time = t - offset;
                    train.state = TrainState::Running;
                }

                if let TrainState::Withdrawing { started, path, .. } = &train.state {
                    let progress = (t - started) / DEPOT_TRANSIT_MIN;
                    if progress >= 1.0 {
                        continue; // reached the depot
                    }
                    if path.len() >= 2 {
                        let point = connector_point(path, 1.0 - progress);
                        all.push(connector_marker(&train, code, line, point, "Returning to Depot"));
                    }
                    survivors.push(train);
                    continue;
                }

                // Running or Despawning.
                let elapsed_total = t - train.entry_time;
                if elapsed_total < 0.0 {
                    // Not yet departed: kept alive, no marker.
                    survivors.push(train);
                    continue;
                }
                let loops = (elapsed_total / journey).floor() as u64;
                let elapsed_in_cycle = elapsed_total.rem_euclid(journey);

                if matches!(train.state, TrainState::Despawning) && loops >= 1 {
                    continue;
                }

                let resolved = position_with_dwell(
                    &line.interpolator,
                    &line.stations,
                    elapsed_in_cycle,
                    &segment_times,
                    dwell,
                    train.direction.is_reverse(),
                );
                train.is_at_station = resolved.is_at_station;

                if train.wants_to_retire && resolved.is_at_station {
                    let at_code = &line.stations[resolved.station_index].code;
                    if let Some((depot_id, depot)) = self.depots.connector_at(code, at_code) {
                        train.state = TrainState::Withdrawing {
                            depot: depot_id.to_string(),
                            started: t,
                            path: depot.connection.path.clone(),
                        };
                        train.wants_to_retire = false;
                        train.retire_requested_at = None;
                        survivors.push(train);
                        continue;
                    }
                    if let Some(requested) = train.retire_requested_at {
                        if t - requested >= MAX_RETIRE_WAIT_MIN {
                            // Give up waiting for a depot station: finish
                            // the current loop, then disappear.
                            train.state = TrainState::Despawning;
                            train.entry_time = t - elapsed_in_cycle;
                            train.wants_to_retire = false;
                        }
                    }
                }

                let bearing = if train.direction.is_reverse() {
                    geo::flip_bearing(resolved.point.bearing)
                } else {
                    resolved.point.bearing
                };

                all.push(TrainPosition {
                    id: train.id.clone(),
                    line: code.clone(),
                    color: line.color.clone(),
                    line_name: line.name.clone(),
                    direction: train.direction,
                    lng: resolved.point.lng,
                    lat: resolved.point.lat,
                    bearing,
                    is_at_station: resolved.is_at_station,
                    station_index: Some(resolved.station_index),
                    station_name: resolved.station_name,
                    speed: resolved.speed,
                });
                survivors.push(train);
            }

            self.fleets.insert(code.clone(), survivors);
        }

        all
    }

    /// Step 1 of every query: converge fleets toward target. A first call
    /// or a coarse time jump re-seeds everything; small deltas reconcile
    /// one injection / one retire flag per line per call.
    fn update_fleets(&mut self, t: f64) {
        let resync = self
            .last_update
            .is_none_or(|prev| (t - prev).abs() > RESYNC_THRESHOLD_MIN);
        let codes: Vec<String> = self.lines.keys().cloned().collect();

        for code in &codes {
            if !self.schedules.is_operating(code, t) {
                self.fleets.insert(code.clone(), Vec::new());
                continue;
            }

            let ctx = FleetContext {
                line: code.as_str(),
                journey_minutes: self.total_journey_time(code),
                frequency: self.schedules.line_frequency(code, t),
                max_fleet: self.schedules.line(code).map_or(1, |s| s.max_fleet),
                depots: &self.depots,
            };

            if resync {
                let fleet = fleet::seed_fleet(&ctx, t, &mut self.ids);
                self.fleets.insert(code.clone(), fleet);
                self.last_injection.insert(code.clone(), t);
            } else {
                let fleet = self.fleets.remove(code).unwrap_or_default();
                let can_inject = self
                    .last_injection
                    .get(code)
                    .is_none_or(|&last| t - last >= fleet::INJECTION_COOLDOWN_MIN);
                let out = fleet::reconcile(&ctx, fleet, t, can_inject, &mut self.rng, &mut self.ids);
                if out.injected {
                    self.last_injection.insert(code.clone(), t);
                }
                self.fleets.insert(code.clone(), out.fleet);
            }
        }

        self.last_update = Some(t);
    }
}

// --- Position resolution helpers ----------------------------------------

struct ResolvedPosition {
    point: TrackPoint,
    is_at_station: bool,
    /// Traversal station index: the current station while dwelling, the
    /// departure station while in a segment.
    station_index: usize,
    station_name: String,
    speed: u8,
}

/// Walk one timetable cycle: consume dwell then segment time per hop until
/// the elapsed budget runs out, then resolve the resting place. `stations`
/// must be non-empty. Reverse trains walk the traversal order backward via
/// index mirroring; segment times are mirrored the same way.
fn position_with_dwell(
    interpolator: &RouteInterpolator,
    stations: &[Station],
    elapsed: f64,
    segment_times: &[f64],
    dwell: f64,
    reverse: bool,
) -> ResolvedPosition {
    let station_count = stations.len();
    let segments = station_count.saturating_sub(1);
    let segment_time = |seg: usize| {
        let idx = if reverse { segments - 1 - seg } else { seg };
        segment_times.get(idx).copied().unwrap_or(2.0)
    };

    let mut current_station = 0usize;
    let mut time_remaining = elapsed;

    if time_remaining >= dwell {
        time_remaining -= dwell;
        let mut dwelling = false;
        for seg in 0..segments {
            let this_segment = segment_time(seg);
            if time_remaining < this_segment {
                let linear = if this_segment > 0.0 {
                    time_remaining / this_segment
                } else {
                    1.0
                };
                let eased = motion::trapezoidal_motion(linear);
                let from_idx = if reverse { station_count - 1 - seg } else { seg };
                let to_idx = if reverse { station_count - 2 - seg } else { seg + 1 };

                let lo = from_idx.min(to_idx);
                let hi = from_idx.max(to_idx);
                let frac = if reverse { 1.0 - eased } else { eased };
                let point = interpolator.position_between_stations(lo, hi, frac);

                return ResolvedPosition {
                    point,
                    is_at_station: false,
                    station_index: from_idx,
                    station_name: format!(
                        "{} → {}",
                        stations[from_idx].code, stations[to_idx].code
                    ),
                    speed: motion::speed_phase(linear),
                };
            }
            time_remaining -= this_segment;
            if time_remaining < dwell {
                current_station = seg + 1;
                dwelling = true;
                break;
            }
            time_remaining -= dwell;
        }
        if !dwelling {
            // Budget exhausted past the last hop: resting at the far end.
            current_station = segments;
        }
    }

    let actual = if reverse {
        station_count - 1 - current_station
    } else {
        current_station
    }
    .min(station_count - 1);
    let point = interpolator.position_between_stations(actual, actual, 0.0);

    ResolvedPosition {
        point,
        is_at_station: true,
        station_index: actual,
        station_name: stations[actual].name.clone(),
        speed: 0,
    }
}

/// Arrival offset from cycle start to the beginning of the dwell at
/// `station_index`, for either direction.
fn timetable_offset(
    segment_times: &[f64],
    dwell: f64,
    station_index: usize,
    direction: Direction,
) -> f64 {
    let station_count = segment_times.len() + 1;
    let station_index = station_index.min(station_count - 1);
    match direction {
        Direction::Forward => {
            station_index as f64 * dwell + segment_times[..station_index].iter().sum::<f64>()
        }
        Direction::Reverse => {
            (station_count - 1 - station_index) as f64 * dwell
                + segment_times[station_index..].iter().sum::<f64>()
        }
    }
}

/// Vertex-parameter interpolation along a depot connector. Unlike track
/// walks this is not arc-length parameterized; connector polylines are
/// short and drawn with roughly even spacing.
fn connector_point(path: &[GeoPoint], progress: f64) -> GeoPoint {
    let last = path.len() - 1;
    let float_idx = progress.clamp(0.0, 1.0) * last as f64;
    let idx = (float_idx.floor() as usize).min(last);
    let sub = float_idx - idx as f64;
    path[idx].lerp(path[(idx + 1).min(last)], sub)
}

fn connector_marker(
    train: &Train,
    code: &str,
    line: &ResolvedLine,
    point: GeoPoint,
    status: &str,
) -> TrainPosition {
    TrainPosition {
        id: train.id.clone(),
        line: code.to_string(),
        color: NON_REVENUE_COLOR.to_string(),
        line_name: line.name.clone(),
        direction: train.direction,
        lng: point.lng,
        lat: point.lat,
        bearing: 0.0,
        is_at_station: false,
        station_index: None,
        station_name: status.to_string(),
        speed: DEPOT_TRANSIT_SPEED,
    }
}
