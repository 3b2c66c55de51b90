//! Fleet sizing and reconciliation.
//!
//! Pure functions from (line parameters, current fleet, clock time) to a
//! new fleet. The engine owns the mutation points; everything here is
//! testable without an engine instance.
//!
//! Two sizing rules exist on purpose. Seeding answers "how many trains
//! would already be mid-route if service had been running all along" and
//! back-dates their entry times; reconciliation answers "how many should
//! be in service right now" and converges the live set toward that target
//! one train per call, paced by the engine's injection cooldown.

use crate::depot::DepotBook;
use crate::rng::SimRng;
use crate::train::{Direction, Train, TrainIdGen};

/// Fraction of a line's maximum fleet allowed in revenue service; the
/// remainder is notionally under maintenance.
pub const FLEET_UTILIZATION: f64 = 0.9;

/// Minimum gap between consecutive injections on one line, minutes.
pub const INJECTION_COOLDOWN_MIN: f64 = 2.0;

/// Everything reconciliation needs to know about one line.
#[derive(Debug, Clone, Copy)]
pub struct FleetContext<'a> {
    pub line: &'a str,
    /// One-way end-to-end journey time including dwells, minutes.
    pub journey_minutes: f64,
    /// Current headway, minutes.
    pub frequency: f64,
    pub max_fleet: u32,
    pub depots: &'a DepotBook,
}

/// Outcome of one reconciliation pass.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub fleet: Vec<Train>,
    /// Whether a train was spawned this pass (starts the cooldown).
    pub injected: bool,
}

fn service_cap(max_fleet: u32) -> usize {
    (f64::from(max_fleet) * FLEET_UTILIZATION).floor() as usize
}

/// Trains per direction for a cold start: one per headway slot along the
/// journey, capped by the service cap, never zero.
pub fn seed_target_per_direction(journey_minutes: f64, frequency: f64, max_fleet: u32) -> usize {
    if frequency <= 0.0 {
        return 1;
    }
    let by_headway = (journey_minutes / frequency).ceil() as usize;
    by_headway.min(service_cap(max_fleet)).max(1)
}

/// Steady-state in-service target per direction. The total target is
/// capped first, then split evenly, so both directions stay balanced
/// under a tight cap.
pub fn service_target_per_direction(journey_minutes: f64, frequency: f64, max_fleet: u32) -> usize {
    if frequency <= 0.0 {
        return 1;
    }
    let needed_per_direction = (journey_minutes / frequency).ceil() as usize;
    let total = (needed_per_direction * 2).min(service_cap(max_fleet));
    (total / 2).max(1)
}

/// Build a full fleet as if service had been running continuously:
/// entry times are back-dated one headway apart, with the reverse
/// direction offset by half a headway so trains alternate.
pub fn seed_fleet(ctx: &FleetContext<'_>, t: f64, ids: &mut TrainIdGen) -> Vec<Train> {
    let per_direction = seed_target_per_direction(ctx.journey_minutes, ctx.frequency, ctx.max_fleet);
    let mut fleet = Vec::with_capacity(per_direction * 2);
    for i in 0..per_direction {
        let offset = i as f64 * ctx.frequency;
        fleet.push(Train::running(
            ids.next(ctx.line, &format!("F{i}")),
            ctx.line,
            Direction::Forward,
            t - offset,
        ));
        fleet.push(Train::running(
            ids.next(ctx.line, &format!("R{i}")),
            ctx.line,
            Direction::Reverse,
            t - offset - ctx.frequency / 2.0,
        ));
    }
    fleet
}

/// Converge `fleet` toward the current service target: spawn at most one
/// train (respecting `can_inject`), and flag at most one surplus train
/// per direction for retirement. Flagged trains keep running until they
/// reach a depot-connected station.
pub fn reconcile(
    ctx: &FleetContext<'_>,
    mut fleet: Vec<Train>,
    t: f64,
    can_inject: bool,
    rng: &mut SimRng,
    ids: &mut TrainIdGen,
) -> ReconcileOutcome {
    let target = service_target_per_direction(ctx.journey_minutes, ctx.frequency, ctx.max_fleet);

    let effective = |fleet: &[Train], direction: Direction| {
        fleet
            .iter()
            .filter(|tr| tr.direction == direction && tr.state.in_service() && !tr.wants_to_retire)
            .count()
    };

    let mut injected = false;
    if can_inject {
        for direction in [Direction::Forward, Direction::Reverse] {
            if effective(&fleet, direction) < target {
                fleet.push(spawn_train(ctx, direction, t, rng, ids));
                injected = true;
                break;
            }
        }
    }

    for direction in [Direction::Forward, Direction::Reverse] {
        if effective(&fleet, direction) > target {
            if let Some(train) = fleet.iter_mut().find(|tr| {
                tr.direction == direction
                    && matches!(tr.state, crate::train::TrainState::Running)
                    && !tr.wants_to_retire
            }) {
                train.wants_to_retire = true;
                train.retire_requested_at = Some(t);
            }
        }
    }

    ReconcileOutcome { fleet, injected }
}

/// Spawn one replacement train. When a serving depot's connector joins
/// this line the train animates out of the depot; otherwise (no depot, or
/// a depot whose connector belongs to another line) it enters the
/// timetable directly at its starting terminal.
fn spawn_train(
    ctx: &FleetContext<'_>,
    direction: Direction,
    t: f64,
    rng: &mut SimRng,
    ids: &mut TrainIdGen,
) -> Train {
    let tag = match direction {
        Direction::Forward => format!("fwd-{}", rng.id_suffix()),
        Direction::Reverse => format!("rev-{}", rng.id_suffix()),
    };
    let id = ids.next(ctx.line, &tag);

    let serving = ctx.depots.serving(ctx.line);
    if !serving.is_empty() {
        let (depot_id, depot) = serving[rng.pick_index(serving.len())];
        if depot.connection.line == ctx.line {
            return Train::injecting(
                id,
                ctx.line,
                direction,
                depot_id.to_string(),
                t,
                depot.connection.path.clone(),
                depot.connection.station_code.clone(),
            );
        }
    }
    Train::running(id, ctx.line, direction, t)
}
