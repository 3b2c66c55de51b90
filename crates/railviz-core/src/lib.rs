//! Railviz Core -- the train position simulation engine for rail network maps.
//!
//! This crate computes, for any queried clock time, the positions of all
//! trains operating on a multi-line rail network, driven by per-line
//! timetables, per-segment travel times, dwell times, and fleet-size caps.
//! It is consumed by a map-rendering front end that turns positions into
//! visual markers.
//!
//! # Pull-Based Query Pipeline
//!
//! There is no background clock. Each call to
//! [`engine::SimulationEngine::train_positions`] runs three phases for the
//! queried time `t` (minutes from midnight; values past 1440 represent
//! past-midnight continuation of the same service day):
//!
//! 1. **Resync or reconcile** -- On the first query, or when `t` jumps by
//!    more than 5 simulated minutes (the user scrubbed the clock), every
//!    line's fleet is discarded and re-seeded with evenly staggered trains.
//!    Otherwise each operating line injects or flags-for-retirement at most
//!    one train to track its headway-derived service target.
//! 2. **Lifecycle transitions** -- Trains finish depot connector runs
//!    (Injecting becomes Running with a back-computed entry time), begin or
//!    finish withdrawal, or despawn.
//! 3. **Position resolution** -- Each running train's elapsed time in its
//!    timetable cycle is walked through dwell and segment budgets, eased
//!    through a trapezoidal speed profile, and mapped onto real track
//!    geometry by the [`interpolator::RouteInterpolator`].
//!
//! # Key Types
//!
//! - [`engine::SimulationEngine`] -- Owns all mutable fleet state; plainly
//!   constructed, no global instance. "Reset" means building a new one.
//! - [`interpolator::RouteInterpolator`] -- Maps (station pair, fraction)
//!   requests onto a detailed track polyline, with straight-line fallback.
//! - [`train::Train`] / [`train::TrainState`] -- Per-train lifecycle as an
//!   exhaustively matched tagged union.
//! - [`query::TrainPosition`] -- Owned snapshot handed to renderers.
//! - [`rng::SimRng`] -- Seedable SplitMix64 generator behind every random
//!   choice (depot pick, id suffixes), so tests are reproducible.
//!
//! All lookups degrade gracefully: missing travel times default to 2-minute
//! segments, unmapped geometry falls back to straight lines, and no query
//! ever panics or returns non-finite coordinates.

pub mod depot;
pub mod engine;
pub mod fleet;
pub mod geo;
pub mod interpolator;
pub mod line;
pub mod motion;
pub mod query;
pub mod rng;
pub mod schedule;
pub mod train;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
