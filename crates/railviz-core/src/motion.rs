//! Trapezoidal motion profile for station-to-station runs.
//!
//! Real trains accelerate out of a station, cruise, and brake into the
//! next one. Mapping linear time-progress straight onto spatial progress
//! makes markers glide at constant speed and visibly overshoot platforms,
//! so the engine eases every segment through this three-phase profile:
//! 20% acceleration, 60% cruise, 20% deceleration.

/// Fraction of the segment's travel time spent accelerating.
const ACCEL_PHASE: f64 = 0.2;
/// Fraction spent cruising at line speed.
const CRUISE_PHASE: f64 = 0.6;
/// Fraction spent braking.
const DECEL_PHASE: f64 = 0.2;

/// Map linear time-progress `t` in `[0, 1]` to spatial progress in `[0, 1]`.
///
/// Quadratic ease-in over the first 20% (covering 10% of the distance),
/// linear cruise over the middle 60% (covering 80%), quadratic ease-out
/// over the last 20% (covering the final 10%). Continuous and monotonically
/// non-decreasing; inputs outside `[0, 1]` are clamped.
pub fn trapezoidal_motion(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);

    let t1 = ACCEL_PHASE;
    let t2 = ACCEL_PHASE + CRUISE_PHASE;

    if t < t1 {
        let local = t / ACCEL_PHASE;
        0.1 * local * local
    } else if t < t2 {
        let local = (t - t1) / CRUISE_PHASE;
        0.1 + 0.8 * local
    } else {
        let local = (t - t2) / DECEL_PHASE;
        0.9 + 0.1 * (2.0 * local - local * local)
    }
}

/// Display speed for UI indication, 0..=100, with the same three-phase
/// breakpoints as [`trapezoidal_motion`]: ramp up over the first 20% of
/// the run, hold 100 through the cruise, ramp down over the last 20%.
pub fn speed_phase(t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    let value = if t < 0.2 {
        (t / 0.2) * 100.0
    } else if t < 0.8 {
        100.0
    } else {
        ((1.0 - t) / 0.2) * 100.0
    };
    value.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn endpoints() {
        assert_eq!(trapezoidal_motion(0.0), 0.0);
        assert!((trapezoidal_motion(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn continuous_at_phase_boundaries() {
        // Value just below each breakpoint must match the next branch's
        // value at the breakpoint within floating tolerance.
        let eps = 1e-9;
        let below_accel = trapezoidal_motion(0.2 - eps);
        let at_accel = trapezoidal_motion(0.2);
        assert!((below_accel - at_accel).abs() < 1e-6);
        assert!((at_accel - 0.1).abs() < 1e-12);

        let below_decel = trapezoidal_motion(0.8 - eps);
        let at_decel = trapezoidal_motion(0.8);
        assert!((below_decel - at_decel).abs() < 1e-6);
        assert!((at_decel - 0.9).abs() < 1e-12);
    }

    #[test]
    fn clamps_out_of_range_input() {
        assert_eq!(trapezoidal_motion(-0.5), 0.0);
        assert!((trapezoidal_motion(1.5) - 1.0).abs() < 1e-12);
        assert_eq!(speed_phase(-1.0), 0);
        assert_eq!(speed_phase(2.0), 0);
    }

    #[test]
    fn speed_phase_breakpoints() {
        assert_eq!(speed_phase(0.0), 0);
        assert_eq!(speed_phase(0.1), 50);
        assert_eq!(speed_phase(0.2), 100);
        assert_eq!(speed_phase(0.5), 100);
        assert_eq!(speed_phase(0.9), 50);
        assert_eq!(speed_phase(1.0), 0);
    }

    proptest! {
        #[test]
        fn monotonically_non_decreasing(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(trapezoidal_motion(lo) <= trapezoidal_motion(hi) + 1e-12);
        }

        #[test]
        fn output_stays_in_unit_interval(t in -1.0f64..=2.0) {
            let v = trapezoidal_motion(t);
            prop_assert!((0.0..=1.0).contains(&v));
        }

        #[test]
        fn speed_phase_bounded(t in 0.0f64..=1.0) {
            prop_assert!(speed_phase(t) <= 100);
        }
    }
}
