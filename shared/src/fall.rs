//! Two-phase fall model.
//!
//! A falling body accelerates at [`FALL_GRAVITY`] until it reaches terminal velocity,
//! then keeps falling at that constant speed. Slow fall ("safe fall") uses a much lower
//! terminal velocity. Times are seconds, distances meters.

use crate::constants::{FALL_GRAVITY, TERMINAL_SAFE_FALL_VELOCITY, TERMINAL_VELOCITY};

#[inline]
fn terminal_velocity(safe_fall: bool) -> f32 {
    if safe_fall {
        TERMINAL_SAFE_FALL_VELOCITY
    } else {
        TERMINAL_VELOCITY
    }
}

/// Seconds needed to reach terminal velocity from rest.
#[inline]
pub fn terminal_fall_time(safe_fall: bool) -> f32 {
    terminal_velocity(safe_fall) / FALL_GRAVITY
}

/// Distance covered while accelerating to terminal velocity from rest.
#[inline]
pub fn terminal_fall_length(safe_fall: bool) -> f32 {
    let v = terminal_velocity(safe_fall);
    (v * v) / (2.0 * FALL_GRAVITY)
}

/// Seconds needed to fall `path_length` meters from rest.
///
/// Negative lengths (the target is above the start) take no time.
pub fn compute_fall_time(path_length: f32, safe_fall: bool) -> f32 {
    if path_length < 0.0 {
        return 0.0;
    }

    let terminal_length = terminal_fall_length(safe_fall);
    if path_length >= terminal_length {
        (path_length - terminal_length) / terminal_velocity(safe_fall) + terminal_fall_time(safe_fall)
    } else {
        (2.0 * path_length / FALL_GRAVITY).sqrt()
    }
}

/// Distance fallen after `t_passed` seconds, starting at `start_velocity` (downward, m/s).
///
/// `start_velocity` above terminal velocity is clamped. A negative start velocity models
/// an upward launch (used by jumps to find the apex height).
pub fn compute_fall_elevation(t_passed: f32, safe_fall: bool, start_velocity: f32) -> f32 {
    let term_vel = terminal_velocity(safe_fall);
    let start_velocity = start_velocity.min(term_vel);

    let terminal_time = terminal_fall_time(safe_fall) - start_velocity / FALL_GRAVITY;
    if t_passed > terminal_time {
        term_vel * (t_passed - terminal_time)
            + start_velocity * terminal_time
            + FALL_GRAVITY * terminal_time * terminal_time * 0.5
    } else {
        t_passed * (start_velocity + t_passed * FALL_GRAVITY * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_falls_are_pure_acceleration() {
        let t = compute_fall_time(10.0, false);
        assert!((t - (20.0 / FALL_GRAVITY).sqrt()).abs() < 1.0e-6);
        assert!((compute_fall_elevation(t, false, 0.0) - 10.0).abs() < 1.0e-3);
    }

    #[test]
    fn long_falls_reach_terminal_velocity() {
        let length = terminal_fall_length(false) + TERMINAL_VELOCITY * 2.0;
        let t = compute_fall_time(length, false);
        assert!((t - (terminal_fall_time(false) + 2.0)).abs() < 1.0e-4);
        assert!((compute_fall_elevation(t, false, 0.0) - length).abs() < 1.0e-2);
    }

    #[test]
    fn safe_fall_is_slower() {
        assert!(compute_fall_time(50.0, true) > compute_fall_time(50.0, false));
    }

    #[test]
    fn rising_targets_take_no_time() {
        assert_eq!(compute_fall_time(-3.0, false), 0.0);
    }
}
