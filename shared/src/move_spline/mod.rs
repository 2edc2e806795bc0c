//! Spline playback state ("spline clock").
//!
//! [`MoveSpline`] owns a [`Spline`] and tracks how far along it the mover is. It is
//! advanced with [`MoveSpline::update_state`] every simulation tick and sampled with
//! [`MoveSpline::compute_position`] by movement application and wire serialization.
//!
//! States:
//! - Uninitialized: empty spline (never launched, or a stop spline).
//! - Active: `time_passed < duration`. Cyclic splines stay here forever.
//! - Finalized: `Done` flag set, `time_passed == duration`.
//!
//! Time is integer milliseconds so that advancing by `a` then `b` is bit-identical to
//! advancing by `a + b`. Clients predict with the same math from the wire snapshot.

mod args;
mod facing;
mod flags;
mod init;

pub use args::{InitArgsError, MoveSplineInitArgs};
pub use facing::Facing;
pub use flags::{NO_TANGENT_FACING_FLAGS, SplineFlag, SplineFlags, TIMED_EFFECT_FLAGS};
pub use init::MoveSplineInit;

use std::f32::consts::{PI, TAU};

use nalgebra::Vector3;

use crate::{
    EntityId,
    curve::Curve,
    fall::compute_fall_elevation,
    spline::{EvaluationMode, SegmentTiming, Spline},
};

/// Outcome of one step of [`MoveSpline::update_state`], ordered by significance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum UpdateResult {
    None,
    NextSegment,
    NextCycle,
    Arrived,
}

/// A sampled position with its yaw (radians, `atan2(dy, dx)`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Location {
    pub position: Vector3<f32>,
    pub orientation: f32,
}

#[derive(Clone, Debug, Default)]
pub struct MoveSpline {
    args: MoveSplineInitArgs,
    spline: Spline,
    flags: SplineFlags,
    facing: Facing,
    id: u32,
    time_passed: i32,
    point_idx: usize,
    point_idx_offset: i32,
    initial_orientation: f32,
    velocity: f32,
    vertical_acceleration: f32,
    effect_start_time: i32,
    parabolic_curve: Option<Curve>,
    facing_only: bool,
}

impl MoveSpline {
    /// Builds the path and resets playback to its start.
    ///
    /// Arguments are not validated here; [`MoveSplineInit::launch`] does that. Inputs with
    /// fewer than two points are logged and coerced.
    pub fn initialize(&mut self, args: &MoveSplineInitArgs) {
        self.args = args.clone();
        self.flags = args.flags;
        self.facing = args.facing;
        self.id = args.spline_id;
        self.point_idx_offset = args.path_idx_offset;
        self.initial_orientation = args.initial_orientation;
        self.velocity = args.velocity;
        self.parabolic_curve = args.parabolic_curve.clone();
        self.facing_only = args.is_facing_only();
        self.time_passed = 0;
        self.vertical_acceleration = 0.0;
        self.effect_start_time = 0;
        self.point_idx = 0;

        // Stop spline: nothing to travel.
        if self.flags.has(SplineFlag::Done) {
            self.spline.clear();
            return;
        }

        match args.path.len() {
            0 => {
                log::error!("MoveSpline::initialize: empty path for spline {}", self.id);
                self.flags.add(SplineFlag::Done);
                self.spline.clear();
                return;
            }
            1 => {
                log::error!(
                    "MoveSpline::initialize: single point path for spline {}",
                    self.id
                );
                self.args.path.push(args.path[0]);
            }
            _ => {}
        }

        let launched = self.args.clone();
        self.init_spline(&launched);

        if self.flags.has_any(&TIMED_EFFECT_FLAGS) {
            let duration = self.spline.length();
            self.effect_start_time = (duration as f32 * args.time_perc) as i32;
            if self.flags.has(SplineFlag::Parabolic) && self.effect_start_time < duration {
                if args.parabolic_amplitude != 0.0 {
                    let f_duration = (duration - self.effect_start_time) as f32 / 1000.0;
                    self.vertical_acceleration =
                        args.parabolic_amplitude * 8.0 / (f_duration * f_duration);
                } else if args.vertical_acceleration != 0.0 {
                    self.vertical_acceleration = args.vertical_acceleration;
                }
            }
        }
    }

    /// Rebuilds a playback state from its persisted form.
    ///
    /// `args` must be [`MoveSpline::args`] of the original, which already reflects any
    /// cycle entry that was dropped.
    pub fn restore(args: &MoveSplineInitArgs, time_passed: i32, interrupted: bool) -> Self {
        let mut spline = MoveSpline::default();
        spline.initialize(args);
        spline.update_state(time_passed);
        if interrupted {
            spline.interrupt();
        }
        spline
    }

    fn init_spline(&mut self, args: &MoveSplineInitArgs) {
        let mode = if self.flags.has(SplineFlag::CatmullRom) {
            EvaluationMode::CatmullRom
        } else {
            EvaluationMode::Linear
        };

        if self.flags.has(SplineFlag::Cyclic) {
            // A cycle entered from outside loops back to the first point after the entry.
            let cyclic_point =
                usize::from(self.flags.has(SplineFlag::EnterCycle) && args.path.len() > 2);
            self.spline.init_cyclic_spline(&args.path, mode, cyclic_point);
        } else {
            self.spline.init_spline(&args.path, mode);
        }

        let timing = if self.flags.has(SplineFlag::Falling) {
            SegmentTiming::Fall {
                start_elevation: self.spline.point(self.spline.first()).z,
                safe_fall: self.flags.has(SplineFlag::FallingSlow),
            }
        } else {
            SegmentTiming::Velocity(args.velocity)
        };
        self.spline.init_lengths(timing);
        if self.spline.is_cyclic() && args.cycle_duration > 0 {
            self.spline.fit_length(args.cycle_duration);
        }
        self.point_idx = self.spline.first();
    }

    /// Advances playback by `diff` milliseconds and returns the most significant step
    /// result (`Arrived` beats `NextCycle` beats `NextSegment`).
    pub fn update_state(&mut self, diff: i32) -> UpdateResult {
        let mut result = UpdateResult::None;
        self.update_state_with(diff, |step| result = result.max(step));
        result
    }

    /// Advances playback by `diff` milliseconds, reporting every step to `handler`.
    ///
    /// A large `diff` crosses several segments (and cycles) in one call.
    pub fn update_state_with(&mut self, diff: i32, mut handler: impl FnMut(UpdateResult)) {
        let mut remaining = diff.max(0);
        loop {
            handler(self.update_step(&mut remaining));
            if remaining <= 0 {
                break;
            }
        }
    }

    fn update_step(&mut self, diff: &mut i32) -> UpdateResult {
        if self.finalized() || !self.initialized() {
            *diff = 0;
            return UpdateResult::Arrived;
        }

        let step = (*diff).min(self.segment_time_remaining());
        self.time_passed += step;
        *diff -= step;

        if self.time_passed < self.next_timestamp() {
            return UpdateResult::None;
        }

        self.point_idx += 1;
        if self.point_idx < self.spline.last() {
            return UpdateResult::NextSegment;
        }

        if self.spline.is_cyclic() {
            self.point_idx = self.spline.first();
            self.time_passed %= self.duration().max(1);
            if self.flags.has(SplineFlag::EnterCycle) {
                self.flags.remove(SplineFlag::EnterCycle);
                self.drop_cycle_entry();
            }
            UpdateResult::NextCycle
        } else {
            self.finalize();
            *diff = 0;
            UpdateResult::Arrived
        }
    }

    /// Removes the pre-entry point after the first lap.
    ///
    /// The rebuilt loop keeps the duration of the first lap: the velocity is rescaled
    /// so the shorter path takes as long as the original one did, and the lap time is
    /// pinned so per-segment rounding cannot drift it.
    fn drop_cycle_entry(&mut self) {
        if self.args.path.len() < 3 {
            return;
        }

        let lap = self.duration();
        let mut args = self.args.clone();
        args.path.remove(0);
        args.flags = self.flags;
        args.path_idx_offset = self.point_idx_offset;
        args.velocity = 1.0;
        if let Err(err) = args.validate() {
            log::warn!("MoveSpline {}: cannot drop cycle entry point: {err}", self.id);
            return;
        }

        let mut unit_speed = MoveSpline::default();
        unit_speed.initialize(&args);
        args.velocity = unit_speed.duration() as f32 / lap.max(1) as f32;
        args.cycle_duration = lap;
        if let Err(err) = args.validate() {
            log::warn!("MoveSpline {}: rescaled cycle rejected: {err}", self.id);
            return;
        }

        self.init_spline(&args);
        self.velocity = args.velocity;
        self.args = args;
    }

    fn finalize(&mut self) {
        self.flags.add(SplineFlag::Done);
        self.point_idx = self
            .spline
            .last()
            .saturating_sub(1)
            .max(self.spline.first());
        self.time_passed = self.duration();
    }

    /// Stops playback where it is. Cyclic splines only end this way.
    pub fn interrupt(&mut self) {
        self.flags.add(SplineFlag::Done);
    }

    fn next_timestamp(&self) -> i32 {
        self.spline.length_at(self.point_idx + 1)
    }

    fn segment_time_remaining(&self) -> i32 {
        (self.next_timestamp() - self.time_passed).max(0)
    }

    /// Position and orientation `time_offset` milliseconds from now.
    ///
    /// Entity facing cannot be resolved here and keeps the initial orientation; use
    /// [`MoveSpline::compute_position_facing`] to supply target positions.
    pub fn compute_position(&self, time_offset: i32) -> Location {
        self.compute_position_facing(time_offset, |_| None)
    }

    pub fn compute_position_facing(
        &self,
        time_offset: i32,
        resolve_target: impl FnOnce(EntityId) -> Option<Vector3<f32>>,
    ) -> Location {
        if !self.initialized() {
            return Location {
                position: self.args.path.first().copied().unwrap_or_else(Vector3::zeros),
                orientation: self.initial_orientation,
            };
        }

        let first = self.spline.first();
        let last_segment = self.spline.last() - 1;
        let duration = self.duration();
        let time_point = self.time_passed.saturating_add(time_offset);

        if time_point >= duration {
            return self.compute_position_at(duration, last_segment, resolve_target);
        }
        if time_point <= 0 {
            return self.compute_position_at(0, first, resolve_target);
        }

        // Queries stay close to the current index.
        let mut index = self.point_idx.clamp(first, last_segment);
        while index < last_segment && time_point >= self.spline.length_at(index + 1) {
            index += 1;
        }
        while index > first && time_point < self.spline.length_at(index) {
            index -= 1;
        }
        self.compute_position_at(time_point, index, resolve_target)
    }

    fn compute_position_at(
        &self,
        time_point: i32,
        index: usize,
        resolve_target: impl FnOnce(EntityId) -> Option<Vector3<f32>>,
    ) -> Location {
        let seg_time = self.spline.length_between(index, index + 1);
        let u = if seg_time > 0 {
            (time_point - self.spline.length_at(index)) as f32 / seg_time as f32
        } else {
            1.0
        };

        let mut position = self.spline.evaluate_percent(index, u);
        let mut orientation = self.initial_orientation;

        // Animation tiers replace vertical effects entirely.
        if !self.flags.has(SplineFlag::Animation) {
            if self.flags.has(SplineFlag::Parabolic) {
                position.z += self.parabolic_elevation(time_point);
            } else if self.flags.has(SplineFlag::Falling) {
                position.z = self.fall_elevation(time_point);
            }
        }

        if self.finalized() && !self.facing.is_normal() {
            let spot = match self.facing {
                Facing::Angle(angle) => {
                    orientation = angle;
                    None
                }
                Facing::Spot(spot) => Some(spot),
                Facing::Target(target) => resolve_target(target),
                Facing::Normal => None,
            };
            if let Some(spot) = spot {
                orientation = (spot.y - position.y).atan2(spot.x - position.x);
            }
        } else {
            if !self.flags.has_any(&NO_TANGENT_FACING_FLAGS) {
                let tangent = self.spline.evaluate_derivative(index, u);
                if tangent.x != 0.0 || tangent.y != 0.0 {
                    orientation = tangent.y.atan2(tangent.x);
                }
            }
            if self.flags.has(SplineFlag::Backward) {
                orientation -= PI;
            }
        }

        Location {
            position,
            orientation: orientation.rem_euclid(TAU),
        }
    }

    fn parabolic_elevation(&self, time_point: i32) -> f32 {
        if time_point <= self.effect_start_time {
            return 0.0;
        }

        let duration = self.duration();
        let mut t_passed = (time_point - self.effect_start_time) as f32 / 1000.0;
        let t_duration = (duration - self.effect_start_time) as f32 / 1000.0;
        if let Some(curve) = &self.parabolic_curve {
            t_passed *= curve.value_at(time_point as f32 / duration as f32);
        }

        // -a*x*x + b*x, zero at both ends of the effect window.
        (t_duration - t_passed) * 0.5 * self.vertical_acceleration * t_passed
    }

    fn fall_elevation(&self, time_point: i32) -> f32 {
        let start_z = self.spline.point(self.spline.first()).z;
        let fallen = compute_fall_elevation(
            time_point as f32 / 1000.0,
            self.flags.has(SplineFlag::FallingSlow),
            0.0,
        );
        (start_z - fallen).max(self.final_destination().z)
    }

    pub fn initialized(&self) -> bool {
        !self.spline.is_empty()
    }

    pub fn finalized(&self) -> bool {
        self.flags.has(SplineFlag::Done)
    }

    pub fn is_cyclic(&self) -> bool {
        self.flags.has(SplineFlag::Cyclic)
    }

    pub fn is_falling(&self) -> bool {
        self.flags.has(SplineFlag::Falling)
    }

    /// Total playback duration (milliseconds). For cyclic splines, one lap.
    pub fn duration(&self) -> i32 {
        self.spline.length()
    }

    pub fn time_passed(&self) -> i32 {
        self.time_passed
    }

    pub fn time_remaining(&self) -> i32 {
        self.duration() - self.time_passed
    }

    /// Index of the caller-visible path point last passed, including the launch offset.
    pub fn current_path_idx(&self) -> i32 {
        if !self.initialized() {
            return self.point_idx_offset;
        }
        let mut point = self.point_idx_offset
            + (self.point_idx - self.spline.first()) as i32
            + i32::from(self.finalized());
        if self.is_cyclic() {
            point %= (self.spline.last() - self.spline.first()) as i32;
        }
        point
    }

    /// Raw index into the spline's point storage (includes virtual points).
    pub fn current_spline_idx(&self) -> usize {
        self.point_idx
    }

    pub fn final_destination(&self) -> Vector3<f32> {
        if self.initialized() {
            self.spline.point(self.spline.last())
        } else {
            Vector3::zeros()
        }
    }

    pub fn current_destination(&self) -> Vector3<f32> {
        if self.initialized() {
            self.spline.point(self.point_idx + 1)
        } else {
            Vector3::zeros()
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn flags(&self) -> SplineFlags {
        self.flags
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn vertical_acceleration(&self) -> f32 {
        self.vertical_acceleration
    }

    pub fn effect_start_time(&self) -> i32 {
        self.effect_start_time
    }

    pub fn is_facing_only(&self) -> bool {
        self.facing_only
    }

    /// The arguments the current path was built from.
    pub fn args(&self) -> &MoveSplineInitArgs {
        &self.args
    }

    pub fn spline(&self) -> &Spline {
        &self.spline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fall::compute_fall_time;

    fn v(x: f32, y: f32, z: f32) -> Vector3<f32> {
        Vector3::new(x, y, z)
    }

    fn args(path: Vec<Vector3<f32>>, velocity: f32) -> MoveSplineInitArgs {
        MoveSplineInitArgs {
            path,
            velocity,
            ..Default::default()
        }
    }

    fn launched(args: &MoveSplineInitArgs) -> MoveSpline {
        let mut spline = MoveSpline::default();
        spline.initialize(args);
        spline
    }

    fn triangle_loop() -> MoveSplineInitArgs {
        // 3 + 4 + 5 meters at 4 m/s: 750 + 1000 + 1250 ms.
        let mut a = args(vec![v(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(3.0, 4.0, 0.0)], 4.0);
        a.flags.add(SplineFlag::Cyclic);
        a
    }

    #[test]
    fn straight_line_midpoint() {
        let mut spline = launched(&args(vec![v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0)], 5.0));
        assert_eq!(spline.duration(), 2000);

        assert_eq!(spline.update_state(1000), UpdateResult::None);
        let loc = spline.compute_position(0);
        assert_eq!(loc.position, v(5.0, 0.0, 0.0));
        assert_eq!(loc.orientation, 0.0);
    }

    #[test]
    fn endpoints_are_exact() {
        let path = vec![v(1.5, -2.0, 0.3), v(7.25, 3.0, 1.0), v(9.0, 11.0, -4.0)];
        for smooth in [false, true] {
            let mut a = args(path.clone(), 3.3);
            a.flags.set(SplineFlag::CatmullRom, smooth);
            let mut spline = launched(&a);

            assert_eq!(spline.compute_position(0).position, path[0]);
            assert_eq!(spline.update_state(spline.duration()), UpdateResult::Arrived);
            assert!(spline.finalized());
            assert_eq!(spline.time_passed(), spline.duration());
            assert_eq!(spline.compute_position(0).position, path[2]);
        }
    }

    #[test]
    fn advance_is_associative() {
        let mut a = args(
            vec![v(0.0, 0.0, 0.0), v(6.0, 1.0, 0.0), v(9.0, 7.0, 2.0), v(1.0, 12.0, 0.0)],
            4.5,
        );
        a.flags.add(SplineFlag::CatmullRom);
        let splits = [(0, 0), (1, 999), (377, 1623), (2500, 1), (10, 4000)];

        for (dt1, dt2) in splits {
            let mut stepped = launched(&a);
            stepped.update_state(dt1);
            stepped.update_state(dt2);

            let mut single = launched(&a);
            single.update_state(dt1 + dt2);

            assert_eq!(stepped.time_passed(), single.time_passed());
            assert_eq!(stepped.current_spline_idx(), single.current_spline_idx());
            assert_eq!(stepped.compute_position(0), single.compute_position(0));
        }
    }

    #[test]
    fn cyclic_wraps_modulo_duration() {
        let loop_args = triangle_loop();
        let mut long = launched(&loop_args);
        assert_eq!(long.duration(), 3000);
        assert_eq!(long.update_state(4000), UpdateResult::NextCycle);

        let mut short = launched(&loop_args);
        short.update_state(1000);

        assert_eq!(long.time_passed(), short.time_passed());
        assert_eq!(long.current_spline_idx(), short.current_spline_idx());
        assert_eq!(long.compute_position(0), short.compute_position(0));
    }

    #[test]
    fn cyclic_never_finalizes_until_interrupted() {
        let mut spline = launched(&triangle_loop());
        for _ in 0..100 {
            spline.update_state(733);
            assert!(!spline.finalized());
        }
        spline.interrupt();
        assert!(spline.finalized());
        assert_eq!(spline.update_state(100), UpdateResult::Arrived);
    }

    #[test]
    fn coincident_points_finish_immediately() {
        let p = v(4.0, 4.0, 4.0);
        let mut spline = launched(&args(vec![p, p, p], 7.0));
        assert!(spline.initialized());
        assert_eq!(spline.update_state(100), UpdateResult::Arrived);
        assert!(spline.finalized());
        assert_eq!(spline.compute_position(0).position, p);
    }

    #[test]
    fn entering_a_cycle_drops_the_entry_point_and_keeps_lap_time() {
        let mut a = args(
            vec![v(-10.0, 0.0, 0.0), v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0), v(10.0, 10.0, 0.0)],
            5.0,
        );
        a.flags.add_many(&[SplineFlag::Cyclic, SplineFlag::EnterCycle]);
        let mut spline = launched(&a);
        let first_lap = spline.duration();

        // The first lap closes on the point after the entry.
        assert_eq!(spline.final_destination(), v(0.0, 0.0, 0.0));

        assert_eq!(spline.update_state(first_lap), UpdateResult::NextCycle);
        assert!(!spline.flags().has(SplineFlag::EnterCycle));
        assert_eq!(spline.args().path.len(), 3);
        assert_eq!(spline.compute_position(0).position, v(0.0, 0.0, 0.0));
        assert_eq!(spline.duration(), first_lap);
        assert_eq!(spline.args().cycle_duration, first_lap);

        // Later laps never revisit the entry point.
        for _ in 0..20 {
            spline.update_state(97);
            assert!(spline.compute_position(0).position.x >= -1.0e-3);
        }
    }

    #[test]
    fn smooth_loop_keeps_exact_lap_after_entry_drop() {
        let mut a = args(
            vec![
                v(-20.0, 3.0, 0.0),
                v(0.0, 0.0, 0.0),
                v(17.0, 4.0, 1.0),
                v(29.0, 21.0, 0.0),
                v(13.0, 37.0, 2.0),
                v(-6.0, 19.0, 0.0),
            ],
            7.0,
        );
        a.flags
            .add_many(&[SplineFlag::Cyclic, SplineFlag::EnterCycle, SplineFlag::CatmullRom]);
        let mut spline = launched(&a);
        let first_lap = spline.duration();

        spline.update_state(first_lap + 250);
        assert_eq!(spline.duration(), first_lap);
        assert_eq!(spline.time_passed(), 250);

        let restored = MoveSpline::restore(spline.args(), spline.time_passed(), false);
        assert_eq!(restored.duration(), first_lap);
        assert_eq!(restored.compute_position(0), spline.compute_position(0));
    }

    #[test]
    fn restore_reproduces_playback() {
        let mut a = args(
            vec![v(-10.0, 0.0, 0.0), v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0), v(10.0, 10.0, 0.0)],
            5.0,
        );
        a.flags.add_many(&[SplineFlag::Cyclic, SplineFlag::EnterCycle]);
        let mut live = launched(&a);
        live.update_state(live.duration() + 1234);

        let restored = MoveSpline::restore(live.args(), live.time_passed(), false);
        assert_eq!(restored.time_passed(), live.time_passed());
        assert_eq!(restored.compute_position(0), live.compute_position(0));
    }

    #[test]
    fn parabolic_arc_peaks_at_amplitude() {
        let mut a = args(vec![v(0.0, 0.0, 0.0), v(20.0, 0.0, 0.0)], 10.0);
        a.flags.add(SplineFlag::Parabolic);
        a.parabolic_amplitude = 3.0;
        let mut spline = launched(&a);

        spline.update_state(1000);
        assert!((spline.compute_position(0).position.z - 3.0).abs() < 1.0e-4);
        spline.update_state(1000);
        assert!(spline.compute_position(0).position.z.abs() < 1.0e-4);
    }

    #[test]
    fn falling_never_goes_below_destination() {
        let mut a = args(vec![v(0.0, 0.0, 30.0), v(0.0, 0.0, 0.0)], 1.0);
        a.flags.add(SplineFlag::Falling);
        let mut spline = launched(&a);
        assert_eq!(spline.duration(), (compute_fall_time(30.0, false) * 1000.0) as i32);

        let mut last_z = f32::MAX;
        while !spline.finalized() {
            let z = spline.compute_position(0).position.z;
            assert!(z <= last_z && z >= 0.0);
            last_z = z;
            spline.update_state(50);
        }
        assert!(spline.compute_position(0).position.z < 0.05);
    }

    #[test]
    fn facing_applies_only_once_done() {
        let mut a = args(vec![v(0.0, 0.0, 0.0), v(0.0, 10.0, 0.0)], 10.0);
        a.facing = Facing::Spot(v(-5.0, 10.0, 0.0));
        let mut spline = launched(&a);

        spline.update_state(500);
        assert!((spline.compute_position(0).orientation - PI / 2.0).abs() < 1.0e-6);

        spline.update_state(500);
        assert!((spline.compute_position(0).orientation - PI).abs() < 1.0e-6);

        a.facing = Facing::Target(42);
        let mut targeted = launched(&a);
        targeted.update_state(1000);
        let loc = targeted.compute_position_facing(0, |id| {
            assert_eq!(id, 42);
            Some(v(10.0, 10.0, 0.0))
        });
        assert!(loc.orientation.abs() < 1.0e-6);
    }

    #[test]
    fn backward_flips_the_tangent() {
        let mut a = args(vec![v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0)], 10.0);
        a.flags.add(SplineFlag::Backward);
        let mut spline = launched(&a);
        spline.update_state(300);
        assert!((spline.compute_position(0).orientation - PI).abs() < 1.0e-6);
    }

    #[test]
    fn time_offset_samples_ahead_without_moving() {
        let mut spline = launched(&args(
            vec![v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0), v(10.0, 10.0, 0.0)],
            10.0,
        ));
        spline.update_state(500);
        assert_eq!(spline.compute_position(1000).position, v(10.0, 5.0, 0.0));
        assert_eq!(spline.compute_position(-5000).position, v(0.0, 0.0, 0.0));
        assert_eq!(spline.compute_position(99_999).position, v(10.0, 10.0, 0.0));
        assert_eq!(spline.time_passed(), 500);
    }

    #[test]
    fn path_index_counts_passed_points() {
        let mut a = args(
            vec![v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0), v(20.0, 0.0, 0.0)],
            10.0,
        );
        a.path_idx_offset = 5;
        let mut spline = launched(&a);
        assert_eq!(spline.current_path_idx(), 5);
        spline.update_state(1500);
        assert_eq!(spline.current_path_idx(), 6);
        spline.update_state(500);
        assert_eq!(spline.current_path_idx(), 7);
    }

    #[test]
    fn stop_spline_is_finalized_and_stationary() {
        let mut a = args(vec![v(1.0, 2.0, 3.0)], 1.0);
        a.flags.add(SplineFlag::Done);
        let mut spline = launched(&a);
        assert!(!spline.initialized());
        assert!(spline.finalized());
        assert_eq!(spline.update_state(100), UpdateResult::Arrived);
        assert_eq!(spline.compute_position(0).position, v(1.0, 2.0, 3.0));
    }
}
