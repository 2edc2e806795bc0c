use nalgebra::Vector3;

use crate::{
    EntityId, constants::FALL_GRAVITY, curve::Curve, fall::compute_fall_elevation, mover::Mover,
};

use super::{Facing, MoveSpline, MoveSplineInitArgs, SplineFlag};

/// Builder for launching a spline on a [`Mover`].
///
/// The first path point is a placeholder: [`MoveSplineInit::launch`] replaces it with the
/// mover's real position, so a launch while already moving starts from where the mover
/// actually is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveSplineInit {
    args: MoveSplineInitArgs,
    walk: bool,
    duration: Option<i32>,
}

impl MoveSplineInit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a builder from persisted parts.
    pub fn from_parts(args: MoveSplineInitArgs, walk: bool, duration: Option<i32>) -> Self {
        Self {
            args,
            walk,
            duration,
        }
    }

    pub fn move_to(&mut self, dest: Vector3<f32>) -> &mut Self {
        self.args.path_idx_offset = 0;
        self.args.path = vec![Vector3::zeros(), dest];
        self
    }

    /// Travel through `controls`; `path_offset` is added to reported path indices.
    pub fn move_by_path(&mut self, controls: &[Vector3<f32>], path_offset: i32) -> &mut Self {
        self.args.path_idx_offset = path_offset;
        self.args.path = std::iter::once(Vector3::zeros())
            .chain(controls.iter().copied())
            .collect();
        self
    }

    pub fn set_smooth(&mut self) -> &mut Self {
        self.args.flags.add(SplineFlag::CatmullRom);
        self
    }

    pub fn set_cyclic(&mut self) -> &mut Self {
        self.args.flags.add(SplineFlag::Cyclic);
        self
    }

    pub fn set_fall(&mut self, slow: bool) -> &mut Self {
        self.args.flags.add(SplineFlag::Falling);
        self.args.flags.set(SplineFlag::FallingSlow, slow);
        self
    }

    /// Arc with peak height `amplitude`, starting after `time_shift` of the duration.
    pub fn set_parabolic(&mut self, amplitude: f32, time_shift: f32) -> &mut Self {
        self.args.time_perc = time_shift;
        self.args.parabolic_amplitude = amplitude;
        self.args.vertical_acceleration = 0.0;
        self.args.flags.add(SplineFlag::Parabolic);
        self
    }

    pub fn set_parabolic_curve(&mut self, curve: Curve) -> &mut Self {
        self.args.parabolic_curve = Some(curve);
        self
    }

    /// Jump to `dest`: horizontal speed `speed_xy`, initial vertical speed `speed_z`.
    pub fn set_jump(&mut self, dest: Vector3<f32>, speed_xy: f32, speed_z: f32) -> &mut Self {
        let time_to_apex = speed_z / FALL_GRAVITY;
        let apex = -compute_fall_elevation(time_to_apex, false, -speed_z);
        self.move_to(dest);
        self.set_parabolic(apex, 0.0);
        self.set_velocity(speed_xy)
    }

    pub fn set_facing_angle(&mut self, angle: f32) -> &mut Self {
        self.args.facing = Facing::Angle(angle);
        self
    }

    pub fn set_facing_spot(&mut self, spot: Vector3<f32>) -> &mut Self {
        self.args.facing = Facing::Spot(spot);
        self
    }

    pub fn set_facing_target(&mut self, target: EntityId) -> &mut Self {
        self.args.facing = Facing::Target(target);
        self
    }

    pub fn set_velocity(&mut self, velocity: f32) -> &mut Self {
        self.args.velocity = velocity;
        self
    }

    /// Fixes the total duration (milliseconds); the velocity is derived at launch.
    pub fn set_duration(&mut self, duration_ms: i32) -> &mut Self {
        self.duration = Some(duration_ms);
        self
    }

    pub fn set_walk(&mut self, walk: bool) -> &mut Self {
        self.walk = walk;
        self
    }

    pub fn set_fly(&mut self) -> &mut Self {
        self.args.flags.add(SplineFlag::Flying);
        self
    }

    pub fn set_backward(&mut self) -> &mut Self {
        self.args.flags.add(SplineFlag::Backward);
        self
    }

    pub fn set_orientation_fixed(&mut self, fixed: bool) -> &mut Self {
        self.args.flags.set(SplineFlag::OrientationFixed, fixed);
        self
    }

    pub fn set_uncompressed(&mut self) -> &mut Self {
        self.args.flags.add(SplineFlag::UncompressedPath);
        self
    }

    pub fn set_first_point_id(&mut self, point_id: i32) -> &mut Self {
        self.args.path_idx_offset = point_id;
        self
    }

    pub fn args(&self) -> &MoveSplineInitArgs {
        &self.args
    }

    pub fn path_mut(&mut self) -> &mut Vec<Vector3<f32>> {
        &mut self.args.path
    }

    pub fn is_walk(&self) -> bool {
        self.walk
    }

    pub fn fixed_duration(&self) -> Option<i32> {
        self.duration
    }

    /// Starts the spline on `mover`, replacing whatever it was doing.
    ///
    /// Returns the spline duration in milliseconds, or 0 when the arguments are
    /// rejected (the mover's current spline is left untouched).
    pub fn launch(&self, mover: &mut Mover) -> i32 {
        if self.args.path.is_empty() {
            log::error!("MoveSplineInit::launch: mover {} got an empty path", mover.id);
            return 0;
        }

        let real = mover.real_location();
        let mut args = self.args.clone();
        args.path[0] = real.position;
        args.initial_orientation = real.orientation;
        // The real position is off the loop; it is dropped after the first lap.
        args.flags.set(SplineFlag::EnterCycle, args.flags.has(SplineFlag::Cyclic));

        if args.velocity == 0.0 {
            args.velocity = mover.speeds.for_mode(self.walk, args.flags.has(SplineFlag::Flying));
        }

        if let Some(duration) = self.duration {
            match velocity_for_duration(&args, duration) {
                Some(velocity) => args.velocity = velocity,
                None => log::warn!(
                    "MoveSplineInit::launch: mover {} cannot fit path into {duration} ms",
                    mover.id
                ),
            }
        }

        if let Err(err) = args.validate() {
            log::error!("MoveSplineInit::launch: mover {} rejected spline: {err}", mover.id);
            return 0;
        }

        args.spline_id = mover.next_spline_id();
        mover.spline.initialize(&args);
        mover.spline.duration()
    }

    /// Halts `mover` where it currently is.
    pub fn stop(mover: &mut Mover) {
        if mover.spline.finalized() {
            return;
        }

        let real = mover.real_location();
        Self::stop_at(mover, real.position, real.orientation);
    }

    /// Replaces whatever spline `mover` has, finished or not, with a stop spline
    /// holding `position`.
    pub fn stop_at(mover: &mut Mover, position: Vector3<f32>, orientation: f32) {
        let mut args = MoveSplineInitArgs {
            path: vec![position],
            initial_orientation: orientation,
            ..Default::default()
        };
        args.flags.add(SplineFlag::Done);
        args.spline_id = mover.next_spline_id();

        mover.position = position;
        mover.orientation = orientation;
        mover.spline.initialize(&args);
    }
}

/// Velocity that makes `args` take `duration_ms`, measured on a unit-speed copy.
fn velocity_for_duration(args: &MoveSplineInitArgs, duration_ms: i32) -> Option<f32> {
    if duration_ms <= 0 || args.path.len() < 2 {
        return None;
    }

    let mut unit_args = args.clone();
    unit_args.velocity = 1.0;
    let mut unit_speed = MoveSpline::default();
    unit_speed.initialize(&unit_args);
    Some(unit_speed.duration() as f32 / duration_ms as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mover_at(position: Vector3<f32>) -> Mover {
        Mover::new(7, 1, position, 0.0)
    }

    #[test]
    fn parabolic_curve_warps_the_arc() {
        let mut mover = mover_at(Vector3::zeros());
        let half_speed = Curve::new(vec![
            nalgebra::Vector2::new(0.0, 0.5),
            nalgebra::Vector2::new(0.5, 0.5),
            nalgebra::Vector2::new(1.0, 1.0),
        ]);
        let mut init = MoveSplineInit::new();
        init.move_to(Vector3::new(20.0, 0.0, 0.0))
            .set_parabolic(3.0, 0.0)
            .set_parabolic_curve(half_speed)
            .set_velocity(10.0);
        assert_eq!(init.launch(&mut mover), 2000);

        // Only half of the elapsed second counts: (2 - 0.5) * 0.5 * 6 * 0.5.
        mover.update_movement(1000, |_| None);
        assert!((mover.position.z - 2.25).abs() < 1.0e-4);
        assert!((mover.position.x - 10.0).abs() < 1.0e-4);

        // The curve is back to 1 at the end, so the arc still lands.
        mover.update_movement(1000, |_| None);
        assert_eq!(mover.position, Vector3::new(20.0, 0.0, 0.0));
    }

    #[test]
    fn launch_starts_from_the_real_position() {
        let mut mover = mover_at(Vector3::new(0.0, 0.0, 0.0));
        let mut init = MoveSplineInit::new();
        init.move_to(Vector3::new(14.0, 0.0, 0.0)).set_velocity(7.0);

        assert_eq!(init.launch(&mut mover), 2000);
        mover.update_movement(1000, |_| None);
        assert_eq!(mover.position, Vector3::new(7.0, 0.0, 0.0));

        // Re-launching mid-way starts from the current point, not the old start.
        init.move_to(Vector3::new(7.0, 7.0, 0.0));
        assert_eq!(init.launch(&mut mover), 1000);
        assert_eq!(mover.spline.args().path[0], Vector3::new(7.0, 0.0, 0.0));
    }

    #[test]
    fn velocity_defaults_to_the_movement_mode() {
        let mut mover = mover_at(Vector3::zeros());
        let mut init = MoveSplineInit::new();
        init.move_to(Vector3::new(10.0, 0.0, 0.0)).set_walk(true);
        init.launch(&mut mover);
        assert_eq!(mover.spline.velocity(), mover.speeds.walk);

        init.set_walk(false).set_fly();
        init.launch(&mut mover);
        assert_eq!(mover.spline.velocity(), mover.speeds.flight);
    }

    #[test]
    fn rejected_launch_keeps_current_spline() {
        let mut mover = mover_at(Vector3::zeros());
        let mut init = MoveSplineInit::new();
        init.move_to(Vector3::new(10.0, 0.0, 0.0)).set_velocity(5.0);
        init.launch(&mut mover);
        let id = mover.spline.id();

        let mut bad = MoveSplineInit::new();
        bad.move_to(Vector3::new(10.0, 0.0, 0.0)).set_velocity(-1.0);
        assert_eq!(bad.launch(&mut mover), 0);
        assert_eq!(mover.spline.id(), id);
    }

    #[test]
    fn explicit_duration_rescales_velocity() {
        let mut mover = mover_at(Vector3::zeros());
        let mut init = MoveSplineInit::new();
        init.move_to(Vector3::new(10.0, 0.0, 0.0)).set_duration(4000);
        let duration = init.launch(&mut mover);
        assert!((duration - 4000).abs() <= 1);
    }

    #[test]
    fn jump_reaches_its_apex_half_way() {
        let mut mover = mover_at(Vector3::zeros());
        let mut init = MoveSplineInit::new();
        init.set_jump(Vector3::new(20.0, 0.0, 0.0), 10.0, 9.0);
        assert_eq!(init.launch(&mut mover), 2000);

        let apex = 9.0 * 9.0 / (2.0 * FALL_GRAVITY);
        mover.update_movement(1000, |_| None);
        assert!((mover.position.z - apex).abs() < 1.0e-3);
    }

    #[test]
    fn cyclic_launch_enters_the_cycle() {
        let mut mover = mover_at(Vector3::new(-5.0, 0.0, 0.0));
        let mut init = MoveSplineInit::new();
        init.move_by_path(
            &[
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(10.0, 0.0, 0.0),
                Vector3::new(10.0, 10.0, 0.0),
            ],
            0,
        )
        .set_cyclic()
        .set_velocity(5.0);
        init.launch(&mut mover);
        assert!(mover.spline.flags().has(SplineFlag::EnterCycle));
    }

    #[test]
    fn stop_freezes_in_place() {
        let mut mover = mover_at(Vector3::zeros());
        let mut init = MoveSplineInit::new();
        init.move_to(Vector3::new(10.0, 0.0, 0.0)).set_velocity(10.0);
        init.launch(&mut mover);
        mover.update_movement(250, |_| None);

        MoveSplineInit::stop(&mut mover);
        assert!(mover.spline.finalized());
        assert!(!mover.is_moving());
        mover.update_movement(1000, |_| None);
        assert_eq!(mover.position, Vector3::new(2.5, 0.0, 0.0));
    }
}
