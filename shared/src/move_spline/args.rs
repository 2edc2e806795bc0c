use nalgebra::Vector3;
use thiserror::Error;

use crate::{
    constants::{FACING_ONLY_MAX_LENGTH, MIN_SEGMENT_LENGTH, MIN_SPLINE_VELOCITY},
    curve::Curve,
};

use super::{Facing, SplineFlags};

/// Everything [`super::MoveSpline::initialize`] needs to build a playback state.
///
/// The launched args are kept by the spline so the playback can be persisted and
/// rebuilt later.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveSplineInitArgs {
    pub path: Vec<Vector3<f32>>,
    /// Added to the spline's point index when reporting `current_path_idx`.
    pub path_idx_offset: i32,
    pub facing: Facing,
    pub flags: SplineFlags,
    /// Meters per second along the curve.
    pub velocity: f32,
    /// Peak height of a parabolic jump; takes precedence over `vertical_acceleration`.
    pub parabolic_amplitude: f32,
    pub vertical_acceleration: f32,
    /// Fraction of the duration after which parabolic/animation/fade effects start.
    pub time_perc: f32,
    /// Optional warp applied to elapsed time inside the parabola.
    pub parabolic_curve: Option<Curve>,
    pub spline_id: u32,
    pub initial_orientation: f32,
    /// Exact lap time (milliseconds) of a cyclic spline; `0` derives it from `velocity`.
    pub cycle_duration: i32,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InitArgsError {
    #[error("spline needs at least two points, got {0}")]
    TooFewPoints(usize),
    #[error("spline velocity {0} is below the minimum")]
    VelocityTooLow(f32),
    #[error("effect start fraction {0} is outside [0, 1]")]
    TimePercOutOfRange(f32),
    #[error("segment {index} is only {length} meters long")]
    SegmentTooShort { index: usize, length: f32 },
}

impl MoveSplineInitArgs {
    pub fn validate(&self) -> Result<(), InitArgsError> {
        if self.path.len() < 2 {
            return Err(InitArgsError::TooFewPoints(self.path.len()));
        }
        if !(self.velocity >= MIN_SPLINE_VELOCITY) {
            return Err(InitArgsError::VelocityTooLow(self.velocity));
        }
        if !(0.0..=1.0).contains(&self.time_perc) {
            return Err(InitArgsError::TimePercOutOfRange(self.time_perc));
        }
        self.check_path_lengths()
    }

    /// A two point path may be shorter than the minimum when it only turns the mover.
    fn check_path_lengths(&self) -> Result<(), InitArgsError> {
        if self.path.len() == 2 && !self.facing.is_normal() {
            return Ok(());
        }
        for (index, pair) in self.path.windows(2).enumerate() {
            let length = (pair[1] - pair[0]).norm();
            if length < MIN_SEGMENT_LENGTH {
                return Err(InitArgsError::SegmentTooShort { index, length });
            }
        }
        Ok(())
    }

    /// Whether this spline only rotates the mover in place.
    pub fn is_facing_only(&self) -> bool {
        self.path.len() == 2
            && !self.facing.is_normal()
            && (self.path[1] - self.path[0]).norm() < FACING_ONLY_MAX_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: Vec<Vector3<f32>>) -> MoveSplineInitArgs {
        MoveSplineInitArgs {
            path,
            velocity: 7.0,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_a_plain_path() {
        let a = args(vec![Vector3::zeros(), Vector3::new(5.0, 0.0, 0.0)]);
        assert_eq!(a.validate(), Ok(()));
    }

    #[test]
    fn rejects_single_point_and_slow_velocity() {
        assert_eq!(
            args(vec![Vector3::zeros()]).validate(),
            Err(InitArgsError::TooFewPoints(1))
        );

        let mut slow = args(vec![Vector3::zeros(), Vector3::new(5.0, 0.0, 0.0)]);
        slow.velocity = 0.0;
        assert_eq!(slow.validate(), Err(InitArgsError::VelocityTooLow(0.0)));
    }

    #[test]
    fn short_segments_only_allowed_for_facing_turns() {
        let mut a = args(vec![Vector3::zeros(), Vector3::new(0.01, 0.0, 0.0)]);
        assert!(matches!(
            a.validate(),
            Err(InitArgsError::SegmentTooShort { index: 0, .. })
        ));

        a.facing = Facing::Angle(1.0);
        assert_eq!(a.validate(), Ok(()));
        assert!(a.is_facing_only());
    }
}
