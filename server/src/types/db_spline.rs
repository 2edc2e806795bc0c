use nalgebra::Vector2;
use shared::{Curve, EventId, Facing, MoveSpline, MoveSplineInitArgs, SplineFlags};
use spacetimedb::SpacetimeType;

use super::DbVec3;

/// Stored form of [`EventId`].
#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbEventId {
    pub id: u32,
    pub group: u8,
    pub phase: u8,
}

impl From<DbEventId> for EventId {
    fn from(e: DbEventId) -> Self {
        EventId::with_scope(e.id, e.group, e.phase)
    }
}

impl From<EventId> for DbEventId {
    fn from(e: EventId) -> Self {
        Self {
            id: e.id,
            group: e.group,
            phase: e.phase,
        }
    }
}

/// Stored form of [`Facing`].
#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq, Default)]
pub enum DbFacing {
    #[default]
    Normal,
    Spot(DbVec3),
    Target(u64),
    Angle(f32),
}

impl From<DbFacing> for Facing {
    fn from(f: DbFacing) -> Self {
        match f {
            DbFacing::Normal => Facing::Normal,
            DbFacing::Spot(spot) => Facing::Spot(spot.into()),
            DbFacing::Target(target) => Facing::Target(target),
            DbFacing::Angle(angle) => Facing::Angle(angle),
        }
    }
}

impl From<Facing> for DbFacing {
    fn from(f: Facing) -> Self {
        match f {
            Facing::Normal => DbFacing::Normal,
            Facing::Spot(spot) => DbFacing::Spot(spot.into()),
            Facing::Target(target) => DbFacing::Target(target),
            Facing::Angle(angle) => DbFacing::Angle(angle),
        }
    }
}

#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbCurvePoint {
    pub x: f32,
    pub y: f32,
}

/// Launch arguments of a spline, as kept by the playback state.
#[derive(SpacetimeType, Debug, Clone, PartialEq, Default)]
pub struct DbSplineArgs {
    pub path: Vec<DbVec3>,
    pub path_idx_offset: i32,
    pub facing: DbFacing,
    /// `SplineFlag` bits (same layout as on the wire).
    pub flags: u32,
    pub velocity: f32,
    pub parabolic_amplitude: f32,
    pub vertical_acceleration: f32,
    pub time_perc: f32,
    pub parabolic_curve: Option<Vec<DbCurvePoint>>,
    pub spline_id: u32,
    pub initial_orientation: f32,
    pub cycle_duration: i32,
}

impl From<&MoveSplineInitArgs> for DbSplineArgs {
    fn from(args: &MoveSplineInitArgs) -> Self {
        Self {
            path: args.path.iter().map(DbVec3::from).collect(),
            path_idx_offset: args.path_idx_offset,
            facing: args.facing.into(),
            flags: args.flags.bits(),
            velocity: args.velocity,
            parabolic_amplitude: args.parabolic_amplitude,
            vertical_acceleration: args.vertical_acceleration,
            time_perc: args.time_perc,
            parabolic_curve: args.parabolic_curve.as_ref().map(|curve| {
                curve
                    .points()
                    .iter()
                    .map(|p| DbCurvePoint { x: p.x, y: p.y })
                    .collect()
            }),
            spline_id: args.spline_id,
            initial_orientation: args.initial_orientation,
            cycle_duration: args.cycle_duration,
        }
    }
}

impl From<&DbSplineArgs> for MoveSplineInitArgs {
    fn from(args: &DbSplineArgs) -> Self {
        Self {
            path: args.path.iter().map(Into::into).collect(),
            path_idx_offset: args.path_idx_offset,
            facing: args.facing.into(),
            flags: SplineFlags::new(args.flags),
            velocity: args.velocity,
            parabolic_amplitude: args.parabolic_amplitude,
            vertical_acceleration: args.vertical_acceleration,
            time_perc: args.time_perc,
            parabolic_curve: args.parabolic_curve.as_ref().map(|points| {
                Curve::new(points.iter().map(|p| Vector2::new(p.x, p.y)).collect())
            }),
            spline_id: args.spline_id,
            initial_orientation: args.initial_orientation,
            cycle_duration: args.cycle_duration,
        }
    }
}

/// Persisted playback state: launch args plus how far playback got.
///
/// Restoring re-initializes from `args` and advances by `time_passed` in one step,
/// which lands on the same state as the original sequence of ticks.
#[derive(SpacetimeType, Debug, Clone, PartialEq, Default)]
pub struct DbSplineState {
    pub args: DbSplineArgs,
    pub time_passed: i32,
    pub interrupted: bool,
}

impl From<&MoveSpline> for DbSplineState {
    fn from(spline: &MoveSpline) -> Self {
        Self {
            args: spline.args().into(),
            time_passed: spline.time_passed(),
            interrupted: spline.finalized(),
        }
    }
}

impl DbSplineState {
    pub fn restore(&self) -> MoveSpline {
        // Never launched.
        if self.args.path.is_empty() {
            return MoveSpline::default();
        }
        MoveSpline::restore(&(&self.args).into(), self.time_passed, self.interrupted)
    }
}
