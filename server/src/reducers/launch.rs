//! Reducers that put a mover in motion.
//!
//! Each one builds the matching generator, replaces whatever motion the mover had and
//! starts it immediately; the motion tick takes over from there.

use crate::{
    motion::{authorize, start_motion, TableTaxiSource},
    schema::*,
    types::*,
};
use nalgebra::Vector3;
use shared::{
    Facing, FlightPathMovementGenerator, GenericMovementGenerator, Motion, MotionKind,
    MoveSplineInit, SplineChainLink, SplineChainMovementGenerator,
};
use spacetimedb::ReducerContext;

/// Rejects launches the engine would refuse, so the caller gets the reason.
///
/// The stored position stands in for the real one; it is at most one tick stale.
fn check_launch(row: &Mover, init: &MoveSplineInit) -> Result<(), String> {
    let mut args = init.args().clone();
    if let Some(first) = args.path.first_mut() {
        *first = row.position.into();
    }
    if args.velocity == 0.0 {
        args.velocity = row.walk_speed.max(row.run_speed);
    }
    args.validate().map_err(|err| err.to_string())
}

#[spacetimedb::reducer]
pub fn move_along_path(
    ctx: &ReducerContext,
    mover_id: u64,
    points: Vec<DbVec3>,
    options: PathOptions,
) -> Result<(), String> {
    let row = authorize(ctx, mover_id)?;
    if points.is_empty() {
        return Err("Path is empty".into());
    }

    let controls: Vec<Vector3<f32>> = points.iter().map(Into::into).collect();
    let mut init = MoveSplineInit::new();
    init.move_by_path(&controls, 0).set_walk(options.walk);
    if options.smooth {
        init.set_smooth();
    }
    if options.cyclic {
        init.set_cyclic();
    }
    if options.fly {
        init.set_fly();
    }
    if let Some(velocity) = options.velocity {
        init.set_velocity(velocity);
    }
    if let Some(duration) = options.duration_ms {
        init.set_duration(duration);
    }
    match Facing::from(options.facing) {
        Facing::Normal => {}
        Facing::Spot(spot) => {
            init.set_facing_spot(spot);
        }
        Facing::Target(target) => {
            init.set_facing_target(target);
        }
        Facing::Angle(angle) => {
            init.set_facing_angle(angle);
        }
    }
    check_launch(&row, &init)?;

    let mut generator = GenericMovementGenerator::new(init, MotionKind::Point, options.point_id);
    if let Some(spell_id) = options.arrival_spell_id {
        generator = generator.with_arrival_spell(spell_id, options.arrival_spell_target);
    }
    start_motion(ctx, mover_id, Motion::Generic(generator))
}

#[spacetimedb::reducer]
pub fn move_jump(
    ctx: &ReducerContext,
    mover_id: u64,
    dest: DbVec3,
    speed_xy: f32,
    speed_z: f32,
    point_id: u32,
    arrival_spell_id: Option<u32>,
) -> Result<(), String> {
    let row = authorize(ctx, mover_id)?;
    if !(speed_xy > 0.0 && speed_z > 0.0) {
        return Err("Jump speeds must be positive".into());
    }

    let mut init = MoveSplineInit::new();
    init.set_jump(dest.into(), speed_xy, speed_z);
    check_launch(&row, &init)?;

    let mut generator = GenericMovementGenerator::new(init, MotionKind::Jump, point_id);
    if let Some(spell_id) = arrival_spell_id {
        generator = generator.with_arrival_spell(spell_id, None);
    }
    start_motion(ctx, mover_id, Motion::Generic(generator))
}

/// Drops the mover straight down to `ground_z` under gravity.
#[spacetimedb::reducer]
pub fn move_fall(
    ctx: &ReducerContext,
    mover_id: u64,
    ground_z: f32,
    slow: bool,
) -> Result<(), String> {
    let row = authorize(ctx, mover_id)?;
    if !(ground_z < row.position.z) {
        return Err("Ground is not below the mover".into());
    }

    let mut init = MoveSplineInit::new();
    init.move_to(Vector3::new(row.position.x, row.position.y, ground_z)).set_fall(slow);
    check_launch(&row, &init)?;

    let generator = GenericMovementGenerator::new(init, MotionKind::Fall, 0);
    start_motion(ctx, mover_id, Motion::Generic(generator))
}

/// Flies the mover along `route` (taxi stop ids, first is where it boards).
///
/// `discount` scales every leg fare; `1.0` charges full price.
#[spacetimedb::reducer]
pub fn start_flight(
    ctx: &ReducerContext,
    mover_id: u64,
    route: Vec<u32>,
    discount: f32,
) -> Result<(), String> {
    authorize(ctx, mover_id)?;
    if route.len() < 2 {
        return Err("Route needs at least two stops".into());
    }
    if !(discount >= 0.0) {
        return Err("Discount must not be negative".into());
    }

    let mut generator = FlightPathMovementGenerator::new(route);
    generator.load_path(&TableTaxiSource { ctx }, discount, 0);
    if generator.path().len() < 2 {
        return Err("Route has no flyable taxi path".into());
    }

    log::info!(
        "Mover {mover_id} boarding flight with {} nodes",
        generator.path().len()
    );
    start_motion(ctx, mover_id, Motion::Flight(generator))
}

#[spacetimedb::reducer]
pub fn start_spline_chain(
    ctx: &ReducerContext,
    mover_id: u64,
    chain_id: u32,
    walk: bool,
) -> Result<(), String> {
    authorize(ctx, mover_id)?;
    let Some(chain) = ctx.db.spline_chain().id().find(chain_id) else {
        return Err("Spline chain not found".into());
    };

    let links: Vec<SplineChainLink> = chain.links.iter().map(Into::into).collect();
    let generator = SplineChainMovementGenerator::new(chain_id, links, walk);
    start_motion(ctx, mover_id, Motion::SplineChain(generator))
}
