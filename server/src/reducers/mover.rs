use crate::{schema::*, types::*};
use spacetimedb::{ReducerContext, Table};

/// Spawns a mover owned by the caller, with the default speeds from `motion_settings`.
#[spacetimedb::reducer]
pub fn spawn_mover(
    ctx: &ReducerContext,
    map_id: u32,
    position: DbVec3,
    orientation: f32,
    money: u64,
) -> Result<(), String> {
    let Some(settings) = ctx.db.motion_settings().id().find(1) else {
        return Err("Motion settings not found".into());
    };
    if ![position.x, position.y, position.z, orientation].iter().all(|v| v.is_finite()) {
        return Err("Position and orientation must be finite".into());
    }

    let mover = ctx.db.mover().insert(Mover {
        id: 0,
        owner: Some(ctx.sender),
        map_id,
        position,
        orientation,
        walk_speed: settings.walk_speed,
        run_speed: settings.run_speed,
        flight_speed: settings.flight_speed,
        money,
        last_spline_id: 0,
        spline: DbSplineState::default(),
    });
    log::info!("Spawned mover {} on map {map_id} for {:?}", mover.id, ctx.sender);
    Ok(())
}
