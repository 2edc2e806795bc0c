mod reducers {
    pub mod control;
    pub mod launch;
    pub(crate) mod motion_tick;
    pub mod mover;
    pub mod paths;
}
mod motion;
pub mod schema;
pub mod types;
mod utils;

use crate::schema::*;
use shared::constants::{DEFAULT_RUN_SPEED, DEFAULT_WALK_SPEED, PLAYER_FLIGHT_SPEED};
use spacetimedb::*;

#[reducer(init)]
pub fn init(ctx: &ReducerContext) {
    ctx.db.motion_settings().id().delete(1);
    ctx.db.motion_settings().insert(MotionSettings {
        id: 1,
        walk_speed: DEFAULT_WALK_SPEED,
        run_speed: DEFAULT_RUN_SPEED,
        flight_speed: PLAYER_FLIGHT_SPEED,
        max_tick_dt_s: 0.25,
    });
    reducers::motion_tick::init(ctx);
}
