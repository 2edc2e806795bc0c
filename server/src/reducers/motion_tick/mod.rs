//! Motion tick.
//!
//! This module contains:
//! - `MotionTickTimer` scheduled table
//! - `init(ctx)` to schedule the tick
//! - `motion_tick_reducer`, which advances every active motion
//!
//! Notes:
//! - Uses a clamped variable timestep (`motion_settings.max_tick_dt_s`), rounded to
//!   whole milliseconds before it reaches the splines.
//! - Suspended motions are skipped via the `suspended` btree index.

pub mod constants;

use crate::{
    motion::tick_motion,
    schema::{active_motion, motion_settings},
    utils::{delta_millis, get_fixed_delta_time, get_variable_delta_time, LogStopwatch},
};
use spacetimedb::{ReducerContext, ScheduleAt, Table, TimeDuration, Timestamp};

/// Scheduled timer for the motion tick (single row).
#[spacetimedb::table(name = motion_tick_timer, scheduled(motion_tick_reducer))]
pub struct MotionTickTimer {
    #[primary_key]
    #[auto_inc]
    pub scheduled_id: u64,

    pub scheduled_at: ScheduleAt,

    /// Timestamp of the previous invocation (authoritative delta time source).
    pub last_tick: Timestamp,
}

/// Schedule the motion tick. Called from the crate `init` reducer.
pub fn init(ctx: &ReducerContext) {
    let interval = TimeDuration::from_micros(1_000_000i64 / constants::MOTION_TICK_HZ);

    ctx.db.motion_tick_timer().scheduled_id().delete(1);
    ctx.db.motion_tick_timer().insert(MotionTickTimer {
        scheduled_id: 1,
        scheduled_at: ScheduleAt::Interval(interval),
        last_tick: ctx.timestamp,
    });
}

#[spacetimedb::reducer]
pub fn motion_tick_reducer(ctx: &ReducerContext, mut timer: MotionTickTimer) -> Result<(), String> {
    // Only the server (module identity) may invoke scheduled reducers.
    if ctx.sender != ctx.identity() {
        return Err("`motion_tick_reducer` may not be invoked by clients.".into());
    }

    let mut stopwatch = LogStopwatch::new(
        ctx,
        "motion_tick",
        false,
        constants::MOTION_TICK_LOG_SAMPLE_RATE,
    );

    let Some(settings) = ctx.db.motion_settings().id().find(1) else {
        return Err("`motion_tick_reducer` couldn't find motion settings.".into());
    };

    let fixed_dt = get_fixed_delta_time(&timer.scheduled_at)
        .unwrap_or(1.0 / constants::MOTION_TICK_HZ as f32);
    let real_dt = get_variable_delta_time(ctx.timestamp, timer.last_tick).unwrap_or(fixed_dt);
    let diff = delta_millis(real_dt.clamp(0.0, settings.max_tick_dt_s));

    stopwatch.span("advance_motions");
    let running: Vec<_> = ctx.db.active_motion().suspended().filter(false).collect();
    for active in running {
        let mover_id = active.mover_id;
        if let Err(err) = tick_motion(ctx, active, diff) {
            log::error!("Dropping motion of mover {mover_id}: {err}");
            ctx.db.active_motion().mover_id().delete(mover_id);
        }
    }

    timer.last_tick = ctx.timestamp;
    ctx.db.motion_tick_timer().scheduled_id().update(timer);

    Ok(())
}
