//! Glue between stored rows and the `shared` movement engine.
//!
//! Layout:
//! - `with_mover`: load a mover row into an engine `Mover`, run a closure, persist it.
//! - `ServerHooks`: buffers generator side effects and writes them to `movement_event`.
//! - `TableTaxiSource`: serves taxi legs from `taxi_path`/`taxi_path_node`.
//! - `start_motion`/`tick_motion`: generator lifecycle shared by the reducers.
//!
//! Notes:
//! - Nothing engine-side survives between reducer calls; every call rebuilds the
//!   splines and generators from their rows and writes them back.
//! - Hook effects are flushed after the mover row is saved so fares land on the
//!   updated row.

use nalgebra::Vector3;
use shared::{
    wire::{write_spline_data, PacketWriter},
    EntityId, EventId, MotionContext, MotionKind, MoveSpeeds, MovementHooks, Motion, TaxiLeg,
    TaxiPathSource,
};
use spacetimedb::{ReducerContext, Table};

use crate::{schema::*, types::*};

/// Side effects requested while driving one mover, applied on [`ServerHooks::flush`].
pub struct ServerHooks {
    mover_id: u64,
    effects: Vec<(u64, MovementEffect)>,
}

impl MovementHooks for ServerHooks {
    fn preload_grid(&mut self, map_id: u32, x: f32, y: f32) {
        log::debug!("Mover {} preloading grid around ({x}, {y}) on map {map_id}", self.mover_id);
        self.effects.push((
            self.mover_id,
            MovementEffect::GridPreload(DbGridPreload { map_id, x, y }),
        ));
    }

    fn fire_event(&mut self, event: EventId, source: EntityId, target: EntityId) {
        self.effects.push((
            source,
            MovementEffect::WorldEvent(DbWorldEvent {
                event: event.into(),
                source,
                target,
            }),
        ));
    }

    fn cast_spell(&mut self, caster: EntityId, spell_id: u32, target: Option<EntityId>) {
        self.effects.push((
            caster,
            MovementEffect::SpellCast(DbSpellCast { spell_id, target }),
        ));
    }

    fn movement_inform(&mut self, owner: EntityId, kind: MotionKind, point_id: u32) {
        self.effects.push((
            owner,
            MovementEffect::MovementInform(DbMovementInform {
                kind: kind as u8,
                point_id,
            }),
        ));
    }

    fn charge_fare(&mut self, owner: EntityId, amount: u32) {
        self.effects.push((owner, MovementEffect::FareCharged(amount)));
    }
}

impl ServerHooks {
    pub fn new(mover_id: u64) -> Self {
        Self {
            mover_id,
            effects: Vec::new(),
        }
    }

    pub fn flush(self, ctx: &ReducerContext) {
        for (mover_id, effect) in self.effects {
            if let MovementEffect::FareCharged(amount) = effect {
                charge_fare(ctx, mover_id, amount);
            }
            ctx.db.movement_event().insert(MovementEvent {
                id: 0,
                mover_id,
                effect,
                at: ctx.timestamp,
            });
        }
    }
}

fn charge_fare(ctx: &ReducerContext, mover_id: u64, amount: u32) {
    let Some(mut row) = ctx.db.mover().id().find(mover_id) else {
        log::warn!("Fare of {amount} charged to missing mover {mover_id}");
        return;
    };
    if row.money < u64::from(amount) {
        log::warn!(
            "Mover {mover_id} cannot afford fare {amount} (has {}), clamping to zero",
            row.money
        );
    }
    row.money = row.money.saturating_sub(u64::from(amount));
    ctx.db.mover().id().update(row);
}

/// Taxi legs read straight from the module tables.
pub struct TableTaxiSource<'a> {
    pub ctx: &'a ReducerContext,
}

impl TaxiPathSource for TableTaxiSource<'_> {
    fn leg(&self, from: u32, to: u32) -> Option<TaxiLeg> {
        let path = self.ctx.db.taxi_path().from_and_to().filter((from, to)).next()?;
        let mut rows: Vec<TaxiPathNodeRow> =
            self.ctx.db.taxi_path_node().path_id().filter(path.id).collect();
        rows.sort_by_key(|row| row.index);
        Some(TaxiLeg {
            nodes: rows.iter().map(|row| (&row.node).into()).collect(),
            cost: path.cost,
        })
    }
}

fn load_mover(row: &Mover) -> shared::Mover {
    let mut mover = shared::Mover::new(row.id, row.map_id, row.position.into(), row.orientation);
    mover.speeds = MoveSpeeds {
        walk: row.walk_speed,
        run: row.run_speed,
        flight: row.flight_speed,
    };
    mover.last_spline_id = row.last_spline_id;
    mover.spline = row.spline.restore();
    mover
}

fn save_mover(ctx: &ReducerContext, mut row: Mover, mover: &shared::Mover) {
    if mover.last_spline_id != row.last_spline_id {
        publish_spline(ctx, mover);
    }

    row.map_id = mover.map_id;
    row.position = mover.position.into();
    row.orientation = mover.orientation;
    row.last_spline_id = mover.last_spline_id;
    row.spline = (&mover.spline).into();
    ctx.db.mover().id().update(row);
}

/// Writes the client prediction snapshot of a freshly launched spline.
fn publish_spline(ctx: &ReducerContext, mover: &shared::Mover) {
    let mut data = PacketWriter::new();
    write_spline_data(&mut data, &mover.spline);
    let row = MoverSplineData {
        mover_id: mover.id,
        spline_id: mover.spline.id(),
        data: data.into_bytes(),
        sent_at: ctx.timestamp,
    };

    if ctx.db.mover_spline_data().mover_id().find(mover.id).is_some() {
        ctx.db.mover_spline_data().mover_id().update(row);
    } else {
        ctx.db.mover_spline_data().insert(row);
    }
}

/// Position of another mover, for `Facing::Target`.
pub fn resolve_target(ctx: &ReducerContext, target: EntityId) -> Option<Vector3<f32>> {
    ctx.db.mover().id().find(target).map(|row| row.position.into())
}

/// Only the module or the mover's owner may command it.
pub fn authorize(ctx: &ReducerContext, mover_id: u64) -> Result<Mover, String> {
    let Some(row) = ctx.db.mover().id().find(mover_id) else {
        return Err("Mover not found".into());
    };
    if ctx.sender != ctx.identity() && row.owner != Some(ctx.sender) {
        return Err("Mover is owned by someone else".into());
    }
    Ok(row)
}

/// Runs `f` against the live engine state of `mover_id` and persists the result.
pub fn with_mover<R>(
    ctx: &ReducerContext,
    mover_id: u64,
    f: impl FnOnce(&mut MotionContext<'_>) -> R,
) -> Result<R, String> {
    let Some(row) = ctx.db.mover().id().find(mover_id) else {
        return Err("Mover not found".into());
    };

    let mut mover = load_mover(&row);
    let mut hooks = ServerHooks::new(mover_id);
    let result = f(&mut MotionContext::new(&mut mover, &mut hooks));

    save_mover(ctx, row, &mover);
    hooks.flush(ctx);
    Ok(result)
}

/// Finalizes whatever currently drives the mover, without reporting completion.
fn end_active_motion(ctx: &ReducerContext, mctx: &mut MotionContext<'_>) {
    let mover_id = mctx.mover.id;
    let Some(active) = ctx.db.active_motion().mover_id().find(mover_id) else {
        return;
    };

    match Motion::try_from(&active.motion) {
        Ok(mut previous) => previous
            .generator_mut()
            .finalize(mctx, !active.suspended, false),
        Err(err) => log::error!("Dropping unreadable motion of mover {mover_id}: {err}"),
    }
    ctx.db.active_motion().mover_id().delete(mover_id);
}

/// Replaces the mover's motion with `motion` and starts it.
pub fn start_motion(ctx: &ReducerContext, mover_id: u64, mut motion: Motion) -> Result<(), String> {
    with_mover(ctx, mover_id, |mctx| {
        end_active_motion(ctx, mctx);
        ctx.db.spline_chain_resume().mover_id().delete(mover_id);

        let generator = motion.generator_mut();
        generator.initialize(mctx);
        if generator.is_finalized() {
            log::debug!("Motion of mover {mover_id} finished on start");
            return;
        }

        ctx.db.active_motion().insert(ActiveMotion {
            mover_id,
            motion: (&motion).into(),
            suspended: false,
        });
    })
}

/// Finalizes the current motion and stops the mover where it is.
pub fn stop_motion(ctx: &ReducerContext, mover_id: u64) -> Result<(), String> {
    with_mover(ctx, mover_id, |mctx| {
        end_active_motion(ctx, mctx);
        ctx.db.spline_chain_resume().mover_id().delete(mover_id);
        mctx.mover.stop();
    })
}

/// Advances one mover and its generator by `diff` milliseconds.
pub fn tick_motion(ctx: &ReducerContext, active: ActiveMotion, diff: u32) -> Result<(), String> {
    let mover_id = active.mover_id;
    let mut motion = Motion::try_from(&active.motion)?;

    let still_active = with_mover(ctx, mover_id, |mctx| {
        mctx.mover
            .update_movement(diff as i32, |target| resolve_target(ctx, target));

        let generator = motion.generator_mut();
        if generator.update(mctx, diff) {
            return true;
        }
        generator.finalize(mctx, true, true);
        false
    })?;

    if still_active {
        ctx.db.active_motion().mover_id().update(ActiveMotion {
            motion: (&motion).into(),
            ..active
        });
    } else {
        log::debug!("Motion of mover {mover_id} finished");
        ctx.db.active_motion().mover_id().delete(mover_id);
    }
    Ok(())
}
