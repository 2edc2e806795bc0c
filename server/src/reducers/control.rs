//! Reducers that interrupt, pause and continue motions.
//!
//! Behavior
//! - `stop_motion`: ends the motion without an arrival report and halts the mover.
//! - `suspend_motion`: halts the mover but keeps enough state to continue.
//!   - Spline chains are reduced to a resume record in `spline_chain_resume`, the
//!     same record a save/reload would use.
//!   - Other motions stay in `active_motion`, deactivated.
//! - `resume_motion`: continues whichever of the two was left behind.

use crate::{
    motion::{authorize, start_motion, stop_motion as halt, with_mover},
    schema::*,
};
use shared::{Motion, MovementGenerator, SplineChainLink, SplineChainMovementGenerator};
use spacetimedb::{ReducerContext, Table};

#[spacetimedb::reducer]
pub fn stop_motion(ctx: &ReducerContext, mover_id: u64) -> Result<(), String> {
    authorize(ctx, mover_id)?;
    halt(ctx, mover_id)
}

#[spacetimedb::reducer]
pub fn suspend_motion(ctx: &ReducerContext, mover_id: u64) -> Result<(), String> {
    authorize(ctx, mover_id)?;
    let Some(active) = ctx.db.active_motion().mover_id().find(mover_id) else {
        return Err("Mover has no motion".into());
    };
    if active.suspended {
        return Err("Motion is already suspended".into());
    }
    let mut motion = Motion::try_from(&active.motion)?;

    with_mover(ctx, mover_id, |mctx| {
        if let Motion::SplineChain(chain) = &mut motion {
            let resume = chain.resume_info(mctx.mover);
            chain.finalize(mctx, true, false);
            ctx.db.active_motion().mover_id().delete(mover_id);
            match resume {
                Some(info) => {
                    ctx.db.spline_chain_resume().insert(SplineChainResume {
                        mover_id,
                        info: info.into(),
                    });
                }
                None => {
                    log::debug!("Chain of mover {mover_id} already complete, nothing to resume")
                }
            }
        } else {
            motion.generator_mut().deactivate(mctx);
            ctx.db.active_motion().mover_id().update(ActiveMotion {
                mover_id,
                motion: (&motion).into(),
                suspended: true,
            });
        }
        mctx.mover.stop();
    })
}

#[spacetimedb::reducer]
pub fn resume_motion(ctx: &ReducerContext, mover_id: u64) -> Result<(), String> {
    authorize(ctx, mover_id)?;

    if let Some(resume) = ctx.db.spline_chain_resume().mover_id().find(mover_id) {
        let Some(chain) = ctx.db.spline_chain().id().find(resume.info.chain_id) else {
            ctx.db.spline_chain_resume().mover_id().delete(mover_id);
            return Err("Spline chain of resume record no longer exists".into());
        };
        let links: Vec<SplineChainLink> = chain.links.iter().map(Into::into).collect();
        let generator = SplineChainMovementGenerator::from_resume(links, &resume.info.into());
        return start_motion(ctx, mover_id, Motion::SplineChain(generator));
    }

    let Some(active) = ctx.db.active_motion().mover_id().find(mover_id) else {
        return Err("Mover has nothing to resume".into());
    };
    if !active.suspended {
        return Err("Motion is not suspended".into());
    }
    let mut motion = Motion::try_from(&active.motion)?;

    with_mover(ctx, mover_id, |mctx| {
        let generator = motion.generator_mut();
        generator.reset(mctx);
        if generator.is_finalized() {
            generator.finalize(mctx, true, false);
            ctx.db.active_motion().mover_id().delete(mover_id);
            log::debug!("Motion of mover {mover_id} could not resume and was dropped");
            return;
        }
        ctx.db.active_motion().mover_id().update(ActiveMotion {
            mover_id,
            motion: (&motion).into(),
            suspended: false,
        });
    })
}
