use crate::{EntityId, move_spline::MoveSplineInit};

use super::{
    CountdownTimer, GeneratorFlag, GeneratorFlags, MotionContext, MotionKind, MovementGenerator,
};

/// Plays one prepared spline, then optionally casts an arrival spell.
///
/// Duration comes from the launched spline unless the launch builder fixes it
/// with [`MoveSplineInit::set_duration`]. Cyclic splines only end when finalized from
/// outside.
///
/// Resuming after [`MovementGenerator::deactivate`] is not supported: the generator
/// finalizes instead of replaying a partial path.
#[derive(Clone, Debug)]
pub struct GenericMovementGenerator {
    pub spline_init: MoveSplineInit,
    pub kind: MotionKind,
    pub point_id: u32,
    pub arrival_spell_id: Option<u32>,
    pub arrival_spell_target: Option<EntityId>,
    pub duration: CountdownTimer,
    pub flags: GeneratorFlags,
}

impl GenericMovementGenerator {
    pub fn new(spline_init: MoveSplineInit, kind: MotionKind, point_id: u32) -> Self {
        let mut flags = GeneratorFlags::default();
        flags.add(GeneratorFlag::InitializationPending);
        Self {
            spline_init,
            kind,
            point_id,
            arrival_spell_id: None,
            arrival_spell_target: None,
            duration: CountdownTimer::default(),
            flags,
        }
    }

    pub fn with_arrival_spell(mut self, spell_id: u32, target: Option<EntityId>) -> Self {
        self.arrival_spell_id = Some(spell_id);
        self.arrival_spell_target = target;
        self
    }

    fn movement_inform(&mut self, ctx: &mut MotionContext<'_>) {
        // Inform is one-shot.
        self.flags.remove(GeneratorFlag::InformEnabled);
        if let Some(spell_id) = self.arrival_spell_id {
            ctx.hooks.cast_spell(ctx.mover.id, spell_id, self.arrival_spell_target);
        }
        ctx.hooks.movement_inform(ctx.mover.id, self.kind, self.point_id);
    }
}

impl MovementGenerator for GenericMovementGenerator {
    fn kind(&self) -> MotionKind {
        self.kind
    }

    fn flags(&self) -> GeneratorFlags {
        self.flags
    }

    fn initialize(&mut self, ctx: &mut MotionContext<'_>) {
        if self.flags.has(GeneratorFlag::Deactivated)
            && !self.flags.has(GeneratorFlag::InitializationPending)
        {
            log::debug!(
                "GenericMovementGenerator: mover {} cannot resume point {}, finalizing",
                ctx.mover.id,
                self.point_id
            );
            self.flags.remove(GeneratorFlag::Deactivated);
            self.flags.add(GeneratorFlag::Finalized);
            return;
        }

        self.flags.remove_many(&[
            GeneratorFlag::InitializationPending,
            GeneratorFlag::Deactivated,
        ]);
        self.flags.add(GeneratorFlag::Initialized);

        let launched = self.spline_init.launch(ctx.mover);
        self.duration.reset(self.spline_init.fixed_duration().unwrap_or(launched));
    }

    fn reset(&mut self, ctx: &mut MotionContext<'_>) {
        self.initialize(ctx);
    }

    fn update(&mut self, ctx: &mut MotionContext<'_>, diff: u32) -> bool {
        if self.flags.has(GeneratorFlag::Finalized) {
            return false;
        }

        if !ctx.mover.spline.is_cyclic() {
            self.duration.update(diff);
        }

        if self.duration.passed() || ctx.mover.spline.finalized() {
            self.flags.add(GeneratorFlag::InformEnabled);
            return false;
        }
        true
    }

    fn deactivate(&mut self, _ctx: &mut MotionContext<'_>) {
        self.flags.add(GeneratorFlag::Deactivated);
    }

    fn finalize(&mut self, ctx: &mut MotionContext<'_>, _active: bool, movement_inform: bool) {
        self.flags.add(GeneratorFlag::Finalized);
        if movement_inform && self.flags.has(GeneratorFlag::InformEnabled) {
            self.movement_inform(ctx);
        }
    }
}
