//! Movement generators: state machines that launch splines on a [`Mover`] and turn
//! playback progress into side effects.
//!
//! Layout:
//! - `generic`: one ad-hoc path with an optional arrival spell.
//! - `flight`: multi-leg taxi route with node events, fares and grid preloading.
//! - `spline_chain`: pre-timed links played back to back, resumable mid-link.
//! - `hooks`: the [`MovementHooks`] side-effect interface.
//! - `timer`: [`CountdownTimer`].
//!
//! Notes:
//! - Generators never advance the spline. The owner calls
//!   [`Mover::update_movement`] first, then [`MovementGenerator::update`] with the
//!   same delta.
//! - Everything a generator touches comes in through [`MotionContext`]; there is no
//!   global state.

mod flight;
mod generic;
mod hooks;
mod spline_chain;
mod timer;

pub use flight::{FlightPathMovementGenerator, PathSwitch, TaxiLeg, TaxiPathNode, TaxiPathSource};
pub use generic::GenericMovementGenerator;
pub use hooks::MovementHooks;
pub use spline_chain::{SplineChainLink, SplineChainMovementGenerator, SplineChainResumeInfo};
pub use timer::CountdownTimer;

#[cfg(test)]
pub(crate) use hooks::recording;

use crate::{bitmask_flags::BitmaskFlags, define_bitmask_flags, mover::Mover};

define_bitmask_flags!(
    /// Lifecycle flags shared by all generators.
    GeneratorFlag,
    u16,
    {
        InitializationPending,
        Initialized,
        Deactivated,
        InformEnabled,
        Finalized,
    }
);

pub type GeneratorFlags = BitmaskFlags<u16>;

/// What kind of movement finished, reported through [`MovementHooks::movement_inform`].
///
/// The numeric values are persisted.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MotionKind {
    #[default]
    Effect = 0,
    Point = 1,
    Jump = 2,
    Fall = 3,
    Flight = 4,
    SplineChain = 5,
}

impl MotionKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => MotionKind::Effect,
            1 => MotionKind::Point,
            2 => MotionKind::Jump,
            3 => MotionKind::Fall,
            4 => MotionKind::Flight,
            5 => MotionKind::SplineChain,
            _ => return None,
        })
    }
}

/// The mover being driven plus the world it may affect.
pub struct MotionContext<'a> {
    pub mover: &'a mut Mover,
    pub hooks: &'a mut dyn MovementHooks,
}

impl<'a> MotionContext<'a> {
    pub fn new(mover: &'a mut Mover, hooks: &'a mut dyn MovementHooks) -> Self {
        Self { mover, hooks }
    }
}

pub trait MovementGenerator {
    fn kind(&self) -> MotionKind;

    fn flags(&self) -> GeneratorFlags;

    /// First activation, or re-activation after [`MovementGenerator::deactivate`].
    fn initialize(&mut self, ctx: &mut MotionContext<'_>);

    fn reset(&mut self, ctx: &mut MotionContext<'_>);

    /// Returns `false` once the generator has nothing left to do.
    fn update(&mut self, ctx: &mut MotionContext<'_>, diff: u32) -> bool;

    /// Suspends the generator; its state is kept for a later `initialize`.
    fn deactivate(&mut self, ctx: &mut MotionContext<'_>);

    /// `active`: the generator is the one currently moving the owner.
    /// `movement_inform`: report completion if the generator reached its goal.
    fn finalize(&mut self, ctx: &mut MotionContext<'_>, active: bool, movement_inform: bool);

    fn is_finalized(&self) -> bool {
        self.flags().has(GeneratorFlag::Finalized)
    }
}

/// Any of the concrete generators, for owners that store one of each kind.
#[derive(Clone, Debug)]
pub enum Motion {
    Generic(GenericMovementGenerator),
    Flight(FlightPathMovementGenerator),
    SplineChain(SplineChainMovementGenerator),
}

impl Motion {
    pub fn generator(&self) -> &dyn MovementGenerator {
        match self {
            Motion::Generic(generator) => generator,
            Motion::Flight(generator) => generator,
            Motion::SplineChain(generator) => generator,
        }
    }

    pub fn generator_mut(&mut self) -> &mut dyn MovementGenerator {
        match self {
            Motion::Generic(generator) => generator,
            Motion::Flight(generator) => generator,
            Motion::SplineChain(generator) => generator,
        }
    }
}
