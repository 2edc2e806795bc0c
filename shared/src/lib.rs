//! Movement path interpolation shared by the server module and its tests.
//!
//! Layout:
//! - `spline`: time-parameterized control polylines (linear and Catmull-Rom).
//! - `move_spline`: playback state over a spline, launch builder and validation.
//! - `mover`: the moving entity a spline is launched on.
//! - `generators`: generic, flight path and spline chain movement generators.
//! - `wire`: client-facing snapshot of a playback state.
//! - `fall`, `curve`, `bitmask_flags`, `event`, `constants`: supporting pieces.

pub mod bitmask_flags;
pub mod constants;
pub mod curve;
pub mod event;
pub mod fall;
pub mod generators;
pub mod move_spline;
pub mod mover;
pub mod spline;
pub mod wire;

pub use bitmask_flags::{BitmaskFlags, FlagBitmask};
pub use curve::Curve;
pub use event::{EntityId, EventId};
pub use generators::{
    CountdownTimer, FlightPathMovementGenerator, GeneratorFlag, GeneratorFlags,
    GenericMovementGenerator, Motion, MotionContext, MotionKind, MovementGenerator,
    MovementHooks, PathSwitch, SplineChainLink, SplineChainMovementGenerator,
    SplineChainResumeInfo, TaxiLeg, TaxiPathNode, TaxiPathSource,
};
pub use move_spline::{
    Facing, InitArgsError, Location, MoveSpline, MoveSplineInit, MoveSplineInitArgs,
    SplineFlag, SplineFlags, UpdateResult,
};
pub use mover::{MoveSpeeds, Mover};
pub use spline::{EvaluationMode, Spline};
pub use wire::{PacketWriter, write_spline_data};
