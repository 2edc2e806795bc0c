use crate::{EntityId, event::EventId};

use super::MotionKind;

/// Side effects generators ask the surrounding world to perform.
///
/// All calls are fire-and-forget; generators never wait on their outcome.
pub trait MovementHooks {
    /// Warm the world grid around `(x, y)` on `map_id` ahead of an arrival.
    fn preload_grid(&mut self, map_id: u32, x: f32, y: f32);

    fn fire_event(&mut self, event: EventId, source: EntityId, target: EntityId);

    fn cast_spell(&mut self, caster: EntityId, spell_id: u32, target: Option<EntityId>);

    /// Tells the owner's controller that a movement finished.
    fn movement_inform(&mut self, owner: EntityId, kind: MotionKind, point_id: u32);

    /// Deducts a taxi fare from the owner.
    fn charge_fare(&mut self, owner: EntityId, amount: u32);
}
