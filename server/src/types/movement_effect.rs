use spacetimedb::SpacetimeType;

use super::DbEventId;

#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbGridPreload {
    pub map_id: u32,
    pub x: f32,
    pub y: f32,
}

#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbWorldEvent {
    pub event: DbEventId,
    pub source: u64,
    pub target: u64,
}

#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbSpellCast {
    pub spell_id: u32,
    pub target: Option<u64>,
}

#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbMovementInform {
    /// `MotionKind` value.
    pub kind: u8,
    pub point_id: u32,
}

/// A side effect requested by a movement generator.
///
/// The module records these in `movement_event` for subscribers (scripts, clients)
/// instead of acting on them; only fares are applied directly.
#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub enum MovementEffect {
    GridPreload(DbGridPreload),
    WorldEvent(DbWorldEvent),
    SpellCast(DbSpellCast),
    MovementInform(DbMovementInform),
    FareCharged(u32),
}
