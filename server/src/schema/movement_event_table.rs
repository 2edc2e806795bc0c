use crate::types::*;
use spacetimedb::*;

/// Append-only log of side effects requested by movement generators.
#[table(name = movement_event, public)]
pub struct MovementEvent {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    #[index(btree)]
    pub mover_id: u64,

    pub effect: MovementEffect,
    pub at: Timestamp,
}
