use crate::types::*;
use spacetimedb::*;

/// The movement generator currently driving a mover (at most one per mover).
#[table(name = active_motion)]
pub struct ActiveMotion {
    #[primary_key]
    pub mover_id: u64,

    pub motion: DbMotion,

    /// Deactivated by `suspend_motion`; skipped by the tick until resumed.
    #[index(btree)]
    pub suspended: bool,
}
