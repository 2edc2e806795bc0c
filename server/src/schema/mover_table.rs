use crate::types::*;
use spacetimedb::*;

/// A world entity moved by splines.
///
/// The authoritative position is refreshed every motion tick while a motion is
/// active. `spline` is the persisted playback state; clients predict from
/// `mover_spline_data` instead.
#[table(name = mover, public)]
pub struct Mover {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    /// Identity allowed to command this mover. `None` for module-owned movers.
    pub owner: Option<Identity>,

    #[index(btree)]
    pub map_id: u32,

    pub position: DbVec3,
    /// Yaw in radians.
    pub orientation: f32,

    /// Speeds (m/s) used when a launch does not set its own velocity.
    pub walk_speed: f32,
    pub run_speed: f32,
    pub flight_speed: f32,

    /// Taxi fares are deducted from this.
    pub money: u64,

    pub last_spline_id: u32,
    pub spline: DbSplineState,
}
