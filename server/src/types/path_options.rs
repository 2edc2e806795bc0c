use super::DbFacing;

/// How `move_along_path` should launch its spline.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, PartialEq, Default)]
pub struct PathOptions {
    /// Catmull-Rom instead of straight segments.
    pub smooth: bool,
    /// Loop forever; ends only through `stop_motion`.
    pub cyclic: bool,
    pub fly: bool,
    pub walk: bool,
    /// Meters per second; the mover's speed for the mode when unset.
    pub velocity: Option<f32>,
    /// Overrides velocity so the whole path takes exactly this long (milliseconds).
    pub duration_ms: Option<i32>,
    pub facing: DbFacing,
    /// Reported back in the arrival `MovementInform`.
    pub point_id: u32,
    pub arrival_spell_id: Option<u32>,
    pub arrival_spell_target: Option<u64>,
}
