/// Minimal spline duration in milliseconds.
///
/// A spline whose timing table sums to less than this is considered degenerate
/// (all control points coincide) and is re-timed to a minimal span.
pub const MINIMAL_DURATION_MS: i32 = 1;

/// Duration given to a degenerate cyclic spline (milliseconds).
///
/// Cyclic splines wrap on every lap, so a one millisecond lap would make each
/// tick spin through hundreds of cycles.
pub const DEGENERATE_CYCLE_DURATION_MS: i32 = 1000;

/// Number of chord steps used to approximate one Catmull-Rom segment length.
pub const CATMULL_ROM_STEPS_PER_SEGMENT: u32 = 3;

/// Smallest accepted spline velocity (meters per second).
pub const MIN_SPLINE_VELOCITY: f32 = 0.01;

/// Minimal distance between two consecutive launched control points (meters).
pub const MIN_SEGMENT_LENGTH: f32 = 0.1;

/// A two point spline shorter than this with a facing directive only turns the mover.
pub const FACING_ONLY_MAX_LENGTH: f32 = 0.1;

/// Gravity used by the fall model (meters per second squared).
///
/// Convention: this is the magnitude, falling moves toward -Z.
pub const FALL_GRAVITY: f32 = 19.291_105;

/// Terminal fall velocity (meters per second).
pub const TERMINAL_VELOCITY: f32 = 60.148_003;

/// Terminal velocity while slow falling (meters per second).
pub const TERMINAL_SAFE_FALL_VELOCITY: f32 = 7.0;

/// Default walking speed (meters per second).
pub const DEFAULT_WALK_SPEED: f32 = 2.5;

/// Default running speed (meters per second).
pub const DEFAULT_RUN_SPEED: f32 = 7.0;

/// Speed of a mounted taxi flight (meters per second).
pub const PLAYER_FLIGHT_SPEED: f32 = 32.0;

/// Taxi nodes closer than this (planar, squared) to the previous leg's kept node
/// are dropped when legs are stitched together.
pub const SKIP_SPLINE_POINT_DISTANCE_SQ: f32 = 40.0 * 40.0;

/// How many nodes before the final one the destination grid gets preloaded.
pub const FLIGHT_PRELOAD_NODES_AHEAD: usize = 3;
