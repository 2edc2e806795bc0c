use spacetimedb::*;

/// Runtime movement tuning. Single row with `id = 1`, seeded by `init`.
#[table(name = motion_settings, public)]
pub struct MotionSettings {
    #[primary_key]
    pub id: u32,

    /// Default speeds (m/s) for newly spawned movers.
    pub walk_speed: f32,
    pub run_speed: f32,
    pub flight_speed: f32,

    /// Upper bound on the delta time (seconds) fed to one motion tick.
    pub max_tick_dt_s: f32,
}
