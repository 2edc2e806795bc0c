//! Motion tick constants.

/// Motion tick frequency (Hz).
pub const MOTION_TICK_HZ: i64 = 10;

/// Fraction of ticks whose timing is logged.
pub const MOTION_TICK_LOG_SAMPLE_RATE: f32 = 0.01;
