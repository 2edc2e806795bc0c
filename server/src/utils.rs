use log::info;
use spacetimedb::{
    log_stopwatch::LogStopwatch as SpacetimeLogStopwatch, ReducerContext, ScheduleAt, Timestamp,
};

/// Seconds elapsed between two ticks, or `None` if the clock went backwards.
pub fn get_variable_delta_time(now: Timestamp, last: Timestamp) -> Option<f32> {
    now.time_duration_since(last)
        .map(|dur| dur.to_micros() as f32 / 1_000_000.0)
}

/// Seconds between scheduled invocations, for interval schedules.
pub fn get_fixed_delta_time(scheduled_at: &ScheduleAt) -> Option<f32> {
    match scheduled_at {
        ScheduleAt::Interval(dt) => Some(dt.to_micros() as f32 / 1_000_000.0),
        _ => None,
    }
}

/// Converts a tick delta to the whole milliseconds splines advance by.
pub fn delta_millis(dt_s: f32) -> u32 {
    (dt_s.max(0.0) * 1000.0).round() as u32
}

/// Sampled begin/end logging around a reducer, with sequential named spans.
///
/// Sampling uses `ctx.random::<f32>()` so the module stays deterministic.
pub struct LogStopwatch {
    event_sw: Option<SpacetimeLogStopwatch>,
    span_sw: Option<SpacetimeLogStopwatch>,
    name: String,
    should_sample: bool,
}

impl LogStopwatch {
    /// Logs when `force_debug` is set, otherwise with probability `sample_rate`.
    pub fn new(
        ctx: &ReducerContext,
        name: impl Into<String>,
        force_debug: bool,
        sample_rate: f32,
    ) -> Self {
        let name = name.into();
        let should_sample =
            force_debug || (sample_rate > 0.0 && ctx.random::<f32>() <= sample_rate);

        if should_sample {
            info!("--------- {name} begin ---------");
        }

        Self {
            event_sw: should_sample.then(|| SpacetimeLogStopwatch::new("event_time")),
            span_sw: None,
            name,
            should_sample,
        }
    }

    /// Starts a new span, ending the previous one.
    pub fn span(&mut self, section_name: &str) {
        if !self.should_sample {
            return;
        }

        if let Some(sw) = self.span_sw.take() {
            sw.end();
        }

        self.span_sw = Some(SpacetimeLogStopwatch::new(section_name));
    }
}

impl Drop for LogStopwatch {
    fn drop(&mut self) {
        if !self.should_sample {
            return;
        }

        if let Some(sw) = self.span_sw.take() {
            sw.end();
        }
        if let Some(sw) = self.event_sw.take() {
            sw.end();
        }

        info!("---------- {} end ----------", self.name);
    }
}

