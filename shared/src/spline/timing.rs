use crate::{
    constants::{DEGENERATE_CYCLE_DURATION_MS, MINIMAL_DURATION_MS},
    fall::compute_fall_time,
};

use super::Spline;

/// How the cumulative time table of a [`Spline`] is derived from its geometry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SegmentTiming {
    /// Constant speed along the curve (meters per second).
    Velocity(f32),
    /// Free fall from the elevation of the first point, reaching each point when the
    /// fall model has dropped to its elevation.
    Fall { start_elevation: f32, safe_fall: bool },
}

impl SegmentTiming {
    /// Time (milliseconds) at which point `index + 1` is reached, given the time at `index`.
    fn next_time(&self, spline: &Spline, index: usize, time: i32) -> i32 {
        match *self {
            SegmentTiming::Velocity(velocity) => {
                let ms_per_meter = 1000.0 / velocity;
                // `as` saturates, so a runaway segment clamps to i32::MAX instead of wrapping.
                (time as f32 + spline.seg_length(index) * ms_per_meter) as i32
            }
            SegmentTiming::Fall {
                start_elevation,
                safe_fall,
            } => {
                let drop = start_elevation - spline.point(index + 1).z;
                (compute_fall_time(drop, safe_fall) * 1000.0) as i32
            }
        }
    }
}

impl Spline {
    /// Fills the cumulative time table.
    ///
    /// The resulting table is strictly increasing over `first()..=last()`. A path whose
    /// geometry collapses to zero duration is logged and re-timed to the minimal span.
    pub fn init_lengths(&mut self, timing: SegmentTiming) {
        let lo = self.first();
        let hi = self.last();
        if self.is_empty() {
            return;
        }

        let mut raw = vec![0i32; hi + 1];
        let mut time = 0;
        for i in lo..hi {
            time = timing.next_time(self, i, time).max(0);
            raw[i + 1] = time;
        }

        let segments = (hi - lo) as i32;
        if raw[hi] < MINIMAL_DURATION_MS {
            log::error!(
                "Spline::init_lengths: zero length spline ({} points), wrong input data?",
                hi - lo + 1
            );
            let span = if self.is_cyclic() {
                DEGENERATE_CYCLE_DURATION_MS.max(segments)
            } else {
                MINIMAL_DURATION_MS * segments
            };
            for (k, slot) in raw.iter_mut().enumerate().skip(lo) {
                *slot = (k - lo) as i32 * span / segments;
            }
        } else {
            for i in lo + 1..=hi {
                raw[i] = raw[i].max(raw[i - 1].saturating_add(1));
            }
        }

        for (i, value) in raw.into_iter().enumerate() {
            self.set_length(i, value);
        }
    }

    /// Stretches the time table proportionally so the whole path takes exactly
    /// `total` milliseconds.
    ///
    /// Ignored when `total` cannot keep every segment at least one millisecond long.
    pub fn fit_length(&mut self, total: i32) {
        let lo = self.first();
        let hi = self.last();
        let current = self.length();
        if self.is_empty() || current <= 0 || total < (hi - lo) as i32 {
            return;
        }

        let base = self.length_at(lo);
        for i in lo + 1..hi {
            let scaled =
                i64::from(self.length_at(i) - base) * i64::from(total) / i64::from(current);
            let value = (base + scaled as i32).max(self.length_at(i - 1) + 1);
            self.set_length(i, value);
        }
        self.set_length(hi, base + total);

        // Pull interior points back under the pinned end.
        for i in (lo + 1..hi).rev() {
            let value = self.length_at(i).min(self.length_at(i + 1) - 1);
            self.set_length(i, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::EvaluationMode;
    use nalgebra::Vector3;

    #[test]
    fn constant_velocity_table() {
        let mut spline = Spline::default();
        spline.init_spline(
            &[
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(10.0, 0.0, 0.0),
                Vector3::new(10.0, 5.0, 0.0),
            ],
            EvaluationMode::Linear,
        );
        spline.init_lengths(SegmentTiming::Velocity(5.0));
        assert_eq!(spline.length_at(0), 0);
        assert_eq!(spline.length_at(1), 2000);
        assert_eq!(spline.length_at(2), 3000);
        assert_eq!(spline.length(), 3000);
    }

    #[test]
    fn fall_table_is_absolute_fall_time() {
        let mut spline = Spline::default();
        spline.init_spline(
            &[Vector3::new(0.0, 0.0, 20.0), Vector3::new(0.0, 0.0, 0.0)],
            EvaluationMode::Linear,
        );
        spline.init_lengths(SegmentTiming::Fall {
            start_elevation: 20.0,
            safe_fall: false,
        });
        let expected = (compute_fall_time(20.0, false) * 1000.0) as i32;
        assert_eq!(spline.length(), expected);
    }

    #[test]
    fn degenerate_path_gets_minimal_span() {
        let p = Vector3::new(3.0, 3.0, 3.0);
        let mut spline = Spline::default();
        spline.init_spline(&[p, p, p], EvaluationMode::Linear);
        spline.init_lengths(SegmentTiming::Velocity(7.0));
        assert_eq!(spline.length_at(1), 1);
        assert_eq!(spline.length(), 2);

        let mut cyclic = Spline::default();
        cyclic.init_cyclic_spline(&[p, p, p], EvaluationMode::Linear, 0);
        cyclic.init_lengths(SegmentTiming::Velocity(7.0));
        assert_eq!(cyclic.length(), DEGENERATE_CYCLE_DURATION_MS);
        assert!(cyclic.length_at(1) < cyclic.length_at(2));
    }

    #[test]
    fn zero_length_interior_segment_still_advances_time() {
        let mut spline = Spline::default();
        spline.init_spline(
            &[
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(10.0, 0.0, 0.0),
            ],
            EvaluationMode::Linear,
        );
        spline.init_lengths(SegmentTiming::Velocity(5.0));
        assert_eq!(spline.length_at(1), 1);
        assert_eq!(spline.length_at(2), 2000);
    }

    #[test]
    fn fitted_table_ends_on_the_requested_total() {
        let mut spline = Spline::default();
        spline.init_spline(
            &[
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(3.0, 0.0, 0.0),
                Vector3::new(3.0, 4.0, 0.0),
                Vector3::new(3.0, 4.0, 7.0),
            ],
            EvaluationMode::Linear,
        );
        spline.init_lengths(SegmentTiming::Velocity(3.0));
        assert_eq!(spline.length(), 4666);

        spline.fit_length(4669);
        assert_eq!(spline.length(), 4669);
        assert_eq!(spline.length_at(0), 0);
        assert!(spline.length_at(0) < spline.length_at(1));
        assert!(spline.length_at(1) < spline.length_at(2));
        assert!(spline.length_at(2) < spline.length_at(3));
        assert!((spline.length_at(1) - 1000).abs() <= 1);

        // Too short to keep three segments apart.
        spline.fit_length(2);
        assert_eq!(spline.length(), 4669);
    }
}
