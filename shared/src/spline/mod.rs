//! Parametric path: control points, evaluation mode and cumulative time table.
//!
//! A [`Spline`] is pure geometry. It knows nothing about who travels along it; the
//! playback state lives in [`crate::move_spline::MoveSpline`].
//!
//! # Index layout
//! `points` may contain virtual points that only exist so the Catmull-Rom basis has
//! neighbors at the ends. Real travel happens on `first()..=last()`:
//! - Linear: no virtual points, `first = 0`. Cyclic paths append the loop target so the
//!   closing segment is a normal segment.
//! - Catmull-Rom: one leading virtual point, `first = 1`, and one (two when cyclic)
//!   trailing virtual points.
//!
//! `lengths[i]` is the time (milliseconds) at which point `i` is reached, measured from
//! `first()`. Entries below `first()` are zero.

mod eval;
mod timing;

pub use eval::{catmull_rom, catmull_rom_derivative};
pub use timing::SegmentTiming;

use nalgebra::Vector3;

/// How a segment is interpolated between its two control points.
///
/// The numeric values are part of the wire format.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EvaluationMode {
    #[default]
    Linear = 0,
    CatmullRom = 1,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spline {
    points: Vec<Vector3<f32>>,
    lengths: Vec<i32>,
    index_lo: usize,
    index_hi: usize,
    mode: EvaluationMode,
    cyclic: bool,
}

impl Spline {
    /// Builds an open path through `controls`.
    ///
    /// Callers guarantee at least two control points.
    pub fn init_spline(&mut self, controls: &[Vector3<f32>], mode: EvaluationMode) {
        self.mode = mode;
        self.cyclic = false;
        match mode {
            EvaluationMode::Linear => self.init_linear(controls, None),
            EvaluationMode::CatmullRom => self.init_catmull_rom(controls, None),
        }
        self.lengths = vec![0; self.points.len()];
    }

    /// Builds a closed path that loops back to `controls[cyclic_point]`.
    pub fn init_cyclic_spline(
        &mut self,
        controls: &[Vector3<f32>],
        mode: EvaluationMode,
        cyclic_point: usize,
    ) {
        self.mode = mode;
        self.cyclic = true;
        let cyclic_point = cyclic_point.min(controls.len().saturating_sub(2));
        match mode {
            EvaluationMode::Linear => self.init_linear(controls, Some(cyclic_point)),
            EvaluationMode::CatmullRom => self.init_catmull_rom(controls, Some(cyclic_point)),
        }
        self.lengths = vec![0; self.points.len()];
    }

    fn init_linear(&mut self, controls: &[Vector3<f32>], cyclic_point: Option<usize>) {
        self.points = controls.to_vec();
        if let Some(cp) = cyclic_point {
            self.points.push(controls[cp]);
        }
        self.index_lo = 0;
        self.index_hi = self.points.len() - 1;
    }

    fn init_catmull_rom(&mut self, controls: &[Vector3<f32>], cyclic_point: Option<usize>) {
        let count = controls.len();
        let lo = 1;
        let hi = lo + count - 1;

        let mut points = Vec::with_capacity(count + 3);
        let lead = match cyclic_point {
            Some(0) => controls[count - 1],
            _ => eval::lerp(&controls[0], &controls[1], -1.0),
        };
        points.push(lead);
        points.extend_from_slice(controls);
        match cyclic_point {
            Some(cp) => {
                points.push(controls[cp]);
                points.push(controls[cp + 1]);
            }
            None => points.push(controls[count - 1]),
        }

        self.points = points;
        self.index_lo = lo;
        self.index_hi = if cyclic_point.is_some() { hi + 1 } else { hi };
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.lengths.clear();
        self.index_lo = 0;
        self.index_hi = 0;
        self.cyclic = false;
    }

    pub fn is_empty(&self) -> bool {
        self.index_lo == self.index_hi
    }

    pub fn first(&self) -> usize {
        self.index_lo
    }

    pub fn last(&self) -> usize {
        self.index_hi
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    pub fn points(&self) -> &[Vector3<f32>] {
        &self.points
    }

    /// Point at `index`, clamped into the stored range.
    pub fn point(&self, index: usize) -> Vector3<f32> {
        match self.points.get(index) {
            Some(p) => *p,
            None => {
                log::error!(
                    "Spline::point: index {index} out of range ({} points)",
                    self.points.len()
                );
                self.points.last().copied().unwrap_or_else(Vector3::zeros)
            }
        }
    }

    /// Total travel time in milliseconds.
    pub fn length(&self) -> i32 {
        if self.lengths.is_empty() {
            return 0;
        }
        self.lengths[self.index_hi] - self.lengths[self.index_lo]
    }

    /// Time at which point `index` is reached.
    pub fn length_at(&self, index: usize) -> i32 {
        self.lengths
            .get(index.min(self.index_hi))
            .copied()
            .unwrap_or(0)
    }

    /// Time spent between `first` and `last` (point indices).
    pub fn length_between(&self, first: usize, last: usize) -> i32 {
        self.length_at(last) - self.length_at(first)
    }

    pub fn set_length(&mut self, index: usize, value: i32) {
        if let Some(slot) = self.lengths.get_mut(index) {
            *slot = value;
        }
    }

    /// Geometric length of segment `index` (meters).
    pub fn seg_length(&self, index: usize) -> f32 {
        match self.mode {
            EvaluationMode::Linear => (self.points[index + 1] - self.points[index]).norm(),
            EvaluationMode::CatmullRom => eval::catmull_rom_length(&self.points[index - 1..index + 3]),
        }
    }

    /// Position on segment `index` at `u ∈ [0, 1]`.
    pub fn evaluate_percent(&self, index: usize, u: f32) -> Vector3<f32> {
        let index = self.clamp_segment(index);
        match self.mode {
            EvaluationMode::Linear => eval::lerp(&self.points[index], &self.points[index + 1], u),
            EvaluationMode::CatmullRom => catmull_rom(&self.points[index - 1..index + 3], u),
        }
    }

    /// Tangent (not normalized) on segment `index` at `u ∈ [0, 1]`.
    pub fn evaluate_derivative(&self, index: usize, u: f32) -> Vector3<f32> {
        let index = self.clamp_segment(index);
        match self.mode {
            EvaluationMode::Linear => self.points[index + 1] - self.points[index],
            EvaluationMode::CatmullRom => {
                catmull_rom_derivative(&self.points[index - 1..index + 3], u)
            }
        }
    }

    fn clamp_segment(&self, index: usize) -> usize {
        if index < self.index_lo || index >= self.index_hi {
            log::error!(
                "Spline: segment {index} outside [{}, {})",
                self.index_lo,
                self.index_hi
            );
            return index.clamp(self.index_lo, self.index_hi.saturating_sub(1).max(self.index_lo));
        }
        index
    }
}
