use nalgebra::Vector2;

/// Piecewise-linear curve sampled by `x`, used to warp parabolic jump timing.
///
/// Points are kept sorted by `x`. Lookups outside the covered range clamp to the first
/// or last value; an empty curve evaluates to `1.0` (no warp).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    points: Vec<Vector2<f32>>,
}

impl Curve {
    pub fn new(mut points: Vec<Vector2<f32>>) -> Self {
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { points }
    }

    pub fn points(&self) -> &[Vector2<f32>] {
        &self.points
    }

    pub fn value_at(&self, x: f32) -> f32 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return 1.0;
        };
        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        // First point strictly past `x`; guaranteed to exist and be > 0 here.
        let hi = self.points.partition_point(|p| p.x <= x);
        let a = self.points[hi - 1];
        let b = self.points[hi];
        let span = b.x - a.x;
        if span <= f32::EPSILON {
            return b.y;
        }
        a.y + (b.y - a.y) * ((x - a.x) / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_points() {
        let curve = Curve::new(vec![Vector2::new(1.0, 2.0), Vector2::new(0.0, 0.0)]);
        assert!((curve.value_at(0.25) - 0.5).abs() < 1.0e-6);
        assert_eq!(curve.value_at(-1.0), 0.0);
        assert_eq!(curve.value_at(3.0), 2.0);
    }

    #[test]
    fn empty_curve_does_not_warp() {
        assert_eq!(Curve::default().value_at(0.5), 1.0);
    }
}
