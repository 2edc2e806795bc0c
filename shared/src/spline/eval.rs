//! Segment evaluation for the two supported interpolation modes.

use nalgebra::{Matrix4, RowVector4, Vector3};

use crate::constants::CATMULL_ROM_STEPS_PER_SEGMENT;

/// Uniform Catmull-Rom basis, applied as `[t³ t² t 1] * M`.
#[rustfmt::skip]
fn catmull_rom_coeffs() -> Matrix4<f32> {
    Matrix4::new(
        -0.5,  1.5, -1.5,  0.5,
         1.0, -2.5,  2.0, -0.5,
        -0.5,  0.0,  0.5,  0.0,
         0.0,  1.0,  0.0,  0.0,
    )
}

#[inline]
fn weighted(p: &[Vector3<f32>], w: RowVector4<f32>) -> Vector3<f32> {
    p[0] * w[0] + p[1] * w[1] + p[2] * w[2] + p[3] * w[3]
}

/// Evaluates a Catmull-Rom segment. `p` holds the four points `[i-1, i, i+1, i+2]`.
///
/// The basis is exact at the knots: `t = 0` yields `p[1]`, `t = 1` yields `p[2]`.
pub fn catmull_rom(p: &[Vector3<f32>], t: f32) -> Vector3<f32> {
    let tvec = RowVector4::new(t * t * t, t * t, t, 1.0);
    weighted(p, tvec * catmull_rom_coeffs())
}

/// First derivative of [`catmull_rom`] with respect to `t`.
pub fn catmull_rom_derivative(p: &[Vector3<f32>], t: f32) -> Vector3<f32> {
    let tvec = RowVector4::new(3.0 * t * t, 2.0 * t, 1.0, 0.0);
    weighted(p, tvec * catmull_rom_coeffs())
}

/// Linear interpolation written so `u = 0` and `u = 1` return the endpoints exactly.
#[inline]
pub fn lerp(a: &Vector3<f32>, b: &Vector3<f32>, u: f32) -> Vector3<f32> {
    a * (1.0 - u) + b * u
}

/// Approximate arc length of a Catmull-Rom segment by summing chords.
pub fn catmull_rom_length(p: &[Vector3<f32>]) -> f32 {
    let mut cur = p[1];
    let mut length = 0.0;
    for step in 1..=CATMULL_ROM_STEPS_PER_SEGMENT {
        let next = catmull_rom(p, step as f32 / CATMULL_ROM_STEPS_PER_SEGMENT as f32);
        length += (next - cur).norm();
        cur = next;
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knots() -> [Vector3<f32>; 4] {
        [
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 2.0, 0.0),
            Vector3::new(2.0, 2.0, 1.0),
        ]
    }

    #[test]
    fn catmull_rom_hits_knots_exactly() {
        let p = knots();
        assert_eq!(catmull_rom(&p, 0.0), p[1]);
        assert_eq!(catmull_rom(&p, 1.0), p[2]);
    }

    #[test]
    fn catmull_rom_tangent_at_knot_is_central_difference() {
        let p = knots();
        let d = catmull_rom_derivative(&p, 0.0);
        let expected = (p[2] - p[0]) * 0.5;
        assert!((d - expected).norm() < 1.0e-6);
    }

    #[test]
    fn straight_catmull_rom_length_matches_chord() {
        let p = [
            Vector3::new(-3.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(6.0, 0.0, 0.0),
        ];
        assert!((catmull_rom_length(&p) - 3.0).abs() < 1.0e-5);
    }
}
