use nalgebra::Vector3;

/// A 3D point in world space (meters).
///
/// Semantics:
/// - `x`/`y` span the ground plane, `z` is elevation.
/// - This is a data type only; movement math runs on `nalgebra` vectors in `shared`.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbVec3 {
    pub x: f32,
    pub y: f32,
    /// Elevation.
    pub z: f32,
}

impl Default for DbVec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl DbVec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<DbVec3> for Vector3<f32> {
    fn from(v: DbVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
impl From<&DbVec3> for Vector3<f32> {
    fn from(v: &DbVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3<f32>> for DbVec3 {
    fn from(v: Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
impl From<&Vector3<f32>> for DbVec3 {
    fn from(v: &Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
