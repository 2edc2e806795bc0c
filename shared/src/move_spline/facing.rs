use nalgebra::Vector3;

use crate::EntityId;

/// What the mover faces, independent of the direction it travels.
///
/// A directive other than [`Facing::Normal`] only takes over once playback is done;
/// while travelling the path tangent wins.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Facing {
    /// Face along the path tangent.
    #[default]
    Normal,
    /// Face a fixed world point.
    Spot(Vector3<f32>),
    /// Face another entity; its position is resolved by the caller.
    Target(EntityId),
    /// Face a fixed yaw (radians).
    Angle(f32),
}

impl Facing {
    /// Two-bit tag used on the wire.
    pub fn wire_tag(&self) -> u8 {
        match self {
            Facing::Normal => 0,
            Facing::Spot(_) => 1,
            Facing::Target(_) => 2,
            Facing::Angle(_) => 3,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Facing::Normal)
    }
}
