use crate::{bitmask_flags::BitmaskFlags, define_bitmask_flags};

define_bitmask_flags!(
    /// Playback flags of a [`super::MoveSpline`].
    ///
    /// Bit positions are part of the wire format shared with clients. Placeholder
    /// variants keep the positions of bits this server never sets.
    SplineFlag,
    u32,
    {
        Unknown0,
        FallingSlow,
        Done,
        Falling,
        NoSpline,
        Unknown5,
        Flying,
        OrientationFixed,
        CatmullRom,
        Cyclic,
        EnterCycle,
        Frozen,
        TransportEnter,
        TransportExit,
        Unknown14,
        Unknown15,
        Backward,
        SmoothGroundPath,
        CanSwim,
        UncompressedPath,
        Unknown20,
        Unknown21,
        Animation,
        Parabolic,
        FadeObject,
        Steering,
    }
);

pub type SplineFlags = BitmaskFlags<u32>;

/// Flags whose effect starts part way through the spline (`effect_start_time`).
pub const TIMED_EFFECT_FLAGS: [SplineFlag; 3] =
    [SplineFlag::Parabolic, SplineFlag::Animation, SplineFlag::FadeObject];

/// Flags that freeze the reported orientation while travelling.
pub const NO_TANGENT_FACING_FLAGS: [SplineFlag; 3] = [
    SplineFlag::OrientationFixed,
    SplineFlag::Falling,
    SplineFlag::Unknown0,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmask_flags::FlagBitmask;

    #[test]
    fn wire_bit_positions_are_stable() {
        assert_eq!(SplineFlag::Done.mask(), 0x0000_0004);
        assert_eq!(SplineFlag::CatmullRom.mask(), 0x0000_0100);
        assert_eq!(SplineFlag::Cyclic.mask(), 0x0000_0200);
        assert_eq!(SplineFlag::EnterCycle.mask(), 0x0000_0400);
        assert_eq!(SplineFlag::Backward.mask(), 0x0001_0000);
        assert_eq!(SplineFlag::Parabolic.mask(), 0x0080_0000);
        assert_eq!(SplineFlag::FadeObject.mask(), 0x0100_0000);
    }
}
