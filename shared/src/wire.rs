//! Wire snapshot of a playback state, consumed by clients to predict motion.
//!
//! Layout (see [`write_spline_data`]):
//! - `u32` spline id, `vec3` final destination (zero when cyclic).
//! - one bit "has spline move", flushed.
//! - for a move: header values, a packed bit block, the facing payload, optional fade
//!   time, the control points and optional jump data.
//!
//! Bits are packed MSB-first and flushed to a byte boundary before any byte-aligned
//! value. Multi-byte values are little-endian.

use nalgebra::Vector3;

use crate::move_spline::{Facing, MoveSpline, SplineFlag};

#[derive(Clone, Debug, Default)]
pub struct PacketWriter {
    bytes: Vec<u8>,
    bit_value: u8,
    bit_count: u8,
}

impl PacketWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.bit_value |= u8::from(bit) << (7 - self.bit_count);
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.bytes.push(self.bit_value);
            self.bit_value = 0;
            self.bit_count = 0;
        }
    }

    /// Writes the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: u8) {
        for shift in (0..count.min(32)).rev() {
            self.write_bit((value >> shift) & 1 != 0);
        }
    }

    /// Pads the pending bit byte with zeros.
    pub fn flush_bits(&mut self) {
        if self.bit_count == 0 {
            return;
        }
        self.bytes.push(self.bit_value);
        self.bit_value = 0;
        self.bit_count = 0;
    }

    fn append(&mut self, data: &[u8]) {
        self.flush_bits();
        self.bytes.extend_from_slice(data);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.append(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.append(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.append(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.append(&value.to_le_bytes());
    }

    pub fn write_vec3(&mut self, value: &Vector3<f32>) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush_bits();
        self.bytes
    }
}

/// Serializes `spline` so a client can rebuild the same playback.
pub fn write_spline_data(data: &mut PacketWriter, spline: &MoveSpline) {
    data.write_u32(spline.id());
    if spline.is_cyclic() {
        data.write_vec3(&Vector3::zeros());
    } else {
        data.write_vec3(&spline.final_destination());
    }

    let has_spline_move = !spline.finalized() && !spline.is_facing_only();
    data.write_bit(has_spline_move);
    data.flush_bits();
    if !has_spline_move {
        return;
    }

    let flags = spline.flags();
    let duration = spline.duration();
    let fade = flags.has(SplineFlag::FadeObject) && spline.effect_start_time() < duration;
    let jump = flags.has(SplineFlag::Parabolic);
    let points = &spline.args().path;

    data.write_u32(flags.bits());
    data.write_i32(spline.time_passed());
    data.write_u32(duration.max(0) as u32);
    // Duration and vertical speed modifiers.
    data.write_f32(1.0);
    data.write_f32(1.0);

    let facing = spline.facing();
    data.write_bits(u32::from(facing.wire_tag()), 2);
    data.write_bit(fade);
    data.write_bits(points.len().min(u16::MAX as usize) as u32, 16);
    data.write_bits(spline.spline().mode() as u32, 2);
    data.write_bit(false);
    data.write_bit(jump);
    data.flush_bits();

    match facing {
        Facing::Spot(spot) => data.write_vec3(&spot),
        Facing::Target(target) => data.write_u64(target),
        Facing::Angle(angle) => data.write_f32(angle),
        Facing::Normal => {}
    }

    if fade {
        data.write_i32(duration - spline.effect_start_time());
    }

    for point in points.iter().take(u16::MAX as usize) {
        data.write_vec3(point);
    }

    if jump {
        data.write_f32(spline.vertical_acceleration());
        data.write_i32(spline.effect_start_time());
        data.write_u32(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bitmask_flags::FlagBitmask, move_spline::MoveSplineInitArgs};

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn f32_at(bytes: &[u8], at: usize) -> f32 {
        f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    #[test]
    fn bits_pack_msb_first() {
        let mut data = PacketWriter::new();
        data.write_bit(true);
        data.write_bits(0b01, 2);
        data.write_u32(0xAABB_CCDD);
        assert_eq!(data.as_bytes(), &[0b1010_0000, 0xDD, 0xCC, 0xBB, 0xAA]);
    }

    #[test]
    fn moving_spline_layout() {
        let mut args = MoveSplineInitArgs {
            path: vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(10.0, 0.0, 0.0)],
            velocity: 5.0,
            spline_id: 9,
            facing: Facing::Angle(1.25),
            ..Default::default()
        };
        args.flags.add(SplineFlag::Flying);
        let mut spline = MoveSpline::default();
        spline.initialize(&args);
        spline.update_state(500);

        let mut data = PacketWriter::new();
        write_spline_data(&mut data, &spline);
        let bytes = data.into_bytes();

        assert_eq!(u32_at(&bytes, 0), 9);
        assert_eq!(f32_at(&bytes, 4), 10.0);
        assert_eq!(bytes[16], 0b1000_0000);
        assert_eq!(u32_at(&bytes, 17), SplineFlag::Flying.mask());
        assert_eq!(u32_at(&bytes, 21), 500);
        assert_eq!(u32_at(&bytes, 25), 2000);
        assert_eq!(f32_at(&bytes, 29), 1.0);
        assert_eq!(f32_at(&bytes, 33), 1.0);

        // tag 3, no fade, 2 points, linear, no filter, no jump: 23 bits then padding.
        assert_eq!(&bytes[37..40], &[0b1100_0000, 0b0000_0000, 0b0100_0000]);
        assert_eq!(f32_at(&bytes, 40), 1.25);
        assert_eq!(f32_at(&bytes, 56), 10.0);
        assert_eq!(bytes.len(), 68);
    }

    #[test]
    fn finished_spline_has_no_move_block() {
        let args = MoveSplineInitArgs {
            path: vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(4.0, 0.0, 0.0)],
            velocity: 4.0,
            ..Default::default()
        };
        let mut spline = MoveSpline::default();
        spline.initialize(&args);
        spline.update_state(1000);

        let mut data = PacketWriter::new();
        write_spline_data(&mut data, &spline);
        assert_eq!(data.as_bytes().len(), 17);
        assert_eq!(data.as_bytes()[16], 0);
    }
}
