use spacetimedb::*;

/// Wire snapshot of a mover's most recently launched spline.
///
/// Rewritten whenever a new spline is launched; clients replay it locally.
#[table(name = mover_spline_data, public)]
pub struct MoverSplineData {
    #[primary_key]
    pub mover_id: u64,

    pub spline_id: u32,
    pub data: Vec<u8>,
    pub sent_at: Timestamp,
}
