/// Millisecond countdown used by generators with a fixed duration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CountdownTimer {
    expiry: i32,
}

impl CountdownTimer {
    pub fn new(expiry_ms: i32) -> Self {
        Self { expiry: expiry_ms }
    }

    pub fn update(&mut self, diff: u32) {
        let diff = i32::try_from(diff).unwrap_or(i32::MAX);
        self.expiry = self.expiry.saturating_sub(diff);
    }

    pub fn passed(&self) -> bool {
        self.expiry <= 0
    }

    pub fn reset(&mut self, expiry_ms: i32) {
        self.expiry = expiry_ms;
    }

    /// Remaining milliseconds; negative once overrun.
    pub fn expiry(&self) -> i32 {
        self.expiry
    }
}
