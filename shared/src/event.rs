/// Identity of a world entity (mover, spell target, event source).
pub type EntityId = u64;

/// A scripted world event fired by movement (taxi node arrival/departure).
///
/// `group` and `phase` scope the event; `0` means "any".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventId {
    pub id: u32,
    pub group: u8,
    pub phase: u8,
}

impl EventId {
    pub const fn new(id: u32) -> Self {
        Self {
            id,
            group: 0,
            phase: 0,
        }
    }

    pub const fn with_scope(id: u32, group: u8, phase: u8) -> Self {
        Self { id, group, phase }
    }

    /// Whether this event is active in `phase`.
    pub fn is_in_phase(&self, phase: u8) -> bool {
        self.phase == 0 || self.phase == phase
    }
}
