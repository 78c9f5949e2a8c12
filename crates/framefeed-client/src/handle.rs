use std::fmt;

/// Opaque identifier for one live session in a registry.
///
/// A handle packs a slot index in the low 32 bits (stored plus one, so the
/// raw value 0 stays permanently invalid) and the slot's generation in the
/// high 32 bits. Destroying a session bumps its slot generation, which
/// retires the old raw value: a stale handle can never resolve to a
/// successor session that happens to reuse the slot.
///
/// The first handle a fresh registry issues has raw value 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientHandle(u64);

impl ClientHandle {
    /// The reserved "no session" handle; raw value 0.
    pub const INVALID: ClientHandle = ClientHandle(0);

    /// Builds a handle from slot coordinates. `index` must be below
    /// `u32::MAX` so the stored index+1 stays within the low word.
    pub(crate) fn pack(index: u32, generation: u32) -> ClientHandle {
        debug_assert!(index < u32::MAX);
        ClientHandle((u64::from(generation) << 32) | (u64::from(index) + 1))
    }

    /// Slot index and generation, or `None` for the invalid handle.
    pub(crate) fn unpack(self) -> Option<(u32, u32)> {
        let low = (self.0 & 0xFFFF_FFFF) as u32;
        if low == 0 {
            return None;
        }
        Some((low - 1, (self.0 >> 32) as u32))
    }

    /// Raw integer form for foreign callers. 0 means invalid.
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Rebuilds a handle from its raw form. The result still has to pass
    /// the registry's generation check to reach a session.
    pub fn from_raw(raw: u64) -> ClientHandle {
        ClientHandle(raw)
    }

    pub fn is_valid(self) -> bool {
        (self.0 & 0xFFFF_FFFF) != 0
    }
}

impl fmt::Display for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
