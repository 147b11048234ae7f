//! Retained memory abstractions
//!
//! Some state has to survive a deep-sleep cycle without going through
//! persistent storage (RTC slow memory on ESP32-class chips). It is lost
//! on a full power loss, which is exactly the reset rule the boot retry
//! counter needs.

/// Slots in the retained memory region
///
/// Each slot holds one 32-bit word. The region is exempt from the normal
/// zero-on-boot initialization; only a power loss clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RetainedSlot {
    /// Consecutive boots that found no battery (drives the boot backoff)
    BootRetryCount = 0,
}

impl RetainedSlot {
    /// Number of slots an implementation must provide
    pub const COUNT: usize = 1;

    /// Get the slot as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a slot from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RetainedSlot::BootRetryCount),
            _ => None,
        }
    }
}

/// Memory that keeps its contents across deep sleep
pub trait RetainedMemory {
    /// Read the word stored in `slot`
    fn load(&self, slot: RetainedSlot) -> u32;

    /// Overwrite the word stored in `slot`
    fn store(&mut self, slot: RetainedSlot, value: u32);
}

impl<T: RetainedMemory + ?Sized> RetainedMemory for &mut T {
    fn load(&self, slot: RetainedSlot) -> u32 {
        (**self).load(slot)
    }

    fn store(&mut self, slot: RetainedSlot, value: u32) {
        (**self).store(slot, value)
    }
}
