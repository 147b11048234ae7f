//! Shared modem power state

use portable_atomic::{AtomicU8, Ordering};

/// Modem power rail state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ModemPowerState {
    Off = 0,
    PoweringOn = 1,
    On = 2,
    PoweringOff = 3,
}

impl ModemPowerState {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => ModemPowerState::PoweringOn,
            2 => ModemPowerState::On,
            3 => ModemPowerState::PoweringOff,
            _ => ModemPowerState::Off,
        }
    }
}

/// Modem state written by the sequencer task, read by anyone
///
/// Intended to live in a `static`.
pub struct ModemStatus {
    state: AtomicU8,
}

impl ModemStatus {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ModemPowerState::Off as u8),
        }
    }

    pub fn state(&self) -> ModemPowerState {
        ModemPowerState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: ModemPowerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub fn is_off(&self) -> bool {
        self.state() == ModemPowerState::Off
    }
}

impl Default for ModemStatus {
    fn default() -> Self {
        Self::new()
    }
}
