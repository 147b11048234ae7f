//! Low-battery kill switch
//!
//! Counts consecutive samples at or below the empty threshold while not
//! charging. Any sample above the threshold, or any sample taken while
//! charging, re-arms the full countdown.

/// Outcome of feeding one sample to the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuardStatus {
    /// Battery fine or charging; countdown at full value
    Idle,
    /// Empty and discharging, `remaining` samples left
    Counting { remaining: u8 },
    /// Countdown ran out; a shutdown must be requested
    Expired,
}

impl GuardStatus {
    /// Remaining count while counting down
    pub fn remaining(&self) -> Option<u8> {
        match self {
            GuardStatus::Counting { remaining } => Some(*remaining),
            _ => None,
        }
    }
}

/// Consecutive-empty-sample counter
#[derive(Debug, Clone)]
pub struct LowBatteryGuard {
    initial: u8,
    remaining: u8,
}

impl LowBatteryGuard {
    pub fn new(countdown: u8) -> Self {
        let initial = countdown.max(1);
        Self {
            initial,
            remaining: initial,
        }
    }

    /// Feed one sample
    ///
    /// Fires exactly once per run of `countdown` empty samples, then re-arms.
    pub fn update(&mut self, voltage_mv: u16, empty_mv: u16, charging: bool) -> GuardStatus {
        if charging || voltage_mv > empty_mv {
            self.remaining = self.initial;
            return GuardStatus::Idle;
        }

        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.initial;
            GuardStatus::Expired
        } else {
            GuardStatus::Counting {
                remaining: self.remaining,
            }
        }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }
}
