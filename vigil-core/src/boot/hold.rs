//! Low-voltage boot hold
//!
//! After the battery is detected, a boot below the hold threshold is kept
//! on a warning screen. Without a charger the board powers off once the
//! countdown runs out; plugging in a charger restarts it.

/// Outcome of one hold check (called once per second)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldStatus {
    /// Voltage at or above the hold threshold; boot may continue
    Clear,
    /// Low but charging; keep waiting
    Charging,
    /// Low and discharging, `remaining` seconds shown to the user
    Countdown { remaining: u8 },
    /// Countdown finished; power off
    Expired,
}

#[derive(Debug, Clone)]
pub struct BootHold {
    threshold_mv: u16,
    initial: u8,
    remaining: u8,
}

impl BootHold {
    pub fn new(threshold_mv: u16, seconds: u8) -> Self {
        Self {
            threshold_mv,
            initial: seconds,
            remaining: seconds,
        }
    }

    pub fn update(&mut self, voltage_mv: u16, charging: bool) -> HoldStatus {
        if voltage_mv >= self.threshold_mv {
            return HoldStatus::Clear;
        }
        if charging {
            self.remaining = self.initial;
            return HoldStatus::Charging;
        }
        if self.remaining == 0 {
            return HoldStatus::Expired;
        }

        let shown = self.remaining;
        self.remaining -= 1;
        HoldStatus::Countdown { remaining: shown }
    }
}
