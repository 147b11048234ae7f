//! Fuel gauge drivers

pub mod bq27220;

pub use bq27220::{BatteryStatus, Bq27220, SecurityMode};

/// Point-in-time gauge snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GaugeReading {
    pub voltage_mv: u16,
    /// Instantaneous current, negative while discharging
    pub current_ma: i16,
    pub average_current_ma: i16,
    pub standby_current_ma: i16,
    /// Current the gauge is requesting from the charger
    pub charging_current_ma: i16,
    /// Cell temperature in 0.1 K
    pub temperature_dk: u16,
    pub remaining_capacity_mah: u16,
    pub full_charge_capacity_mah: u16,
    /// Relative state of charge (%)
    pub state_of_charge: u16,
    /// Minutes to empty at the average current (0xFFFF while charging)
    pub time_to_empty_min: u16,
}

impl GaugeReading {
    /// Temperature in 0.1 °C
    pub fn temperature_dc(&self) -> i32 {
        i32::from(self.temperature_dk) - 2731
    }
}
