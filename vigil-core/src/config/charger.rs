//! Charger configuration
//!
//! Values are expressed in physical units. The driver clamps them into the
//! range the register fields can hold.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest programmable fast-charge current (mA)
pub const CHARGE_CURRENT_MAX_MA: u16 = 456;
/// Fast-charge current step (mA per LSB)
pub const CHARGE_CURRENT_STEP_MA: u16 = 8;

/// Discharge current limit range (mA)
pub const DISCHARGE_CURRENT_MIN_MA: u16 = 200;
pub const DISCHARGE_CURRENT_MAX_MA: u16 = 3200;
/// Discharge current limit step (mA per LSB)
pub const DISCHARGE_CURRENT_STEP_MA: u16 = 200;

/// Charge termination voltage range (mV)
pub const CHARGE_VOLTAGE_MIN_MV: u16 = 3600;
pub const CHARGE_VOLTAGE_MAX_MV: u16 = 4545;
/// Charge termination voltage step (mV per LSB)
pub const CHARGE_VOLTAGE_STEP_MV: u16 = 15;

/// Highest programmable precharge current (mA)
pub const PRECHARGE_CURRENT_MAX_MA: u16 = 31;

/// Charger watchdog timeout
///
/// Only these four settings exist in hardware; anything else is rejected
/// before it reaches the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WatchdogTimeout {
    #[default]
    Disabled,
    Secs40,
    Secs80,
    Secs160,
}

impl WatchdogTimeout {
    /// Map a timeout in seconds to a setting, `None` if unsupported
    pub fn from_secs(secs: u16) -> Option<Self> {
        match secs {
            0 => Some(Self::Disabled),
            40 => Some(Self::Secs40),
            80 => Some(Self::Secs80),
            160 => Some(Self::Secs160),
            _ => None,
        }
    }

    pub fn as_secs(self) -> u16 {
        match self {
            Self::Disabled => 0,
            Self::Secs40 => 40,
            Self::Secs80 => 80,
            Self::Secs160 => 160,
        }
    }

    /// Two-bit field value
    pub fn bits(self) -> u8 {
        match self {
            Self::Disabled => 0b00,
            Self::Secs40 => 0b01,
            Self::Secs80 => 0b10,
            Self::Secs160 => 0b11,
        }
    }
}

/// Battery voltage below which the charger precharges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrechargeThreshold {
    /// 2.8 V
    #[default]
    Low,
    /// 3.0 V
    High,
}

/// INT pin press duration that wakes the chip from shipping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntWakeupTime {
    /// 100 ms
    #[default]
    Short,
    /// 2 s (power-on default)
    Long,
}

/// Full charger setup applied at boot
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChargerConfig {
    /// Fast-charge current (mA)
    pub charge_current_ma: u16,
    /// Discharge (battery to system) current limit (mA)
    pub discharge_current_ma: u16,
    /// Charge termination voltage (mV)
    pub charge_voltage_mv: u16,
    /// Precharge current (mA)
    pub precharge_current_ma: u16,
    pub precharge_threshold: PrechargeThreshold,
    pub watchdog: WatchdogTimeout,
    /// Also arm the watchdog while discharging
    pub discharge_watchdog: bool,
    /// Battery thermistor monitoring
    pub ntc_enabled: bool,
    pub charge_enabled: bool,
    pub int_wakeup: IntWakeupTime,
}

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            charge_current_ma: 260,
            discharge_current_ma: 2800,
            charge_voltage_mv: 4200,
            precharge_current_ma: 31,
            precharge_threshold: PrechargeThreshold::Low,
            watchdog: WatchdogTimeout::Disabled,
            discharge_watchdog: false,
            ntc_enabled: false,
            charge_enabled: true,
            int_wakeup: IntWakeupTime::Short,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watchdog_from_secs() {
        assert_eq!(WatchdogTimeout::from_secs(0), Some(WatchdogTimeout::Disabled));
        assert_eq!(WatchdogTimeout::from_secs(40), Some(WatchdogTimeout::Secs40));
        assert_eq!(WatchdogTimeout::from_secs(80), Some(WatchdogTimeout::Secs80));
        assert_eq!(WatchdogTimeout::from_secs(160), Some(WatchdogTimeout::Secs160));
        assert_eq!(WatchdogTimeout::from_secs(50), None);
        assert_eq!(WatchdogTimeout::from_secs(320), None);
    }

    #[test]
    fn test_watchdog_secs_round_trip() {
        for secs in [0, 40, 80, 160] {
            let wd = WatchdogTimeout::from_secs(secs).unwrap();
            assert_eq!(wd.as_secs(), secs);
        }
        assert_eq!(WatchdogTimeout::Secs160.bits(), 0b11);
    }

    #[test]
    fn test_default_board_setup() {
        let config = ChargerConfig::default();
        assert_eq!(config.charge_current_ma, 260);
        assert_eq!(config.discharge_current_ma, 2800);
        assert_eq!(config.charge_voltage_mv, 4200);
        assert_eq!(config.precharge_current_ma, 31);
        assert!(!config.ntc_enabled);
        assert!(config.charge_enabled);
    }
}
