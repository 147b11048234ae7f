//! Charger trait

use crate::config::ChargerConfig;
use crate::error::PowerError;

/// Charge phase reported by the charger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargerState {
    NotCharging = 0,
    PreCharge = 1,
    FastCharge = 2,
    ChargeDone = 3,
}

impl ChargerState {
    /// Decode the two-bit phase field
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => ChargerState::NotCharging,
            1 => ChargerState::PreCharge,
            2 => ChargerState::FastCharge,
            _ => ChargerState::ChargeDone,
        }
    }

    /// Any phase other than `NotCharging` means external power is present
    pub fn is_charging(&self) -> bool {
        !matches!(self, ChargerState::NotCharging)
    }
}

/// Battery charger used by the lifecycle controller
pub trait Charger {
    /// Read the current charge phase
    fn charge_state(&mut self) -> impl core::future::Future<Output = Result<ChargerState, PowerError>>;

    /// Enter (`true`) or leave (`false`) shipping mode
    ///
    /// Entering isolates the battery and the board loses power shortly after.
    fn set_shipping_mode(&mut self, enable: bool) -> impl core::future::Future<Output = Result<(), PowerError>>;

    /// Apply the full boot-time setup
    fn configure(&mut self, config: &ChargerConfig) -> impl core::future::Future<Output = Result<(), PowerError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits() {
        assert_eq!(ChargerState::from_bits(0), ChargerState::NotCharging);
        assert_eq!(ChargerState::from_bits(1), ChargerState::PreCharge);
        assert_eq!(ChargerState::from_bits(2), ChargerState::FastCharge);
        assert_eq!(ChargerState::from_bits(3), ChargerState::ChargeDone);
        assert_eq!(ChargerState::from_bits(0b110), ChargerState::FastCharge);
    }

    #[test]
    fn test_is_charging() {
        assert!(!ChargerState::NotCharging.is_charging());
        assert!(ChargerState::PreCharge.is_charging());
        assert!(ChargerState::FastCharge.is_charging());
        assert!(ChargerState::ChargeDone.is_charging());
    }
}
