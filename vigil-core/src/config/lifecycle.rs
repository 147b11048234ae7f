//! Lifecycle timing and battery thresholds

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Battery voltage thresholds (mV)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatteryThresholds {
    /// At or below this the battery is empty (0 %)
    pub empty_mv: u16,
    /// Below this a non-charging boot is held and then powered off
    pub boot_hold_mv: u16,
    /// At or above this the battery is full (100 %)
    pub full_mv: u16,
}

impl Default for BatteryThresholds {
    fn default() -> Self {
        Self {
            empty_mv: 3400,
            boot_hold_mv: 3500,
            full_mv: 4200,
        }
    }
}

/// Deep-sleep retry schedule while no battery is detected
///
/// The n-th consecutive retry (starting at 0) sleeps for
/// `min(base_s + n * step_s, max_s)` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BackoffConfig {
    pub base_s: u32,
    pub step_s: u32,
    pub max_s: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_s: 10,
            step_s: 10,
            max_s: 60,
        }
    }
}

/// Lifecycle controller timing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LifecycleConfig {
    pub thresholds: BatteryThresholds,
    pub backoff: BackoffConfig,
    /// Event receive timeout; one tick per expiry (ms)
    pub poll_interval_ms: u32,
    /// Ticks between battery samples
    pub sample_interval_ticks: u16,
    /// Consecutive empty samples before the kill switch fires
    pub low_battery_countdown: u8,
    /// Remaining count at which the charge prompt appears
    pub low_battery_notice_at: u8,
    /// Seconds a non-charging low-voltage boot is held before power-off
    pub boot_hold_secs: u8,
    /// Light-sleep timer wake-up period (s)
    pub sleep_wake_interval_s: u32,
    /// Voltage samples taken on each timer wake-up
    pub sleep_check_samples: u8,
    pub sleep_check_spacing_ms: u32,
    /// How long the "cannot power off while charging" notice stays up (ms)
    pub refusal_notice_ms: u32,
    /// Hold after entering shipping mode, for the FET to open (ms)
    pub shipping_hold_ms: u32,
    /// Settle time around audio and screen changes (ms)
    pub audio_settle_ms: u32,
    /// Polls waiting for the network to confirm it is down
    pub network_confirm_attempts: u8,
    pub wifi_confirm_interval_ms: u32,
    pub modem_confirm_interval_ms: u32,
    /// Wait before powering the modem back off on WiFi boots (ms)
    pub modem_settle_ms: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            thresholds: BatteryThresholds::default(),
            backoff: BackoffConfig::default(),
            poll_interval_ms: 1000,
            sample_interval_ticks: 1,
            low_battery_countdown: 10,
            low_battery_notice_at: 5,
            boot_hold_secs: 5,
            sleep_wake_interval_s: 300,
            sleep_check_samples: 5,
            sleep_check_spacing_ms: 20,
            refusal_notice_ms: 1000,
            shipping_hold_ms: 3000,
            audio_settle_ms: 100,
            network_confirm_attempts: 10,
            wifi_confirm_interval_ms: 300,
            modem_confirm_interval_ms: 500,
            modem_settle_ms: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_ordering() {
        let t = BatteryThresholds::default();
        assert!(t.empty_mv < t.boot_hold_mv);
        assert!(t.boot_hold_mv < t.full_mv);
    }

    #[test]
    fn test_default_timing() {
        let config = LifecycleConfig::default();
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.low_battery_countdown, 10);
        assert!(config.low_battery_notice_at < config.low_battery_countdown);
        assert_eq!(config.sleep_wake_interval_s, 300);
        assert_eq!(config.backoff.max_s, 60);
    }
}
