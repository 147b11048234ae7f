//! Voltage to charge-level mapping

use crate::config::BatteryThresholds;

/// Map a battery voltage to a raw level in `[0, 100]`
///
/// Linear between the empty and full thresholds, clamped at both ends.
pub fn raw_level(voltage_mv: u16, thresholds: &BatteryThresholds) -> f32 {
    if voltage_mv >= thresholds.full_mv {
        return 100.0;
    }
    if voltage_mv <= thresholds.empty_mv {
        return 0.0;
    }

    let span = (thresholds.full_mv - thresholds.empty_mv) as f32;
    (voltage_mv - thresholds.empty_mv) as f32 * 100.0 / span
}
