//! Periodic battery sampling
//!
//! One sample reads the gauge voltage and the charger phase, updates the
//! filtered level and feeds the low-battery guard. The caller decides what
//! to show and whether to post a shutdown.

use crate::config::{BatteryThresholds, LifecycleConfig};
use crate::error::PowerError;
use crate::traits::{Charger, Gauge};

use super::filter::MovingAverage;
use super::guard::{GuardStatus, LowBatteryGuard};
use super::level::raw_level;

/// Samples averaged for the displayed level
pub const FILTER_WINDOW: usize = 60;

/// Result of one battery sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatterySample {
    pub voltage_mv: u16,
    /// Unfiltered level from this sample alone
    pub raw_level: f32,
    /// Filtered, rounded level in `[0, 100]`
    pub level: u8,
    /// Level differs from the previous sample's
    pub level_changed: bool,
    pub charging: bool,
    /// Charging flag differs from the previous sample's
    pub charging_changed: bool,
    pub guard: GuardStatus,
}

/// Battery sampler state carried between ticks
#[derive(Debug, Clone)]
pub struct BatterySampler {
    thresholds: BatteryThresholds,
    filter: MovingAverage<FILTER_WINDOW>,
    guard: LowBatteryGuard,
    interval_ticks: u16,
    ticks: u16,
    last_level: u8,
    last_charging: bool,
}

impl BatterySampler {
    pub fn new(thresholds: BatteryThresholds, countdown: u8, interval_ticks: u16) -> Self {
        Self {
            thresholds,
            filter: MovingAverage::new(),
            guard: LowBatteryGuard::new(countdown),
            interval_ticks: interval_ticks.max(1),
            ticks: 0,
            last_level: 0,
            last_charging: false,
        }
    }

    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self::new(
            config.thresholds,
            config.low_battery_countdown,
            config.sample_interval_ticks,
        )
    }

    /// Advance one tick, returning true when a sample is due
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks >= self.interval_ticks {
            self.ticks = 0;
            true
        } else {
            false
        }
    }

    /// Fold one voltage reading and charge flag into the sampler state
    pub fn update(&mut self, voltage_mv: u16, charging: bool) -> BatterySample {
        let raw = raw_level(voltage_mv, &self.thresholds);
        let filtered = self.filter.update(raw);
        let level = ((filtered + 0.5) as u8).min(100);

        let level_changed = level != self.last_level;
        self.last_level = level;
        let charging_changed = charging != self.last_charging;
        self.last_charging = charging;

        let guard = self
            .guard
            .update(voltage_mv, self.thresholds.empty_mv, charging);

        BatterySample {
            voltage_mv,
            raw_level: raw,
            level,
            level_changed,
            charging,
            charging_changed,
            guard,
        }
    }

    /// Read the gauge and charger and fold the result in
    ///
    /// A failed voltage read leaves the sampler untouched. An unreadable
    /// charge phase counts as not charging.
    pub async fn sample<G: Gauge, C: Charger>(
        &mut self,
        gauge: &mut G,
        charger: &mut C,
    ) -> Result<BatterySample, PowerError> {
        let voltage_mv = gauge.voltage_mv().await?;
        let charging = charger
            .charge_state()
            .await
            .map(|state| state.is_charging())
            .unwrap_or(false);
        Ok(self.update(voltage_mv, charging))
    }

    /// Filtered level, `None` before the first sample
    pub fn level(&self) -> Option<u8> {
        self.filter.average().map(|avg| ((avg + 0.5) as u8).min(100))
    }

    pub fn thresholds(&self) -> &BatteryThresholds {
        &self.thresholds
    }
}
