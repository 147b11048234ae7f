//! No-battery retry backoff
//!
//! The delay grows linearly, `base + step * retry`, up to a cap.
//!
//! The retry count lives in memory that survives deep sleep; this type
//! only computes with it. The board loads it before constructing and
//! stores [`BootBackoff::retries`] back before sleeping.

use crate::config::BackoffConfig;

#[derive(Debug, Clone)]
pub struct BootBackoff {
    config: BackoffConfig,
    retries: u32,
}

impl BootBackoff {
    /// Resume from a retry count loaded from retained memory
    pub fn resume(config: BackoffConfig, retries: u32) -> Self {
        Self { config, retries }
    }

    /// Linear sleep duration for the given retry number (seconds)
    pub fn delay_secs(config: &BackoffConfig, retry: u32) -> u32 {
        config
            .base_s
            .saturating_add(config.step_s.saturating_mul(retry))
            .min(config.max_s)
    }

    /// Record another missed detection and return how long to sleep
    pub fn battery_missing(&mut self) -> u32 {
        let secs = Self::delay_secs(&self.config, self.retries);
        self.retries = self.retries.saturating_add(1);
        secs
    }

    /// Battery found; the next absence starts the schedule over
    pub fn battery_found(&mut self) {
        self.retries = 0;
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}
