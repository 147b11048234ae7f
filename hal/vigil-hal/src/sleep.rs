//! Sleep and power-off control
//!
//! The lifecycle controller decides *when* to sleep; the platform decides
//! *how*. Light sleep keeps RAM and resumes the caller, deep sleep restarts
//! the firmware from the reset vector (only retained memory survives).

use embassy_time::Duration;

/// Why the chip last left a sleep state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeCause {
    /// Cold boot or reset, not a wake-up
    PowerOn,
    /// The sleep timer expired
    Timer,
    /// A wake-up pin (button, touch panel) fired
    External,
    /// Any other wake source
    Other,
}

/// Platform sleep control
pub trait SleepControl {
    /// Cause of the most recent wake-up (or `PowerOn` after a cold boot)
    fn wake_cause(&self) -> WakeCause;

    /// Enter light sleep until `wake_after` elapses or an external source fires
    ///
    /// Returns the cause that ended the sleep.
    fn light_sleep(&mut self, wake_after: Duration) -> impl core::future::Future<Output = WakeCause>;

    /// Enter deep sleep with a timer wake-up after `wake_after`
    ///
    /// On hardware this does not return; the firmware restarts on wake.
    fn deep_sleep(&mut self, wake_after: Duration);

    /// Stop all activity; used once the battery has been isolated
    fn power_off(&mut self);
}
