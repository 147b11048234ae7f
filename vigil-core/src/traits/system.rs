//! Device services the controller coordinates with
//!
//! Audio, the power-save timer and network selection all belong to the
//! device application. The controller drives them but never owns them.

/// Active network transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkType {
    Wifi,
    Cellular,
}

/// Audio pipeline control
pub trait AudioControl {
    fn wake_word_running(&self) -> bool;
    fn enable_wake_word(&mut self, enable: bool);
    /// Codec input and output paths
    fn enable_codec_io(&mut self, enable: bool);
    fn start_audio(&mut self);
    fn stop_audio(&mut self);
}

/// Automatic power-save timer
pub trait PowerSaveTimer {
    fn set_enabled(&mut self, enable: bool);
    fn is_enabled(&self) -> bool;
    /// Reset the inactivity countdown
    fn wake_up(&mut self);
    /// Trigger the timer's own sleep path immediately
    fn manual_sleep(&mut self);
}

/// Network transport selection
pub trait NetworkSelector {
    fn network_type(&self) -> NetworkType;
    /// Toggle to the other transport; the device reboots into it
    fn switch_network(&mut self);
    /// Drop stored WiFi credentials and reboot into provisioning
    fn reset_wifi_config(&mut self);
}

/// Everything the controller needs from the device application
pub trait System: AudioControl + PowerSaveTimer + NetworkSelector {}

impl<T: AudioControl + PowerSaveTimer + NetworkSelector> System for T {}
