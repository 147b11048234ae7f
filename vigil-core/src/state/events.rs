//! Events posted to the lifecycle controller

/// Requests handled by the lifecycle event worker
///
/// Any context (button handler, UI callback, the controller's own battery
/// sampler) may post these. They are processed strictly in order, one at a
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleEvent {
    /// Power the board off (refused while charging)
    Shutdown,
    /// Enter the low-power sleep loop
    Sleep,
    /// Wake from the sleep loop
    WakeUp,
    /// Toggle between WiFi and cellular
    SwitchNetwork,
    /// Forget stored WiFi credentials (WiFi boards only)
    ClearNetworkConfig,
    /// Sleep now, through the power-save timer when it is enabled
    ManualSleep,
    /// Flip the automatic power-save timer
    ToggleAutoSleep,
}

impl LifecycleEvent {
    /// Check if this event changes the power state
    pub fn is_power_event(&self) -> bool {
        matches!(
            self,
            LifecycleEvent::Shutdown
                | LifecycleEvent::Sleep
                | LifecycleEvent::WakeUp
                | LifecycleEvent::ManualSleep
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_events() {
        assert!(LifecycleEvent::Shutdown.is_power_event());
        assert!(LifecycleEvent::Sleep.is_power_event());
        assert!(LifecycleEvent::ManualSleep.is_power_event());
        assert!(!LifecycleEvent::SwitchNetwork.is_power_event());
        assert!(!LifecycleEvent::ToggleAutoSleep.is_power_event());
    }
}
