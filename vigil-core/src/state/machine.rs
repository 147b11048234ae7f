//! Lifecycle state definition
//!
//! Every effect the controller performs is bracketed by a [`Step`]; the
//! table below decides which steps are legal from which state.

/// Power lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// Cold start, nothing probed yet
    Booting,
    /// Woke from a no-battery deep sleep and probing again
    AwaitingBattery,
    /// Battery present, event worker running
    Active,
    /// Inside the light-sleep loop
    Sleeping,
    /// Shutdown sequence in progress
    ShuttingDown,
    /// Battery isolated; nothing else will run
    Off,
}

/// Progress reported by the controller as it performs effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Gauge did not answer at boot
    BatteryMissing,
    /// Gauge answered at boot
    BatteryDetected,
    /// Sleep screen shown, audio stopped
    SleepEntered,
    /// Left the sleep loop on a non-timer wake-up
    Woke,
    /// Shutdown accepted (not charging)
    ShutdownStarted,
    /// Shipping mode engaged
    PoweredOff,
}

impl LifecycleState {
    /// Initial state for a boot, given the retained no-battery retry count
    pub fn at_boot(retries: u32) -> Self {
        if retries > 0 {
            LifecycleState::AwaitingBattery
        } else {
            LifecycleState::Booting
        }
    }

    /// Check if queued events may be dispatched in this state
    pub fn accepts_events(&self) -> bool {
        matches!(self, LifecycleState::Active)
    }

    /// Check if the board is on its way out or already off
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::ShuttingDown | LifecycleState::Off)
    }

    /// Apply a step and return the next state
    ///
    /// Steps that are not legal from the current state leave it unchanged.
    pub fn transition(self, step: Step) -> Self {
        use LifecycleState::*;
        use Step::*;

        match (self, step) {
            // Boot transitions
            (Booting, BatteryMissing) => AwaitingBattery,
            (AwaitingBattery, BatteryMissing) => AwaitingBattery,
            (Booting, BatteryDetected) => Active,
            (AwaitingBattery, BatteryDetected) => Active,

            // Sleep loop
            (Active, SleepEntered) => Sleeping,
            (Sleeping, Woke) => Active,

            // Shutdown, also from the boot hold and the sleep-loop escalation
            (Active, ShutdownStarted) => ShuttingDown,
            (Sleeping, ShutdownStarted) => ShuttingDown,
            (ShuttingDown, PoweredOff) => Off,

            // Default: stay in current state
            _ => self,
        }
    }
}
