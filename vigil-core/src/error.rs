//! Error kinds shared by drivers and the lifecycle controller

/// Power subsystem error kinds
///
/// Bus-level kinds are produced by the drivers; the controller logs them and
/// degrades instead of propagating them further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerError {
    /// Bus transaction failed or exceeded its deadline
    BusTimeout,
    /// Device did not acknowledge its address
    DeviceAbsent,
    /// Parameter outside the set the hardware accepts
    InvalidParameter,
    /// Bounded polling loop ran out of attempts
    SequenceTimeout,
    /// Event dropped because the dispatch channel was full
    ChannelFull,
}

impl PowerError {
    /// Check if the error came from the bus rather than from our own logic
    pub fn is_bus_fault(&self) -> bool {
        matches!(self, PowerError::BusTimeout | PowerError::DeviceAbsent)
    }
}
