//! Cellular modem power control
//!
//! The modem's PWRKEY is driven through an inverting transistor: holding
//! the pin high for 2-3.5 s turns the module on, 3.5-4 s turns it off.
//! Sequences are long, so they run on their own task and publish progress
//! through a lock-free [`ModemStatus`].

pub mod sequencer;
pub mod status;

pub use sequencer::{ModemCommand, ModemPowerSequencer, ModemTiming};
pub use status::{ModemPowerState, ModemStatus};
