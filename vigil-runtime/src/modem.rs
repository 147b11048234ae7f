//! Controller-side modem handle
//!
//! The lifecycle worker never touches the PWRKEY pin. It queues commands
//! for the modem worker and reads back the published rail state.

use embassy_sync::blocking_mutex::raw::RawMutex;
use vigil_core::PowerError;
use vigil_drivers::modem::{ModemCommand, ModemPowerState, ModemStatus};

use crate::channels::ModemChannel;
use crate::fmt::*;

/// Queues modem sequences and tracks what was last asked for
///
/// Requests must alternate between on and off. A repeated request is
/// ignored, so at most one pulse of each kind is ever queued.
pub struct ModemHandle<'a, M: RawMutex> {
    commands: &'a ModemChannel<M>,
    status: &'a ModemStatus,
    requested_on: bool,
}

impl<'a, M: RawMutex> ModemHandle<'a, M> {
    pub fn new(commands: &'a ModemChannel<M>, status: &'a ModemStatus) -> Self {
        Self {
            commands,
            status,
            requested_on: false,
        }
    }

    pub fn request_power_on(&mut self) -> Result<(), PowerError> {
        if self.requested_on {
            debug!("modem: power on already requested");
            return Ok(());
        }
        self.send(ModemCommand::PowerOn)?;
        self.requested_on = true;
        Ok(())
    }

    /// Queue a power-off, delayed by `settle_ms` on the modem worker
    pub fn request_power_off(&mut self, settle_ms: u32) -> Result<(), PowerError> {
        if !self.requested_on {
            debug!("modem: not powered, power off skipped");
            return Ok(());
        }
        self.send(ModemCommand::PowerOff { settle_ms })?;
        self.requested_on = false;
        Ok(())
    }

    fn send(&self, command: ModemCommand) -> Result<(), PowerError> {
        self.commands.try_send(command).map_err(|_| {
            warn!("modem: {:?} dropped, queue full", command);
            PowerError::ChannelFull
        })
    }

    pub fn state(&self) -> ModemPowerState {
        self.status.state()
    }

    /// True once every queued command has run and the rail is off
    pub fn is_off(&self) -> bool {
        self.commands.is_empty() && self.status.is_off()
    }

    pub fn requested_on(&self) -> bool {
        self.requested_on
    }
}
