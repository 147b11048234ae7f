//! PWRKEY pulse sequencer

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use super::status::{ModemPowerState, ModemStatus};
use crate::error::Error;
use crate::fmt::*;

/// PWRKEY pulse timing (ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemTiming {
    /// Low time before the pulse
    pub release_ms: u32,
    /// High time that turns the module on
    pub power_on_hold_ms: u32,
    /// High time that turns the module off
    pub power_off_hold_ms: u32,
}

impl Default for ModemTiming {
    fn default() -> Self {
        Self {
            release_ms: 100,
            power_on_hold_ms: 2500,
            power_off_hold_ms: 3750,
        }
    }
}

/// Work item for the modem task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemCommand {
    PowerOn,
    /// Wait `settle_ms` (module still booting) before the off pulse
    PowerOff { settle_ms: u32 },
}

/// Drives the PWRKEY pin and publishes the resulting state
///
/// A pin failure aborts the sequence and leaves the state in its
/// `Powering*` value; waiters see the sequence as never completing.
pub struct ModemPowerSequencer<'a, P, D> {
    pin: P,
    delay: D,
    timing: ModemTiming,
    status: &'a ModemStatus,
}

impl<'a, P, D, E> ModemPowerSequencer<'a, P, D>
where
    P: OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D, timing: ModemTiming, status: &'a ModemStatus) -> Self {
        Self {
            pin,
            delay,
            timing,
            status,
        }
    }

    pub fn status(&self) -> ModemPowerState {
        self.status.state()
    }

    /// Release the pin and delay
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    async fn pulse(&mut self, hold_ms: u32) -> Result<(), Error<E>> {
        self.pin.set_low()?;
        self.delay.delay_ms(self.timing.release_ms).await;
        self.pin.set_high()?;
        self.delay.delay_ms(hold_ms).await;
        self.pin.set_low()?;
        Ok(())
    }

    pub async fn power_on(&mut self) -> Result<(), Error<E>> {
        info!("modem: power on");
        self.status.set(ModemPowerState::PoweringOn);
        self.pulse(self.timing.power_on_hold_ms).await?;
        self.status.set(ModemPowerState::On);
        Ok(())
    }

    pub async fn power_off(&mut self, settle_ms: u32) -> Result<(), Error<E>> {
        if settle_ms > 0 {
            self.delay.delay_ms(settle_ms).await;
        }
        info!("modem: power off");
        self.status.set(ModemPowerState::PoweringOff);
        self.pulse(self.timing.power_off_hold_ms).await?;
        self.status.set(ModemPowerState::Off);
        Ok(())
    }

    pub async fn execute(&mut self, command: ModemCommand) -> Result<(), Error<E>> {
        let result = match command {
            ModemCommand::PowerOn => self.power_on().await,
            ModemCommand::PowerOff { settle_ms } => self.power_off(settle_ms).await,
        };
        if result.is_err() {
            error!("modem: {:?} aborted, pin error", command);
        }
        result
    }
}
