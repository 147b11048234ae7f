//! BQ27220 single-cell fuel gauge driver
//!
//! Standard commands are 16-bit little-endian words read with a register
//! pointer write. The gauge is powered from the cell, so an address probe
//! that is not acknowledged means no battery.

use byteorder::{ByteOrder, LittleEndian};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use vigil_core::traits::Gauge;
use vigil_core::PowerError;

use super::GaugeReading;
use crate::error::Error;
use crate::fmt::*;

/// 7-bit I2C address
pub const DEFAULT_ADDRESS: u8 = 0x55;

/// Value returned by [`Bq27220::device_id`]
pub const DEVICE_ID: u16 = 0x0220;

/// Standard commands
pub mod commands {
    #![allow(dead_code)]
    pub const CONTROL: u8 = 0x00;
    pub const TEMPERATURE: u8 = 0x06;
    pub const VOLTAGE: u8 = 0x08;
    pub const BATTERY_STATUS: u8 = 0x0A;
    pub const CURRENT: u8 = 0x0C;
    pub const REMAINING_CAPACITY: u8 = 0x10;
    pub const FULL_CHARGE_CAPACITY: u8 = 0x12;
    pub const AVERAGE_CURRENT: u8 = 0x14;
    pub const TIME_TO_EMPTY: u8 = 0x16;
    pub const TIME_TO_FULL: u8 = 0x18;
    pub const STANDBY_CURRENT: u8 = 0x1A;
    pub const AVERAGE_POWER: u8 = 0x24;
    pub const STATE_OF_CHARGE: u8 = 0x2C;
    pub const CHARGING_VOLTAGE: u8 = 0x30;
    pub const CHARGING_CURRENT: u8 = 0x32;
    pub const OPERATION_STATUS: u8 = 0x3A;
    pub const RAW_CURRENT: u8 = 0x7A;
    pub const RAW_VOLTAGE: u8 = 0x7C;
}

/// Control() subcommands and security keys
pub mod control {
    pub const SEALED: u16 = 0x0030;
    pub const UNSEAL_KEY1: u16 = 0x0414;
    pub const UNSEAL_KEY2: u16 = 0x3672;
}

/// Settle time after each Control() key write
const KEY_DELAY_MS: u32 = 5;

bitflags! {
    /// Contents of BatteryStatus()
    pub struct BatteryStatus: u16 {
        /// Discharging
        const DSG = 1 << 0;
        /// System down threshold reached
        const SYSDWN = 1 << 1;
        /// Terminate discharge alarm
        const TDA = 1 << 2;
        /// Battery present
        const BATTPRES = 1 << 3;
        /// Authentication good
        const AUTH_GD = 1 << 4;
        /// Good OCV measurement taken
        const OCVGD = 1 << 5;
        /// Terminate charge alarm
        const TCA = 1 << 6;
        /// Charge inhibit
        const CHGINH = 1 << 8;
        /// Fully charged
        const FC = 1 << 9;
        /// Overtemperature in discharge
        const OTD = 1 << 10;
        /// Overtemperature in charge
        const OTC = 1 << 11;
        /// Sleep mode
        const SLEEP = 1 << 12;
        /// OCV reading failed
        const OCVFAIL = 1 << 13;
        /// OCV measurement complete
        const OCVCOMP = 1 << 14;
        /// Fully discharged
        const FD = 1 << 15;
    }
}

/// Security mode from OperationStatus() bits 2:1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SecurityMode {
    Reserved,
    FullAccess,
    Unsealed,
    Sealed,
}

impl SecurityMode {
    pub fn from_operation_status(status: u16) -> Self {
        match (status >> 1) & 0b11 {
            0b01 => SecurityMode::FullAccess,
            0b10 => SecurityMode::Unsealed,
            0b11 => SecurityMode::Sealed,
            _ => SecurityMode::Reserved,
        }
    }
}

/// BQ27220 driver
pub struct Bq27220<I, D> {
    i2c: I,
    delay: D,
    addr: u8,
}

impl<I, D, E> Bq27220<I, D>
where
    I: I2c<Error = E>,
    D: DelayNs,
{
    pub fn new(i2c: I, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I, delay: D, addr: u8) -> Self {
        Self { i2c, delay, addr }
    }

    /// Release the bus and delay
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    async fn read_word(&mut self, command: u8) -> Result<u16, Error<E>> {
        let mut response = [0; 2];
        self.i2c
            .write_read(self.addr, &[command], &mut response)
            .await?;
        Ok(LittleEndian::read_u16(&response))
    }

    async fn read_signed(&mut self, command: u8) -> Result<i16, Error<E>> {
        let mut response = [0; 2];
        self.i2c
            .write_read(self.addr, &[command], &mut response)
            .await?;
        Ok(LittleEndian::read_i16(&response))
    }

    async fn write_control(&mut self, subcommand: u16) -> Result<(), Error<E>> {
        let [lsb, msb] = subcommand.to_le_bytes();
        self.i2c
            .write(self.addr, &[commands::CONTROL, lsb, msb])
            .await?;
        Ok(())
    }

    /// Address-only probe
    pub async fn detect(&mut self) -> bool {
        self.i2c.write(self.addr, &[]).await.is_ok()
    }

    pub fn device_id(&self) -> u16 {
        DEVICE_ID
    }

    pub async fn security_mode(&mut self) -> Result<SecurityMode, Error<E>> {
        let status = self.read_word(commands::OPERATION_STATUS).await?;
        Ok(SecurityMode::from_operation_status(status))
    }

    /// Send both unseal keys; `Ok(false)` if the gauge stayed sealed
    pub async fn unseal(&mut self) -> Result<bool, Error<E>> {
        self.write_control(control::UNSEAL_KEY1).await?;
        self.delay.delay_ms(KEY_DELAY_MS).await;
        self.write_control(control::UNSEAL_KEY2).await?;
        self.delay.delay_ms(KEY_DELAY_MS).await;

        let mode = self.security_mode().await?;
        if mode != SecurityMode::Unsealed {
            warn!("bq27220: unseal rejected, mode {:?}", mode);
        }
        Ok(mode == SecurityMode::Unsealed)
    }

    /// Seal the gauge; `Ok(false)` if it did not report sealed afterwards
    pub async fn seal(&mut self) -> Result<bool, Error<E>> {
        self.write_control(control::SEALED).await?;
        self.delay.delay_ms(KEY_DELAY_MS).await;

        let mode = self.security_mode().await?;
        Ok(mode == SecurityMode::Sealed)
    }

    /// Cell temperature (0.1 K)
    pub async fn temperature(&mut self) -> Result<u16, Error<E>> {
        self.read_word(commands::TEMPERATURE).await
    }

    pub async fn voltage_mv(&mut self) -> Result<u16, Error<E>> {
        self.read_word(commands::VOLTAGE).await
    }

    /// Unfiltered ADC voltage
    pub async fn raw_voltage_mv(&mut self) -> Result<u16, Error<E>> {
        self.read_word(commands::RAW_VOLTAGE).await
    }

    /// Charge voltage the gauge is requesting
    pub async fn charging_voltage_mv(&mut self) -> Result<u16, Error<E>> {
        self.read_word(commands::CHARGING_VOLTAGE).await
    }

    pub async fn battery_status(&mut self) -> Result<BatteryStatus, Error<E>> {
        let raw = self.read_word(commands::BATTERY_STATUS).await?;
        Ok(BatteryStatus::from_bits_truncate(raw))
    }

    /// Charging as seen by the gauge: not discharging
    pub async fn is_charging(&mut self) -> Result<bool, Error<E>> {
        let status = self.battery_status().await?;
        Ok(!status.contains(BatteryStatus::DSG))
    }

    pub async fn current_ma(&mut self) -> Result<i16, Error<E>> {
        self.read_signed(commands::CURRENT).await
    }

    pub async fn raw_current_ma(&mut self) -> Result<i16, Error<E>> {
        self.read_signed(commands::RAW_CURRENT).await
    }

    pub async fn average_current_ma(&mut self) -> Result<i16, Error<E>> {
        self.read_signed(commands::AVERAGE_CURRENT).await
    }

    pub async fn standby_current_ma(&mut self) -> Result<i16, Error<E>> {
        self.read_signed(commands::STANDBY_CURRENT).await
    }

    pub async fn charging_current_ma(&mut self) -> Result<i16, Error<E>> {
        self.read_signed(commands::CHARGING_CURRENT).await
    }

    pub async fn remaining_capacity_mah(&mut self) -> Result<u16, Error<E>> {
        self.read_word(commands::REMAINING_CAPACITY).await
    }

    pub async fn full_charge_capacity_mah(&mut self) -> Result<u16, Error<E>> {
        self.read_word(commands::FULL_CHARGE_CAPACITY).await
    }

    /// Relative state of charge (%)
    pub async fn state_of_charge(&mut self) -> Result<u16, Error<E>> {
        self.read_word(commands::STATE_OF_CHARGE).await
    }

    pub async fn time_to_empty_min(&mut self) -> Result<u16, Error<E>> {
        self.read_word(commands::TIME_TO_EMPTY).await
    }

    pub async fn time_to_full_min(&mut self) -> Result<u16, Error<E>> {
        self.read_word(commands::TIME_TO_FULL).await
    }

    /// Average power (mW), negative while discharging
    pub async fn average_power_mw(&mut self) -> Result<i16, Error<E>> {
        self.read_signed(commands::AVERAGE_POWER).await
    }

    /// Read a full snapshot
    pub async fn reading(&mut self) -> Result<GaugeReading, Error<E>> {
        Ok(GaugeReading {
            voltage_mv: self.voltage_mv().await?,
            current_ma: self.current_ma().await?,
            average_current_ma: self.average_current_ma().await?,
            standby_current_ma: self.standby_current_ma().await?,
            charging_current_ma: self.charging_current_ma().await?,
            temperature_dk: self.temperature().await?,
            remaining_capacity_mah: self.remaining_capacity_mah().await?,
            full_charge_capacity_mah: self.full_charge_capacity_mah().await?,
            state_of_charge: self.state_of_charge().await?,
            time_to_empty_min: self.time_to_empty_min().await?,
        })
    }
}

impl<I, D, E> Gauge for Bq27220<I, D>
where
    I: I2c<Error = E>,
    D: DelayNs,
    E: embedded_hal_async::i2c::Error,
{
    async fn detect(&mut self) -> bool {
        Bq27220::detect(self).await
    }

    async fn voltage_mv(&mut self) -> Result<u16, PowerError> {
        Bq27220::voltage_mv(self).await.map_err(PowerError::from)
    }

    async fn current_ma(&mut self) -> Result<i16, PowerError> {
        Bq27220::current_ma(self).await.map_err(PowerError::from)
    }
}
