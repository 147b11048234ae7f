//! AW32001 linear charger driver
//!
//! Single-cell charger with power path, I2C configured. Every setter is a
//! read-modify-write of one register; bits outside the field are preserved.
//!
//! Out-of-range values are clamped to the nearest legal setting (and logged).
//! The watchdog timeout is the exception: only four values exist, anything
//! else is rejected before touching the bus.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use vigil_core::config::{
    ChargerConfig, IntWakeupTime, PrechargeThreshold, WatchdogTimeout, CHARGE_CURRENT_MAX_MA,
    CHARGE_CURRENT_STEP_MA, CHARGE_VOLTAGE_MAX_MV, CHARGE_VOLTAGE_MIN_MV, CHARGE_VOLTAGE_STEP_MV,
    DISCHARGE_CURRENT_MAX_MA, DISCHARGE_CURRENT_MIN_MA, DISCHARGE_CURRENT_STEP_MA,
    PRECHARGE_CURRENT_MAX_MA,
};
use vigil_core::traits::{Charger, ChargerState};
use vigil_core::PowerError;

use crate::error::Error;
use crate::fmt::*;

/// 7-bit I2C address
pub const DEFAULT_ADDRESS: u8 = 0x49;

/// Register addresses
pub mod reg {
    /// Input source / power configuration
    pub const PWR_CFG: u8 = 0x01;
    /// Charge current (bits 5:0), watchdog reset (bit 6)
    pub const CHG_CURRENT: u8 = 0x02;
    /// Discharge current limit (bits 7:4)
    pub const DISCHG_CURRENT: u8 = 0x03;
    /// Charge voltage (bits 7:2), precharge threshold (bit 1), recharge threshold (bit 0)
    pub const CHG_VOLTAGE: u8 = 0x04;
    /// Watchdog timer control
    pub const TIMER_WDT: u8 = 0x05;
    /// NTC (bit 7), FET_DIS (bit 5)
    pub const MAIN_CTRL: u8 = 0x06;
    /// Charge phase in bits 4:3
    pub const SYS_STATUS: u8 = 0x08;
    /// Shipping mode entry deglitch (bits 7:6)
    pub const SHIP_DEGLITCH: u8 = 0x09;
    /// Precharge current (bits 4:1), VIN deglitch (bit 0)
    pub const PRECHARGE: u8 = 0x0B;
    /// Additional function control
    pub const ADDL_FUNC: u8 = 0x0C;
    /// INT pin wake-up time (bit 3)
    pub const INT_WAKEUP: u8 = 0x22;

    /// Highest register covered by the diagnostic dump
    pub const DUMP_LAST: u8 = ADDL_FUNC;
}

const PWR_CFG_CEB: u8 = 1 << 3;
/// VBAT UVLO at 3.03 V
const PWR_CFG_UVLO_3V03: u8 = 0b111;
const CHG_CURRENT_WD_RST: u8 = 1 << 6;
const CHG_VOLTAGE_VBAT_PRE: u8 = 1 << 1;
const CHG_VOLTAGE_VRECH: u8 = 1 << 0;
const TIMER_WDT_DIS_WD: u8 = 1 << 7;
const MAIN_CTRL_EN_NTC: u8 = 1 << 7;
const MAIN_CTRL_FET_DIS: u8 = 1 << 5;
/// MAIN_CTRL value once the chip has left shipping mode
const MAIN_CTRL_RUNNING: u8 = 0x40;
const PRECHARGE_VIN_DEGLITCH: u8 = 1 << 0;
/// Keeps the INT pin as a wake-up input while in shipping mode
const ADDL_FUNC_SHIPPING_MASK: u8 = 0x0B;
const INT_WAKEUP_100MS: u8 = 1 << 3;

const SHIPPING_EXIT_POLLS: u8 = 10;
const SHIPPING_EXIT_POLL_MS: u32 = 100;

fn encode_charge_current(current: u8, ma: u16) -> u8 {
    let code = (ma.min(CHARGE_CURRENT_MAX_MA) / CHARGE_CURRENT_STEP_MA) as u8;
    (current & 0xC0) | (code & 0x3F)
}

fn encode_discharge_current(current: u8, ma: u16) -> u8 {
    let ma = ma.clamp(DISCHARGE_CURRENT_MIN_MA, DISCHARGE_CURRENT_MAX_MA);
    let code = (ma / DISCHARGE_CURRENT_STEP_MA - 1) as u8;
    (current & 0x0F) | (code << 4)
}

fn encode_charge_voltage(current: u8, mv: u16) -> u8 {
    let mv = mv.clamp(CHARGE_VOLTAGE_MIN_MV, CHARGE_VOLTAGE_MAX_MV);
    let code = ((mv - CHARGE_VOLTAGE_MIN_MV) / CHARGE_VOLTAGE_STEP_MV) as u8;
    (current & 0x03) | (code << 2)
}

fn encode_precharge_current(current: u8, ma: u16) -> u8 {
    let code = (ma.clamp(1, PRECHARGE_CURRENT_MAX_MA) / 2) as u8;
    (current & 0xE1) | ((code << 1) & 0x1E) | PRECHARGE_VIN_DEGLITCH
}

fn encode_watchdog(current: u8, timeout: WatchdogTimeout, discharge: bool) -> u8 {
    let mut value = (current & !(0b11 << 5)) | (timeout.bits() << 5);
    if discharge {
        value |= TIMER_WDT_DIS_WD;
    } else {
        value &= !TIMER_WDT_DIS_WD;
    }
    value
}

/// AW32001 driver
pub struct Aw32001<I, D> {
    i2c: I,
    delay: D,
    addr: u8,
}

impl<I, D, E> Aw32001<I, D>
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

    async fn read_reg(&mut self, reg: u8) -> Result<u8, Error<E>> {
        let mut value = [0];
        self.i2c.write_read(self.addr, &[reg], &mut value).await?;
        Ok(value[0])
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error<E>> {
        self.i2c.write(self.addr, &[reg, value]).await?;
        Ok(())
    }

    async fn modify_reg(&mut self, reg: u8, f: impl FnOnce(u8) -> u8) -> Result<(), Error<E>> {
        let value = self.read_reg(reg).await?;
        self.write_reg(reg, f(value)).await
    }

    async fn set_bit(&mut self, reg: u8, mask: u8, set: bool) -> Result<(), Error<E>> {
        self.modify_reg(reg, |v| if set { v | mask } else { v & !mask })
            .await
    }

    /// Power-on setup: watchdog off, 1 s shipping entry deglitch, 100 ms INT wake-up
    pub async fn init(&mut self) -> Result<(), Error<E>> {
        self.set_watchdog(0, false).await?;
        self.modify_reg(reg::SHIP_DEGLITCH, |v| v & 0x3F).await?;
        self.set_int_wakeup_time(IntWakeupTime::Short).await?;
        debug!("aw32001: initialized");
        Ok(())
    }

    /// Set the fast-charge current (0-456 mA, 8 mA steps)
    pub async fn set_charge_current(&mut self, ma: u16) -> Result<(), Error<E>> {
        if ma > CHARGE_CURRENT_MAX_MA {
            warn!("aw32001: charge current {} mA clamped", ma);
        }
        self.modify_reg(reg::CHG_CURRENT, |v| encode_charge_current(v, ma))
            .await
    }

    /// Set the discharge current limit (200-3200 mA, 200 mA steps)
    pub async fn set_discharge_current(&mut self, ma: u16) -> Result<(), Error<E>> {
        if !(DISCHARGE_CURRENT_MIN_MA..=DISCHARGE_CURRENT_MAX_MA).contains(&ma) {
            warn!("aw32001: discharge current {} mA clamped", ma);
        }
        self.modify_reg(reg::DISCHG_CURRENT, |v| encode_discharge_current(v, ma))
            .await
    }

    /// Set the charge termination voltage (3600-4545 mV, 15 mV steps)
    pub async fn set_charge_voltage(&mut self, mv: u16) -> Result<(), Error<E>> {
        if !(CHARGE_VOLTAGE_MIN_MV..=CHARGE_VOLTAGE_MAX_MV).contains(&mv) {
            warn!("aw32001: charge voltage {} mV clamped", mv);
        }
        self.modify_reg(reg::CHG_VOLTAGE, |v| encode_charge_voltage(v, mv))
            .await
    }

    /// Set the precharge current (1-31 mA, odd values)
    pub async fn set_precharge_current(&mut self, ma: u16) -> Result<(), Error<E>> {
        if !(1..=PRECHARGE_CURRENT_MAX_MA).contains(&ma) {
            warn!("aw32001: precharge current {} mA clamped", ma);
        }
        self.modify_reg(reg::PRECHARGE, |v| encode_precharge_current(v, ma))
            .await
    }

    /// Select the precharge to fast-charge threshold; also sets 100 mV recharge
    pub async fn set_precharge_threshold(
        &mut self,
        threshold: PrechargeThreshold,
    ) -> Result<(), Error<E>> {
        self.modify_reg(reg::CHG_VOLTAGE, |v| {
            let v = match threshold {
                PrechargeThreshold::Low => v & !CHG_VOLTAGE_VBAT_PRE,
                PrechargeThreshold::High => v | CHG_VOLTAGE_VBAT_PRE,
            };
            v & !CHG_VOLTAGE_VRECH
        })
        .await
    }

    /// Set the watchdog timeout (0, 40, 80 or 160 s) and discharge watchdog
    ///
    /// Any other timeout returns `InvalidParameter` without bus access.
    pub async fn set_watchdog(&mut self, timeout_s: u16, discharge: bool) -> Result<(), Error<E>> {
        let Some(timeout) = WatchdogTimeout::from_secs(timeout_s) else {
            warn!("aw32001: unsupported watchdog timeout {} s", timeout_s);
            return Err(Error::InvalidParameter);
        };
        self.modify_reg(reg::TIMER_WDT, |v| encode_watchdog(v, timeout, discharge))
            .await
    }

    /// Kick the watchdog
    pub async fn reset_watchdog(&mut self) -> Result<(), Error<E>> {
        self.set_bit(reg::CHG_CURRENT, CHG_CURRENT_WD_RST, true).await
    }

    /// Enable or disable charging; UVLO is forced to 3.03 V on every call
    pub async fn set_charge(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.modify_reg(reg::PWR_CFG, |v| {
            let v = if enable { v & !PWR_CFG_CEB } else { v | PWR_CFG_CEB };
            v | PWR_CFG_UVLO_3V03
        })
        .await
    }

    pub async fn set_ntc(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.set_bit(reg::MAIN_CTRL, MAIN_CTRL_EN_NTC, enable).await
    }

    pub async fn set_int_wakeup_time(&mut self, time: IntWakeupTime) -> Result<(), Error<E>> {
        self.set_bit(
            reg::INT_WAKEUP,
            INT_WAKEUP_100MS,
            time == IntWakeupTime::Short,
        )
        .await
    }

    /// Enter or leave shipping mode
    ///
    /// Leaving polls MAIN_CTRL until the chip reports it is running. If it
    /// never does, FET_DIS is still cleared and `SequenceTimeout` returned.
    pub async fn set_shipping_mode(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.modify_reg(reg::ADDL_FUNC, |v| v & ADDL_FUNC_SHIPPING_MASK)
            .await?;

        if enable {
            info!("aw32001: entering shipping mode");
            return self.set_bit(reg::MAIN_CTRL, MAIN_CTRL_FET_DIS, true).await;
        }

        let mut value = 0;
        let mut exited = false;
        for attempt in 0..SHIPPING_EXIT_POLLS {
            value = self.read_reg(reg::MAIN_CTRL).await?;
            if value == MAIN_CTRL_RUNNING {
                exited = true;
                break;
            }
            debug!("aw32001: shipping exit pending ({}), main ctrl {:#x}", attempt, value);
            self.delay.delay_ms(SHIPPING_EXIT_POLL_MS).await;
        }

        self.write_reg(reg::MAIN_CTRL, value & !MAIN_CTRL_FET_DIS)
            .await?;

        if exited {
            Ok(())
        } else {
            error!("aw32001: shipping mode exit not confirmed");
            Err(Error::SequenceTimeout)
        }
    }

    /// Read the charge phase
    pub async fn charge_state(&mut self) -> Result<ChargerState, Error<E>> {
        let status = self.read_reg(reg::SYS_STATUS).await?;
        Ok(ChargerState::from_bits(status >> 3))
    }

    /// Board bring-up sequence, starting with [`init`](Self::init)
    ///
    /// A shipping exit that is not confirmed is logged and the rest of the
    /// setup still applied.
    pub async fn configure(&mut self, config: &ChargerConfig) -> Result<(), Error<E>> {
        self.init().await?;
        match self.set_shipping_mode(false).await {
            Err(Error::SequenceTimeout) => warn!("aw32001: continuing setup after shipping exit timeout"),
            other => other?,
        }
        self.set_ntc(config.ntc_enabled).await?;
        self.set_discharge_current(config.discharge_current_ma)
            .await?;
        self.set_charge_current(config.charge_current_ma).await?;
        self.set_charge_voltage(config.charge_voltage_mv).await?;
        self.set_precharge_current(config.precharge_current_ma)
            .await?;
        self.set_precharge_threshold(config.precharge_threshold)
            .await?;
        self.set_watchdog(config.watchdog.as_secs(), config.discharge_watchdog)
            .await?;
        self.set_int_wakeup_time(config.int_wakeup).await?;
        self.set_charge(config.charge_enabled).await?;
        info!("aw32001: configured");
        Ok(())
    }

    /// Log registers `start..=end`; only the 0x00-0x0C block is dumpable
    pub async fn dump_registers(&mut self, start: u8, end: u8) -> Result<(), Error<E>> {
        if start > end || end > reg::DUMP_LAST {
            warn!("aw32001: invalid dump range {:#x}-{:#x}", start, end);
            return Err(Error::InvalidParameter);
        }

        for addr in start..=end {
            let value = self.read_reg(addr).await?;
            info!("aw32001: reg {:#x} = {:#b}", addr, value);
        }
        Ok(())
    }
}

impl<I, D, E> Charger for Aw32001<I, D>
where
    I: I2c<Error = E>,
    D: DelayNs,
    E: embedded_hal_async::i2c::Error,
{
    async fn charge_state(&mut self) -> Result<ChargerState, PowerError> {
        Aw32001::charge_state(self).await.map_err(PowerError::from)
    }

    async fn set_shipping_mode(&mut self, enable: bool) -> Result<(), PowerError> {
        Aw32001::set_shipping_mode(self, enable)
            .await
            .map_err(PowerError::from)
    }

    async fn configure(&mut self, config: &ChargerConfig) -> Result<(), PowerError> {
        Aw32001::configure(self, config)
            .await
            .map_err(PowerError::from)
    }
}
