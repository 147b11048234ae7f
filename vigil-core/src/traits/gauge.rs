//! Fuel gauge trait

use crate::error::PowerError;

/// Battery fuel gauge used by the lifecycle controller
pub trait Gauge {
    /// Check whether the gauge answers on the bus
    ///
    /// The gauge is powered from the cell, so this doubles as battery
    /// presence detection.
    fn detect(&mut self) -> impl core::future::Future<Output = bool>;

    /// Battery terminal voltage (mV)
    fn voltage_mv(&mut self) -> impl core::future::Future<Output = Result<u16, PowerError>>;

    /// Instantaneous current (mA), negative while discharging
    fn current_ma(&mut self) -> impl core::future::Future<Output = Result<i16, PowerError>>;
}
