//! I2C bus configuration and transaction deadlines
//!
//! The charger and gauge share one I2C bus. Every transaction on it is
//! bounded by a fixed deadline so a wedged peripheral shows up as a
//! timeout error instead of stalling the lifecycle worker.

use embassy_time::{with_timeout, Duration};
use embedded_hal_async::i2c::{Error, ErrorKind, ErrorType, I2c, Operation};

/// I2C configuration
#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Per-transaction deadline in milliseconds
    pub timeout_ms: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::FAST
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        timeout_ms: 200,
    };

    /// Fast mode (400 kHz), used by both power ICs
    pub const FAST: Self = Self {
        frequency: 400_000,
        timeout_ms: 200,
    };
}

/// Error from a deadline-bounded transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeadlineError<E> {
    /// The underlying bus reported an error
    Bus(E),
    /// The transaction did not finish before the deadline
    Timeout,
}

impl<E> DeadlineError<E> {
    /// Check if the transaction ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, DeadlineError::Timeout)
    }
}

impl<E: Error> Error for DeadlineError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            DeadlineError::Bus(e) => e.kind(),
            DeadlineError::Timeout => ErrorKind::Other,
        }
    }
}

/// I2C bus wrapper that bounds each transaction with a deadline
pub struct DeadlineI2c<I> {
    inner: I,
    timeout: Duration,
}

impl<I> DeadlineI2c<I> {
    /// Wrap a bus using the deadline from `config`
    pub fn new(inner: I, config: &I2cConfig) -> Self {
        Self {
            inner,
            timeout: Duration::from_millis(config.timeout_ms as u64),
        }
    }

    /// Release the wrapped bus
    pub fn release(self) -> I {
        self.inner
    }
}

impl<I: ErrorType> ErrorType for DeadlineI2c<I> {
    type Error = DeadlineError<I::Error>;
}

impl<I: I2c> I2c for DeadlineI2c<I> {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        match with_timeout(self.timeout, self.inner.transaction(address, operations)).await {
            Ok(result) => result.map_err(DeadlineError::Bus),
            Err(_) => Err(DeadlineError::Timeout),
        }
    }
}
