//! Driver error type

use embedded_hal_async::i2c::{self, ErrorKind, NoAcknowledgeSource};
use vigil_core::PowerError;

/// Driver error, generic over the underlying bus or pin error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bus or pin operation failed
    Bus(E),
    /// Parameter outside the set the hardware accepts; nothing was written
    InvalidParameter,
    /// Bounded polling loop ran out of attempts
    SequenceTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Self::Bus(e)
    }
}

impl<E> Error<E> {
    pub fn is_bus(&self) -> bool {
        matches!(self, Error::Bus(_))
    }
}

impl<E: i2c::Error> From<Error<E>> for PowerError {
    fn from(e: Error<E>) -> Self {
        match e {
            Error::Bus(bus) => match bus.kind() {
                ErrorKind::NoAcknowledge(
                    NoAcknowledgeSource::Address | NoAcknowledgeSource::Unknown,
                ) => PowerError::DeviceAbsent,
                _ => PowerError::BusTimeout,
            },
            Error::InvalidParameter => PowerError::InvalidParameter,
            Error::SequenceTimeout => PowerError::SequenceTimeout,
        }
    }
}
