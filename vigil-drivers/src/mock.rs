//! Register-file bus and recording delay for driver tests

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// 256-register device behind a register pointer
pub struct MockBus {
    pub address: u8,
    pub regs: [u8; 256],
    /// Every register written, in order
    pub writes: Vec<(u8, u8)>,
    /// Bus transactions of any kind
    pub transactions: usize,
    pub present: bool,
    /// Register, value and count: the register reads as `value` for the
    /// next `count` reads before the register file shows through
    pub stale: Option<(u8, u8, u8)>,
    pointer: u8,
}

impl MockBus {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            regs: [0; 256],
            writes: Vec::new(),
            transactions: 0,
            present: true,
            stale: None,
            pointer: 0,
        }
    }

    pub fn with_reg(mut self, reg: u8, value: u8) -> Self {
        self.regs[reg as usize] = value;
        self
    }

    pub fn with_word(mut self, reg: u8, value: u16) -> Self {
        let [lsb, msb] = value.to_le_bytes();
        self.regs[reg as usize] = lsb;
        self.regs[reg as usize + 1] = msb;
        self
    }

    pub fn written(&self, reg: u8) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(r, _)| *r == reg)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Registers written, in order
    pub fn write_order(&self) -> Vec<u8> {
        self.writes.iter().map(|(r, _)| *r).collect()
    }

    fn read_next(&mut self) -> u8 {
        let reg = self.pointer;
        self.pointer = self.pointer.wrapping_add(1);
        if let Some((stale_reg, value, count)) = self.stale {
            if stale_reg == reg && count > 0 {
                self.stale = Some((stale_reg, value, count - 1));
                return value;
            }
        }
        self.regs[reg as usize]
    }
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl I2c for MockBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        if !self.present || address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&reg, data)) = bytes.split_first() {
                        self.pointer = reg;
                        for &value in data {
                            self.regs[self.pointer as usize] = value;
                            self.writes.push((self.pointer, value));
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                        self.pointer = reg;
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = self.read_next();
                    }
                }
            }
        }
        Ok(())
    }
}

/// Zero-time delay that remembers what it was asked for
#[derive(Default)]
pub struct MockDelay {
    pub calls_ms: Vec<u32>,
    pub total_ns: u64,
}

impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    async fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls_ms.push(ms);
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// Output pin that records every level it is driven to
#[derive(Default)]
pub struct MockPin {
    /// `true` for high
    pub levels: Vec<bool>,
    /// Fail every set after this many successful ones
    pub fail_after: Option<usize>,
}

impl MockPin {
    fn drive(&mut self, high: bool) -> Result<(), embedded_hal::digital::ErrorKind> {
        if self.fail_after.is_some_and(|n| self.levels.len() >= n) {
            return Err(embedded_hal::digital::ErrorKind::Other);
        }
        self.levels.push(high);
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = embedded_hal::digital::ErrorKind;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}
