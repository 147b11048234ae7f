//! Vigil Platform Abstraction Layer
//!
//! This crate defines the platform traits the power controller needs beyond
//! the plain `embedded-hal` bus and pin traits. Chip-specific board support
//! (ESP32-S3 RTC memory, light/deep sleep) implements them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  vigil-runtime (lifecycle controller)   │
//! └─────────────────────────────────────────┘
//!           │                      │
//!           ▼                      ▼
//! ┌──────────────────┐  ┌──────────────────┐
//! │    vigil-hal     │  │ embedded-hal-    │
//! │ (sleep, retained)│  │ async (bus, pin) │
//! └──────────────────┘  └──────────────────┘
//!           │                      │
//!           └──────────┬───────────┘
//!                      ▼
//!             ┌────────────────┐
//!             │ board support  │
//!             └────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`retained::RetainedMemory`] - Words that survive deep sleep
//! - [`sleep::SleepControl`] - Light/deep sleep and power-off
//! - [`i2c::DeadlineI2c`] - Per-transaction bus deadline

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod retained;
pub mod sleep;

// Re-export key items at crate root for convenience
pub use i2c::{DeadlineError, DeadlineI2c, I2cConfig};
pub use retained::{RetainedMemory, RetainedSlot};
pub use sleep::{SleepControl, WakeCause};
