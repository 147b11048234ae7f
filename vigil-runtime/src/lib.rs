//! Vigil lifecycle runtime
//!
//! Wires the board-agnostic pieces of `vigil-core` and the drivers into
//! the two workers a board runs:
//!
//! - [`tasks::lifecycle_task`] - boot checks, then the event loop that owns
//!   the charger, the gauge and the lifecycle state
//! - [`tasks::modem_task`] - PWRKEY sequences, fed through a command channel
//!
//! Everything else (buttons, UI callbacks, the power-save timer) only
//! posts [`LifecycleEvent`](vigil_core::state::LifecycleEvent)s through an
//! [`EventSender`].
//!
//! The crate does not pick an executor. Board binaries wrap the task
//! functions in their own `#[embassy_executor::task]` items and hand them
//! the statics from [`channels`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub(crate) mod fmt;

pub mod channels;
pub mod controller;
pub mod modem;
pub mod tasks;

pub use channels::{EventChannel, EventSender, ModemChannel};
pub use controller::{Board, BootOutcome, Dispatch, LifecycleController};
pub use modem::ModemHandle;
