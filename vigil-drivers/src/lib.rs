//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in vigil-core for the power path of the board:
//!
//! - AW32001 linear charger with power path
//! - BQ27220 fuel gauge
//! - Cellular modem power-key sequencer

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub(crate) mod fmt;

pub mod charger;
pub mod error;
pub mod gauge;
pub mod modem;

#[cfg(test)]
pub(crate) mod mock;

pub use error::Error;
