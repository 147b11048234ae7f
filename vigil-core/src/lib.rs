//! Board-agnostic core logic for the power lifecycle controller
//!
//! This crate contains all logic that does not depend on a specific
//! charger, gauge or board:
//!
//! - Collaborator traits (charger, gauge, display, audio, network)
//! - Lifecycle state machine and events
//! - Battery level filtering and the low-battery kill switch
//! - Boot-time backoff and low-voltage hold
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod battery;
pub mod boot;
pub mod config;
pub mod error;
pub mod state;
pub mod traits;

pub use error::PowerError;
