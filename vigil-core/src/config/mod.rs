//! Configuration types
//!
//! Board-agnostic configuration structures. With the `serde` feature enabled
//! they can be loaded from any serde format by the board crate.

pub mod charger;
pub mod lifecycle;

pub use charger::*;
pub use lifecycle::*;
