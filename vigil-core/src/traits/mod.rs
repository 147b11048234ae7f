//! Collaborator traits
//!
//! These traits define the interface between the lifecycle logic and the
//! chip drivers, the UI and the rest of the device firmware.

pub mod charger;
pub mod display;
pub mod gauge;
pub mod system;

pub use charger::{Charger, ChargerState};
pub use display::{Screen, StatusDisplay, StatusDisplayExt};
pub use gauge::Gauge;
pub use system::{AudioControl, NetworkSelector, NetworkType, PowerSaveTimer, System};
