//! Battery monitoring
//!
//! Voltage samples flow through three stages: linear mapping to a raw
//! percentage, a moving-average filter for the displayed level, and the
//! low-battery guard that decides when to force a shutdown.

pub mod filter;
pub mod guard;
pub mod level;
pub mod sampler;

pub use filter::MovingAverage;
pub use guard::{GuardStatus, LowBatteryGuard};
pub use level::raw_level;
pub use sampler::{BatterySample, BatterySampler, FILTER_WINDOW};
