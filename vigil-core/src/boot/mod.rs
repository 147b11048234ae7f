//! Boot-time battery checks
//!
//! Two pieces of pure policy used before the event worker starts: the
//! no-battery deep-sleep backoff and the low-voltage boot hold.

pub mod backoff;
pub mod hold;

pub use backoff::BootBackoff;
pub use hold::{BootHold, HoldStatus};
