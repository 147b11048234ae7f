//! Worker loops
//!
//! Plain async functions; the board crate spawns them from its own
//! executor tasks.

pub mod lifecycle;
pub mod modem;

pub use lifecycle::lifecycle_task;
pub use modem::modem_task;
