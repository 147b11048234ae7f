//! Power lifecycle state machine
//!
//! The controller owns exactly one `LifecycleState` and moves it only through
//! [`LifecycleState::transition`].

pub mod events;
pub mod machine;

pub use events::LifecycleEvent;
pub use machine::{LifecycleState, Step};
