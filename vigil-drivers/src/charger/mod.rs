//! Battery charger drivers

pub mod aw32001;

pub use aw32001::Aw32001;
