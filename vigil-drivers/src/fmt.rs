//! Keeps defmt optional: without the feature the log macros compile to
//! nothing and `bitflags!` comes from the bitflags crate

#![macro_use]
#![allow(unused_macros, unused_imports)]

#[cfg(feature = "defmt")]
pub use defmt::{bitflags, debug, error, info, warn};

#[cfg(not(feature = "defmt"))]
pub use bitflags::bitflags;

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($(&$x),*);
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($(&$x),*);
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($(&$x),*);
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($(&$x),*);
    }};
}
