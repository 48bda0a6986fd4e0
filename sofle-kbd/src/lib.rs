//! Split keyboard firmware building blocks: layered layouts, tap dances,
//! hold-taps, combos, rotary encoders, layer lighting, the split link and
//! USB HID reporting.

#![cfg_attr(not(test), no_std)]

extern crate self as sofle_kbd;

pub mod config;
pub mod encoder;
pub mod french;
pub mod keyboard;
pub mod rgb;
pub mod split;
pub mod time;
pub mod usb;

pub use heapless::Vec;

#[cfg(all(feature = "defmt", not(test)))]
mod log {
    pub(crate) use defmt::{debug, info, warn};
}

#[cfg(not(all(feature = "defmt", not(test))))]
mod log {
    pub(crate) use ::log::{debug, info, warn};
}

/// Values the crate writes to the log with `{:?}`.
#[cfg(feature = "defmt")]
pub trait Loggable: core::fmt::Debug + defmt::Format {}

#[cfg(feature = "defmt")]
impl<T: core::fmt::Debug + defmt::Format> Loggable for T {}

/// Values the crate writes to the log with `{:?}`.
#[cfg(not(feature = "defmt"))]
pub trait Loggable: core::fmt::Debug {}

#[cfg(not(feature = "defmt"))]
impl<T: core::fmt::Debug> Loggable for T {}
