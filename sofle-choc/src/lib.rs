//! Sofle Choc keymap and board constants. The firmware binary lives under
//! `src/bin/firmware` and needs the `firmware` feature.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod keymap;
mod switch_identifier;

pub use switch_identifier::{KeySwitchIdentifier, SplitSwitch};
