pub mod action;
mod combo;
mod controller;
mod external_communicator;
mod hold_tap;
mod key;
mod key_switches;
mod keyboard_state;
mod layer;
mod layout;
mod modifiers;
mod report;
mod tap_dance;

pub use action::{Action, Keystroke};
pub use combo::Combo;
pub use controller::Controller;
pub use external_communicator::ExternalCommunicator;
pub use key::Key;
pub use key_switches::{KeySwitchIdentifier, KeySwitches};
pub use keyboard_state::KeyboardState;
pub use layer::{Layer, LayerState};
pub use layout::Layout;
pub use modifiers::Modifiers;
pub use report::Report;
pub use sofle_kbd_macros::layout;
pub use tap_dance::TapDance;
