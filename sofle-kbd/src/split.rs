//! Two halves joined by a UART link. The left half asks for the link and
//! becomes the controller, the right half answers as the receiver. Both
//! then see every switch of the keyboard, tagged with the side it is on.

mod connection;
mod error;
mod message;
mod split_communicator;
mod split_key_switches;
mod split_state;

pub use connection::{Connection, ConnectionExt};
pub use error::Error;
pub use message::Message;
pub use split_communicator::SplitCommunicator;
pub use split_key_switches::{SplitKeySwitchIdentifier, SplitKeySwitches};
pub use split_state::SplitState;
